use chrono::{Duration, NaiveDate};
use egui::{Color32, Context, RichText, Window};

use crate::model::period::PERIOD_PRESETS;
use crate::model::{Funnel, Period};
use crate::ui::theme;

/// Editable copy of the funnel-level fields.
#[derive(Debug, Clone)]
pub struct FunnelSettingsDraft {
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub base_date: NaiveDate,
    pub base_date_days: u32,
    pub base_date_label: String,
    pub periods: Vec<Period>,
}

impl FunnelSettingsDraft {
    pub fn from_funnel(funnel: &Funnel) -> Self {
        Self {
            name: funnel.name.clone(),
            description: funnel.description.clone(),
            start_date: funnel.start_date,
            end_date: funnel.end_date,
            base_date: funnel.base_date,
            base_date_days: funnel.base_date_days,
            base_date_label: funnel.base_date_label.clone(),
            periods: funnel.periods.clone(),
        }
    }

    /// Problems that block Apply.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name can't be empty".to_string());
        }
        if self.end_date < self.start_date {
            return Err("The display range ends before it starts".to_string());
        }
        if let Some(p) = self.periods.iter().find(|p| p.end_date < p.start_date) {
            return Err(format!("Period '{}' ends before it starts", p.name));
        }
        Ok(())
    }

    pub fn apply_to(&self, funnel: &mut Funnel) {
        funnel.name = self.name.trim().to_string();
        funnel.description = self.description.clone();
        funnel.start_date = self.start_date;
        funnel.end_date = self.end_date;
        funnel.base_date = self.base_date;
        funnel.base_date_days = self.base_date_days.max(1);
        funnel.base_date_label = self.base_date_label.clone();
        funnel.periods = self.periods.clone();
        funnel.touch();
    }

    fn add_period(&mut self) {
        let mut period = Period::new(
            format!("Period {}", self.periods.len() + 1),
            self.start_date,
            self.start_date + Duration::days(6),
        );
        period.color = PERIOD_PRESETS[(self.periods.len() + 1) % PERIOD_PRESETS.len()];
        self.periods.push(period);
    }
}

pub enum SettingsResult {
    None,
    Apply,
    Close,
}

/// Render the "Funnel Settings" dialog.
pub fn show_funnel_settings_dialog(
    draft: &mut FunnelSettingsDraft,
    error: &mut Option<String>,
    ctx: &Context,
) -> SettingsResult {
    let mut result = SettingsResult::None;

    Window::new(RichText::new("Funnel Settings").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH + 80.0, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.add_space(4.0);

            egui::Grid::new("funnel_settings_grid")
                .num_columns(2)
                .striped(false)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                    ui.add_sized([260.0, 24.0], egui::TextEdit::singleline(&mut draft.name));
                    ui.end_row();

                    ui.label(RichText::new("Description").color(theme::TEXT_SECONDARY));
                    ui.add_sized([260.0, 48.0], egui::TextEdit::multiline(&mut draft.description));
                    ui.end_row();

                    ui.label(RichText::new("Timeline from").color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        ui.add(egui_extras::DatePickerButton::new(&mut draft.start_date).id_salt("funnel_dp_start"));
                        ui.label("to");
                        ui.add(egui_extras::DatePickerButton::new(&mut draft.end_date).id_salt("funnel_dp_end"));
                    });
                    ui.end_row();

                    ui.label(RichText::new("Base date").color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        ui.add(egui_extras::DatePickerButton::new(&mut draft.base_date).id_salt("funnel_dp_base"));
                        ui.add(egui::DragValue::new(&mut draft.base_date_days).range(1..=60).suffix(" days"));
                    });
                    ui.end_row();

                    ui.label(RichText::new("Base label").color(theme::TEXT_SECONDARY));
                    ui.add_sized([260.0, 24.0], egui::TextEdit::singleline(&mut draft.base_date_label));
                    ui.end_row();
                });

            ui.add_space(8.0);
            ui.label(RichText::new("Periods").strong());
            ui.add_space(2.0);
            let mut remove = None;
            for (i, period) in draft.periods.iter_mut().enumerate() {
                ui.horizontal(|ui| {
                    let (dot, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                    ui.painter().circle_filled(dot.center(), 5.0, period.color);
                    ui.add(egui::TextEdit::singleline(&mut period.name).desired_width(110.0));
                    let start_salt = format!("period_start_{i}");
                    let end_salt = format!("period_end_{i}");
                    ui.add(egui_extras::DatePickerButton::new(&mut period.start_date).id_salt(&start_salt));
                    ui.add(egui_extras::DatePickerButton::new(&mut period.end_date).id_salt(&end_salt));
                    if ui.small_button(egui_phosphor::regular::TRASH).clicked() {
                        remove = Some(i);
                    }
                });
            }
            if let Some(i) = remove {
                draft.periods.remove(i);
            }
            if ui.button(format!("{}  Add period", egui_phosphor::regular::PLUS)).clicked() {
                draft.add_period();
            }

            if let Some(message) = error.as_deref() {
                ui.add_space(4.0);
                ui.label(RichText::new(message).color(theme::TODAY_LINE).small());
            }

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let apply_btn = egui::Button::new(RichText::new("Apply").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], apply_btn).clicked() {
                    match draft.validate() {
                        Ok(()) => result = SettingsResult::Apply,
                        Err(message) => *error = Some(message),
                    }
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    result = SettingsResult::Close;
                }
            });
            ui.add_space(2.0);
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        result = SettingsResult::Close;
    }
    result
}

/// Render the "About" dialog. Returns false once it should close.
pub fn show_about_dialog(ctx: &Context) -> bool {
    let mut open = true;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Funnel Timeline").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Schedule funnel deliveries per segment");
                ui.label("built with Rust and egui.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    open = false;
                }
            });
        });
    open && !ctx.input(|i| i.key_pressed(egui::Key::Escape))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn apply_copies_fields_and_clamps_days() {
        let mut funnel = Funnel::starting_on(day(1));
        let mut draft = FunnelSettingsDraft::from_funnel(&funnel);
        draft.name = "  Summer sale ".into();
        draft.base_date_days = 0;
        draft.end_date = day(30);
        draft.add_period();
        assert!(draft.validate().is_ok());
        draft.apply_to(&mut funnel);
        assert_eq!(funnel.name, "Summer sale");
        assert_eq!(funnel.base_date_days, 1);
        assert_eq!(funnel.end_date, day(30));
        assert_eq!(funnel.periods.len(), 1);
        assert_eq!(funnel.periods[0].days(), 7);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let funnel = Funnel::starting_on(day(10));
        let mut draft = FunnelSettingsDraft::from_funnel(&funnel);
        draft.end_date = day(1);
        assert!(draft.validate().is_err());
    }
}
