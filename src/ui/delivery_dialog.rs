use chrono::NaiveDate;
use egui::{Color32, Context, RichText, Window};
use uuid::Uuid;

use crate::model::{Delivery, DeliveryKind, Segment};
use crate::ui::theme;

/// Working copy of a delivery while the editor window is open.
#[derive(Debug, Clone)]
pub struct DeliveryDraft {
    pub delivery: Delivery,
    /// Not yet part of the schedule; Delete is hidden.
    pub is_new: bool,
    pub single_day: bool,
    pub error: Option<String>,
}

impl DeliveryDraft {
    pub fn edit(delivery: &Delivery) -> Self {
        Self {
            single_day: delivery.is_single_day(),
            delivery: delivery.clone(),
            is_new: false,
            error: None,
        }
    }

    pub fn create(date: NaiveDate, segment_id: Uuid) -> Self {
        Self {
            delivery: Delivery::new("", date, segment_id),
            is_new: true,
            single_day: true,
            error: None,
        }
    }

    /// The delivery to commit, or a message explaining why it can't be.
    pub fn finish(&self) -> Result<Delivery, String> {
        let mut delivery = self.delivery.clone();
        if delivery.segment_ids.is_empty() {
            return Err("Pick at least one segment".to_string());
        }
        delivery.title = delivery.title.trim().to_string();
        if delivery.title.is_empty() {
            delivery.title = crate::timeline::state::NEW_DELIVERY_TITLE.to_string();
        }
        if self.single_day || delivery.end_date < delivery.start_date {
            delivery.end_date = delivery.start_date;
        }
        Ok(delivery)
    }

    fn toggle_segment(&mut self, id: Uuid) {
        let ids = &mut self.delivery.segment_ids;
        if let Some(pos) = ids.iter().position(|s| *s == id) {
            ids.remove(pos);
        } else {
            ids.push(id);
        }
    }
}

pub enum DialogResult {
    None,
    Save(Delivery),
    Delete(Uuid),
    Close,
}

/// Render the delivery editor window.
pub fn show_delivery_dialog(
    draft: &mut DeliveryDraft,
    segments: &[Segment],
    ctx: &Context,
) -> DialogResult {
    let mut result = DialogResult::None;
    let title = if draft.is_new { "New Delivery" } else { "Edit Delivery" };

    Window::new(RichText::new(title).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.add_space(4.0);

            egui::Grid::new("delivery_grid")
                .num_columns(2)
                .striped(false)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Title").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [240.0, 24.0],
                        egui::TextEdit::singleline(&mut draft.delivery.title)
                            .hint_text("Delivery title...")
                            .text_color(theme::TEXT_PRIMARY),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Kind").color(theme::TEXT_SECONDARY));
                    let current = draft.delivery.kind;
                    egui::ComboBox::from_id_salt("delivery_kind")
                        .selected_text(format!("{} {}", current.icon(), current.label()))
                        .width(240.0)
                        .show_ui(ui, |ui| {
                            for kind in DeliveryKind::all() {
                                ui.selectable_value(
                                    &mut draft.delivery.kind,
                                    *kind,
                                    format!("{} {}", kind.icon(), kind.label()),
                                );
                            }
                        });
                    ui.end_row();

                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.add(
                        egui_extras::DatePickerButton::new(&mut draft.delivery.start_date)
                            .id_salt("delivery_dp_start"),
                    );
                    ui.end_row();

                    ui.label("");
                    ui.checkbox(&mut draft.single_day, "Single day");
                    ui.end_row();

                    if !draft.single_day {
                        ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                        ui.add(
                            egui_extras::DatePickerButton::new(&mut draft.delivery.end_date)
                                .id_salt("delivery_dp_end"),
                        );
                        ui.end_row();
                    }

                    ui.label(RichText::new("Notes").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [240.0, 56.0],
                        egui::TextEdit::multiline(&mut draft.delivery.description)
                            .text_color(theme::TEXT_PRIMARY),
                    );
                    ui.end_row();
                });

            ui.add_space(6.0);
            ui.label(RichText::new("Segments").color(theme::TEXT_SECONDARY));
            let mut toggled = None;
            ui.horizontal_wrapped(|ui| {
                for segment in segments {
                    let on = draft.delivery.segment_ids.contains(&segment.id);
                    let text = RichText::new(&segment.name).color(if on {
                        Color32::WHITE
                    } else {
                        theme::TEXT_SECONDARY
                    });
                    let chip = egui::Button::new(text)
                        .fill(if on { segment.color } else { theme::BG_FIELD })
                        .rounding(egui::Rounding::same(10.0));
                    if ui.add(chip).clicked() {
                        toggled = Some(segment.id);
                    }
                }
            });
            if let Some(id) = toggled {
                draft.toggle_segment(id);
                draft.error = None;
            }

            if let Some(error) = &draft.error {
                ui.add_space(4.0);
                ui.label(RichText::new(error).color(theme::TODAY_LINE).small());
            }

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let save_btn = egui::Button::new(RichText::new("Save").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], save_btn).clicked() {
                    match draft.finish() {
                        Ok(delivery) => result = DialogResult::Save(delivery),
                        Err(message) => draft.error = Some(message),
                    }
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    result = DialogResult::Close;
                }
                if !draft.is_new {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let label = format!("{}  Delete", egui_phosphor::regular::TRASH);
                        if ui.add_sized([90.0, 28.0], egui::Button::new(label)).clicked() {
                            result = DialogResult::Delete(draft.delivery.id);
                        }
                    });
                }
            });
            ui.add_space(2.0);
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        result = DialogResult::Close;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[test]
    fn blank_title_gets_default() {
        let draft = DeliveryDraft::create(day(1), Uuid::new_v4());
        let delivery = draft.finish().unwrap();
        assert_eq!(delivery.title, "New delivery");
    }

    #[test]
    fn needs_a_segment() {
        let segment = Uuid::new_v4();
        let mut draft = DeliveryDraft::create(day(1), segment);
        draft.toggle_segment(segment);
        assert!(draft.finish().is_err());
        draft.toggle_segment(segment);
        assert!(draft.finish().is_ok());
    }

    #[test]
    fn single_day_collapses_end() {
        let mut delivery = Delivery::new("Sale", day(3), Uuid::new_v4());
        delivery.end_date = day(6);
        let mut draft = DeliveryDraft::edit(&delivery);
        assert!(!draft.single_day);
        assert_eq!(draft.finish().unwrap().end_date, day(6));
        draft.single_day = true;
        assert_eq!(draft.finish().unwrap().end_date, day(3));
    }
}
