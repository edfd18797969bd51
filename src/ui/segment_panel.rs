use egui::{Color32, RichText, Sense, Ui, Vec2};
use uuid::Uuid;

use crate::model::segment::SEGMENT_PRESETS;
use crate::model::Segment;
use crate::ui::theme;

/// Actions the segment panel can request.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentAction {
    None,
    Add(String),
    Rename(Uuid, String),
    Recolor(Uuid, Color32),
    Move { from: usize, to: usize },
    Delete(Uuid),
}

/// Text fields of the panel that outlive a frame.
#[derive(Debug, Default)]
pub struct SegmentPanelState {
    pub new_name: String,
    /// Segment being renamed and its working name.
    pub renaming: Option<(Uuid, String)>,
}

/// Render the segment list (left panel).
pub fn show_segment_panel(
    segments: &[Segment],
    state: &mut SegmentPanelState,
    ui: &mut Ui,
) -> SegmentAction {
    let mut action = SegmentAction::None;

    ui.add_space(6.0);
    ui.label(RichText::new("Segments").strong().size(13.0).color(theme::TEXT_PRIMARY));
    ui.add_space(4.0);

    let last = segments.len().saturating_sub(1);
    for (index, segment) in segments.iter().enumerate() {
        ui.horizontal(|ui| {
            let (dot, dot_response) = ui.allocate_exact_size(Vec2::splat(14.0), Sense::click());
            ui.painter().circle_filled(dot.center(), 5.0, segment.color);
            dot_response.context_menu(|ui| {
                ui.label(RichText::new("Colour").small().weak());
                ui.horizontal_wrapped(|ui| {
                    for color in SEGMENT_PRESETS {
                        let (swatch, resp) = ui.allocate_exact_size(Vec2::splat(18.0), Sense::click());
                        ui.painter().circle_filled(swatch.center(), 7.0, *color);
                        if *color == segment.color {
                            ui.painter().circle_stroke(
                                swatch.center(),
                                8.0,
                                egui::Stroke::new(1.5, Color32::WHITE),
                            );
                        }
                        if resp.clicked() {
                            action = SegmentAction::Recolor(segment.id, *color);
                            ui.close_menu();
                        }
                    }
                });
            });

            let renaming = matches!(&state.renaming, Some((id, _)) if *id == segment.id);
            if renaming {
                let mut done = false;
                if let Some((_, name)) = state.renaming.as_mut() {
                    let edit = ui.add(
                        egui::TextEdit::singleline(name)
                            .desired_width(110.0)
                            .text_color(theme::TEXT_PRIMARY),
                    );
                    let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if submitted || ui.small_button(egui_phosphor::regular::CHECK).clicked() {
                        let trimmed = name.trim().to_string();
                        if !trimmed.is_empty() {
                            action = SegmentAction::Rename(segment.id, trimmed);
                        }
                        done = true;
                    }
                }
                if done {
                    state.renaming = None;
                }
            } else {
                let label = ui.add(
                    egui::Label::new(RichText::new(&segment.name).color(theme::TEXT_PRIMARY))
                        .truncate()
                        .sense(Sense::click()),
                );
                if label.double_clicked() {
                    state.renaming = Some((segment.id, segment.name.clone()));
                }
                if segment.is_default {
                    ui.label(RichText::new("default").small().color(theme::TEXT_DIM));
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if !segment.is_default
                    && ui
                        .small_button(egui_phosphor::regular::TRASH)
                        .on_hover_text("Delete segment")
                        .clicked()
                {
                    action = SegmentAction::Delete(segment.id);
                }
                if ui
                    .add_enabled(index < last, egui::Button::new(egui_phosphor::regular::ARROW_DOWN).small())
                    .clicked()
                {
                    action = SegmentAction::Move { from: index, to: index + 1 };
                }
                if ui
                    .add_enabled(index > 0, egui::Button::new(egui_phosphor::regular::ARROW_UP).small())
                    .clicked()
                {
                    action = SegmentAction::Move { from: index, to: index - 1 };
                }
            });
        });
    }

    ui.add_space(6.0);
    ui.separator();
    ui.horizontal(|ui| {
        let edit = ui.add(
            egui::TextEdit::singleline(&mut state.new_name)
                .hint_text("New segment...")
                .desired_width(130.0),
        );
        let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let add = ui.add(
            egui::Button::new(RichText::new(egui_phosphor::regular::PLUS).color(Color32::WHITE))
                .fill(theme::ACCENT),
        );
        if (submitted || add.clicked()) && !state.new_name.trim().is_empty() {
            action = SegmentAction::Add(state.new_name.trim().to_string());
            state.new_name.clear();
        }
    });
    ui.add_space(2.0);
    ui.label(
        RichText::new("Double-click a name to rename, right-click the dot to recolour.")
            .small()
            .color(theme::TEXT_DIM),
    );

    action
}
