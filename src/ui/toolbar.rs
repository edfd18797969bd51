use crate::app::FunnelApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut FunnelApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  New Funnel").clicked() {
                app.new_funnel();
                ui.close_menu();
            }
            if ui.button("  Open...").clicked() {
                app.open_funnel();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Save          Ctrl+S").clicked() {
                app.save_funnel();
                ui.close_menu();
            }
            if ui.button("  Save As...").clicked() {
                app.save_funnel_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Export CSV...").clicked() {
                app.export_csv();
                ui.close_menu();
            }
            ui.separator();
            if ui.checkbox(&mut app.settings.autosave, "Autosave").changed() {
                app.timeline.store_mut().autosave = app.settings.autosave;
                app.persist_settings();
            }
        });

        ui.menu_button(RichText::new("  Edit  ").font(theme::font_menu()), |ui| {
            let can_undo = app.timeline.history().can_undo();
            if ui
                .add_enabled(can_undo, egui::Button::new("  Undo          Ctrl+Z"))
                .clicked()
            {
                app.undo();
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(app.timeline.can_create(), egui::Button::new("  Add Delivery..."))
                .clicked()
            {
                app.add_delivery();
                ui.close_menu();
            }
            if ui.button("  Funnel Settings...").clicked() {
                app.open_funnel_settings();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            if ui.button("  Zoom In        Ctrl+Scroll ↑").clicked() {
                app.zoom_in();
                ui.close_menu();
            }
            if ui.button("  Zoom Out      Ctrl+Scroll ↓").clicked() {
                app.zoom_out();
                ui.close_menu();
            }
            if ui.button("  Reset Zoom").clicked() {
                app.zoom_reset();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Open Settings Folder").clicked() {
                app.open_data_folder();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        // Right-aligned funnel name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let store = app.timeline.store();
            let modified = if store.path.is_none() || store.is_dirty() {
                " (unsaved)"
            } else {
                ""
            };
            ui.label(
                RichText::new(format!("{}{}", store.funnel.name, modified))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
