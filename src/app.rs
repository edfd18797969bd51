use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::Settings;
use crate::io::{csv_export, FileStore};
use crate::model::Funnel;
use crate::timeline::geometry::{COLUMN_WIDTH_STEP, DEFAULT_COLUMN_WIDTH};
use crate::timeline::{Action, Outcome, Selection, Timeline, TimelineInput};
use crate::ui;
use crate::ui::delivery_dialog::{DeliveryDraft, DialogResult};
use crate::ui::dialogs::{FunnelSettingsDraft, SettingsResult};
use crate::ui::segment_panel::{SegmentAction, SegmentPanelState};

/// Main application state.
pub struct FunnelApp {
    pub timeline: Timeline<FileStore>,
    pub settings: Settings,
    settings_path: PathBuf,
    settings_dirty: bool,

    // Dialog state
    pub delivery_draft: Option<DeliveryDraft>,
    pub funnel_settings: Option<(FunnelSettingsDraft, Option<String>)>,
    pub show_about: bool,
    pub segment_panel: SegmentPanelState,

    // Status message
    pub status_message: String,
}

impl FunnelApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let settings_path = Settings::default_path();
        let settings = Settings::load(&settings_path);
        Self::with_settings(settings, settings_path)
    }

    /// Build the app around loaded settings, reopening the last file when
    /// there is one.
    pub fn with_settings(settings: Settings, settings_path: PathBuf) -> Self {
        let mut status_message = "Ready".to_string();
        let store = match settings.last_file.as_deref() {
            Some(path) => match FileStore::open(path, settings.autosave) {
                Ok(store) => store,
                Err(e) => {
                    log::warn!("Could not reopen {}: {e:#}", path.display());
                    status_message = format!("Could not reopen last file: {e}");
                    FileStore::new(Funnel::default(), None, settings.autosave)
                }
            },
            None => FileStore::new(Funnel::default(), None, settings.autosave),
        };
        let input = TimelineInput::from(&store.funnel);
        let timeline = Timeline::new(input, store, settings.column_width, settings.history_limit);

        Self {
            timeline,
            settings,
            settings_path,
            settings_dirty: false,
            delivery_draft: None,
            funnel_settings: None,
            show_about: false,
            segment_panel: SegmentPanelState::default(),
            status_message,
        }
    }

    pub fn funnel(&self) -> &Funnel {
        &self.timeline.store().funnel
    }

    // --- File operations ---

    pub fn new_funnel(&mut self) {
        self.replace_store(FileStore::new(Funnel::default(), None, self.settings.autosave));
        self.settings.last_file = None;
        self.save_settings();
        self.status_message = "New funnel created".to_string();
    }

    pub fn open_funnel(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Funnel", &["json"])
            .pick_file()
        {
            self.open_path(&path);
        }
    }

    pub fn open_path(&mut self, path: &Path) {
        match FileStore::open(path, self.settings.autosave) {
            Ok(store) => {
                self.replace_store(store);
                self.settings.last_file = Some(path.to_path_buf());
                self.save_settings();
                self.status_message = format!("Opened {}", self.funnel().name);
            }
            Err(e) => {
                log::warn!("Failed to open {}: {e:#}", path.display());
                self.status_message = format!("Error loading: {e}");
            }
        }
    }

    pub fn save_funnel(&mut self) {
        if self.timeline.store().path.is_none() {
            self.save_funnel_as();
            return;
        }
        match self.timeline.store_mut().save() {
            Ok(()) => self.status_message = "Funnel saved".to_string(),
            Err(e) => self.status_message = format!("Error saving: {e:#}"),
        }
    }

    pub fn save_funnel_as(&mut self) {
        let default_name = format!("{}.{}", self.funnel().name, crate::io::file::FILE_EXTENSION);
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Funnel", &["json"])
            .set_file_name(&default_name)
            .save_file()
        {
            match self.timeline.store_mut().save_as(&path) {
                Ok(()) => {
                    self.settings.last_file = Some(path);
                    self.save_settings();
                    self.status_message = "Funnel saved".to_string();
                }
                Err(e) => self.status_message = format!("Error saving: {e:#}"),
            }
        }
    }

    pub fn export_csv(&mut self) {
        if self.funnel().deliveries.is_empty() {
            self.status_message = "Nothing to export: the funnel has no deliveries".to_string();
            return;
        }

        let default_name = format!("{}.csv", self.funnel().name);
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(&default_name)
            .save_file()
        {
            match csv_export::export_csv(self.funnel(), &path) {
                Ok(count) => self.status_message = format!("Exported {count} deliveries to CSV"),
                Err(e) => self.status_message = format!("CSV export failed: {e:#}"),
            }
        }
    }

    pub fn open_data_folder(&mut self) {
        if let Some(dir) = self.settings_path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir).and_then(|()| open::that(dir)) {
                self.status_message = format!("Could not open {}: {e}", dir.display());
            }
        }
    }

    fn replace_store(&mut self, store: FileStore) {
        let input = TimelineInput::from(&store.funnel);
        *self.timeline.store_mut() = store;
        self.timeline.reload(input);
        self.delivery_draft = None;
        self.funnel_settings = None;
    }

    /// Write the settings file now.
    pub fn persist_settings(&mut self) {
        self.save_settings();
    }

    fn save_settings(&mut self) {
        self.settings_dirty = false;
        if let Err(e) = self.settings.save(&self.settings_path) {
            log::warn!("Failed to save settings: {e:#}");
        }
    }

    // --- Timeline operations ---

    pub fn dispatch(&mut self, action: Action) -> Outcome {
        let creating = matches!(action, Action::CreateItem(_));
        let outcome = self.timeline.dispatch(action);
        match outcome {
            Outcome::Committed => self.status_message = "Schedule updated".to_string(),
            Outcome::ConnectionPending => {
                self.status_message = "Pick the anchor to connect to (Esc cancels)".to_string()
            }
            Outcome::ConnectionCreated(_) => self.status_message = "Connection added".to_string(),
            Outcome::ConnectionRejected => {
                self.status_message = "Connection not created".to_string()
            }
            Outcome::ItemCreated(id) => {
                self.status_message = "Delivery added".to_string();
                if creating {
                    self.open_editor(id);
                }
            }
            Outcome::Deleted => self.status_message = "Deleted".to_string(),
            Outcome::Undone => self.status_message = "Undo".to_string(),
            Outcome::LayoutChanged => {
                let width = self.timeline.geometry().column_width();
                if width != self.settings.column_width {
                    self.settings.column_width = width;
                    self.settings_dirty = true;
                }
            }
            Outcome::Unchanged
            | Outcome::DragStarted
            | Outcome::Previewed
            | Outcome::Cleared
            | Outcome::Selected => {}
        }
        outcome
    }

    pub fn undo(&mut self) {
        if self.dispatch(Action::Undo) == Outcome::Unchanged {
            self.status_message = "Nothing to undo".to_string();
        }
    }

    pub fn zoom_by(&mut self, step: f32) {
        let width = self.timeline.geometry().column_width() + step;
        self.dispatch(Action::SetColumnWidth(width));
        self.save_settings();
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(COLUMN_WIDTH_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(-COLUMN_WIDTH_STEP);
    }

    pub fn zoom_reset(&mut self) {
        self.dispatch(Action::SetColumnWidth(DEFAULT_COLUMN_WIDTH));
        self.save_settings();
    }

    pub fn delete_selection(&mut self) {
        match self.timeline.selection() {
            Selection::Item(id) => {
                self.dispatch(Action::DeleteItem(id));
            }
            Selection::Connection(id) => {
                self.dispatch(Action::DeleteConnection(id));
            }
            Selection::None => {}
        }
    }

    pub fn open_editor(&mut self, id: Uuid) {
        if let Some(delivery) = self.timeline.delivery(id) {
            self.delivery_draft = Some(DeliveryDraft::edit(delivery));
        }
    }

    /// Open the editor on a delivery that doesn't exist yet.
    pub fn add_delivery(&mut self) {
        let date = self
            .timeline
            .axis()
            .first()
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        match self.timeline.segments().first() {
            Some(segment) => self.delivery_draft = Some(DeliveryDraft::create(date, segment.id)),
            None => self.status_message = "Add a segment first".to_string(),
        }
    }

    pub fn open_funnel_settings(&mut self) {
        self.funnel_settings = Some((FunnelSettingsDraft::from_funnel(self.funnel()), None));
    }

    fn apply_funnel_settings(&mut self, draft: &FunnelSettingsDraft) {
        draft.apply_to(&mut self.timeline.store_mut().funnel);
        self.timeline.set_date_range(draft.start_date, draft.end_date);
        self.timeline
            .set_base_band(draft.base_date, draft.base_date_days.max(1));
        match self.timeline.store_mut().changed() {
            Ok(()) => self.status_message = "Funnel settings updated".to_string(),
            Err(e) => {
                log::warn!("Failed to persist funnel settings: {e:#}");
                self.status_message = format!("Settings applied but not saved: {e}");
            }
        }
    }

    fn handle_segment_action(&mut self, action: SegmentAction) {
        match action {
            SegmentAction::None => {}
            SegmentAction::Add(name) => {
                self.timeline.add_segment(name);
                self.status_message = "Segment added".to_string();
            }
            SegmentAction::Rename(id, name) => {
                self.timeline.rename_segment(id, name);
            }
            SegmentAction::Recolor(id, color) => {
                self.timeline.recolor_segment(id, color);
            }
            SegmentAction::Move { from, to } => {
                self.timeline.move_segment(from, to);
            }
            SegmentAction::Delete(id) => {
                if self.timeline.delete_segment(id) == Outcome::Unchanged {
                    self.status_message = "That segment can't be deleted".to_string();
                } else {
                    self.status_message = "Segment deleted".to_string();
                }
            }
        }
    }
}

impl eframe::App for FunnelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle keyboard shortcuts outside closures to avoid borrow issues
        let typing = ctx.wants_keyboard_input();
        let dialog_open = self.delivery_draft.is_some() || self.funnel_settings.is_some() || self.show_about;
        let (should_save, should_undo, should_delete, should_escape) = ctx.input(|i| {
            (
                i.modifiers.command && i.key_pressed(egui::Key::S),
                i.modifiers.command && !i.modifiers.shift && i.key_pressed(egui::Key::Z),
                i.key_pressed(egui::Key::Delete),
                i.key_pressed(egui::Key::Escape),
            )
        });
        if should_save {
            self.save_funnel();
        }
        if should_undo && !typing {
            self.undo();
        }
        if !typing && !dialog_open {
            if should_delete {
                self.delete_selection();
            }
            if should_escape && self.timeline.pending().is_some() {
                self.dispatch(Action::ClickEmpty);
                self.status_message = "Connection cancelled".to_string();
            }
        }

        // Connector routes for this frame
        self.timeline.on_frame();

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let history = self.timeline.history();
                        ui.label(
                            egui::RichText::new(format!(
                                "Deliveries: {} · Connections: {} · Column: {:.0}px · History: {}/{}",
                                self.timeline.deliveries().len(),
                                self.timeline.connections().len(),
                                self.timeline.geometry().column_width(),
                                history.pointer() + 1,
                                history.len(),
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Left panel: segments
        let mut segment_action = SegmentAction::None;
        egui::SidePanel::left("segment_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(ui::theme::SIDE_PANEL_WIDTH * 0.75)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                segment_action = ui::segment_panel::show_segment_panel(
                    self.timeline.segments(),
                    &mut self.segment_panel,
                    ui,
                );
            });
        self.handle_segment_action(segment_action);

        // Central panel: timeline grid
        let periods = self.funnel().display_periods();
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let response = egui::CentralPanel::default()
            .frame(chart_frame)
            .show(ctx, |ui| ui::timeline_view::show_timeline(&self.timeline, &periods, ui))
            .inner;
        let zoomed = response
            .actions
            .iter()
            .any(|a| matches!(a, Action::SetColumnWidth(_)));
        for action in response.actions {
            self.dispatch(action);
        }
        if let Some(id) = response.open_editor {
            self.open_editor(id);
        }
        if self.timeline.pointer_captured() {
            ctx.request_repaint();
        }
        if self.settings_dirty && !zoomed {
            self.save_settings();
        }

        // Dialogs
        if let Some(draft) = self.delivery_draft.as_mut() {
            let result = ui::delivery_dialog::show_delivery_dialog(draft, self.timeline.segments(), ctx);
            match result {
                DialogResult::None => {}
                DialogResult::Save(delivery) => {
                    self.delivery_draft = None;
                    if self.dispatch(Action::EditItem(delivery)) == Outcome::Unchanged {
                        self.status_message = "No changes".to_string();
                    }
                }
                DialogResult::Delete(id) => {
                    self.delivery_draft = None;
                    self.dispatch(Action::DeleteItem(id));
                }
                DialogResult::Close => self.delivery_draft = None,
            }
        }
        if let Some((draft, error)) = self.funnel_settings.as_mut() {
            match ui::dialogs::show_funnel_settings_dialog(draft, error, ctx) {
                SettingsResult::None => {}
                SettingsResult::Apply => {
                    if let Some((draft, _)) = self.funnel_settings.take() {
                        self.apply_funnel_settings(&draft);
                    }
                }
                SettingsResult::Close => self.funnel_settings = None,
            }
        }
        if self.show_about {
            self.show_about = ui::dialogs::show_about_dialog(ctx);
        }
    }
}
