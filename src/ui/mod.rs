pub mod delivery_dialog;
pub mod dialogs;
pub mod segment_panel;
pub mod theme;
pub mod timeline_view;
pub mod toolbar;
