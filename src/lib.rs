//! Funnel timeline: schedule marketing deliveries on a date × segment grid.
//!
//! [`timeline`] holds the interaction model (axis, geometry, stacking, drag,
//! connector routing, undo). [`ui`] renders it with egui and [`app`] wires
//! both to the file store.

pub mod app;
pub mod config;
pub mod io;
pub mod model;
pub mod timeline;
pub mod ui;
