pub mod csv_export;
pub mod file;

pub use file::{load_funnel, save_funnel, FileStore};
