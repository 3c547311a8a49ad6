// src/storage/mod.rs

//! Storage for athlete artifacts and run logs.
//!
//! - `local`: atomic artifact writes and the `Team/Athlete` folder layout
//! - `run_log`: append-only stage CSV logs and failure lists

pub mod local;
pub mod run_log;

// Re-export for convenience
pub use local::{LocalStorage, dir_name, is_empty_dir, list_images};
pub use run_log::RunLog;
