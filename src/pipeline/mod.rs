//! Pipeline entry points, one per command.
//!
//! - `run_scrape`: Capture portal screenshots per team and athlete
//! - `run_cleanup`: Remove placeholder screenshots and empty folders
//! - `run_analysis`: Turn screenshots into a markdown analysis
//! - `run_program`: Turn an analysis into a training program document
//! - `run_pipeline`: All of the above, in order
//! - `run_validate`: Check a configuration file

pub mod analysis;
pub mod cleanup;
pub mod folders;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod program;
pub mod run;
pub mod scrape;
pub mod validate;

pub use analysis::run_analysis;
pub use cleanup::{CleanupReport, run_cleanup};
pub use pipeline::{PipelineReport, run_pipeline};
pub use program::run_program;
pub use run::{PipelineRun, StageOptions, stage_api};
pub use scrape::run_scrape;
pub use validate::run_validate;
