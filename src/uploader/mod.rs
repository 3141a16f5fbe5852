//! Scheduled shipping of completed log files.
//!
//! - [`candidate`]: which files in the watch directory are ready
//! - [`cycle`]: one scan-upload-delete pass
//! - [`engine`]: the schedule driving cycles one after another

pub mod candidate;
pub mod cycle;
pub mod engine;

pub use cycle::{run_cycle, CycleReport, FileOutcome};
pub use engine::{EngineStatus, UploadEngine};
