use std::path::PathBuf;

use thiserror::Error;

/// Failures the agent reports to operators.
///
/// Each variant is terminal for the operation it belongs to (startup or a
/// single upload cycle) but never for the process.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The configuration file does not exist; no cycles will run.
    #[error("Missing configuration file at: {}. Place the configuration file at this path and restart the agent", .0.display())]
    ConfigMissing(PathBuf),

    /// The configuration file exists but cannot be used.
    #[error("Error while configuring the upload settings from {}: {reason}", .path.display())]
    ConfigMalformed { path: PathBuf, reason: String },

    /// Only the upload interval is unusable; the default is applied.
    #[error("Upload frequency value '{value}' was not in correct format, using {fallback_secs} seconds. Check {} and restart the agent", .path.display())]
    IntervalMalformed {
        path: PathBuf,
        value: String,
        fallback_secs: u64,
    },

    /// The scheduling task could not be started.
    #[error("Error while setting up the upload timer: {0}")]
    TimerArm(String),

    /// A single upload cycle ended early.
    #[error("Error while uploading log files: {0}")]
    Cycle(String),
}
