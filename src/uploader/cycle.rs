use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::cloud::store::{ObjectStore, StoreConnector};
use crate::config::{AgentConfig, FileErrorPolicy};
use crate::constants::{EVENT_ERROR, EVENT_INFO};
use crate::diagnostics::{EventRecorder, Severity};
use crate::errors::AgentError;
use crate::uploader::candidate::{contains_ready_marker, has_log_suffix, list_files, object_name_for};

/// What happened to a single file during a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Uploaded(String),
    NotLogFile,
    NotReady,
}

/// Summary of one upload cycle
#[derive(Debug, Default, Clone)]
pub struct CycleReport {
    /// Object names uploaded and removed locally
    pub uploaded: Vec<String>,
    /// Files left untouched because they are not ready log files
    pub skipped: usize,
    /// Failure messages, in the order they were recorded
    pub failures: Vec<String>,
    /// True if the cycle ended before every file was evaluated
    pub aborted: bool,
}

impl CycleReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run one scan-upload-delete pass over the watch directory.
///
/// Never fails: every problem is recorded through `recorder` and reflected in
/// the returned report. The store session and all file handles are released
/// when this returns.
pub async fn run_cycle(
    config: &AgentConfig,
    connector: &dyn StoreConnector,
    recorder: &dyn EventRecorder,
) -> CycleReport {
    let mut report = CycleReport::default();

    let store = match connector.connect(config) {
        Ok(store) => store,
        Err(e) => {
            fail(&mut report, recorder, format!("{:#}", e));
            report.aborted = true;
            return report;
        }
    };

    let files = match list_files(&config.watch_directory) {
        Ok(files) => files,
        Err(e) => {
            fail(&mut report, recorder, format!("{:#}", e));
            report.aborted = true;
            return report;
        }
    };

    debug!("Found {} files in {}", files.len(), config.watch_directory.display());

    for path in &files {
        match ship_file(store.as_ref(), &config.container_name, path).await {
            Ok(FileOutcome::Uploaded(name)) => report.uploaded.push(name),
            Ok(outcome) => {
                debug!("Leaving {} in place ({:?})", path.display(), outcome);
                report.skipped += 1;
            }
            Err(e) => {
                fail(&mut report, recorder, format!("{:#}", e));
                if config.file_error_policy == FileErrorPolicy::AbortCycle {
                    warn!("Ending upload cycle early after failure on {}", path.display());
                    report.aborted = true;
                    break;
                }
            }
        }
    }

    if !report.uploaded.is_empty() {
        recorder.record(
            Severity::Info,
            EVENT_INFO,
            &format!(
                "Uploaded {} log file(s) to container '{}'",
                report.uploaded.len(),
                config.container_name
            ),
        );
    }

    info!(
        "Upload cycle finished: {} uploaded, {} skipped, {} failed",
        report.uploaded.len(),
        report.skipped,
        report.failures.len()
    );
    report
}

/// Evaluate one file and, if it is ready, upload it and remove the local copy.
///
/// The local file is only removed after the store accepted it.
pub async fn ship_file(store: &dyn ObjectStore, container: &str, path: &Path) -> Result<FileOutcome> {
    if !has_log_suffix(path) {
        return Ok(FileOutcome::NotLogFile);
    }

    let contents = fs::read(path).context(format!("Failed to read {}", path.display()))?;
    if !contains_ready_marker(&contents) {
        return Ok(FileOutcome::NotReady);
    }
    drop(contents);

    let object_name = object_name_for(path)?;
    store
        .put_object(container, &object_name, path)
        .await
        .context(format!("Failed to upload {}", path.display()))?;

    fs::remove_file(path).context(format!("Uploaded {} but failed to delete it", path.display()))?;

    debug!("Shipped {} as {}", path.display(), object_name);
    Ok(FileOutcome::Uploaded(object_name))
}

fn fail(report: &mut CycleReport, recorder: &dyn EventRecorder, message: String) {
    let error = AgentError::Cycle(message.clone());
    recorder.record(Severity::Error, EVENT_ERROR, &error.to_string());
    report.failures.push(message);
}
