//! Test utilities for log-shipper
//!
//! Helpers for building scratch watch directories and configurations.

#![cfg(test)]

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{AgentConfig, FileErrorPolicy};
use crate::constants::READY_MARKER;

/// A configuration pointing at `watch_directory` with fake credentials
pub fn test_config(watch_directory: &Path) -> AgentConfig {
    AgentConfig {
        watch_directory: watch_directory.to_path_buf(),
        container_name: "logs".to_string(),
        storage_account_name: "acct".to_string(),
        storage_account_key: "key".to_string(),
        upload_interval_secs: 10,
        region: None,
        endpoint: None,
        file_error_policy: FileErrorPolicy::AbortCycle,
    }
}

/// Write a closed log file carrying the readiness marker
pub fn write_ready_log(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("entry for {}\n{}\n", name, READY_MARKER)).unwrap();
    path
}

/// Write a YAML agent configuration file and return its path
pub fn write_agent_yaml(dir: &Path, watch_directory: &Path, interval: &str) -> PathBuf {
    let path = dir.join("log-shipper.yaml");
    let content = format!(
        "Container: logs\nStorageAccName: acct\nStorageAccKey: key\nWatchDirectory: '{}'\nUploadFrequencySeconds: '{}'\n",
        watch_directory.display(),
        interval
    );
    fs::write(&path, content).unwrap();
    path
}
