use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde_yaml::Value;

use crate::config::env_vars::expand_env_vars;
use crate::constants::{
    DEFAULT_UPLOAD_INTERVAL_SECS, KEY_CONTAINER, KEY_ENDPOINT, KEY_FILE_ERROR_POLICY, KEY_REGION,
    KEY_STORAGE_ACCOUNT_KEY, KEY_STORAGE_ACCOUNT_NAME, KEY_UPLOAD_FREQUENCY, KEY_WATCH_DIRECTORY,
};
use crate::errors::AgentError;

/// What a cycle does when a single file fails to read, upload or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileErrorPolicy {
    /// Record the failure and end the cycle; later files wait for the next tick.
    #[default]
    AbortCycle,
    /// Record the failure and carry on with the next file.
    SkipFile,
}

impl FileErrorPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abort" | "abortcycle" => Some(FileErrorPolicy::AbortCycle),
            "continue" | "skip" | "skipfile" => Some(FileErrorPolicy::SkipFile),
            _ => None,
        }
    }
}

/// Settings the agent runs with. Loaded once at startup and never re-read.
#[derive(Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub watch_directory: PathBuf,
    pub container_name: String,
    pub storage_account_name: String,
    pub storage_account_key: String,
    pub upload_interval_secs: u64,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub file_error_policy: FileErrorPolicy,
}

// Keep the account key out of logs.
impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("watch_directory", &self.watch_directory)
            .field("container_name", &self.container_name)
            .field("storage_account_name", &self.storage_account_name)
            .field("storage_account_key", &"<redacted>")
            .field("upload_interval_secs", &self.upload_interval_secs)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("file_error_policy", &self.file_error_policy)
            .finish()
    }
}

/// A successfully loaded configuration plus the recoverable problems found in it.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AgentConfig,
    pub warnings: Vec<AgentError>,
}

impl AgentConfig {
    pub fn upload_interval(&self) -> Duration {
        Duration::from_secs(self.upload_interval_secs)
    }

    /// Load the agent configuration from a YAML key-value file.
    ///
    /// `watch_override` takes precedence over the `WatchDirectory` key.
    pub fn load(path: &Path, watch_override: Option<&Path>) -> Result<LoadedConfig, AgentError> {
        if !path.exists() {
            return Err(AgentError::ConfigMissing(path.to_path_buf()));
        }

        let settings = read_settings(path).map_err(|e| AgentError::ConfigMalformed {
            path: path.to_path_buf(),
            reason: format!("{:#}", e),
        })?;

        debug!("Read {} settings from {}", settings.len(), path.display());
        Self::from_settings(&settings, path, watch_override)
    }

    /// Build a configuration from an already resolved key-value map.
    ///
    /// `source` is only used in diagnostics.
    pub fn from_settings(
        settings: &HashMap<String, String>,
        source: &Path,
        watch_override: Option<&Path>,
    ) -> Result<LoadedConfig, AgentError> {
        let malformed = |reason: String| AgentError::ConfigMalformed {
            path: source.to_path_buf(),
            reason,
        };
        let required = |key: &str| -> Result<String, AgentError> {
            match settings.get(key).map(|v| v.trim()) {
                Some(v) if !v.is_empty() => Ok(v.to_string()),
                _ => Err(malformed(format!("required key '{}' is missing or empty", key))),
            }
        };
        let optional = |key: &str| {
            settings
                .get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let container_name = required(KEY_CONTAINER)?;
        let storage_account_name = required(KEY_STORAGE_ACCOUNT_NAME)?;
        let storage_account_key = required(KEY_STORAGE_ACCOUNT_KEY)?;

        let watch_directory = match watch_override {
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::from(expand_env_vars(&required(KEY_WATCH_DIRECTORY)?)),
        };

        let file_error_policy = match optional(KEY_FILE_ERROR_POLICY) {
            Some(raw) => FileErrorPolicy::parse(&raw).ok_or_else(|| {
                malformed(format!(
                    "'{}' must be 'abort' or 'continue', got '{}'",
                    KEY_FILE_ERROR_POLICY, raw
                ))
            })?,
            None => FileErrorPolicy::default(),
        };

        let mut warnings = Vec::new();
        let upload_interval_secs = match parse_interval(settings.get(KEY_UPLOAD_FREQUENCY)) {
            Ok(secs) => secs,
            Err(value) => {
                warnings.push(AgentError::IntervalMalformed {
                    path: source.to_path_buf(),
                    value,
                    fallback_secs: DEFAULT_UPLOAD_INTERVAL_SECS,
                });
                DEFAULT_UPLOAD_INTERVAL_SECS
            }
        };

        let config = AgentConfig {
            watch_directory,
            container_name,
            storage_account_name,
            storage_account_key,
            upload_interval_secs,
            region: optional(KEY_REGION),
            endpoint: optional(KEY_ENDPOINT),
            file_error_policy,
        };

        info!(
            "Shipping {} to container '{}' every {}s",
            config.watch_directory.display(),
            config.container_name,
            config.upload_interval_secs
        );
        Ok(LoadedConfig { config, warnings })
    }
}

/// Parse the interval setting, returning the offending raw value on failure.
fn parse_interval(raw: Option<&String>) -> Result<u64, String> {
    let raw = match raw {
        Some(v) => v,
        None => return Err("<missing>".to_string()),
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(raw.clone()),
    }
}

/// Read a flat YAML mapping into string key-value pairs.
///
/// Scalar values of any YAML type are accepted and rendered as strings; a
/// null value becomes an empty string. Nested values are rejected.
pub fn read_settings(path: &Path) -> Result<HashMap<String, String>> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read config file: {}", path.display()))?;

    let document: Value = serde_yaml::from_str(&content).context("Failed to parse YAML config")?;

    let mapping = match document {
        Value::Mapping(m) => m,
        Value::Null => return Err(anyhow!("Config file is empty")),
        _ => return Err(anyhow!("Config file must be a mapping of keys to values")),
    };

    let mut settings = HashMap::with_capacity(mapping.len());
    for (key, value) in mapping {
        let key = scalar_to_string(&key)
            .ok_or_else(|| anyhow!("Config keys must be plain scalars"))?;
        let value = scalar_to_string(&value)
            .ok_or_else(|| anyhow!("Value for '{}' must be a plain scalar", key))?;
        settings.insert(key, value);
    }

    Ok(settings)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

/// Template written by `init-config`
pub const CONFIG_TEMPLATE: &str = r#"# log-shipper configuration
# Restart the agent after editing; settings are read once at startup.

# Directory scanned for completed *.log files (env vars like $HOME are expanded)
WatchDirectory: /var/log/portal

# Destination bucket / container
Container: portal-logs

# Storage credentials
StorageAccName: ""
StorageAccKey: ""

# Seconds between the end of one upload cycle and the start of the next
UploadFrequencySeconds: 120

# Optional object-store location
# Region: us-east-1
# Endpoint: https://storage.example.com

# What to do when one file fails: abort (end the cycle) or continue
# FileErrorPolicy: abort
"#;

/// Write the configuration template to `path`
pub fn write_config_template(path: &Path) -> Result<()> {
    fs::write(path, CONFIG_TEMPLATE)
        .context(format!("Failed to write config to {}", path.display()))?;
    info!("Saved configuration template to {}", path.display());
    Ok(())
}
