//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::time::Instant;

use log_shipper::cloud::store::{ObjectStore, StoreConnector};
use log_shipper::config::AgentConfig;
use log_shipper::constants::READY_MARKER;

/// Start and end of one `put_object` call
#[derive(Debug, Clone, Copy)]
pub struct PutSpan {
    pub started: Instant,
    pub finished: Instant,
}

#[derive(Default)]
struct StoreState {
    objects: HashMap<String, Vec<u8>>,
    calls: Vec<String>,
    spans: Vec<PutSpan>,
    active: usize,
    max_active: usize,
}

/// In-memory object store with optional latency and injected failures
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
    failing: Mutex<HashSet<String>>,
    latency: Duration,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_latency(latency: Duration) -> Arc<Self> {
        Arc::new(MemoryStore {
            latency,
            ..Default::default()
        })
    }

    /// Make every upload of `object_name` fail
    pub fn fail_on(&self, object_name: &str) {
        self.failing.lock().unwrap().insert(object_name.to_string());
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().objects.get(key).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.state.lock().unwrap().objects.len()
    }

    /// Object names passed to `put_object`, in call order
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn spans(&self) -> Vec<PutSpan> {
        self.state.lock().unwrap().spans.clone()
    }

    pub fn max_active(&self) -> usize {
        self.state.lock().unwrap().max_active
    }
}

/// Session handed to a cycle; all sessions share one [`MemoryStore`]
pub struct StoreSession(Arc<MemoryStore>);

#[async_trait::async_trait]
impl ObjectStore for StoreSession {
    async fn put_object(&self, container: &str, object_name: &str, local_path: &Path) -> Result<()> {
        self.0.put(container, object_name, local_path).await
    }
}

impl MemoryStore {
    async fn put(&self, container: &str, object_name: &str, local_path: &Path) -> Result<()> {
        let started = Instant::now();
        {
            let mut state = self.state.lock().unwrap();
            state.calls.push(object_name.to_string());
            state.active += 1;
            state.max_active = state.max_active.max(state.active);
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let result = if self.failing.lock().unwrap().contains(object_name) {
            Err(anyhow!("store rejected {}", object_name))
        } else {
            fs::read(local_path)
                .map(|bytes| {
                    self.state
                        .lock()
                        .unwrap()
                        .objects
                        .insert(format!("{}/{}", container, object_name), bytes);
                })
                .map_err(|e| anyhow!("failed to read {}: {}", local_path.display(), e))
        };

        let mut state = self.state.lock().unwrap();
        state.active -= 1;
        state.spans.push(PutSpan {
            started,
            finished: Instant::now(),
        });
        result
    }
}

/// Connector handing out the shared [`MemoryStore`]
pub struct MemoryConnector {
    pub store: Arc<MemoryStore>,
}

impl StoreConnector for MemoryConnector {
    fn connect(&self, _config: &AgentConfig) -> Result<Box<dyn ObjectStore>> {
        Ok(Box::new(StoreSession(Arc::clone(&self.store))))
    }
}

/// Write a closed log file carrying the readiness marker
pub fn write_ready_log(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("{}\n{}\n", body, READY_MARKER)).unwrap();
    path
}

/// Write an agent configuration file for `watch_dir`
pub fn write_config(dir: &Path, watch_dir: &Path, interval: &str) -> PathBuf {
    let path = dir.join("log-shipper.yaml");
    fs::write(
        &path,
        format!(
            "Container: portal-logs\nStorageAccName: acct\nStorageAccKey: key\nWatchDirectory: '{}'\nUploadFrequencySeconds: '{}'\n",
            watch_dir.display(),
            interval
        ),
    )
    .unwrap();
    path
}
