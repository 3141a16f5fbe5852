use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::cloud::store::StoreConnector;
use crate::config::AgentConfig;
use crate::constants::{DEFAULT_UPLOAD_INTERVAL_SECS, EVENT_AGENT_STARTED, EVENT_ERROR, EVENT_INFO};
use crate::diagnostics::{EventRecorder, Severity};
use crate::errors::AgentError;
use crate::uploader::cycle::run_cycle;

/// Lifecycle state of an [`UploadEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    /// `start()` has not been called yet
    Uninitialized,
    /// Cycles are scheduled
    Running,
    /// Stopped, or startup failed; no further cycles will be scheduled
    Stopped,
}

struct CycleState {
    status: EngineStatus,
    cycle_active: bool,
    cancel: Option<CancellationToken>,
}

struct Inner {
    config_path: PathBuf,
    watch_override: Option<PathBuf>,
    connector: Arc<dyn StoreConnector>,
    recorder: Arc<dyn EventRecorder>,
    interval_secs: AtomicU64,
    cycles_completed: AtomicU64,
    state: Mutex<CycleState>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, CycleState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn current_interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.load(Ordering::SeqCst))
    }

    fn report(&self, error: &AgentError) {
        self.recorder.record(Severity::Error, EVENT_ERROR, &error.to_string());
    }

    /// Claim the next cycle. Fails once `stop()` has won the race.
    fn begin_cycle(&self, cancel: &CancellationToken) -> bool {
        let mut state = self.state();
        if state.status != EngineStatus::Running || cancel.is_cancelled() {
            return false;
        }
        state.cycle_active = true;
        true
    }

    fn finish_cycle(&self) {
        self.state().cycle_active = false;
        self.cycles_completed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Periodically ships ready log files from the watch directory.
///
/// The engine reads its configuration once in [`start`](Self::start) and then
/// runs one upload cycle per tick on the current tokio runtime. The next tick
/// is armed only after a cycle has finished, so cycles never overlap no matter
/// how long one takes.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use log_shipper::cloud::s3::S3Connector;
/// use log_shipper::diagnostics::LogRecorder;
/// use log_shipper::uploader::UploadEngine;
///
/// # async fn example() {
/// let engine = UploadEngine::new(
///     "log-shipper.yaml",
///     Arc::new(S3Connector),
///     Arc::new(LogRecorder::new()),
/// );
/// engine.start();
/// // ... later, on shutdown
/// engine.stop();
/// engine.wait().await;
/// # }
/// ```
#[derive(Clone)]
pub struct UploadEngine {
    inner: Arc<Inner>,
}

impl UploadEngine {
    pub fn new(
        config_path: impl Into<PathBuf>,
        connector: Arc<dyn StoreConnector>,
        recorder: Arc<dyn EventRecorder>,
    ) -> Self {
        UploadEngine {
            inner: Arc::new(Inner {
                config_path: config_path.into(),
                watch_override: None,
                connector,
                recorder,
                interval_secs: AtomicU64::new(DEFAULT_UPLOAD_INTERVAL_SECS),
                cycles_completed: AtomicU64::new(0),
                state: Mutex::new(CycleState {
                    status: EngineStatus::Uninitialized,
                    cycle_active: false,
                    cancel: None,
                }),
                task: Mutex::new(None),
            }),
        }
    }

    /// Use `dir` as the watch directory regardless of the configuration file.
    ///
    /// Only meaningful before [`start`](Self::start).
    pub fn with_watch_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        if let Some(inner) = Arc::get_mut(&mut self.inner) {
            inner.watch_override = Some(dir.into());
        } else {
            warn!("Watch directory override ignored: engine is already shared");
        }
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.inner.config_path
    }

    pub fn status(&self) -> EngineStatus {
        self.inner.state().status
    }

    /// Number of cycles that have run to completion (including failed ones)
    pub fn cycles_completed(&self) -> u64 {
        self.inner.cycles_completed.load(Ordering::SeqCst)
    }

    /// Interval used when arming the next tick
    pub fn upload_interval(&self) -> Duration {
        self.inner.current_interval()
    }

    /// Change the interval applied from the next re-arm onwards.
    ///
    /// A tick that is already armed keeps its original due time.
    pub fn set_upload_interval(&self, interval: Duration) {
        let secs = interval.as_secs().max(1);
        self.inner.interval_secs.store(secs, Ordering::SeqCst);
        debug!("Upload interval set to {}s", secs);
    }

    /// Load the configuration and arm the first tick.
    ///
    /// Must be called from within a tokio runtime. Every failure is recorded
    /// and leaves the engine `Stopped`; configuration is never re-read, so a
    /// second call is ignored.
    pub fn start(&self) {
        let inner = &self.inner;
        let mut state = inner.state();

        if state.status != EngineStatus::Uninitialized {
            warn!("Upload engine already started ({:?}); restart the agent to reload configuration", state.status);
            return;
        }

        inner.recorder.record(
            Severity::Info,
            EVENT_AGENT_STARTED,
            &format!(
                "Log shipper has started managing log uploads. Using configuration settings defined in: {}",
                inner.config_path.display()
            ),
        );

        let loaded = match AgentConfig::load(&inner.config_path, inner.watch_override.as_deref()) {
            Ok(loaded) => loaded,
            Err(e) => {
                inner.report(&e);
                state.status = EngineStatus::Stopped;
                return;
            }
        };

        inner.recorder.record(
            Severity::Info,
            EVENT_INFO,
            &format!("Config file found at: {}", inner.config_path.display()),
        );
        for warning in &loaded.warnings {
            inner.report(warning);
        }

        let config = Arc::new(loaded.config);
        inner.interval_secs.store(config.upload_interval_secs, Ordering::SeqCst);

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                inner.report(&AgentError::TimerArm(e.to_string()));
                state.status = EngineStatus::Stopped;
                return;
            }
        };

        let cancel = CancellationToken::new();
        state.status = EngineStatus::Running;
        state.cancel = Some(cancel.clone());

        let task = handle.spawn(run_schedule(Arc::clone(inner), config, cancel));
        *inner.task.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(task);
        drop(state);

        info!("Upload engine running, first cycle in {:?}", inner.current_interval());
    }

    /// Prevent any further cycles. Idempotent.
    ///
    /// A cycle that is already running is not interrupted; use
    /// [`wait`](Self::wait) to let it finish.
    pub fn stop(&self) {
        let inner = &self.inner;
        let mut state = inner.state();

        if state.status != EngineStatus::Running {
            debug!("Stop requested while {:?}, nothing to do", state.status);
            return;
        }

        state.status = EngineStatus::Stopped;
        if let Some(cancel) = state.cancel.take() {
            cancel.cancel();
        }
        let in_flight = state.cycle_active;
        drop(state);

        if in_flight {
            info!("Upload cycle in progress will run to completion");
        }
        inner.recorder.record(
            Severity::Info,
            EVENT_INFO,
            "Log shipper has stopped managing log uploads",
        );
    }

    /// Wait for the scheduling task to exit.
    ///
    /// Returns immediately if the engine never ran; otherwise waits until
    /// `stop()` has been called and any in-flight cycle has finished.
    pub async fn wait(&self) {
        let task = self
            .inner
            .task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("Upload schedule ended abnormally: {}", e);
            }
        }
    }
}

/// Sleep, run one cycle, repeat; the delay is recomputed after every cycle.
async fn run_schedule(inner: Arc<Inner>, config: Arc<AgentConfig>, cancel: CancellationToken) {
    loop {
        let delay = inner.current_interval();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = sleep(delay) => {}
        }

        if !inner.begin_cycle(&cancel) {
            break;
        }

        // Run the cycle as its own task so a panicking store only costs one cycle.
        let cycle = {
            let config = Arc::clone(&config);
            let connector = Arc::clone(&inner.connector);
            let recorder = Arc::clone(&inner.recorder);
            tokio::spawn(async move { run_cycle(&config, connector.as_ref(), recorder.as_ref()).await })
        };

        match cycle.await {
            Ok(report) => debug!(
                "Cycle complete: {} uploaded, {} failures",
                report.uploaded.len(),
                report.failures.len()
            ),
            Err(e) => inner.report(&AgentError::Cycle(format!("upload cycle panicked: {}", e))),
        }

        inner.finish_cycle();
    }

    debug!("Upload schedule stopped");
}
