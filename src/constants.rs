//! Global constants for the log-shipper agent.
//!
//! Configuration keys, defaults and diagnostic event codes live here so the
//! loader, the engine and the binary agree on them.

// Upload cycle constants
/// Token a producer appends to a log file once it is closed and safe to ship
pub const READY_MARKER: &str = "<#BlobFileReadyForUpload#>";

/// Extension (lower case, with dot) of files considered for upload
pub const LOG_FILE_SUFFIX: &str = ".log";

/// Default upload interval in seconds
pub const DEFAULT_UPLOAD_INTERVAL_SECS: u64 = 120;

// Configuration keys
pub const KEY_CONTAINER: &str = "Container";
pub const KEY_STORAGE_ACCOUNT_NAME: &str = "StorageAccName";
pub const KEY_STORAGE_ACCOUNT_KEY: &str = "StorageAccKey";
pub const KEY_UPLOAD_FREQUENCY: &str = "UploadFrequencySeconds";
pub const KEY_WATCH_DIRECTORY: &str = "WatchDirectory";
pub const KEY_REGION: &str = "Region";
pub const KEY_ENDPOINT: &str = "Endpoint";
pub const KEY_FILE_ERROR_POLICY: &str = "FileErrorPolicy";

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_NAME: &str = "log-shipper.yaml";

// Diagnostic event codes
/// Agent started managing uploads
pub const EVENT_AGENT_STARTED: u32 = 1982;

/// Every error-class notice
pub const EVENT_ERROR: u32 = 1983;

/// Informational notices (config found, stopped, cycle summary)
pub const EVENT_INFO: u32 = 1987;

// Object store constants
/// Maximum put attempts made by the S3 store for a single object
pub const MAX_UPLOAD_RETRIES: usize = 3;

/// Base retry delay in milliseconds
pub const RETRY_BASE_DELAY_MS: u64 = 250;
