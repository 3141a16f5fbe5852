//! Object store integration for shipped log files.
//!
//! The upload engine only needs one capability from a store: put a local file
//! under a name in a container, replacing any existing object. That capability
//! is the [`store::ObjectStore`] trait; a [`store::StoreConnector`] opens a
//! fresh session from the agent credentials at the start of every cycle.
//!
//! ## Supported Providers
//!
//! - **Amazon S3**: and S3-compatible services through a custom endpoint
//!
//! ## Usage Example
//!
//! ```no_run
//! use std::path::Path;
//! use log_shipper::cloud::s3::S3Connector;
//! use log_shipper::cloud::store::StoreConnector;
//! use log_shipper::config::AgentConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let loaded = AgentConfig::load(Path::new("log-shipper.yaml"), None)?;
//! let store = S3Connector.connect(&loaded.config)?;
//! store
//!     .put_object(&loaded.config.container_name, "app.log", Path::new("/var/log/portal/app.log"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

/// Client construction for S3-compatible stores
pub mod client;

/// Amazon S3 object store
pub mod s3;

/// Store and connector traits
pub mod store;
