use std::path::Path;

use anyhow::Result;

use crate::config::AgentConfig;

/// Destination for shipped log files.
///
/// `put_object` overwrites an existing object with the same name.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, container: &str, object_name: &str, local_path: &Path) -> Result<()>;
}

/// Opens a store session from the agent credentials; called once per cycle.
#[cfg_attr(test, mockall::automock)]
pub trait StoreConnector: Send + Sync {
    fn connect(&self, config: &AgentConfig) -> Result<Box<dyn ObjectStore>>;
}
