use std::sync::Arc;

use anyhow::{Context, Result};
use log::warn;
use rusoto_core::{HttpClient, Region};
use rusoto_credential::StaticProvider;
use rusoto_s3::S3Client;

use crate::config::AgentConfig;

/// Resolve the region (and optional custom endpoint) for the store
pub fn resolve_region(region_name: Option<&str>, endpoint: Option<&str>) -> Region {
    match (region_name, endpoint) {
        (name, Some(endpoint)) => Region::Custom {
            name: name.unwrap_or("us-east-1").to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        },
        (Some(name), None) => match name.parse::<Region>() {
            Ok(r) => r,
            Err(_) => {
                warn!("Invalid region '{}', using default", name);
                Region::default()
            }
        },
        (None, None) => Region::default(),
    }
}

/// Create an S3 client authenticated with the storage account credentials
pub fn create_s3_client(config: &AgentConfig) -> Result<Arc<S3Client>> {
    let region = resolve_region(config.region.as_deref(), config.endpoint.as_deref());

    let provider = StaticProvider::new_minimal(
        config.storage_account_name.clone(),
        config.storage_account_key.clone(),
    );
    let http_client = HttpClient::new().context("Failed to create HTTP client")?;

    Ok(Arc::new(S3Client::new_with(http_client, provider, region)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_named_region() {
        assert_eq!(resolve_region(Some("eu-west-1"), None), Region::EuWest1);
    }

    #[test]
    fn test_resolve_invalid_region_falls_back() {
        assert_eq!(resolve_region(Some("nowhere-9"), None), Region::default());
    }

    #[test]
    fn test_resolve_custom_endpoint() {
        let region = resolve_region(None, Some("https://storage.example.com/"));
        assert_eq!(
            region,
            Region::Custom {
                name: "us-east-1".to_string(),
                endpoint: "https://storage.example.com".to_string(),
            }
        );
    }
}
