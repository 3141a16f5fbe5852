use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use rusoto_core::ByteStream;
use rusoto_s3::{PutObjectRequest, S3Client, S3};
use tokio::time::sleep;

use crate::cloud::client::create_s3_client;
use crate::cloud::store::{ObjectStore, StoreConnector};
use crate::config::AgentConfig;
use crate::constants::{MAX_UPLOAD_RETRIES, RETRY_BASE_DELAY_MS};

/// Object store backed by Amazon S3 or an S3-compatible service.
///
/// Each put reads the whole file and issues a single `PutObject`, retrying
/// transport failures with exponential backoff. Log files are shipped once
/// closed, so multipart uploads are not needed.
pub struct S3Store {
    client: Arc<S3Client>,
    endpoint: String,
}

impl S3Store {
    pub fn new(client: Arc<S3Client>, endpoint: &str) -> Self {
        S3Store {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, container: &str, object_name: &str, local_path: &Path) -> Result<()> {
        let contents = tokio::fs::read(local_path)
            .await
            .context(format!("Failed to read {} for upload", local_path.display()))?;
        let size = contents.len();

        debug!(
            "Uploading {} ({} bytes) to s3://{}/{}",
            local_path.display(),
            size,
            container,
            object_name
        );

        let start_time = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let request = PutObjectRequest {
                bucket: container.to_string(),
                key: object_name.to_string(),
                content_length: Some(size as i64),
                body: Some(ByteStream::from(contents.clone())),
                ..Default::default()
            };

            match self.client.put_object(request).await {
                Ok(_) => {
                    debug!(
                        "Uploaded {} to s3://{}/{} in {:?}",
                        local_path.display(),
                        container,
                        object_name,
                        start_time.elapsed()
                    );
                    return Ok(());
                }
                Err(e) => {
                    if attempt >= MAX_UPLOAD_RETRIES {
                        return Err(anyhow!(
                            "Failed to upload {} to {} after {} attempts: {}",
                            object_name,
                            self.endpoint,
                            MAX_UPLOAD_RETRIES,
                            e
                        ));
                    }

                    let delay = Duration::from_millis(RETRY_BASE_DELAY_MS * 2u64.pow(attempt as u32));
                    warn!("Upload attempt {} for {} failed, retrying in {:?}: {}", attempt, object_name, delay, e);
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Connector producing a fresh [`S3Store`] for every cycle
#[derive(Debug, Default, Clone, Copy)]
pub struct S3Connector;

impl StoreConnector for S3Connector {
    fn connect(&self, config: &AgentConfig) -> Result<Box<dyn ObjectStore>> {
        let client = create_s3_client(config).context("Failed to create storage session")?;
        let endpoint = match (&config.endpoint, &config.region) {
            (Some(endpoint), _) => endpoint.clone(),
            (None, Some(region)) => format!("s3 ({})", region),
            (None, None) => "s3".to_string(),
        };
        Ok(Box::new(S3Store::new(client, &endpoint)))
    }
}
