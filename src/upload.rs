use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Stores the blob and returns an opaque handle the roster keeps verbatim.
    async fn upload_image(&self, bytes: &[u8], content_type: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Clone)]
pub struct MockImageUploader {
    latency: Duration,
}

impl MockImageUploader {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl ImageUploader for MockImageUploader {
    async fn upload_image(&self, bytes: &[u8], content_type: &str) -> anyhow::Result<String> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let digest = format!("{:x}", Sha256::digest(bytes));
        let handle = format!("blob:rosterd/{}-{}", &digest[..16], Uuid::new_v4());
        debug!(size = bytes.len(), content_type, %handle, "profile image stored");
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn handles_are_unique_even_for_identical_blobs() {
        let uploader = MockImageUploader::new(Duration::ZERO);
        let a = uploader.upload_image(b"png-bytes", "image/png").await.expect("upload");
        let b = uploader.upload_image(b"png-bytes", "image/png").await.expect("upload");
        assert!(a.starts_with("blob:rosterd/"));
        assert_ne!(a, b);
        // Same content, same fingerprint prefix.
        assert_eq!(a[..29], b[..29]);
    }
}
