use reqwest::multipart;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use crate::config::StorageConfig;

/// Every store call is bounded; a hung store must not pin a request worker.
const STORE_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a successful upload: the public URL clients will see, and the
/// opaque handle needed to delete the object later.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredImage {
    #[serde(rename = "secure_url")]
    pub image_url: String,
    pub public_id: String,
}

/// HTTP client for the external image store. Uploads are fatal on failure
/// (callers create no record); deletes are best-effort and an
/// already-deleted object is not an error.
#[derive(Clone)]
pub struct ImageStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ImageStore {
    pub fn new(config: &StorageConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(STORE_REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub async fn upload(
        &self,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<StoredImage, reqwest::Error> {
        let part = multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        response.json::<StoredImage>().await
    }

    pub async fn delete(&self, public_id: &str) -> Result<(), reqwest::Error> {
        let response = self
            .http
            .delete(format!("{}/images/{}", self.base_url, public_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            // Object already gone; the outcome we wanted.
            return Ok(());
        }
        response.error_for_status()?;
        Ok(())
    }
}
