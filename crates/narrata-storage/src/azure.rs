use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};

use crate::account::StorageAccount;
use crate::sas::{blob_read_sas, SERVICE_VERSION};
use crate::shared_key::{authorization, request_date};
use crate::traits::{BlobHandle, BlobStore, StorageError, StorageResult};
use crate::StorageBackend;

const ERROR_CODE_HEADER: &str = "x-ms-error-code";
const CONTAINER_ALREADY_EXISTS: &str = "ContainerAlreadyExists";

/// Azure Blob Storage implementation over the REST API
#[derive(Clone)]
pub struct AzureBlobStore {
    account: StorageAccount,
    http_client: reqwest::Client,
}

impl AzureBlobStore {
    /// Create a new AzureBlobStore for `account`.
    pub fn new(account: StorageAccount) -> StorageResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("narrata/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                StorageError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            account,
            http_client,
        })
    }

    /// Create a store from a storage connection string.
    pub fn from_connection_string(connection_string: &str) -> StorageResult<Self> {
        Self::new(StorageAccount::from_connection_string(connection_string)?)
    }

    pub fn account(&self) -> &StorageAccount {
        &self.account
    }

    /// Send a Shared Key authorized request.
    async fn send(
        &self,
        method: Method,
        url: &str,
        content_type: Option<&str>,
        extra_ms_headers: &[(&str, String)],
        body: Vec<u8>,
    ) -> StorageResult<reqwest::Response> {
        let url = Url::parse(url)
            .map_err(|e| StorageError::ConfigError(format!("Invalid blob URL '{}': {}", url, e)))?;

        let mut ms_headers: Vec<(&str, String)> = vec![
            ("x-ms-date", request_date()),
            ("x-ms-version", SERVICE_VERSION.to_string()),
        ];
        ms_headers.extend(extra_ms_headers.iter().cloned());

        let auth = authorization(
            &self.account,
            &method,
            &url,
            body.len(),
            content_type,
            &ms_headers,
        )?;

        let mut request = self
            .http_client
            .request(method, url)
            .header(AUTHORIZATION, auth)
            .header(CONTENT_LENGTH, body.len());
        if let Some(content_type) = content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }
        for (name, value) in &ms_headers {
            request = request.header(*name, value);
        }

        request
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))
    }

    /// Describe a failed response for error messages.
    async fn failure_detail(response: reqwest::Response) -> String {
        let status = response.status();
        let code = response
            .headers()
            .get(ERROR_CODE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("Unknown")
            .to_string();
        let body = response.text().await.unwrap_or_default();
        format!("{} ({}): {}", status, code, body.trim())
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn ensure_container(&self, container: &str) -> StorageResult<()> {
        let url = format!("{}?restype=container", self.account.container_url(container));
        let response = self.send(Method::PUT, &url, None, &[], Vec::new()).await?;

        let status = response.status();
        if status == StatusCode::CREATED {
            tracing::info!(container = %container, "Blob container created");
            return Ok(());
        }

        let already_exists = status == StatusCode::CONFLICT
            && response
                .headers()
                .get(ERROR_CODE_HEADER)
                .and_then(|v| v.to_str().ok())
                == Some(CONTAINER_ALREADY_EXISTS);
        if already_exists {
            tracing::debug!(container = %container, "Blob container already exists");
            return Ok(());
        }

        let detail = Self::failure_detail(response).await;
        tracing::error!(container = %container, detail = %detail, "Create container failed");
        Err(StorageError::ContainerFailed(format!("{}: {}", container, detail)))
    }

    async fn upload(
        &self,
        container: &str,
        blob_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<BlobHandle> {
        self.ensure_container(container).await?;

        let url = self.account.blob_url(container, blob_name);
        let size = data.len() as u64;
        let start = Instant::now();

        let response = self
            .send(
                Method::PUT,
                &url,
                Some(content_type),
                &[("x-ms-blob-type", "BlockBlob".to_string())],
                data,
            )
            .await
            .inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    container = %container,
                    blob = %blob_name,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Blob upload failed"
                );
            })?;

        if !response.status().is_success() {
            let detail = Self::failure_detail(response).await;
            tracing::error!(
                container = %container,
                blob = %blob_name,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                detail = %detail,
                "Blob upload rejected"
            );
            return Err(StorageError::UploadFailed(format!(
                "{}/{}: {}",
                container, blob_name, detail
            )));
        }

        tracing::info!(
            container = %container,
            blob = %blob_name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Blob upload successful"
        );

        Ok(BlobHandle {
            container: container.to_string(),
            blob_name: blob_name.to_string(),
            url,
        })
    }

    fn signed_read_url(&self, blob: &BlobHandle, validity: Duration) -> StorageResult<String> {
        let validity = chrono::Duration::from_std(validity)
            .map_err(|e| StorageError::SigningFailed(format!("Invalid validity: {}", e)))?;
        let sas = blob_read_sas(
            &self.account,
            &blob.container,
            &blob.blob_name,
            Utc::now() + validity,
        )?;
        Ok(format!("{}?{}", blob.url, sas))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Azure
    }
}
