//! Storage account credentials and endpoints.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::traits::{StorageError, StorageResult};

type HmacSha256 = Hmac<Sha256>;

/// Well-known account of the local storage emulator (Azurite).
const DEV_ACCOUNT_NAME: &str = "devstoreaccount1";
const DEV_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const DEV_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

const DEFAULT_PROTOCOL: &str = "https";
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

/// A storage account: its name, decoded key and blob service endpoint.
#[derive(Clone)]
pub struct StorageAccount {
    account_name: String,
    account_key: Vec<u8>,
    blob_endpoint: String,
}

impl Debug for StorageAccount {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StorageAccount")
            .field("account_name", &self.account_name)
            .field("account_key", &"[REDACTED]")
            .field("blob_endpoint", &self.blob_endpoint)
            .finish()
    }
}

impl StorageAccount {
    /// Create an account from its name, base64 key and blob endpoint.
    pub fn new(
        account_name: impl Into<String>,
        account_key_base64: &str,
        blob_endpoint: impl Into<String>,
    ) -> StorageResult<Self> {
        let account_key = base64::engine::general_purpose::STANDARD
            .decode(account_key_base64.trim())
            .map_err(|e| {
                StorageError::ConfigError(format!("AccountKey is not valid base64: {}", e))
            })?;

        let blob_endpoint: String = blob_endpoint.into();

        Ok(Self {
            account_name: account_name.into(),
            account_key,
            blob_endpoint: blob_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// The local emulator account (`UseDevelopmentStorage=true`).
    pub fn development() -> Self {
        // The emulator key is a fixed, valid base64 constant.
        Self {
            account_name: DEV_ACCOUNT_NAME.to_string(),
            account_key: base64::engine::general_purpose::STANDARD
                .decode(DEV_ACCOUNT_KEY)
                .unwrap_or_default(),
            blob_endpoint: DEV_BLOB_ENDPOINT.to_string(),
        }
    }

    /// Parse a storage connection string.
    ///
    /// Supports `DefaultEndpointsProtocol`, `AccountName`, `AccountKey`,
    /// `EndpointSuffix`, `BlobEndpoint` and `UseDevelopmentStorage=true`.
    /// Keys are matched case-insensitively. An account key is mandatory
    /// because every signed URL is computed from it.
    pub fn from_connection_string(connection_string: &str) -> StorageResult<Self> {
        let settings: HashMap<String, String> = connection_string
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.split_once('=')
                    .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_string()))
                    .ok_or_else(|| {
                        StorageError::ConfigError(format!(
                            "Malformed connection string segment '{}'",
                            part.split('=').next().unwrap_or_default()
                        ))
                    })
            })
            .collect::<StorageResult<_>>()?;

        if settings
            .get("usedevelopmentstorage")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
        {
            return Ok(Self::development());
        }

        let account_name = settings
            .get("accountname")
            .cloned()
            .ok_or_else(|| {
                StorageError::ConfigError("AccountName missing from connection string".to_string())
            })?;

        let account_key = settings.get("accountkey").ok_or_else(|| {
            StorageError::ConfigError(
                "AccountKey missing from connection string; it is required to sign blob URLs"
                    .to_string(),
            )
        })?;

        let blob_endpoint = match settings.get("blobendpoint") {
            Some(endpoint) => endpoint.clone(),
            None => {
                let protocol = settings
                    .get("defaultendpointsprotocol")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_PROTOCOL);
                let suffix = settings
                    .get("endpointsuffix")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_ENDPOINT_SUFFIX);
                format!("{}://{}.blob.{}", protocol, account_name, suffix)
            }
        };

        Self::new(account_name, account_key, blob_endpoint)
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    pub fn blob_endpoint(&self) -> &str {
        &self.blob_endpoint
    }

    /// URL of a container.
    pub fn container_url(&self, container: &str) -> String {
        format!("{}/{}", self.blob_endpoint, urlencoding::encode(container))
    }

    /// Unsigned URL of a blob.
    pub fn blob_url(&self, container: &str, blob_name: &str) -> String {
        format!(
            "{}/{}",
            self.container_url(container),
            urlencoding::encode(blob_name)
        )
    }

    /// Base64 HMAC-SHA256 of `string_to_sign` under the account key.
    pub(crate) fn sign(&self, string_to_sign: &str) -> StorageResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.account_key)
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?;
        mac.update(string_to_sign.as_bytes());
        Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
    }
}
