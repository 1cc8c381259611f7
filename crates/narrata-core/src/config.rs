//! Configuration module
//!
//! The process builds one `Config` at startup and hands its sections to the
//! storage factory and the service clients. Nothing reads the environment
//! after that point.
//!
//! Variable names follow `UPPER_SNAKE_CASE`. The Azure Functions app setting
//! names (`AzureWebJobsStorage`, `ComputerVisionEndpoint`,
//! `ComputerVisionAccountKey`, `SpeechKey`, `SpeechLocation`) are accepted as
//! fallbacks.

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use anyhow::{anyhow, Result};

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 3000;
const MAX_UPLOAD_SIZE_MB: usize = 10;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const VISION_LANGUAGE: &str = "en";
const VISION_MAX_CANDIDATES: u32 = 1;
const SPEECH_VOICE: &str = "en-US-JennyNeural";
const SPEECH_LANGUAGE: &str = "en-US";
const SPEECH_OUTPUT_FORMAT: &str = "riff-16khz-16bit-mono-pcm";

/// Console log rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// HTTP server settings
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub concurrency_limit: usize,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

/// Object storage settings
#[derive(Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Storage account connection string. Required for the Azure backend;
    /// the memory backend falls back to the development account when unset.
    pub connection_string: Option<String>,
}

impl Debug for StorageConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StorageConfig")
            .field("backend", &self.backend)
            .field(
                "connection_string",
                &self.connection_string.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Image description service settings
#[derive(Clone)]
pub struct VisionConfig {
    pub endpoint: String,
    pub api_key: String,
    pub language: String,
    pub max_candidates: u32,
}

impl Debug for VisionConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VisionConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("language", &self.language)
            .field("max_candidates", &self.max_candidates)
            .finish()
    }
}

/// Speech synthesis service settings
#[derive(Clone)]
pub struct SpeechConfig {
    pub api_key: String,
    pub region: String,
    /// Full synthesis URL; derived from `region` when unset.
    pub endpoint: Option<String>,
    pub voice: String,
    pub language: String,
    pub output_format: String,
}

impl SpeechConfig {
    /// URL the synthesis request is posted to.
    pub fn synthesis_url(&self) -> String {
        match self.endpoint {
            Some(ref endpoint) => endpoint.clone(),
            None => format!(
                "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                self.region
            ),
        }
    }
}

impl Debug for SpeechConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SpeechConfig")
            .field("api_key", &"[REDACTED]")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("voice", &self.voice)
            .field("language", &self.language)
            .field("output_format", &self.output_format)
            .finish()
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub vision: VisionConfig,
    pub speech: SpeechConfig,
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_or_legacy = |key: &str, legacy: &str| get(key).or_else(|| get(legacy));
        let require = |key: &str, legacy: &str| {
            get_or_legacy(key, legacy)
                .ok_or_else(|| anyhow!("{} (or {}) must be set", key, legacy))
        };

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let port = get("SERVER_PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(SERVER_PORT);

        let max_upload_mb = get("MAX_UPLOAD_SIZE_MB")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);
        let max_upload_bytes = max_upload_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow!("MAX_UPLOAD_SIZE_MB is too large: {}", max_upload_mb))?;

        let concurrency_limit = get("HTTP_CONCURRENCY_LIMIT")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(HTTP_CONCURRENCY_LIMIT);

        let log_format = match get("LOG_FORMAT").as_deref().map(str::to_lowercase) {
            Some(ref f) if f == "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        let backend = match get("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::Azure,
        };

        let server = ServerConfig {
            port,
            environment,
            cors_origins,
            max_upload_bytes,
            concurrency_limit,
            log_format,
        };

        let storage = StorageConfig {
            backend,
            connection_string: get_or_legacy("STORAGE_CONNECTION_STRING", "AzureWebJobsStorage"),
        };

        let vision = VisionConfig {
            endpoint: require("COMPUTER_VISION_ENDPOINT", "ComputerVisionEndpoint")?,
            api_key: require("COMPUTER_VISION_KEY", "ComputerVisionAccountKey")?,
            language: get("COMPUTER_VISION_LANGUAGE")
                .unwrap_or_else(|| VISION_LANGUAGE.to_string()),
            max_candidates: get("COMPUTER_VISION_MAX_CANDIDATES")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(VISION_MAX_CANDIDATES),
        };

        let speech = SpeechConfig {
            api_key: require("SPEECH_KEY", "SpeechKey")?,
            region: require("SPEECH_REGION", "SpeechLocation")?,
            endpoint: get("SPEECH_ENDPOINT"),
            voice: get("SPEECH_VOICE").unwrap_or_else(|| SPEECH_VOICE.to_string()),
            language: get("SPEECH_LANGUAGE").unwrap_or_else(|| SPEECH_LANGUAGE.to_string()),
            output_format: get("SPEECH_OUTPUT_FORMAT")
                .unwrap_or_else(|| SPEECH_OUTPUT_FORMAT.to_string()),
        };

        Ok(Config {
            server,
            storage,
            vision,
            speech,
        })
    }

    /// Check cross-field constraints; called once at startup.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow!("SERVER_PORT cannot be 0"));
        }

        if self.server.max_upload_bytes == 0 {
            return Err(anyhow!("MAX_UPLOAD_SIZE_MB cannot be 0"));
        }

        if self.server.concurrency_limit == 0 {
            return Err(anyhow!("HTTP_CONCURRENCY_LIMIT cannot be 0"));
        }

        if self.server.is_production() && self.server.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.storage.backend == StorageBackend::Azure
            && self.storage.connection_string.is_none()
        {
            return Err(anyhow!(
                "STORAGE_CONNECTION_STRING (or AzureWebJobsStorage) must be set for the azure storage backend"
            ));
        }

        if !self.vision.endpoint.starts_with("http://")
            && !self.vision.endpoint.starts_with("https://")
        {
            return Err(anyhow!(
                "COMPUTER_VISION_ENDPOINT must be an http(s) URL, got '{}'",
                self.vision.endpoint
            ));
        }

        if self.vision.max_candidates == 0 {
            return Err(anyhow!("COMPUTER_VISION_MAX_CANDIDATES cannot be 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("STORAGE_CONNECTION_STRING", "UseDevelopmentStorage=true"),
            ("COMPUTER_VISION_ENDPOINT", "https://vision.example.com"),
            ("COMPUTER_VISION_KEY", "vision-key"),
            ("SPEECH_KEY", "speech-key"),
            ("SPEECH_REGION", "westeurope"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config> {
        Config::from_source(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = load(&base_vars()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.server.log_format, LogFormat::Compact);
        assert_eq!(config.storage.backend, StorageBackend::Azure);
        assert_eq!(config.vision.language, "en");
        assert_eq!(config.vision.max_candidates, 1);
        assert_eq!(config.speech.output_format, "riff-16khz-16bit-mono-pcm");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_legacy_names_are_accepted() {
        let vars = HashMap::from([
            ("AzureWebJobsStorage", "UseDevelopmentStorage=true"),
            ("ComputerVisionEndpoint", "https://vision.example.com"),
            ("ComputerVisionAccountKey", "vision-key"),
            ("SpeechKey", "speech-key"),
            ("SpeechLocation", "northeurope"),
        ]);
        let config = load(&vars).unwrap();
        assert_eq!(config.speech.region, "northeurope");
        assert_eq!(
            config.storage.connection_string.as_deref(),
            Some("UseDevelopmentStorage=true")
        );
    }

    #[test]
    fn test_missing_required_setting() {
        let mut vars = base_vars();
        vars.remove("SPEECH_KEY");
        let err = load(&vars).unwrap_err();
        assert!(err.to_string().contains("SPEECH_KEY"));
    }

    #[test]
    fn test_speech_url_from_region_or_override() {
        let mut vars = base_vars();
        let config = load(&vars).unwrap();
        assert_eq!(
            config.speech.synthesis_url(),
            "https://westeurope.tts.speech.microsoft.com/cognitiveservices/v1"
        );

        vars.insert("SPEECH_ENDPOINT", "http://127.0.0.1:9999/tts");
        let config = load(&vars).unwrap();
        assert_eq!(config.speech.synthesis_url(), "http://127.0.0.1:9999/tts");
    }

    #[test]
    fn test_azure_backend_requires_connection_string() {
        let mut vars = base_vars();
        vars.remove("STORAGE_CONNECTION_STRING");
        let config = load(&vars).unwrap();
        assert!(config.validate().is_err());

        vars.insert("STORAGE_BACKEND", "memory");
        let config = load(&vars).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_rejects_wildcard_cors() {
        let mut vars = base_vars();
        vars.insert("ENVIRONMENT", "production");
        let config = load(&vars).unwrap();
        assert!(config.validate().is_err());

        vars.insert("CORS_ORIGINS", "https://app.example.com");
        let config = load(&vars).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_upload_size_overflow_is_rejected() {
        let vars = base_vars();
        let too_large = usize::MAX.to_string();
        let result = Config::from_source(|key| match key {
            "MAX_UPLOAD_SIZE_MB" => Some(too_large.clone()),
            _ => vars.get(key).map(|v| v.to_string()),
        });

        let err = result.unwrap_err();
        assert!(err.to_string().contains("MAX_UPLOAD_SIZE_MB"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = load(&base_vars()).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("vision-key"));
        assert!(!rendered.contains("speech-key"));
        assert!(!rendered.contains("UseDevelopmentStorage"));
    }
}
