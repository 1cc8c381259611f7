//! API constants

/// Pipeline endpoint. The name matches the path the existing browser client posts to.
pub const IMAGE_TO_SPEECH_PATH: &str = "/api/image_to_speech_http";

pub const OPENAPI_PATH: &str = "/api/openapi.json";

pub const DOCS_PATH: &str = "/docs";

pub const LIVENESS_PATH: &str = "/live";
