//! Fixed values of the image-to-speech pipeline.

use std::time::Duration;

/// Container receiving the uploaded images.
pub const IMAGES_CONTAINER: &str = "images";

/// Container receiving the synthesized audio.
pub const AUDIO_CONTAINER: &str = "audio";

/// Extension appended to the artifact identifier for the audio blob.
pub const AUDIO_EXTENSION: &str = "wav";

/// Content type stored on audio blobs.
pub const AUDIO_CONTENT_TYPE: &str = "audio/wav";

/// Content type used when the upload does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Lifetime of every signed read URL handed out.
pub const SIGNED_URL_VALIDITY: Duration = Duration::from_secs(10 * 60);

/// Length of the random artifact identifier.
pub const ARTIFACT_ID_LENGTH: usize = 30;

/// Image extensions accepted by the describe API (case-sensitive).
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];
