//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers;
use narrata_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Narrata API",
        version = "0.1.0",
        description = "Turns an uploaded image into a spoken description. The image is captioned by a vision service, the caption is synthesized to WAV audio, and the response links to the stored audio through a short-lived signed URL."
    ),
    paths(handlers::image_to_speech::image_to_speech),
    components(schemas(models::SpeechUrlResponse, models::ErrorEnvelope)),
    tags(
        (name = "narration", description = "Image to speech pipeline")
    )
)]
pub struct ApiDoc;
