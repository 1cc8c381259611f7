//! Request fixtures

use axum_test::multipart::{MultipartForm, Part};

/// Smallest valid PNG (1x1)
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 dimensions
    0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, //
    0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, // IDAT chunk
    0x08, 0xD7, 0x63, 0xF8, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, //
    0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, //
    0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82, // IEND chunk
];

pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

pub const WAV_BYTES: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";

/// Multipart form with a single `file` part.
pub fn file_form(file_name: &str, mime_type: &str, data: &[u8]) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::copy_from_slice(data))
        .file_name(file_name.to_string())
        .mime_type(mime_type.to_string());
    MultipartForm::new().add_part("file", part)
}
