//! Upload validation

use crate::constants::ALLOWED_IMAGE_EXTENSIONS;
use crate::error::AppError;

/// Check the uploaded filename against the accepted image extensions.
///
/// The extension is whatever follows the last `.`, compared case-sensitively
/// as received. A filename without any `.` has no extension and is rejected.
pub fn validate_image_filename(filename: &str) -> Result<(), AppError> {
    let extension = filename.rsplit_once('.').map(|(_, ext)| ext);

    match extension {
        Some(ext) if ALLOWED_IMAGE_EXTENSIONS.contains(&ext) => Ok(()),
        _ => Err(AppError::InvalidFileType {
            filename: filename.to_string(),
        }),
    }
}
