use std::path::Path;
use crate::core::BatchRequest;
use crate::utils::{StamperResult, ValidationError};

/// Validates a batch request before the coordinator takes ownership of it.
///
/// Only checks what can be known up front: the input directory exists and the
/// logo path names a file. Output directory creation and logo decoding are
/// batch-fatal conditions handled by the coordinator.
pub fn validate_request(request: &BatchRequest) -> StamperResult<()> {
    validate_input_dir(&request.input_dir)?;
    validate_logo_path(&request.logo_path)?;
    validate_size_ratio(request.placement.size_ratio())?;
    Ok(())
}

/// Validates the input directory path
pub fn validate_input_dir(path: &Path) -> StamperResult<()> {
    if !path.exists() {
        return Err(ValidationError::path_not_found(path).into());
    }

    if !path.is_dir() {
        return Err(ValidationError::not_a_directory(path).into());
    }

    Ok(())
}

/// Validates that a logo path was given at all. Whether it can be loaded is
/// decided when the coordinator opens it.
pub fn validate_logo_path(path: &Path) -> StamperResult<()> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::settings("No logo file selected").into());
    }
    Ok(())
}

/// Size ratio must be a finite value in `(0, 1]`.
pub fn validate_size_ratio(size_ratio: f64) -> StamperResult<()> {
    if !size_ratio.is_finite() || size_ratio <= 0.0 || size_ratio > 1.0 {
        return Err(ValidationError::placement(format!(
            "Invalid size ratio: {size_ratio}. Must be greater than 0 and at most 1"
        ))
        .into());
    }
    Ok(())
}
