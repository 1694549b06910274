pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;

pub use error::{ItemError, PathError, StamperError, StamperResult, ValidationError};
pub use validation::{validate_request, validate_size_ratio};
pub use formats::{InputFormat, format_from_extension, is_supported_input};
pub use fs::{
    ensure_output_dir,
    extract_filename,
    list_eligible_files,
    output_path_for,
};
