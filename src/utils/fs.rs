use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use crate::utils::{StamperError, StamperResult, is_supported_input};
use crate::utils::validation::validate_input_dir;

/// Lists every regular file in `input_dir` whose extension is a supported input format.
///
/// Order follows the directory listing and is not sorted. Symlinks are followed,
/// so a link to a regular image file counts as eligible.
pub async fn list_eligible_files(input_dir: impl AsRef<Path>) -> StamperResult<Vec<PathBuf>> {
    let input_dir = input_dir.as_ref();
    validate_input_dir(input_dir)?;

    let mut entries = fs::read_dir(input_dir)
        .await
        .map_err(|e| StamperError::io(format!("Failed to read {}: {}", input_dir.display(), e)))?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !is_supported_input(&path) {
            continue;
        }
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => debug!("Skipping non-file entry: {}", path.display()),
            Err(e) => debug!("Skipping unreadable entry {}: {}", path.display(), e),
        }
    }

    Ok(files)
}

/// Creates `output_dir` (and parents) when it does not exist yet.
pub async fn ensure_output_dir(output_dir: impl AsRef<Path>) -> StamperResult<()> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)
        .await
        .map_err(|e| StamperError::io(format!("Cannot create {}: {}", output_dir.display(), e)))
}

/// Maps an input file to `<output_dir>/<stem>.jpg`.
///
/// Inputs that share a stem (`a.png`, `a.jpg`) map to the same output; the
/// later write wins.
pub fn output_path_for(output_dir: impl AsRef<Path>, input_path: impl AsRef<Path>) -> PathBuf {
    let stem = input_path
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output_dir.as_ref().join(format!("{stem}.jpg"))
}

/// File name component of a path, for reporting.
pub fn extract_filename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_only_supported_regular_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.txt", "c.JPEG", "d.gif", "e"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let mut names: Vec<String> = list_eligible_files(dir.path())
            .await
            .unwrap()
            .iter()
            .map(|p| extract_filename(p))
            .collect();
        names.sort();

        assert_eq!(names, vec!["a.png", "c.JPEG", "d.gif"]);
    }

    #[tokio::test]
    async fn missing_input_dir_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_eligible_files(dir.path().join("missing")).await.unwrap_err();
        assert!(matches!(err, StamperError::Validation(_)));
    }

    #[tokio::test]
    async fn ensure_output_dir_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("x").join("y");
        ensure_output_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn output_path_replaces_extension_with_jpg() {
        let out = Path::new("/out");
        assert_eq!(output_path_for(out, "/in/a.png"), PathBuf::from("/out/a.jpg"));
        assert_eq!(output_path_for(out, "/in/a.JPG"), PathBuf::from("/out/a.jpg"));
        assert_eq!(output_path_for(out, "/in/my.photo.bmp"), PathBuf::from("/out/my.photo.jpg"));
    }
}
