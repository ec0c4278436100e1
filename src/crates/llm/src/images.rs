//! Loading image references found in conversation content.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::ImageError;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

/// File extensions treated as image references.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff", "tif", "webp"];

/// Whether a content string looks like a path to an image.
///
/// Decided by extension alone; the file may or may not exist.
pub fn is_image_path(reference: &str) -> bool {
    Path::new(reference.trim())
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// An image file that was read and successfully decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    /// Base name of the source file.
    pub file_name: String,
    pub mime_type: String,
    /// Original file bytes.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl LoadedImage {
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

/// Why an image reference could not be turned into a [`LoadedImage`].
///
/// `Display` renders the inline placeholder that replaces the image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageLoadError {
    #[error("[Image not found: {file_name}]")]
    NotFound { file_name: String },

    #[error("[Unidentifiable image: {file_name}]")]
    Unidentified { file_name: String, reason: String },

    #[error("[Error loading image: {file_name}: {reason}]")]
    Other { file_name: String, reason: String },
}

/// Read and decode the image at `reference`.
pub fn load_image(reference: &str) -> Result<LoadedImage, ImageLoadError> {
    let path = Path::new(reference.trim());
    let file_name = base_name(path, reference);

    let data = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ImageLoadError::NotFound {
            file_name: file_name.clone(),
        },
        _ => ImageLoadError::Other {
            file_name: file_name.clone(),
            reason: e.to_string(),
        },
    })?;

    let format = image::guess_format(&data).map_err(|e| ImageLoadError::Unidentified {
        file_name: file_name.clone(),
        reason: e.to_string(),
    })?;

    let decoded = image::load_from_memory_with_format(&data, format).map_err(|e| match e {
        ImageError::Decoding(_) | ImageError::Unsupported(_) => ImageLoadError::Unidentified {
            file_name: file_name.clone(),
            reason: e.to_string(),
        },
        other => ImageLoadError::Other {
            file_name: file_name.clone(),
            reason: other.to_string(),
        },
    })?;

    Ok(LoadedImage {
        file_name,
        mime_type: format.to_mime_type().to_string(),
        width: decoded.width(),
        height: decoded.height(),
        data,
    })
}

fn base_name(path: &Path, fallback: &str) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path("/tmp/outputs/screenshot_ab12.png"));
        assert!(is_image_path("C:/shots/Capture.JPG"));
        assert!(is_image_path("photo.webp"));
        assert!(!is_image_path("notes.txt"));
        assert!(!is_image_path("Click the OK button"));
        assert!(!is_image_path("png"));
    }

    #[test]
    fn test_missing_file_uses_base_name() {
        let err = load_image("/definitely/not/here/shot_001.png").unwrap_err();
        assert_eq!(
            err,
            ImageLoadError::NotFound {
                file_name: "shot_001.png".to_string()
            }
        );
        assert_eq!(err.to_string(), "[Image not found: shot_001.png]");
    }

    #[test]
    fn test_corrupt_file_is_unidentified() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"this is not a png").unwrap();

        let err = load_image(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ImageLoadError::Unidentified { .. }));
        assert_eq!(err.to_string(), "[Unidentifiable image: broken.png]");
    }

    #[test]
    fn test_directory_is_other_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("folder.png");
        std::fs::create_dir(&path).unwrap();

        let err = load_image(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ImageLoadError::Other { .. }));
        assert!(err.to_string().starts_with("[Error loading image: folder.png: "));
    }

    #[test]
    fn test_load_valid_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        image::RgbImage::new(3, 2).save(&path).unwrap();

        let loaded = load_image(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.file_name, "tiny.png");
        assert_eq!(loaded.mime_type, "image/png");
        assert_eq!((loaded.width, loaded.height), (3, 2));
        assert_eq!(loaded.data, std::fs::read(&path).unwrap());
        assert!(!loaded.to_base64().is_empty());
    }
}
