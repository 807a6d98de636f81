//! Staging of poster files chosen through the picker or dropped on the window.

use crate::error::IntakeError;
use anyhow::{Context, Result};
use image::RgbaImage;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";
const FALLBACK_FILE_NAME: &str = "poster";

/// Extensions staged as images, with the media type each declares.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("ico", "image/x-icon"),
    ("avif", "image/avif"),
];

/// How a candidate file reached the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Picker,
    Drop,
}

/// Identity of the preview derived from one staged image.
///
/// A new key is minted for every [`SelectedImage`], so a renderer holding a
/// texture for an older key knows to release it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreviewKey(u64);

impl PreviewKey {
    fn mint() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// A poster staged for upload.
///
/// The file content is read once at selection time and shared cheaply with
/// the worker that uploads it.
#[derive(Clone)]
pub struct SelectedImage {
    path: PathBuf,
    file_name: String,
    media_type: String,
    bytes: Arc<[u8]>,
    preview: PreviewKey,
}

impl fmt::Debug for SelectedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedImage")
            .field("path", &self.path)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .field("preview", &self.preview)
            .finish()
    }
}

impl SelectedImage {
    /// Wraps content already in memory; the media type is declared from the
    /// path's extension.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let path = path.into();
        let media_type = media_type_for_path(&path).to_string();
        Self::with_media_type(path, media_type, bytes)
    }

    /// Wraps content with an explicitly declared media type.
    pub fn with_media_type(
        path: impl Into<PathBuf>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());
        Self {
            path,
            file_name,
            media_type: media_type.into(),
            bytes: bytes.into(),
            preview: PreviewKey::mint(),
        }
    }

    /// Reads a candidate from disk after checking its declared type, so
    /// non-images are refused without touching their content.
    pub fn load(path: impl AsRef<Path>, origin: ImageSource) -> Result<Self, IntakeError> {
        let path = path.as_ref();
        let media_type = media_type_for_path(path);
        if !is_image_media_type(media_type) {
            return Err(IntakeError::NotAnImage {
                path: path.to_path_buf(),
                media_type: media_type.to_string(),
                origin,
            });
        }
        let bytes = fs::read(path).map_err(|source| IntakeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::with_media_type(path, media_type, bytes))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn preview_key(&self) -> PreviewKey {
        self.preview
    }

    pub fn is_image(&self) -> bool {
        is_image_media_type(&self.media_type)
    }

    /// Decodes the content into an RGBA thumbnail no larger than `max_side`
    /// on either axis.
    pub fn decode_preview(&self, max_side: u32) -> Result<RgbaImage> {
        let img = image::load_from_memory(&self.bytes)
            .with_context(|| format!("cannot decode preview for {}", self.path.display()))?;
        if img.width() <= max_side && img.height() <= max_side {
            return Ok(img.to_rgba8());
        }
        Ok(img.thumbnail(max_side, max_side).to_rgba8())
    }
}

/// Media type declared for a path, judged by its extension.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return FALLBACK_MEDIA_TYPE;
    };
    IMAGE_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map_or(FALLBACK_MEDIA_TYPE, |&(_, media_type)| media_type)
}

/// Every extension [`media_type_for_path`] declares as an image.
pub fn image_extensions() -> impl Iterator<Item = &'static str> {
    IMAGE_TYPES.iter().map(|&(ext, _)| ext)
}

pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[rstest]
    #[case("poster.jpg", "image/jpeg")]
    #[case("poster.JPEG", "image/jpeg")]
    #[case("poster.Png", "image/png")]
    #[case("poster.webp", "image/webp")]
    #[case("poster.TIFF", "image/tiff")]
    #[case("poster.avif", "image/avif")]
    #[case("notes.txt", "application/octet-stream")]
    #[case("no_extension", "application/octet-stream")]
    fn media_type_follows_extension(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(media_type_for_path(Path::new(name)), expected);
    }

    #[test]
    fn every_listed_extension_is_an_image() {
        let extensions: Vec<_> = image_extensions().collect();
        assert!(extensions.contains(&"tif") && extensions.contains(&"ico"));
        for ext in extensions {
            let path = PathBuf::from(format!("poster.{ext}"));
            assert!(is_image_media_type(media_type_for_path(&path)), "{ext}");
        }
    }

    #[test]
    fn every_selection_gets_a_fresh_preview_key() {
        let a = SelectedImage::from_bytes("a.png", vec![1u8, 2, 3]);
        let b = SelectedImage::from_bytes("a.png", vec![1u8, 2, 3]);
        assert_ne!(a.preview_key(), b.preview_key());
        assert_eq!(a.clone().preview_key(), a.preview_key());
    }

    #[test]
    fn load_reads_image_content() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("poster.png");
        File::create(&path)?.write_all(b"not really a png")?;

        let image = SelectedImage::load(&path, ImageSource::Picker)?;
        assert_eq!(image.file_name(), "poster.png");
        assert_eq!(image.media_type(), "image/png");
        assert_eq!(image.bytes(), b"not really a png");
        Ok(())
    }

    #[test]
    fn load_refuses_non_images_before_reading() {
        // The file does not exist; a type check that ran after reading would
        // report a read error instead.
        let err = SelectedImage::load("/nowhere/readme.txt", ImageSource::Drop).unwrap_err();
        assert!(matches!(err, IntakeError::NotAnImage { .. }));
        assert_eq!(err.user_message(), "Please drop an image file");
    }

    #[test]
    fn load_reports_unreadable_images() {
        let err = SelectedImage::load("/nowhere/poster.jpg", ImageSource::Picker).unwrap_err();
        assert!(matches!(err, IntakeError::Read { .. }));
        assert_eq!(err.user_message(), "Could not read the selected file");
    }

    #[test]
    fn decode_preview_shrinks_large_images() -> Result<()> {
        let img = image::RgbaImage::from_pixel(400, 200, image::Rgba([10, 20, 30, 255]));
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)?;
        let selected = SelectedImage::from_bytes("wide.png", png);

        let preview = selected.decode_preview(100)?;
        assert_eq!(preview.dimensions(), (100, 50));
        Ok(())
    }

    #[test]
    fn decode_preview_rejects_garbage() {
        let selected = SelectedImage::from_bytes("broken.png", vec![0u8; 16]);
        assert!(selected.decode_preview(64).is_err());
    }
}
