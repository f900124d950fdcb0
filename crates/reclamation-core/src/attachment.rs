use std::path::{Path, PathBuf};

use bytes::Bytes;

const OCTET_STREAM: &str = "application/octet-stream";

/// Where the bytes of an attachment live until the payload is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentSource {
    /// A file picked from disk. Read only when the request body is built.
    Path(PathBuf),
    /// Data already held in memory. The terminal picker only produces
    /// `Path`; this is for library callers and tests that build photos
    /// without touching the disk.
    Bytes(Bytes),
}

/// A photo selected for the complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub file_name: String,
    pub content_type: String,
    pub source: AttachmentSource,
}

impl FileAttachment {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let content_type = image_content_type(&path).unwrap_or(OCTET_STREAM);
        Self {
            file_name,
            content_type: content_type.to_string(),
            source: AttachmentSource::Path(path),
        }
    }

    /// In-memory attachment, sent as-is without any file read.
    pub fn from_bytes(file_name: &str, content_type: &str, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            source: AttachmentSource::Bytes(data.into()),
        }
    }
}

/// MIME type for the image extensions the photo picker offers.
pub fn image_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "tif" | "tiff" => "image/tiff",
        _ => return None,
    };
    Some(mime)
}

/// Selection hint equivalent to `accept="image/*"`: only image files are offered.
pub fn is_image_path(path: &Path) -> bool {
    image_content_type(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_path_uses_file_name_and_image_mime() {
        let a = FileAttachment::from_path("/tmp/photos/Brake.JPG");
        assert_eq!(a.file_name, "Brake.JPG");
        assert_eq!(a.content_type, "image/jpeg");
        assert_eq!(
            a.source,
            AttachmentSource::Path(PathBuf::from("/tmp/photos/Brake.JPG"))
        );
    }

    #[test]
    fn from_path_falls_back_to_octet_stream() {
        let a = FileAttachment::from_path("notes.txt");
        assert_eq!(a.content_type, "application/octet-stream");
    }

    #[test]
    fn image_hint() {
        assert!(is_image_path(Path::new("a.png")));
        assert!(is_image_path(Path::new("dir/b.WebP")));
        assert!(!is_image_path(Path::new("c.pdf")));
        assert!(!is_image_path(Path::new("no_extension")));
    }
}
