//! Embedded media resources.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// A binary resource referenced from the document body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Original filename inside the package (if known)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// MIME type
    pub mime_type: String,

    /// Binary data
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl Resource {
    /// Create an image resource, guessing the MIME type from the filename.
    pub fn image(data: Vec<u8>, filename: Option<String>) -> Self {
        let mime_type = filename
            .as_deref()
            .and_then(Self::mime_from_filename)
            .unwrap_or("application/octet-stream")
            .to_string();
        Self {
            filename,
            mime_type,
            data,
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Whether browsers can display this resource in an `<img>`.
    pub fn is_web_image(&self) -> bool {
        matches!(
            self.mime_type.as_str(),
            "image/png"
                | "image/jpeg"
                | "image/gif"
                | "image/bmp"
                | "image/svg+xml"
                | "image/webp"
                | "image/tiff"
        )
    }

    /// Encode the resource as a `data:` URI.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }

    /// Determine MIME type from filename.
    pub fn mime_from_filename(filename: &str) -> Option<&'static str> {
        let ext = filename.rsplit('.').next()?.to_ascii_lowercase();
        let mime = match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            "tiff" | "tif" => "image/tiff",
            "svg" => "image/svg+xml",
            "webp" => "image/webp",
            "wmf" => "image/x-wmf",
            "emf" => "image/x-emf",
            _ => return None,
        };
        Some(mime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_filename() {
        assert_eq!(Resource::mime_from_filename("image1.PNG"), Some("image/png"));
        assert_eq!(Resource::mime_from_filename("photo.jpeg"), Some("image/jpeg"));
        assert_eq!(Resource::mime_from_filename("drawing.emf"), Some("image/x-emf"));
        assert_eq!(Resource::mime_from_filename("file.xyz"), None);
    }

    #[test]
    fn test_data_uri() {
        let res = Resource::image(vec![1, 2, 3], Some("media/image1.png".into()));
        assert_eq!(res.data_uri(), "data:image/png;base64,AQID");
        assert!(res.is_web_image());
        assert_eq!(res.size(), 3);
    }

    #[test]
    fn test_unknown_type() {
        let res = Resource::image(vec![0], None);
        assert_eq!(res.mime_type, "application/octet-stream");
        assert!(!res.is_web_image());
    }
}
