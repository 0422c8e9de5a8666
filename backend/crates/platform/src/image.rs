//! Image content sniffing
//!
//! Detects raster formats from their magic bytes; the declared content type
//! of an upload is never trusted.

/// Raster formats accepted for pet pictures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Webp,
}

impl ImageFormat {
    /// File extension used when storing the image
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Webp => "webp",
        }
    }
}

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Detect the image format of `bytes`, or `None` if it is not an image
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.starts_with(PNG_SIGNATURE) {
        Some(ImageFormat::Png)
    } else if bytes.starts_with(JPEG_SIGNATURE) {
        Some(ImageFormat::Jpeg)
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some(ImageFormat::Gif)
    } else if bytes.len() >= 14 && bytes.starts_with(b"BM") {
        Some(ImageFormat::Bmp)
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some(ImageFormat::Webp)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_png() {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 13]);
        assert_eq!(detect_image_format(&bytes), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::Png.extension(), "png");
    }

    #[test]
    fn test_detects_jpeg_gif_webp_bmp() {
        assert_eq!(
            detect_image_format(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(detect_image_format(b"GIF89a\x01\x00"), Some(ImageFormat::Gif));
        assert_eq!(
            detect_image_format(b"RIFF\x24\x00\x00\x00WEBPVP8 "),
            Some(ImageFormat::Webp)
        );
        assert_eq!(
            detect_image_format(b"BM\x36\x00\x00\x00\x00\x00\x00\x00\x36\x00\x00\x00"),
            Some(ImageFormat::Bmp)
        );
    }

    #[test]
    fn test_rejects_non_images() {
        assert_eq!(detect_image_format(b""), None);
        assert_eq!(detect_image_format(b"hello world"), None);
        assert_eq!(detect_image_format(b"%PDF-1.7"), None);
        assert_eq!(detect_image_format(b"BM"), None);
        assert_eq!(detect_image_format(b"RIFF\x24\x00\x00\x00WAVE"), None);
    }
}
