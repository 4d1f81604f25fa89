//! PNG QR code encoder.

use std::io::Cursor;

use image::{ImageFormat, Luma};
use qrcode::QrCode;

use payments_types::{QrEncoder, QrError};

/// Smallest edge length of rendered codes, in pixels.
const MIN_DIMENSION: u32 = 200;

/// Renders QR codes as grayscale PNG images.
#[derive(Debug, Clone)]
pub struct PngQrEncoder {
    min_dimension: u32,
}

impl Default for PngQrEncoder {
    fn default() -> Self {
        Self {
            min_dimension: MIN_DIMENSION,
        }
    }
}

impl PngQrEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum width/height of rendered images.
    pub fn with_min_dimension(mut self, pixels: u32) -> Self {
        self.min_dimension = pixels;
        self
    }
}

impl QrEncoder for PngQrEncoder {
    fn encode(&self, text: &str) -> Result<Vec<u8>, QrError> {
        let code = QrCode::new(text.as_bytes()).map_err(|e| QrError::Encode(e.to_string()))?;

        let image = code
            .render::<Luma<u8>>()
            .min_dimensions(self.min_dimension, self.min_dimension)
            .build();

        let mut buf = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| QrError::Image(e.to_string()))?;

        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    #[test]
    fn test_encode_produces_png() {
        let png = PngQrEncoder::new()
            .encode("https://example.com/payment/abc")
            .unwrap();

        assert!(png.starts_with(PNG_MAGIC));
    }

    #[test]
    fn test_encode_respects_min_dimension() {
        let png = PngQrEncoder::new()
            .with_min_dimension(300)
            .encode("https://example.com/payment/abc")
            .unwrap();

        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert!(decoded.width() >= 300);
        assert_eq!(decoded.width(), decoded.height());
    }

    #[test]
    fn test_encode_is_deterministic() {
        let encoder = PngQrEncoder::new();
        let a = encoder.encode("https://example.com/payment/1").unwrap();
        let b = encoder.encode("https://example.com/payment/1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_rejects_oversized_payload() {
        let text = "x".repeat(8000);
        let result = PngQrEncoder::new().encode(&text);
        assert!(matches!(result, Err(QrError::Encode(_))));
    }
}
