//! QR encoder port.

use crate::error::QrError;

/// Renders text as a QR code image.
pub trait QrEncoder: Send + Sync {
    /// Encodes `text` and returns the image file bytes.
    fn encode(&self, text: &str) -> Result<Vec<u8>, QrError>;

    /// MIME type of the bytes returned by [`QrEncoder::encode`].
    fn content_type(&self) -> &'static str {
        "image/png"
    }
}
