//! HMAC signing for inbound payment notifications.
//!
//! Notifiers sign the raw request body with a shared secret and send the
//! hex digest in the [`SIGNATURE_HEADER`] header.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Header carrying the notification signature.
pub const SIGNATURE_HEADER: &str = "X-Signature";

type HmacSha256 = Hmac<Sha256>;

/// Signs a notification payload using HMAC-SHA256, hex encoded.
pub fn sign_notification(payload: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a notification signature using constant-time comparison.
pub fn verify_notification(payload: &[u8], signature: &str, secret: &str) -> bool {
    let expected = sign_notification(payload, secret);
    expected
        .as_bytes()
        .ct_eq(signature.trim().to_lowercase().as_bytes())
        .into()
}
