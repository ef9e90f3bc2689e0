//! `x-line-signature` verification: base64(HMAC-SHA256(channel secret, body)).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::WebhookError;

pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Signature the platform would send for `body`.
pub fn sign(channel_secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(channel_secret.as_bytes()).ok()?;
    mac.update(body);
    Some(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Check the header against the raw body. Comparison is constant time.
pub fn verify(
    channel_secret: &str,
    signature_header: Option<&str>,
    body: &[u8],
) -> Result<(), WebhookError> {
    let signature = signature_header
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(WebhookError::MissingSignature)?;
    let signature_bytes = STANDARD
        .decode(signature)
        .map_err(|_| WebhookError::BadSignature)?;
    let mut mac = Hmac::<Sha256>::new_from_slice(channel_secret.as_bytes())
        .map_err(|_| WebhookError::BadSignature)?;
    mac.update(body);
    mac.verify_slice(&signature_bytes)
        .map_err(|_| WebhookError::BadSignature)
}
