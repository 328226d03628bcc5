use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::error;

pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";
const SIGNATURE_PREFIX: &str = "sha256=";

type HmacSha256 = Hmac<Sha256>;

/// Checks a GitHub `X-Hub-Signature-256` value against the raw request body.
pub fn verify_github_signature(request_body: &[u8], signature: &str, secret: &str) -> bool {
    let Some(signature_hex) = signature.strip_prefix(SIGNATURE_PREFIX) else {
        error!("Signature header is missing the sha256= prefix");
        return false;
    };

    let Ok(expected) = hex::decode(signature_hex) else {
        error!("Signature header is not valid hex");
        return false;
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return false;
        }
    };
    mac.update(request_body);

    if mac.verify_slice(&expected).is_ok() {
        true
    } else {
        error!("Webhook signature verification failed");
        false
    }
}

pub fn compute_signature(request_body: &[u8], secret: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return String::new();
        }
    };
    mac.update(request_body);
    format!("{SIGNATURE_PREFIX}{}", hex::encode(mac.finalize().into_bytes()))
}
