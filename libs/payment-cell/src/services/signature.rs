// libs/payment-cell/src/services/signature.rs
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 over `order_id + "|" + payment_id` with the
/// shared gateway secret. This is the signature the gateway attaches to its
/// payment callbacks.
pub fn payment_signature(order_id: &str, payment_id: &str, secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time check of a provided signature. The reason for a mismatch
/// is never reported to the caller.
pub fn verify_payment_signature(
    order_id: &str,
    payment_id: &str,
    provided: &str,
    secret: &str,
) -> bool {
    let decoded = match hex::decode(provided) {
        Ok(bytes) => bytes,
        Err(_) => {
            debug!("Payment signature is not valid hex");
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());

    mac.verify_slice(&decoded).is_ok()
}
