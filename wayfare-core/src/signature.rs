use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn confirmation_mac(secret: &str, order_id: &str, payment_id: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    Some(mac)
}

/// Hex HMAC-SHA256 of `order_id|payment_id`, as the gateway signs confirmations.
pub fn expected_signature(secret: &str, order_id: &str, payment_id: &str) -> Option<String> {
    confirmation_mac(secret, order_id, payment_id)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a client-presented confirmation signature.
///
/// The signature is compared as bytes, so surrounding whitespace and hex case
/// are not significant.
pub fn verify_signature(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(presented) = hex::decode(signature.trim()) else {
        return false;
    };

    match confirmation_mac(secret, order_id, payment_id) {
        Some(mac) => mac.verify_slice(&presented).is_ok(),
        None => false,
    }
}
