//! Payment gateway integration: order amounts and callback signature
//! verification. The gateway signs `"<order_id>|<payment_id>"` with a
//! shared HMAC-SHA256 secret and sends the hex digest in the callback.

use std::sync::Arc;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Convert a rupee amount to minor units (paise) for the gateway.
pub fn minor_units(rupees: i64) -> i64 {
    rupees * 100
}

/// Currency code sent with every order.
pub const CURRENCY: &str = "INR";

/// Verifies gateway callback signatures.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;
}

/// Production verifier: HMAC-SHA256 over `"<order_id>|<payment_id>"`
/// with the shared gateway secret, compared in constant time.
pub struct HmacSha256Verifier {
    secret: Vec<u8>,
}

impl HmacSha256Verifier {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self { secret: secret.into() }
    }

    pub fn from_env() -> Self {
        let secret = std::env::var("PAYMENT_WEBHOOK_SECRET")
            .expect("PAYMENT_WEBHOOK_SECRET must be set");
        Self::new(secret.into_bytes())
    }
}

impl SignatureVerifier for HmacSha256Verifier {
    fn verify(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(&self.secret) else {
            return false;
        };
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}

/// Test double that accepts every signature. Selected only by the
/// `payment_stub` feature flag.
pub struct AcceptAllVerifier;

impl SignatureVerifier for AcceptAllVerifier {
    fn verify(&self, _order_id: &str, _payment_id: &str, _signature: &str) -> bool {
        true
    }
}

/// Build the verifier selected by feature flags.
pub fn verifier_from_flags() -> Arc<dyn SignatureVerifier> {
    if crate::config::feature_flags().payment_stub {
        tracing::warn!("payment_stub enabled — callback signatures are NOT verified");
        Arc::new(AcceptAllVerifier)
    } else {
        Arc::new(HmacSha256Verifier::from_env())
    }
}

/// Compute the hex signature for a payload. Used by tests and local
/// gateway simulation.
pub fn sign(secret: &[u8], order_id: &str, payment_id: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
