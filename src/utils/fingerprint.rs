//! Keyed one-way hashing of client addresses.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Hashes client addresses with HMAC-SHA256 so click records never hold a raw address.
///
/// The same address always maps to the same fingerprint under one secret, which
/// keeps unique-visitor counts possible without storing the address.
#[derive(Clone)]
pub struct ClientFingerprinter {
    secret: Vec<u8>,
}

impl ClientFingerprinter {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Returns a 64-character lowercase hex digest.
    pub fn fingerprint(&self, address: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(address.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for ClientFingerprinter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientFingerprinter")
            .field("secret", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let hasher = ClientFingerprinter::new("secret");
        let a = hasher.fingerprint("203.0.113.7");
        let b = hasher.fingerprint("203.0.113.7");

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_fingerprint_hides_address() {
        let hasher = ClientFingerprinter::new("secret");
        assert!(!hasher.fingerprint("203.0.113.7").contains("203"));
    }

    #[test]
    fn test_secret_matters() {
        let a = ClientFingerprinter::new("secret-a").fingerprint("unknown");
        let b = ClientFingerprinter::new("secret-b").fingerprint("unknown");
        assert_ne!(a, b);
    }

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2.
        let hasher = ClientFingerprinter::new("Jefe");
        assert_eq!(
            hasher.fingerprint("what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_debug_masks_secret() {
        let hasher = ClientFingerprinter::new("super-secret");
        assert!(!format!("{hasher:?}").contains("super-secret"));
    }
}
