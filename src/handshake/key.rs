//! Key exchange.

use super::GUID;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha1::{Digest, Sha1};

/// Generate a new `sec-websocket-key`.
#[inline]
pub fn new_sec_key() -> String {
    let input: [u8; 16] = rand::random();
    STANDARD.encode(input)
}

/// Derive `sec-websocket-accept` from `sec-websocket-key`.
#[inline]
pub fn derive_accept_key(sec_key: &str) -> String {
    let mut sha1 = Sha1::default();
    sha1.update(sec_key.as_bytes());
    sha1.update(GUID);
    STANDARD.encode(sha1.finalize())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn generate_sec_key() {
        for _ in 0..=1024 {
            let key = new_sec_key();
            assert_eq!(key.len(), 24);
            assert_eq!(STANDARD.decode(&key).unwrap().len(), 16);
        }
    }

    #[test]
    fn derive_sec_key() {
        assert_eq!(
            derive_accept_key("dGhlIHNhbXBsZSBub25jZQ=="),
            "s3pPLMBiTxaQ9kYGzzhZRbK+xOo="
        );
    }
}
