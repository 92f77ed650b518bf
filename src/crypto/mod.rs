//! Key derivation, key exchange and record protection.

pub mod key_exchange;
pub mod keys;
pub mod prf;
pub mod protection;

pub use key_exchange::{rsa_encrypt_pre_master, rsa_pre_master, KeyExchange};
pub use keys::ExchangeKeys;
pub use protection::RecordProtection;

/// Constant-time equality for short fixed-length values such as Finished
/// verify_data.
pub(crate) fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ct_eq_basics() {
        assert!(ct_eq(b"abc", b"abc"));
        assert!(!ct_eq(b"abc", b"abd"));
        assert!(!ct_eq(b"abc", b"abcd"));
        assert!(ct_eq(&[], &[]));
    }
}
