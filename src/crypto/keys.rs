use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::prf;
use crate::error::Error;
use crate::suite::CipherSuite;

/// The connection key material: the master secret and the key block split
/// into its six positional parts (RFC 5246 section 6.3).
///
/// Split order is fixed: client MAC, server MAC, client key, server key,
/// client IV, server IV. Parts a suite does not use are empty.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ExchangeKeys {
    pub master_secret: [u8; prf::MASTER_SECRET_LEN],
    pub client_mac_key: Vec<u8>,
    pub server_mac_key: Vec<u8>,
    pub client_key: Vec<u8>,
    pub server_key: Vec<u8>,
    pub client_iv: Vec<u8>,
    pub server_iv: Vec<u8>,
}

impl ExchangeKeys {
    /// Expand a pre-master secret into connection keys for `suite`.
    pub fn derive(
        pre_master_secret: &[u8],
        client_random: &[u8; 32],
        server_random: &[u8; 32],
        suite: CipherSuite,
    ) -> Result<ExchangeKeys, Error> {
        if !suite.is_supported() {
            return Err(Error::UnsupportedCipherSuite(suite.as_u16()));
        }

        let hash = suite.hash_algorithm();
        let master_secret =
            prf::master_secret(pre_master_secret, client_random, server_random, hash);

        let mut key_block = prf::key_block(
            &master_secret,
            client_random,
            server_random,
            suite.key_block_len(),
            hash,
        );

        let mac_len = suite.mac_algorithm().key_len();
        let bulk = suite.bulk_cipher();

        let mut at = 0;
        let mut next = |len: usize| {
            let part = key_block[at..at + len].to_vec();
            at += len;
            part
        };

        let client_mac_key = next(mac_len);
        let server_mac_key = next(mac_len);
        let client_key = next(bulk.key_len);
        let server_key = next(bulk.key_len);
        let client_iv = next(bulk.fixed_iv_len);
        let server_iv = next(bulk.fixed_iv_len);

        key_block.zeroize();

        Ok(ExchangeKeys {
            master_secret,
            client_mac_key,
            server_mac_key,
            client_key,
            server_key,
            client_iv,
            server_iv,
        })
    }
}

impl std::fmt::Debug for ExchangeKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of logs.
        f.debug_struct("ExchangeKeys").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aes_gcm_split() {
        let keys = ExchangeKeys::derive(
            &[0x03; 48],
            &[0x01; 32],
            &[0x02; 32],
            CipherSuite::ECDHE_RSA_AES128_GCM_SHA256,
        )
        .unwrap();

        assert!(keys.client_mac_key.is_empty());
        assert!(keys.server_mac_key.is_empty());
        assert_eq!(keys.client_key.len(), 16);
        assert_eq!(keys.server_key.len(), 16);
        assert_eq!(keys.client_iv.len(), 4);
        assert_eq!(keys.server_iv.len(), 4);
        assert_ne!(keys.client_key, keys.server_key);
    }

    #[test]
    fn cbc_split() {
        let keys = ExchangeKeys::derive(
            &[0x03; 48],
            &[0x01; 32],
            &[0x02; 32],
            CipherSuite::ECDHE_RSA_AES128_CBC_SHA,
        )
        .unwrap();

        assert_eq!(keys.client_mac_key.len(), 20);
        assert_eq!(keys.server_mac_key.len(), 20);
        assert_eq!(keys.client_key.len(), 16);
        // CBC records carry an explicit IV; none comes from the key block.
        assert!(keys.client_iv.is_empty());
        assert!(keys.server_iv.is_empty());
    }

    #[test]
    fn chacha_split() {
        let keys = ExchangeKeys::derive(
            &[0x03; 48],
            &[0x01; 32],
            &[0x02; 32],
            CipherSuite::ECDHE_RSA_CHACHA20_POLY1305_SHA256,
        )
        .unwrap();

        assert_eq!(keys.client_key.len(), 32);
        assert_eq!(keys.client_iv.len(), 12);
        assert!(keys.client_mac_key.is_empty());
    }

    #[test]
    fn unsupported_suite_is_rejected() {
        assert!(ExchangeKeys::derive(
            &[0x03; 48],
            &[0x01; 32],
            &[0x02; 32],
            CipherSuite::RSA_3DES_EDE_CBC_SHA,
        )
        .is_err());
    }
}
