//! Cipher suite registry.
//!
//! Each suite code pins down the key exchange algorithm, the bulk cipher
//! parameters and the PRF hash. The record layer and the key derivation
//! never look at the code again after the lookup here.

use nom::number::complete::be_u16;
use nom::IResult;

use crate::message::Codec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum CipherSuite {
    ECDHE_RSA_CHACHA20_POLY1305_SHA256,
    ECDHE_ECDSA_CHACHA20_POLY1305_SHA256,
    ECDHE_RSA_AES128_GCM_SHA256,
    ECDHE_RSA_AES256_GCM_SHA384,
    ECDHE_ECDSA_AES128_GCM_SHA256,
    ECDHE_ECDSA_AES256_GCM_SHA384,
    ECDHE_RSA_AES128_CBC_SHA,
    ECDHE_ECDSA_AES128_CBC_SHA,
    ECDHE_RSA_AES256_CBC_SHA,
    ECDHE_ECDSA_AES256_CBC_SHA,
    RSA_AES128_GCM_SHA256,
    RSA_AES256_GCM_SHA384,
    RSA_AES128_CBC_SHA,
    RSA_AES256_CBC_SHA,
    ECDHE_RSA_3DES_EDE_CBC_SHA,
    RSA_3DES_EDE_CBC_SHA,
    RSA_RC4_128_SHA,
    Unknown(u16),
}

impl Default for CipherSuite {
    fn default() -> Self {
        Self::Unknown(0)
    }
}

impl CipherSuite {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0xCCA8 => CipherSuite::ECDHE_RSA_CHACHA20_POLY1305_SHA256,
            0xCCA9 => CipherSuite::ECDHE_ECDSA_CHACHA20_POLY1305_SHA256,
            0xC02F => CipherSuite::ECDHE_RSA_AES128_GCM_SHA256,
            0xC030 => CipherSuite::ECDHE_RSA_AES256_GCM_SHA384,
            0xC02B => CipherSuite::ECDHE_ECDSA_AES128_GCM_SHA256,
            0xC02C => CipherSuite::ECDHE_ECDSA_AES256_GCM_SHA384,
            0xC013 => CipherSuite::ECDHE_RSA_AES128_CBC_SHA,
            0xC009 => CipherSuite::ECDHE_ECDSA_AES128_CBC_SHA,
            0xC014 => CipherSuite::ECDHE_RSA_AES256_CBC_SHA,
            0xC00A => CipherSuite::ECDHE_ECDSA_AES256_CBC_SHA,
            0x009C => CipherSuite::RSA_AES128_GCM_SHA256,
            0x009D => CipherSuite::RSA_AES256_GCM_SHA384,
            0x002F => CipherSuite::RSA_AES128_CBC_SHA,
            0x0035 => CipherSuite::RSA_AES256_CBC_SHA,
            0xC012 => CipherSuite::ECDHE_RSA_3DES_EDE_CBC_SHA,
            0x000A => CipherSuite::RSA_3DES_EDE_CBC_SHA,
            0x0005 => CipherSuite::RSA_RC4_128_SHA,
            _ => CipherSuite::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CipherSuite::ECDHE_RSA_CHACHA20_POLY1305_SHA256 => 0xCCA8,
            CipherSuite::ECDHE_ECDSA_CHACHA20_POLY1305_SHA256 => 0xCCA9,
            CipherSuite::ECDHE_RSA_AES128_GCM_SHA256 => 0xC02F,
            CipherSuite::ECDHE_RSA_AES256_GCM_SHA384 => 0xC030,
            CipherSuite::ECDHE_ECDSA_AES128_GCM_SHA256 => 0xC02B,
            CipherSuite::ECDHE_ECDSA_AES256_GCM_SHA384 => 0xC02C,
            CipherSuite::ECDHE_RSA_AES128_CBC_SHA => 0xC013,
            CipherSuite::ECDHE_ECDSA_AES128_CBC_SHA => 0xC009,
            CipherSuite::ECDHE_RSA_AES256_CBC_SHA => 0xC014,
            CipherSuite::ECDHE_ECDSA_AES256_CBC_SHA => 0xC00A,
            CipherSuite::RSA_AES128_GCM_SHA256 => 0x009C,
            CipherSuite::RSA_AES256_GCM_SHA384 => 0x009D,
            CipherSuite::RSA_AES128_CBC_SHA => 0x002F,
            CipherSuite::RSA_AES256_CBC_SHA => 0x0035,
            CipherSuite::ECDHE_RSA_3DES_EDE_CBC_SHA => 0xC012,
            CipherSuite::RSA_3DES_EDE_CBC_SHA => 0x000A,
            CipherSuite::RSA_RC4_128_SHA => 0x0005,
            CipherSuite::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], CipherSuite> {
        let (input, value) = be_u16(input)?;
        Ok((input, CipherSuite::from_u16(value)))
    }

    pub fn key_exchange_algorithm(&self) -> KeyExchangeAlgorithm {
        match self {
            CipherSuite::ECDHE_RSA_CHACHA20_POLY1305_SHA256
            | CipherSuite::ECDHE_ECDSA_CHACHA20_POLY1305_SHA256
            | CipherSuite::ECDHE_RSA_AES128_GCM_SHA256
            | CipherSuite::ECDHE_RSA_AES256_GCM_SHA384
            | CipherSuite::ECDHE_ECDSA_AES128_GCM_SHA256
            | CipherSuite::ECDHE_ECDSA_AES256_GCM_SHA384
            | CipherSuite::ECDHE_RSA_AES128_CBC_SHA
            | CipherSuite::ECDHE_ECDSA_AES128_CBC_SHA
            | CipherSuite::ECDHE_RSA_AES256_CBC_SHA
            | CipherSuite::ECDHE_ECDSA_AES256_CBC_SHA
            | CipherSuite::ECDHE_RSA_3DES_EDE_CBC_SHA => KeyExchangeAlgorithm::Ecdhe,
            CipherSuite::RSA_AES128_GCM_SHA256
            | CipherSuite::RSA_AES256_GCM_SHA384
            | CipherSuite::RSA_AES128_CBC_SHA
            | CipherSuite::RSA_AES256_CBC_SHA
            | CipherSuite::RSA_3DES_EDE_CBC_SHA
            | CipherSuite::RSA_RC4_128_SHA => KeyExchangeAlgorithm::Rsa,
            CipherSuite::Unknown(_) => KeyExchangeAlgorithm::Unknown,
        }
    }

    pub fn bulk_cipher(&self) -> BulkCipher {
        match self {
            CipherSuite::ECDHE_RSA_CHACHA20_POLY1305_SHA256
            | CipherSuite::ECDHE_ECDSA_CHACHA20_POLY1305_SHA256 => BulkCipher {
                algorithm: BulkAlgorithm::ChaCha20Poly1305,
                kind: CipherKind::Aead,
                key_len: 32,
                fixed_iv_len: 12,
                tag_len: 16,
                explicit_nonce: false,
            },
            CipherSuite::ECDHE_RSA_AES128_GCM_SHA256
            | CipherSuite::ECDHE_ECDSA_AES128_GCM_SHA256
            | CipherSuite::RSA_AES128_GCM_SHA256 => BulkCipher {
                algorithm: BulkAlgorithm::Aes128Gcm,
                kind: CipherKind::Aead,
                key_len: 16,
                fixed_iv_len: 4,
                tag_len: 16,
                explicit_nonce: true,
            },
            CipherSuite::ECDHE_RSA_AES256_GCM_SHA384
            | CipherSuite::ECDHE_ECDSA_AES256_GCM_SHA384
            | CipherSuite::RSA_AES256_GCM_SHA384 => BulkCipher {
                algorithm: BulkAlgorithm::Aes256Gcm,
                kind: CipherKind::Aead,
                key_len: 32,
                fixed_iv_len: 4,
                tag_len: 16,
                explicit_nonce: true,
            },
            CipherSuite::ECDHE_RSA_AES128_CBC_SHA
            | CipherSuite::ECDHE_ECDSA_AES128_CBC_SHA
            | CipherSuite::RSA_AES128_CBC_SHA => BulkCipher {
                algorithm: BulkAlgorithm::Aes128Cbc,
                kind: CipherKind::Block,
                key_len: 16,
                fixed_iv_len: 0,
                tag_len: 0,
                explicit_nonce: false,
            },
            CipherSuite::ECDHE_RSA_AES256_CBC_SHA
            | CipherSuite::ECDHE_ECDSA_AES256_CBC_SHA
            | CipherSuite::RSA_AES256_CBC_SHA => BulkCipher {
                algorithm: BulkAlgorithm::Aes256Cbc,
                kind: CipherKind::Block,
                key_len: 32,
                fixed_iv_len: 0,
                tag_len: 0,
                explicit_nonce: false,
            },
            CipherSuite::ECDHE_RSA_3DES_EDE_CBC_SHA | CipherSuite::RSA_3DES_EDE_CBC_SHA => {
                BulkCipher {
                    algorithm: BulkAlgorithm::TripleDesEdeCbc,
                    kind: CipherKind::Block,
                    key_len: 24,
                    fixed_iv_len: 0,
                    tag_len: 0,
                    explicit_nonce: false,
                }
            }
            CipherSuite::RSA_RC4_128_SHA => BulkCipher {
                algorithm: BulkAlgorithm::Rc4_128,
                kind: CipherKind::Stream,
                key_len: 16,
                fixed_iv_len: 0,
                tag_len: 0,
                explicit_nonce: false,
            },
            CipherSuite::Unknown(_) => BulkCipher {
                algorithm: BulkAlgorithm::Unknown,
                kind: CipherKind::Aead,
                key_len: 0,
                fixed_iv_len: 0,
                tag_len: 0,
                explicit_nonce: false,
            },
        }
    }

    pub fn mac_algorithm(&self) -> MacAlgorithm {
        match self.bulk_cipher().kind {
            CipherKind::Aead => MacAlgorithm::Null,
            CipherKind::Block | CipherKind::Stream => MacAlgorithm::HmacSha1,
        }
    }

    /// The HMAC driving the PRF. TLS 1.2 never uses the old MD5/SHA1 pair.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        match self {
            CipherSuite::ECDHE_RSA_AES256_GCM_SHA384
            | CipherSuite::ECDHE_ECDSA_AES256_GCM_SHA384
            | CipherSuite::RSA_AES256_GCM_SHA384 => HashAlgorithm::SHA384,
            _ => HashAlgorithm::SHA256,
        }
    }

    /// Total length of the key block derived from the master secret:
    /// 2 x MAC key + 2 x cipher key + 2 x fixed IV.
    pub fn key_block_len(&self) -> usize {
        let bulk = self.bulk_cipher();
        2 * self.mac_algorithm().key_len() + 2 * bulk.key_len + 2 * bulk.fixed_iv_len
    }

    pub fn verify_data_len(&self) -> usize {
        12
    }

    /// Whether this suite can actually be negotiated. 3DES has a suite
    /// code so it can be offered and recognized, but no record protection.
    pub fn is_supported(&self) -> bool {
        !matches!(
            self,
            CipherSuite::ECDHE_RSA_3DES_EDE_CBC_SHA
                | CipherSuite::RSA_3DES_EDE_CBC_SHA
                | CipherSuite::Unknown(_)
        )
    }
}

impl Codec for CipherSuite {
    fn byte_size(&self) -> usize {
        2
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&self.as_u16().to_be_bytes());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyExchangeAlgorithm {
    Ecdhe,
    Rsa,
    Unknown,
}

/// The bulk cipher geometry a suite commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkCipher {
    pub algorithm: BulkAlgorithm,
    pub kind: CipherKind,
    pub key_len: usize,
    /// IV material drawn from the key block: the 4-byte GCM salt or the
    /// full 12-byte ChaCha20 implicit IV. CBC records carry a fresh
    /// explicit IV instead and derive none.
    pub fixed_iv_len: usize,
    pub tag_len: usize,
    /// Whether each record carries the 8-byte explicit nonce in the clear.
    pub explicit_nonce: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherKind {
    Aead,
    Block,
    Stream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAlgorithm {
    Aes128Gcm,
    Aes256Gcm,
    ChaCha20Poly1305,
    Aes128Cbc,
    Aes256Cbc,
    TripleDesEdeCbc,
    Rc4_128,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    SHA256,
    SHA384,
}

impl HashAlgorithm {
    pub fn output_len(&self) -> usize {
        match self {
            HashAlgorithm::SHA256 => 32,
            HashAlgorithm::SHA384 => 48,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacAlgorithm {
    Null,
    HmacSha1,
}

impl MacAlgorithm {
    pub fn key_len(&self) -> usize {
        match self {
            MacAlgorithm::Null => 0,
            MacAlgorithm::HmacSha1 => 20,
        }
    }

    pub fn output_len(&self) -> usize {
        self.key_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_roundtrip() {
        for code in [
            0xCCA8, 0xCCA9, 0xC02F, 0xC030, 0xC02B, 0xC02C, 0xC013, 0xC009, 0xC014, 0xC00A,
            0x009C, 0x009D, 0x002F, 0x0035, 0xC012, 0x000A, 0x0005,
        ] {
            let suite = CipherSuite::from_u16(code);
            assert!(!matches!(suite, CipherSuite::Unknown(_)));
            assert_eq!(suite.as_u16(), code);
        }

        assert_eq!(
            CipherSuite::from_u16(0x1234),
            CipherSuite::Unknown(0x1234)
        );
    }

    #[test]
    fn key_block_lengths() {
        // AEAD: no MAC keys, 2x16 key + 2x4 fixed IV.
        assert_eq!(CipherSuite::ECDHE_RSA_AES128_GCM_SHA256.key_block_len(), 40);
        assert_eq!(CipherSuite::ECDHE_RSA_AES256_GCM_SHA384.key_block_len(), 72);
        // ChaCha20: 2x32 key + 2x12 IV.
        assert_eq!(
            CipherSuite::ECDHE_RSA_CHACHA20_POLY1305_SHA256.key_block_len(),
            88
        );
        // CBC: 2x20 MAC + 2x16 key; the explicit per-record IV derives
        // nothing from the key block.
        assert_eq!(CipherSuite::RSA_AES128_CBC_SHA.key_block_len(), 72);
        assert_eq!(CipherSuite::RSA_AES256_CBC_SHA.key_block_len(), 104);
        // RC4: 2x20 MAC + 2x16 key, no IV.
        assert_eq!(CipherSuite::RSA_RC4_128_SHA.key_block_len(), 72);
    }

    #[test]
    fn bulk_cipher_geometry() {
        let gcm = CipherSuite::ECDHE_RSA_AES128_GCM_SHA256.bulk_cipher();
        assert_eq!(gcm.algorithm, BulkAlgorithm::Aes128Gcm);
        assert_eq!(gcm.kind, CipherKind::Aead);
        assert_eq!((gcm.key_len, gcm.fixed_iv_len, gcm.tag_len), (16, 4, 16));
        assert!(gcm.explicit_nonce);

        let cbc = CipherSuite::ECDHE_RSA_AES128_CBC_SHA.bulk_cipher();
        assert_eq!(cbc.algorithm, BulkAlgorithm::Aes128Cbc);
        assert_eq!(cbc.kind, CipherKind::Block);
        assert_eq!((cbc.key_len, cbc.fixed_iv_len, cbc.tag_len), (16, 0, 0));
        assert!(!cbc.explicit_nonce);
    }

    #[test]
    fn three_des_is_recognized_but_unsupported() {
        let suite = CipherSuite::from_u16(0xC012);
        assert_eq!(suite, CipherSuite::ECDHE_RSA_3DES_EDE_CBC_SHA);
        assert!(!suite.is_supported());
        assert_eq!(
            suite.key_exchange_algorithm(),
            KeyExchangeAlgorithm::Ecdhe
        );
    }

    #[test]
    fn sha384_suites() {
        assert_eq!(
            CipherSuite::RSA_AES256_GCM_SHA384.hash_algorithm(),
            HashAlgorithm::SHA384
        );
        assert_eq!(
            CipherSuite::RSA_AES128_GCM_SHA256.hash_algorithm(),
            HashAlgorithm::SHA256
        );
    }
}
