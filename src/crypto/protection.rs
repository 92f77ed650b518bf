//! Per-direction record protection: seal on write, open on read.
//!
//! A [`RecordProtection`] value covers exactly one direction of one
//! connection epoch. ChangeCipherSpec swaps the active instance and the
//! caller's sequence number restarts at zero with it.

use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm};
use chacha20poly1305::ChaCha20Poly1305;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use rc4::consts::U16;
use rc4::{KeyInit as _, Rc4, StreamCipher};
use sha1::Sha1;

use crate::error::Error;
use crate::message::{ContentType, ProtocolVersion, MAX_PLAINTEXT_LEN};
use crate::suite::{BulkAlgorithm, CipherSuite};

const AAD_LEN: usize = 13;
const GCM_EXPLICIT_NONCE_LEN: usize = 8;
const NONCE_LEN: usize = 12;
const MAC_LEN: usize = 20;
const BLOCK_LEN: usize = 16;

/// One direction's record transform.
pub enum RecordProtection {
    /// The handshake epoch: records pass through unmodified.
    Null,
    Aead(AeadProtection),
    Block(BlockProtection),
    Stream(StreamProtection),
}

impl RecordProtection {
    /// Build the transform for one direction from that direction's slice
    /// of the key block.
    pub fn new(suite: CipherSuite, key: &[u8], iv: &[u8], mac_key: &[u8]) -> Result<Self, Error> {
        match suite.bulk_cipher().algorithm {
            BulkAlgorithm::Aes128Gcm => {
                let cipher = Aes128Gcm::new_from_slice(key)
                    .map_err(|_| Error::Security("bad AES-128-GCM key length"))?;
                let mut fixed_iv = [0u8; 4];
                fixed_iv.copy_from_slice(iv);
                Ok(RecordProtection::Aead(AeadProtection {
                    cipher: AeadCipher::Aes128(Box::new(cipher)),
                    fixed_iv: FixedIv::Gcm(fixed_iv),
                }))
            }
            BulkAlgorithm::Aes256Gcm => {
                let cipher = Aes256Gcm::new_from_slice(key)
                    .map_err(|_| Error::Security("bad AES-256-GCM key length"))?;
                let mut fixed_iv = [0u8; 4];
                fixed_iv.copy_from_slice(iv);
                Ok(RecordProtection::Aead(AeadProtection {
                    cipher: AeadCipher::Aes256(Box::new(cipher)),
                    fixed_iv: FixedIv::Gcm(fixed_iv),
                }))
            }
            BulkAlgorithm::ChaCha20Poly1305 => {
                let cipher = ChaCha20Poly1305::new_from_slice(key)
                    .map_err(|_| Error::Security("bad ChaCha20 key length"))?;
                let mut fixed_iv = [0u8; NONCE_LEN];
                fixed_iv.copy_from_slice(iv);
                Ok(RecordProtection::Aead(AeadProtection {
                    cipher: AeadCipher::ChaCha20(Box::new(cipher)),
                    fixed_iv: FixedIv::ChaCha(fixed_iv),
                }))
            }
            BulkAlgorithm::Aes128Cbc | BulkAlgorithm::Aes256Cbc => {
                Ok(RecordProtection::Block(BlockProtection {
                    key: key.to_vec(),
                    mac_key: mac_key.to_vec(),
                    aes256: suite.bulk_cipher().algorithm == BulkAlgorithm::Aes256Cbc,
                }))
            }
            BulkAlgorithm::Rc4_128 => Ok(RecordProtection::Stream(StreamProtection {
                cipher: Rc4::new_from_slice(key)
                    .map_err(|_| Error::Security("bad RC4 key length"))?,
                mac_key: mac_key.to_vec(),
            })),
            BulkAlgorithm::TripleDesEdeCbc | BulkAlgorithm::Unknown => {
                Err(Error::UnsupportedCipherSuite(suite.as_u16()))
            }
        }
    }

    /// Transform a plaintext fragment into the on-the-wire fragment.
    pub fn encrypt(
        &mut self,
        sequence: u64,
        content_type: ContentType,
        version: ProtocolVersion,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let aad = additional_data(sequence, content_type, version, plaintext.len());
        match self {
            RecordProtection::Null => Ok(plaintext.to_vec()),
            RecordProtection::Aead(aead) => aead.seal(sequence, &aad, plaintext),
            RecordProtection::Block(block) => block.seal(&aad, plaintext),
            RecordProtection::Stream(stream) => stream.seal(&aad, plaintext),
        }
    }

    /// Transform a received fragment back into plaintext, authenticating
    /// where the suite provides integrity.
    pub fn decrypt(
        &mut self,
        sequence: u64,
        content_type: ContentType,
        version: ProtocolVersion,
        fragment: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let plaintext = match self {
            RecordProtection::Null => fragment.to_vec(),
            RecordProtection::Aead(aead) => {
                aead.open(sequence, content_type, version, fragment)?
            }
            RecordProtection::Block(block) => {
                block.open(sequence, content_type, version, fragment)?
            }
            RecordProtection::Stream(stream) => {
                stream.open(sequence, content_type, version, fragment)?
            }
        };

        if plaintext.len() > MAX_PLAINTEXT_LEN {
            return Err(Error::RecordOverflow(plaintext.len()));
        }
        Ok(plaintext)
    }
}

/// additional_data = seq_num + type + version + length, 13 bytes. The
/// length is always the *plaintext* length.
fn additional_data(
    sequence: u64,
    content_type: ContentType,
    version: ProtocolVersion,
    plaintext_len: usize,
) -> [u8; AAD_LEN] {
    let mut aad = [0u8; AAD_LEN];
    aad[..8].copy_from_slice(&sequence.to_be_bytes());
    aad[8] = content_type.as_u8();
    aad[9..11].copy_from_slice(&version.as_u16().to_be_bytes());
    aad[11..13].copy_from_slice(&(plaintext_len as u16).to_be_bytes());
    aad
}

enum AeadCipher {
    Aes128(Box<Aes128Gcm>),
    Aes256(Box<Aes256Gcm>),
    ChaCha20(Box<ChaCha20Poly1305>),
}

enum FixedIv {
    /// GCM: 4-byte salt, completed by the 8-byte explicit nonce carried
    /// in the record.
    Gcm([u8; 4]),
    /// ChaCha20: full 12-byte IV, XORed with the left-padded sequence
    /// number. Nothing extra on the wire.
    ChaCha([u8; NONCE_LEN]),
}

pub struct AeadProtection {
    cipher: AeadCipher,
    fixed_iv: FixedIv,
}

impl AeadProtection {
    fn nonce(&self, sequence: u64) -> [u8; NONCE_LEN] {
        let mut nonce = [0u8; NONCE_LEN];
        match &self.fixed_iv {
            FixedIv::Gcm(salt) => {
                nonce[..4].copy_from_slice(salt);
                nonce[4..].copy_from_slice(&sequence.to_be_bytes());
            }
            FixedIv::ChaCha(iv) => {
                nonce.copy_from_slice(iv);
                for (nonce_byte, seq_byte) in
                    nonce[4..].iter_mut().zip(sequence.to_be_bytes())
                {
                    *nonce_byte ^= seq_byte;
                }
            }
        }
        nonce
    }

    fn seal(&self, sequence: u64, aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        let nonce = self.nonce(sequence);
        let payload = Payload {
            msg: plaintext,
            aad,
        };

        let ciphertext = match &self.cipher {
            AeadCipher::Aes128(cipher) => cipher.encrypt((&nonce).into(), payload),
            AeadCipher::Aes256(cipher) => cipher.encrypt((&nonce).into(), payload),
            AeadCipher::ChaCha20(cipher) => cipher.encrypt((&nonce).into(), payload),
        }
        .map_err(|_| Error::Security("AEAD seal failed"))?;

        match self.fixed_iv {
            FixedIv::Gcm(_) => {
                // The explicit nonce travels in the clear ahead of the
                // ciphertext.
                let mut fragment =
                    Vec::with_capacity(GCM_EXPLICIT_NONCE_LEN + ciphertext.len());
                fragment.extend_from_slice(&sequence.to_be_bytes());
                fragment.extend_from_slice(&ciphertext);
                Ok(fragment)
            }
            FixedIv::ChaCha(_) => Ok(ciphertext),
        }
    }

    fn open(
        &self,
        sequence: u64,
        content_type: ContentType,
        version: ProtocolVersion,
        fragment: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let (nonce, ciphertext) = match &self.fixed_iv {
            FixedIv::Gcm(salt) => {
                if fragment.len() < GCM_EXPLICIT_NONCE_LEN + 16 {
                    return Err(Error::Decode("AEAD record too short"));
                }
                let (explicit, ciphertext) = fragment.split_at(GCM_EXPLICIT_NONCE_LEN);
                let mut nonce = [0u8; NONCE_LEN];
                nonce[..4].copy_from_slice(salt);
                nonce[4..].copy_from_slice(explicit);
                (nonce, ciphertext)
            }
            FixedIv::ChaCha(_) => {
                if fragment.len() < 16 {
                    return Err(Error::Decode("AEAD record too short"));
                }
                (self.nonce(sequence), fragment)
            }
        };

        // The AAD length field covers the plaintext, which for AEAD is
        // the ciphertext minus tag (and explicit nonce).
        let plaintext_len = ciphertext.len() - 16;
        let aad = additional_data(sequence, content_type, version, plaintext_len);
        let payload = Payload {
            msg: ciphertext,
            aad: &aad,
        };

        match &self.cipher {
            AeadCipher::Aes128(cipher) => cipher.decrypt((&nonce).into(), payload),
            AeadCipher::Aes256(cipher) => cipher.decrypt((&nonce).into(), payload),
            AeadCipher::ChaCha20(cipher) => cipher.decrypt((&nonce).into(), payload),
        }
        .map_err(|_| Error::Security("AEAD tag verification failed"))
    }
}

/// CBC with HMAC-SHA1, MAC-then-pad-then-encrypt. Each record carries a
/// fresh random IV in the clear ahead of the ciphertext (RFC 5246
/// 6.2.3.2); the key block derives no CBC IV material.
pub struct BlockProtection {
    key: Vec<u8>,
    mac_key: Vec<u8>,
    aes256: bool,
}

impl BlockProtection {
    fn seal(&self, aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        let mac = hmac_sha1(&self.mac_key, aad, plaintext)?;

        let mut buffer = Vec::with_capacity(plaintext.len() + MAC_LEN + BLOCK_LEN);
        buffer.extend_from_slice(plaintext);
        buffer.extend_from_slice(&mac);

        // pad_len + 1 bytes, each holding the value pad_len.
        let pad_len = BLOCK_LEN - 1 - (buffer.len() % BLOCK_LEN);
        buffer.resize(buffer.len() + pad_len + 1, pad_len as u8);

        let mut iv = [0u8; BLOCK_LEN];
        OsRng.fill_bytes(&mut iv);

        let ciphertext = if self.aes256 {
            cbc::Encryptor::<aes::Aes256>::new_from_slices(&self.key, &iv)
                .map_err(|_| Error::Security("bad CBC key or IV length"))?
                .encrypt_padded_vec_mut::<NoPadding>(&buffer)
        } else {
            cbc::Encryptor::<aes::Aes128>::new_from_slices(&self.key, &iv)
                .map_err(|_| Error::Security("bad CBC key or IV length"))?
                .encrypt_padded_vec_mut::<NoPadding>(&buffer)
        };

        let mut fragment = Vec::with_capacity(BLOCK_LEN + ciphertext.len());
        fragment.extend_from_slice(&iv);
        fragment.extend_from_slice(&ciphertext);
        Ok(fragment)
    }

    fn open(
        &self,
        sequence: u64,
        content_type: ContentType,
        version: ProtocolVersion,
        fragment: &[u8],
    ) -> Result<Vec<u8>, Error> {
        // At least the explicit IV block plus one ciphertext block.
        if fragment.len() < 2 * BLOCK_LEN || fragment.len() % BLOCK_LEN != 0 {
            return Err(Error::Decode("CBC record length"));
        }
        let (iv, ciphertext) = fragment.split_at(BLOCK_LEN);

        let decrypted = if self.aes256 {
            cbc::Decryptor::<aes::Aes256>::new_from_slices(&self.key, iv)
                .map_err(|_| Error::Security("bad CBC key or IV length"))?
                .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
        } else {
            cbc::Decryptor::<aes::Aes128>::new_from_slices(&self.key, iv)
                .map_err(|_| Error::Security("bad CBC key or IV length"))?
                .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
        }
        .map_err(|_| Error::Security("CBC decryption failed"))?;

        // Padding: pad_len + 1 trailing bytes, each equal to pad_len.
        let pad_len = *decrypted.last().ok_or(Error::Decode("CBC record empty"))? as usize;
        if decrypted.len() < pad_len + 1 + MAC_LEN {
            return Err(Error::Security("bad record padding"));
        }
        let content_end = decrypted.len() - pad_len - 1;
        if decrypted[content_end..].iter().any(|&b| b as usize != pad_len) {
            return Err(Error::Security("bad record padding"));
        }

        let mac_start = content_end - MAC_LEN;
        let plaintext = &decrypted[..mac_start];
        let received_mac = &decrypted[mac_start..content_end];

        let aad = additional_data(sequence, content_type, version, plaintext.len());
        verify_hmac_sha1(&self.mac_key, &aad, plaintext, received_mac)?;

        Ok(plaintext.to_vec())
    }
}

/// RC4 with HMAC-SHA1. One long keystream per direction; record
/// boundaries do not reset it.
pub struct StreamProtection {
    cipher: Rc4<U16>,
    mac_key: Vec<u8>,
}

impl StreamProtection {
    fn seal(&mut self, aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        let mac = hmac_sha1(&self.mac_key, aad, plaintext)?;

        let mut buffer = Vec::with_capacity(plaintext.len() + MAC_LEN);
        buffer.extend_from_slice(plaintext);
        buffer.extend_from_slice(&mac);

        self.cipher.apply_keystream(&mut buffer);
        Ok(buffer)
    }

    fn open(
        &mut self,
        sequence: u64,
        content_type: ContentType,
        version: ProtocolVersion,
        fragment: &[u8],
    ) -> Result<Vec<u8>, Error> {
        if fragment.len() < MAC_LEN {
            return Err(Error::Decode("stream record too short"));
        }

        let mut buffer = fragment.to_vec();
        self.cipher.apply_keystream(&mut buffer);

        let mac_start = buffer.len() - MAC_LEN;
        let plaintext = &buffer[..mac_start];
        let received_mac = &buffer[mac_start..];

        let aad = additional_data(sequence, content_type, version, plaintext.len());
        verify_hmac_sha1(&self.mac_key, &aad, plaintext, received_mac)?;

        Ok(plaintext.to_vec())
    }
}

fn hmac_sha1(key: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<[u8; MAC_LEN], Error> {
    let mut mac = <Hmac<Sha1> as Mac>::new_from_slice(key)
        .map_err(|_| Error::Security("bad HMAC key length"))?;
    mac.update(aad);
    mac.update(plaintext);

    let mut out = [0u8; MAC_LEN];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

fn verify_hmac_sha1(key: &[u8], aad: &[u8], plaintext: &[u8], tag: &[u8]) -> Result<(), Error> {
    let mut mac = <Hmac<Sha1> as Mac>::new_from_slice(key)
        .map_err(|_| Error::Security("bad HMAC key length"))?;
    mac.update(aad);
    mac.update(plaintext);
    // verify_slice compares in constant time.
    mac.verify_slice(tag)
        .map_err(|_| Error::Security("record MAC verification failed"))
}
