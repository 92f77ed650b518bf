//! The TLS 1.2 pseudorandom function (RFC 5246 section 5) and the key
//! derivation steps built on it (sections 6.3 and 7.4.9).

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha384};

use crate::message::VERIFY_DATA_LEN;
use crate::suite::HashAlgorithm;

pub const MASTER_SECRET_LEN: usize = 48;

/// PRF(secret, label, seed) = P_hash(secret, label + seed), truncated to
/// `output_len`.
pub fn prf_tls12(
    secret: &[u8],
    label: &str,
    seed: &[u8],
    output_len: usize,
    hash: HashAlgorithm,
) -> Vec<u8> {
    let mut full_seed = Vec::with_capacity(label.len() + seed.len());
    full_seed.extend_from_slice(label.as_bytes());
    full_seed.extend_from_slice(seed);

    let mut result = Vec::with_capacity(output_len);

    match hash {
        HashAlgorithm::SHA256 => {
            // A(1) = HMAC_hash(secret, A(0)), A(0) = seed
            let mut a = hmac_sha256(secret, &[&full_seed]);
            while result.len() < output_len {
                // HMAC_hash(secret, A(i) + seed)
                let output = hmac_sha256(secret, &[&a, &full_seed]);
                let take = output.len().min(output_len - result.len());
                result.extend_from_slice(&output[..take]);
                a = hmac_sha256(secret, &[&a]);
            }
        }
        HashAlgorithm::SHA384 => {
            let mut a = hmac_sha384(secret, &[&full_seed]);
            while result.len() < output_len {
                let output = hmac_sha384(secret, &[&a, &full_seed]);
                let take = output.len().min(output_len - result.len());
                result.extend_from_slice(&output[..take]);
                a = hmac_sha384(secret, &[&a]);
            }
        }
    }

    result
}

fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    // HMAC accepts keys of any length.
    let mut mac = Hmac::<Sha256>::new_from_slice(key).unwrap_or_else(|_| unreachable!());
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().to_vec()
}

fn hmac_sha384(key: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let mut mac = Hmac::<Sha384>::new_from_slice(key).unwrap_or_else(|_| unreachable!());
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().to_vec()
}

/// master_secret = PRF(pre_master_secret, "master secret",
/// client_random + server_random, 48)
pub fn master_secret(
    pre_master_secret: &[u8],
    client_random: &[u8; 32],
    server_random: &[u8; 32],
    hash: HashAlgorithm,
) -> [u8; MASTER_SECRET_LEN] {
    let mut seed = [0u8; 64];
    seed[..32].copy_from_slice(client_random);
    seed[32..].copy_from_slice(server_random);

    let out = prf_tls12(pre_master_secret, "master secret", &seed, MASTER_SECRET_LEN, hash);
    let mut master = [0u8; MASTER_SECRET_LEN];
    master.copy_from_slice(&out);
    master
}

/// key_block = PRF(master_secret, "key expansion",
/// server_random + client_random, length). Note the random order flips
/// relative to the master secret derivation.
pub fn key_block(
    master_secret: &[u8],
    client_random: &[u8; 32],
    server_random: &[u8; 32],
    length: usize,
    hash: HashAlgorithm,
) -> Vec<u8> {
    let mut seed = [0u8; 64];
    seed[..32].copy_from_slice(server_random);
    seed[32..].copy_from_slice(client_random);

    prf_tls12(master_secret, "key expansion", &seed, length, hash)
}

/// Hash of the handshake transcript with the suite's digest.
pub fn handshake_hash(transcript: &[u8], hash: HashAlgorithm) -> Vec<u8> {
    match hash {
        HashAlgorithm::SHA256 => Sha256::digest(transcript).to_vec(),
        HashAlgorithm::SHA384 => Sha384::digest(transcript).to_vec(),
    }
}

/// verify_data = PRF(master_secret, label, Hash(transcript), 12), where
/// the label is "client finished" or "server finished".
pub fn finished_verify_data(
    master_secret: &[u8],
    label: &str,
    transcript: &[u8],
    hash: HashAlgorithm,
) -> [u8; VERIFY_DATA_LEN] {
    let session_hash = handshake_hash(transcript, hash);
    let out = prf_tls12(master_secret, label, &session_hash, VERIFY_DATA_LEN, hash);

    let mut verify_data = [0u8; VERIFY_DATA_LEN];
    verify_data.copy_from_slice(&out);
    verify_data
}
