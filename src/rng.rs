//! Injectable randomness for handshake randoms and ephemeral keys.
//!
//! The handshake driver never reaches for a global RNG. Tests inject
//! [`SequentialRandom`] to get byte-exact, reproducible handshakes; real
//! connections use [`OsRandom`].

use rand::rngs::OsRng;
use rand::RngCore;

/// Source of the random bytes used in ClientHello randoms, ephemeral key
/// generation and the RSA pre-master secret.
pub trait RandomSource: Send {
    fn fill(&mut self, buf: &mut [u8]);
}

/// Cryptographically secure randomness from the operating system.
#[derive(Debug, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&mut self, buf: &mut [u8]) {
        OsRng.fill_bytes(buf);
    }
}

/// Deterministic counter randomness. Produces 0x00, 0x01, 0x02, ...
/// wrapping at 0xFF.
///
/// Only for tests and interop debugging. Never use on a real connection.
#[derive(Debug, Default)]
pub struct SequentialRandom {
    next: u8,
}

impl SequentialRandom {
    pub fn new() -> Self {
        Self { next: 0 }
    }
}

impl RandomSource for SequentialRandom {
    fn fill(&mut self, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            *b = self.next;
            self.next = self.next.wrapping_add(1);
        }
    }
}
