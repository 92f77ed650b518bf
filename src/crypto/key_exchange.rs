//! Client-side key exchange: ephemeral X25519 for ECDHE suites and
//! PKCS#1 v1.5 encryption of the pre-master secret for plain RSA suites.

use rand::{CryptoRng, RngCore};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};
use x25519_dalek::{PublicKey, StaticSecret};
use x509_cert::der::Decode;
use x509_cert::Certificate;
use zeroize::Zeroizing;

use crate::error::Error;
use crate::message::{NamedCurve, ProtocolVersion};
use crate::rng::RandomSource;

pub const X25519_PUBLIC_LEN: usize = 32;
pub const PRE_MASTER_SECRET_LEN: usize = 48;

/// An ephemeral X25519 key pair, alive for exactly one handshake.
pub struct KeyExchange {
    secret: StaticSecret,
    public: PublicKey,
}

impl KeyExchange {
    pub fn generate(curve: NamedCurve, rng: &mut dyn RandomSource) -> Result<Self, Error> {
        if curve != NamedCurve::X25519 {
            return Err(Error::UnsupportedCurve(curve.as_u16()));
        }

        let mut bytes = [0u8; 32];
        rng.fill(&mut bytes);
        Ok(Self::from_private(bytes))
    }

    /// Build the key pair from raw private key bytes. Clamping is the
    /// curve implementation's business.
    pub fn from_private(bytes: [u8; 32]) -> Self {
        let secret = StaticSecret::from(bytes);
        let public = PublicKey::from(&secret);
        KeyExchange { secret, public }
    }

    pub fn public_key(&self) -> &[u8; X25519_PUBLIC_LEN] {
        self.public.as_bytes()
    }

    /// Complete the exchange against the server's public point. The
    /// all-zero output of a low-order peer point is rejected.
    pub fn shared_secret(self, peer_public: &[u8]) -> Result<Zeroizing<[u8; 32]>, Error> {
        if peer_public.len() != X25519_PUBLIC_LEN {
            return Err(Error::Decode("server ECDH public key"));
        }
        let mut peer = [0u8; 32];
        peer.copy_from_slice(peer_public);

        let shared = self.secret.diffie_hellman(&PublicKey::from(peer));
        if !shared.was_contributory() {
            return Err(Error::Security("non-contributory ECDH result"));
        }

        Ok(Zeroizing::new(shared.to_bytes()))
    }
}

impl std::fmt::Debug for KeyExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyExchange")
            .field("public", &self.public.as_bytes())
            .finish_non_exhaustive()
    }
}

/// The RSA pre-master secret: the client's highest offered version in the
/// first two bytes, then 46 random bytes.
pub fn rsa_pre_master(rng: &mut dyn RandomSource) -> Zeroizing<[u8; PRE_MASTER_SECRET_LEN]> {
    let mut pre_master = Zeroizing::new([0u8; PRE_MASTER_SECRET_LEN]);
    rng.fill(&mut pre_master[..]);
    let version = ProtocolVersion::TLS1_2.as_u16().to_be_bytes();
    pre_master[0] = version[0];
    pre_master[1] = version[1];
    pre_master
}

/// Encrypt the pre-master secret to the RSA public key in the server's
/// leaf certificate. The padding bytes come from the injected source,
/// like every other random the handshake draws.
pub fn rsa_encrypt_pre_master(
    leaf_der: &[u8],
    pre_master: &[u8; PRE_MASTER_SECRET_LEN],
    rng: &mut dyn RandomSource,
) -> Result<Vec<u8>, Error> {
    let certificate =
        Certificate::from_der(leaf_der).map_err(|_| Error::Decode("server certificate"))?;
    let spki = &certificate.tbs_certificate.subject_public_key_info;
    let key_bytes = spki
        .subject_public_key
        .as_bytes()
        .ok_or(Error::Decode("server public key"))?;
    let public_key = RsaPublicKey::from_pkcs1_der(key_bytes)
        .map_err(|_| Error::Decode("server RSA public key"))?;

    public_key
        .encrypt(&mut SourceRng(rng), Pkcs1v15Encrypt, &pre_master[..])
        .map_err(|_| Error::Security("RSA encryption failed"))
}

/// Bridges a [`RandomSource`] into the RustCrypto RNG traits for the
/// PKCS#1 padding.
struct SourceRng<'a>(&'a mut dyn RandomSource);

impl RngCore for SourceRng<'_> {
    fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.0.fill(&mut bytes);
        u32::from_be_bytes(bytes)
    }

    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        self.0.fill(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.fill(dest);
        Ok(())
    }
}

impl CryptoRng for SourceRng<'_> {}
