use std::time::Duration;

use crate::rng::{OsRandom, RandomSource};
use crate::suite::CipherSuite;

/// The suites offered by default, strongest first. 3DES and RC4 have
/// working codecs but are not offered unless explicitly configured.
pub static DEFAULT_CIPHER_SUITES: &[CipherSuite] = &[
    CipherSuite::ECDHE_RSA_AES128_GCM_SHA256,
    CipherSuite::ECDHE_ECDSA_AES128_GCM_SHA256,
    CipherSuite::ECDHE_RSA_AES256_GCM_SHA384,
    CipherSuite::ECDHE_ECDSA_AES256_GCM_SHA384,
    CipherSuite::ECDHE_RSA_CHACHA20_POLY1305_SHA256,
    CipherSuite::ECDHE_ECDSA_CHACHA20_POLY1305_SHA256,
    CipherSuite::ECDHE_RSA_AES128_CBC_SHA,
    CipherSuite::ECDHE_ECDSA_AES128_CBC_SHA,
    CipherSuite::ECDHE_RSA_AES256_CBC_SHA,
    CipherSuite::ECDHE_ECDSA_AES256_CBC_SHA,
    CipherSuite::RSA_AES128_GCM_SHA256,
    CipherSuite::RSA_AES256_GCM_SHA384,
    CipherSuite::RSA_AES128_CBC_SHA,
    CipherSuite::RSA_AES256_CBC_SHA,
];

/// Client configuration.
pub struct Config {
    server_name: String,
    cipher_suites: Vec<CipherSuite>,
    read_timeout: Duration,
    random: Box<dyn RandomSource>,
    client_key: Option<[u8; 32]>,
}

impl Config {
    /// Create a new configuration builder. The server name goes into the
    /// SNI extension.
    pub fn builder(server_name: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder {
            server_name: server_name.into(),
            cipher_suites: DEFAULT_CIPHER_SUITES.to_vec(),
            read_timeout: Duration::from_secs(10),
            random: Box::new(OsRandom),
            client_key: None,
        }
    }

    #[inline(always)]
    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// The suites offered in the ClientHello, in preference order.
    #[inline(always)]
    pub fn cipher_suites(&self) -> &[CipherSuite] {
        &self.cipher_suites
    }

    /// Timeout applied to the socket while waiting for server flights.
    #[inline(always)]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub(crate) fn random(&mut self) -> &mut dyn RandomSource {
        &mut *self.random
    }

    #[inline(always)]
    pub(crate) fn client_key(&self) -> Option<[u8; 32]> {
        self.client_key
    }
}

/// Builder for client configuration.
pub struct ConfigBuilder {
    server_name: String,
    cipher_suites: Vec<CipherSuite>,
    read_timeout: Duration,
    random: Box<dyn RandomSource>,
    client_key: Option<[u8; 32]>,
}

impl ConfigBuilder {
    /// Replace the offered cipher suites.
    ///
    /// Defaults to [`DEFAULT_CIPHER_SUITES`].
    pub fn cipher_suites(mut self, suites: &[CipherSuite]) -> Self {
        self.cipher_suites = suites.to_vec();
        self
    }

    /// Set the socket read timeout used while handshaking and reading.
    ///
    /// Defaults to 10 seconds.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Replace the randomness source. Only useful for deterministic
    /// testing; the default draws from the operating system.
    pub fn random(mut self, random: Box<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Fix the ephemeral X25519 private key instead of generating one.
    /// Only useful for reproducing known handshakes in tests.
    pub fn client_key(mut self, key: [u8; 32]) -> Self {
        self.client_key = Some(key);
        self
    }

    pub fn build(self) -> Config {
        Config {
            server_name: self.server_name,
            cipher_suites: self.cipher_suites,
            read_timeout: self.read_timeout,
            random: self.random,
            client_key: self.client_key,
        }
    }
}
