#![forbid(unsafe_code)]
#![warn(clippy::all)]

//! A synchronous TLS 1.2 client protocol engine.
//!
//! The crate speaks RFC 5246 from the client side: record framing,
//! handshake codecs, ECDHE-X25519 and RSA key exchange, TLS 1.2 PRF key
//! derivation, and AEAD/CBC/RC4 record protection, driven by a blocking
//! state machine over any `Read + Write` transport.
//!
//! Certificate chain validation is intentionally absent; the server's
//! certificate is used for its key and nothing else.

mod client;
pub use client::Client;

pub mod config;
pub use config::{Config, DEFAULT_CIPHER_SUITES};

mod error;
pub use error::Error;

pub mod crypto;
pub mod message;
pub mod record;
pub mod rng;
pub mod suite;
pub use suite::CipherSuite;
