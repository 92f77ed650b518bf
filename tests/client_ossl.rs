//! Interop handshakes against an OpenSSL server, one cipher suite
//! family per test. The server echoes one message and closes.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread::JoinHandle;
use std::time::Duration;

use openssl::asn1::Asn1Time;
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::ssl::{SslAcceptor, SslMethod, SslVersion};
use openssl::x509::{X509NameBuilder, X509};

use tolv::suite::CipherSuite;
use tolv::{Client, Config};

fn identity() -> (PKey<Private>, X509) {
    let rsa = Rsa::generate(2048).unwrap();
    let pkey = PKey::from_rsa(rsa).unwrap();

    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_text("CN", "localhost").unwrap();
    let name = name.build();

    let mut builder = X509::builder().unwrap();
    builder.set_version(2).unwrap();
    builder.set_subject_name(&name).unwrap();
    builder.set_issuer_name(&name).unwrap();
    builder.set_pubkey(&pkey).unwrap();
    builder
        .set_not_before(&Asn1Time::days_from_now(0).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::days_from_now(1).unwrap())
        .unwrap();
    builder.sign(&pkey, MessageDigest::sha256()).unwrap();

    (pkey, builder.build())
}

/// Start a one-shot echo server restricted to `cipher_list`.
fn spawn_server(cipher_list: &'static str) -> (SocketAddr, JoinHandle<()>) {
    let (pkey, cert) = identity();

    let mut acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server()).unwrap();
    acceptor.set_private_key(&pkey).unwrap();
    acceptor.set_certificate(&cert).unwrap();
    acceptor
        .set_min_proto_version(Some(SslVersion::TLS1_2))
        .unwrap();
    acceptor
        .set_max_proto_version(Some(SslVersion::TLS1_2))
        .unwrap();
    acceptor.set_cipher_list(cipher_list).unwrap();
    acceptor.set_groups_list("X25519").unwrap();
    let acceptor = acceptor.build();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut tls = acceptor.accept(stream).unwrap();

        let mut buf = [0u8; 1024];
        let n = tls.read(&mut buf).unwrap();
        tls.write_all(&buf[..n]).unwrap();
        let _ = tls.shutdown();
    });

    (addr, handle)
}

fn echo_roundtrip(cipher_list: &'static str, suites: &[CipherSuite], expected: CipherSuite) {
    let _ = env_logger::builder().is_test(true).try_init();
    let (addr, server) = spawn_server(cipher_list);

    let config = Config::builder("localhost")
        .cipher_suites(suites)
        .read_timeout(Duration::from_secs(5))
        .build();

    let mut client = Client::connect(addr, config).unwrap();
    assert_eq!(client.cipher_suite(), Some(expected));

    client.send_application_data(b"ping over tls").unwrap();
    let echoed = client.read_application_data().unwrap().unwrap();
    assert_eq!(echoed, b"ping over tls");

    // The server shuts down after echoing; we should see a clean close.
    assert!(client.read_application_data().unwrap().is_none());
    client.close().unwrap();

    server.join().unwrap();
}

#[test]
fn ecdhe_aes128_gcm() {
    echo_roundtrip(
        "ECDHE-RSA-AES128-GCM-SHA256",
        &[CipherSuite::ECDHE_RSA_AES128_GCM_SHA256],
        CipherSuite::ECDHE_RSA_AES128_GCM_SHA256,
    );
}

#[test]
fn ecdhe_aes256_gcm_sha384() {
    echo_roundtrip(
        "ECDHE-RSA-AES256-GCM-SHA384",
        &[CipherSuite::ECDHE_RSA_AES256_GCM_SHA384],
        CipherSuite::ECDHE_RSA_AES256_GCM_SHA384,
    );
}

#[test]
fn ecdhe_chacha20_poly1305() {
    echo_roundtrip(
        "ECDHE-RSA-CHACHA20-POLY1305",
        &[CipherSuite::ECDHE_RSA_CHACHA20_POLY1305_SHA256],
        CipherSuite::ECDHE_RSA_CHACHA20_POLY1305_SHA256,
    );
}

#[test]
fn ecdhe_aes128_cbc() {
    echo_roundtrip(
        "ECDHE-RSA-AES128-SHA",
        &[CipherSuite::ECDHE_RSA_AES128_CBC_SHA],
        CipherSuite::ECDHE_RSA_AES128_CBC_SHA,
    );
}

#[test]
fn rsa_key_exchange_aes128_gcm() {
    echo_roundtrip(
        "AES128-GCM-SHA256",
        &[CipherSuite::RSA_AES128_GCM_SHA256],
        CipherSuite::RSA_AES128_GCM_SHA256,
    );
}

#[test]
fn rsa_key_exchange_aes256_cbc() {
    echo_roundtrip(
        "AES256-SHA",
        &[CipherSuite::RSA_AES256_CBC_SHA],
        CipherSuite::RSA_AES256_CBC_SHA,
    );
}

#[test]
fn server_picks_from_preference_list() {
    let (addr, server) = spawn_server("ECDHE-RSA-AES128-GCM-SHA256");

    // Offer the default list; the server can only do one of them.
    let config = Config::builder("localhost")
        .read_timeout(Duration::from_secs(5))
        .build();

    let mut client = Client::connect(addr, config).unwrap();
    assert_eq!(
        client.cipher_suite(),
        Some(CipherSuite::ECDHE_RSA_AES128_GCM_SHA256)
    );

    client.send_application_data(b"x").unwrap();
    client.read_application_data().unwrap().unwrap();
    client.close().unwrap();
    server.join().unwrap();
}

#[test]
fn large_payload_crosses_record_boundary() {
    let (addr, server) = {
        let (pkey, cert) = identity();
        let mut acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server()).unwrap();
        acceptor.set_private_key(&pkey).unwrap();
        acceptor.set_certificate(&cert).unwrap();
        acceptor
            .set_min_proto_version(Some(SslVersion::TLS1_2))
            .unwrap();
        acceptor
            .set_max_proto_version(Some(SslVersion::TLS1_2))
            .unwrap();
        acceptor.set_groups_list("X25519").unwrap();
        let acceptor = acceptor.build();

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut tls = acceptor.accept(stream).unwrap();
            let mut received = Vec::new();
            while received.len() < 20_000 {
                let mut buf = [0u8; 4096];
                let n = tls.read(&mut buf).unwrap();
                received.extend_from_slice(&buf[..n]);
            }
            tls.write_all(&received).unwrap();
            let _ = tls.shutdown();
        });
        (addr, handle)
    };

    let config = Config::builder("localhost")
        .read_timeout(Duration::from_secs(5))
        .build();
    let mut client = Client::connect(addr, config).unwrap();

    // Larger than one record's plaintext ceiling, so the record layer
    // must split it.
    let payload: Vec<u8> = (0..20_000u32).map(|i| i as u8).collect();
    client.send_application_data(&payload).unwrap();

    let mut echoed = Vec::new();
    while echoed.len() < payload.len() {
        match client.read_application_data().unwrap() {
            Some(chunk) => echoed.extend_from_slice(&chunk),
            None => break,
        }
    }
    assert_eq!(echoed, payload);

    client.close().unwrap();
    server.join().unwrap();
}
