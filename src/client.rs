//! The synchronous TLS 1.2 client handshake driver and connection.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use log::{debug, info, warn};

use crate::config::Config;
use crate::crypto::{
    ct_eq, rsa_encrypt_pre_master, rsa_pre_master, ExchangeKeys, KeyExchange, RecordProtection,
};
use crate::error::{parse_all, Error};
use crate::message::{
    Alert, Body, ChangeCipherSpec, ClientHello, ClientKeyExchange, Codec, ContentType, Handshake,
    MessageType, NamedCurve, ProtocolVersion, Random,
};
use crate::record::{Defragmenter, HandshakeMessage, RecordLayer};
use crate::suite::{CipherSuite, KeyExchangeAlgorithm};

/// Where the connection stands. Used for error reporting and to police
/// message order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandshakeState {
    Start,
    AwaitServerHello,
    AwaitCertificate,
    AwaitServerKeyExchange,
    AwaitServerHelloDone,
    AwaitChangeCipherSpec,
    AwaitFinished,
    Connected,
    Closed,
}

impl HandshakeState {
    fn name(&self) -> &'static str {
        match self {
            HandshakeState::Start => "Start",
            HandshakeState::AwaitServerHello => "AwaitServerHello",
            HandshakeState::AwaitCertificate => "AwaitCertificate",
            HandshakeState::AwaitServerKeyExchange => "AwaitServerKeyExchange",
            HandshakeState::AwaitServerHelloDone => "AwaitServerHelloDone",
            HandshakeState::AwaitChangeCipherSpec => "AwaitChangeCipherSpec",
            HandshakeState::AwaitFinished => "AwaitFinished",
            HandshakeState::Connected => "Connected",
            HandshakeState::Closed => "Closed",
        }
    }
}

/// Everything negotiated so far, accumulated while the server's first
/// flight arrives.
struct Negotiation {
    client_random: [u8; 32],
    server_random: [u8; 32],
    suite: CipherSuite,
    leaf_certificate: Vec<u8>,
    server_ecdh_public: Vec<u8>,
}

/// A TLS 1.2 client connection over a blocking transport.
pub struct Client<T> {
    config: Config,
    records: RecordLayer<T>,
    defrag: Defragmenter,
    state: HandshakeState,
    transcript: Vec<u8>,
    master_secret: Option<zeroize::Zeroizing<[u8; 48]>>,
    /// The server-to-client keys, held back until the server's own
    /// ChangeCipherSpec arrives (RFC 5246 7.1).
    pending_read_protection: Option<RecordProtection>,
    pending_suite: Option<CipherSuite>,
    negotiated_suite: Option<CipherSuite>,
}

impl Client<TcpStream> {
    /// Connect a TCP socket and run the handshake. The configured server
    /// name doubles as SNI value; the read timeout applies to the socket.
    pub fn connect(addr: impl ToSocketAddrs, config: Config) -> Result<Self, Error> {
        let stream = TcpStream::connect(addr)?;
        stream.set_read_timeout(Some(config.read_timeout()))?;
        stream.set_nodelay(true)?;

        let mut client = Client::new(stream, config);
        client.handshake()?;
        Ok(client)
    }
}

impl<T: Read + Write> Client<T> {
    pub fn new(transport: T, config: Config) -> Self {
        Client {
            config,
            records: RecordLayer::new(transport),
            defrag: Defragmenter::new(),
            state: HandshakeState::Start,
            transcript: Vec::new(),
            master_secret: None,
            pending_read_protection: None,
            pending_suite: None,
            negotiated_suite: None,
        }
    }

    /// The suite the server selected. `None` before the handshake.
    pub fn cipher_suite(&self) -> Option<CipherSuite> {
        self.negotiated_suite
    }

    /// Run the handshake to completion. Must be called exactly once,
    /// before any application data moves.
    pub fn handshake(&mut self) -> Result<(), Error> {
        if self.state != HandshakeState::Start {
            return Err(Error::UnexpectedMessage {
                state: self.state.name(),
                got: "handshake()",
            });
        }

        let client_random = *Random::new(self.config.random()).as_bytes();
        self.send_client_hello(&client_random)?;

        let negotiation = self.receive_server_flight(client_random)?;
        let suite = negotiation.suite;
        self.send_client_flight(&negotiation)?;
        self.receive_server_finish()?;

        self.state = HandshakeState::Connected;
        self.negotiated_suite = Some(suite);
        self.transcript = Vec::new();
        info!("handshake complete, suite {:?}", suite);
        Ok(())
    }

    /// Send application bytes. The record layer splits as needed.
    pub fn send_application_data(&mut self, data: &[u8]) -> Result<(), Error> {
        if self.state != HandshakeState::Connected {
            return Err(Error::Closed);
        }
        self.records.write_record(ContentType::ApplicationData, data)
    }

    /// Receive the next chunk of application bytes. `Ok(None)` means the
    /// peer closed the connection cleanly with close_notify.
    pub fn read_application_data(&mut self) -> Result<Option<Vec<u8>>, Error> {
        if self.state == HandshakeState::Closed {
            return Err(Error::Closed);
        }
        if self.state != HandshakeState::Connected {
            return Err(Error::UnexpectedMessage {
                state: self.state.name(),
                got: "read_application_data()",
            });
        }

        loop {
            let (content_type, plaintext) = self.records.read_record()?;
            match content_type {
                ContentType::ApplicationData => {
                    // Empty records are legal; skip them rather than
                    // returning an empty read.
                    if plaintext.is_empty() {
                        continue;
                    }
                    return Ok(Some(plaintext));
                }
                ContentType::Alert => {
                    if self.handle_alert(&plaintext)?.is_some() {
                        self.state = HandshakeState::Closed;
                        return Ok(None);
                    }
                }
                ContentType::Handshake => {
                    // A HelloRequest here asks for renegotiation, which
                    // we do not do. Tolerate and ignore it.
                    self.defrag.push(&plaintext);
                    while let Some(message) = self.defrag.next_message()? {
                        if message.msg_type != MessageType::HelloRequest {
                            return Err(Error::UnexpectedMessage {
                                state: self.state.name(),
                                got: message.msg_type.name(),
                            });
                        }
                        debug!("ignoring renegotiation request");
                    }
                }
                _ => {
                    return Err(Error::UnexpectedMessage {
                        state: self.state.name(),
                        got: "record",
                    })
                }
            }
        }
    }

    /// Send close_notify and stop. Further reads and writes fail with
    /// [`Error::Closed`].
    pub fn close(&mut self) -> Result<(), Error> {
        if self.state == HandshakeState::Closed {
            return Ok(());
        }
        self.state = HandshakeState::Closed;

        let alert = Alert::close_notify();
        match self
            .records
            .write_record(ContentType::Alert, &alert.to_bytes())
        {
            Ok(()) => Ok(()),
            // The peer tearing the socket down before our close_notify
            // lands is a normal end of connection.
            Err(Error::Io(e))
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::BrokenPipe
                        | std::io::ErrorKind::ConnectionReset
                        | std::io::ErrorKind::ConnectionAborted
                ) =>
            {
                debug!("peer closed the transport before close_notify");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn send_client_hello(&mut self, client_random: &[u8; 32]) -> Result<(), Error> {
        let mut extension_data = Vec::new();
        let server_name = self.config.server_name().to_string();
        let hello = ClientHello::new(Random(*client_random), self.config.cipher_suites())
            .with_default_extensions(&server_name, &mut extension_data);

        let handshake = Handshake::new(Body::ClientHello(hello));
        let bytes = handshake.to_bytes();
        self.transcript.extend_from_slice(&bytes);

        debug!("sending ClientHello ({} bytes)", bytes.len());
        // The hello itself still goes out under the TLS 1.0 record
        // version; everything after is TLS 1.2.
        self.records.write_record(ContentType::Handshake, &bytes)?;
        self.records.set_write_version(ProtocolVersion::TLS1_2);

        self.state = HandshakeState::AwaitServerHello;
        Ok(())
    }

    /// Drive the states from ServerHello to ServerHelloDone.
    fn receive_server_flight(&mut self, client_random: [u8; 32]) -> Result<Negotiation, Error> {
        let mut server_random = [0u8; 32];
        let mut suite = CipherSuite::Unknown(0);
        let mut leaf_certificate = Vec::new();
        let mut server_ecdh_public = Vec::new();

        loop {
            let message = self.next_handshake_message()?;
            let key_exchange = suite.key_exchange_algorithm();

            match (self.state, message.msg_type) {
                (_, MessageType::HelloRequest) => {
                    // Legal at any time, ignored, and kept out of the
                    // transcript.
                    continue;
                }
                (HandshakeState::AwaitServerHello, MessageType::ServerHello) => {
                    let hello = parse_all(
                        crate::message::ServerHello::parse(message.body()),
                        "ServerHello",
                    )?;

                    if hello.server_version != ProtocolVersion::TLS1_2 {
                        return Err(Error::Decode("server version is not TLS 1.2"));
                    }
                    if !self.config.cipher_suites().contains(&hello.cipher_suite)
                        || !hello.cipher_suite.is_supported()
                    {
                        return Err(Error::UnsupportedCipherSuite(hello.cipher_suite.as_u16()));
                    }
                    if hello.compression_method != crate::message::CompressionMethod::Null {
                        return Err(Error::Decode("compression method"));
                    }

                    server_random = *hello.random.as_bytes();
                    suite = hello.cipher_suite;
                    debug!("server selected {:?}", suite);

                    self.transcript.extend_from_slice(&message.raw);
                    self.state = HandshakeState::AwaitCertificate;
                }
                (HandshakeState::AwaitCertificate, MessageType::Certificate) => {
                    let certificate = parse_all(
                        crate::message::Certificate::parse(message.body()),
                        "Certificate",
                    )?;
                    let leaf = certificate
                        .leaf()
                        .ok_or(Error::Decode("empty certificate chain"))?;
                    leaf_certificate = leaf.der().to_vec();

                    self.transcript.extend_from_slice(&message.raw);
                    self.state = match suite.key_exchange_algorithm() {
                        KeyExchangeAlgorithm::Ecdhe => HandshakeState::AwaitServerKeyExchange,
                        _ => HandshakeState::AwaitServerHelloDone,
                    };
                }
                (HandshakeState::AwaitServerKeyExchange, MessageType::ServerKeyExchange) => {
                    let skx = parse_all(
                        crate::message::ServerKeyExchange::parse(message.body(), key_exchange),
                        "ServerKeyExchange",
                    )?;
                    let params = skx.ecdh_params();
                    if params.curve != NamedCurve::X25519 {
                        return Err(Error::UnsupportedCurve(params.curve.as_u16()));
                    }
                    server_ecdh_public = params.public.to_vec();

                    // The signature over the parameters is carried but
                    // not verified; chain trust is out of scope.
                    self.transcript.extend_from_slice(&message.raw);
                    self.state = HandshakeState::AwaitServerHelloDone;
                }
                (HandshakeState::AwaitServerHelloDone, MessageType::ServerHelloDone) => {
                    self.transcript.extend_from_slice(&message.raw);
                    return Ok(Negotiation {
                        client_random,
                        server_random,
                        suite,
                        leaf_certificate,
                        server_ecdh_public,
                    });
                }
                (state, got) => {
                    return Err(Error::UnexpectedMessage {
                        state: state.name(),
                        got: got.name(),
                    });
                }
            }
        }
    }

    /// ClientKeyExchange, ChangeCipherSpec, Finished.
    fn send_client_flight(&mut self, negotiation: &Negotiation) -> Result<(), Error> {
        let suite = negotiation.suite;

        // Key exchange: produce the pre-master secret and the
        // ClientKeyExchange body in one step.
        let (pre_master, ckx_data): (Vec<u8>, Vec<u8>) =
            match suite.key_exchange_algorithm() {
                KeyExchangeAlgorithm::Ecdhe => {
                    let kx = match self.config.client_key() {
                        Some(key) => KeyExchange::from_private(key),
                        None => KeyExchange::generate(NamedCurve::X25519, self.config.random())?,
                    };
                    let public = kx.public_key().to_vec();
                    let shared = kx.shared_secret(&negotiation.server_ecdh_public)?;
                    (shared.to_vec(), public)
                }
                KeyExchangeAlgorithm::Rsa => {
                    let pre_master = rsa_pre_master(self.config.random());
                    let encrypted = rsa_encrypt_pre_master(
                        &negotiation.leaf_certificate,
                        &pre_master,
                        self.config.random(),
                    )?;
                    (pre_master.to_vec(), encrypted)
                }
                KeyExchangeAlgorithm::Unknown => {
                    return Err(Error::UnsupportedCipherSuite(suite.as_u16()));
                }
            };

        let ckx = match suite.key_exchange_algorithm() {
            KeyExchangeAlgorithm::Ecdhe => ClientKeyExchange::Ecdh { public: &ckx_data },
            _ => ClientKeyExchange::Rsa {
                encrypted_pre_master: &ckx_data,
            },
        };
        let handshake = Handshake::new(Body::ClientKeyExchange(ckx));
        let bytes = handshake.to_bytes();
        self.transcript.extend_from_slice(&bytes);
        debug!("sending ClientKeyExchange ({} bytes)", bytes.len());
        self.records.write_record(ContentType::Handshake, &bytes)?;

        // Derive the connection keys. The write protection activates at
        // our ChangeCipherSpec; the read protection waits for theirs.
        let keys = ExchangeKeys::derive(
            &pre_master,
            &negotiation.client_random,
            &negotiation.server_random,
            suite,
        )?;

        let write_protection =
            RecordProtection::new(suite, &keys.client_key, &keys.client_iv, &keys.client_mac_key)?;
        let read_protection =
            RecordProtection::new(suite, &keys.server_key, &keys.server_iv, &keys.server_mac_key)?;

        self.records
            .write_record(ContentType::ChangeCipherSpec, &ChangeCipherSpec.to_bytes())?;
        self.records.set_write_protection(write_protection);
        self.pending_read_protection = Some(read_protection);

        // Our Finished covers the transcript up to and excluding itself.
        let verify_data = crate::crypto::prf::finished_verify_data(
            &keys.master_secret,
            "client finished",
            &self.transcript,
            suite.hash_algorithm(),
        );
        let finished = Handshake::new(Body::Finished(crate::message::Finished::new(verify_data)));
        let bytes = finished.to_bytes();
        self.transcript.extend_from_slice(&bytes);
        debug!("sending Finished");
        self.records.write_record(ContentType::Handshake, &bytes)?;

        self.master_secret = Some(zeroize::Zeroizing::new(keys.master_secret));
        self.pending_suite = Some(suite);
        self.state = HandshakeState::AwaitChangeCipherSpec;
        Ok(())
    }

    /// Server ChangeCipherSpec, then Finished.
    fn receive_server_finish(&mut self) -> Result<(), Error> {
        // CCS is its own content type and never enters the defragmenter.
        loop {
            let (content_type, plaintext) = self.records.read_record()?;
            match content_type {
                ContentType::ChangeCipherSpec => {
                    parse_all(ChangeCipherSpec::parse(&plaintext), "ChangeCipherSpec")?;
                    // Only now does the server encrypt towards us.
                    let protection = self
                        .pending_read_protection
                        .take()
                        .ok_or(Error::Security("no pending read keys"))?;
                    self.records.set_read_protection(protection);
                    break;
                }
                ContentType::Alert => {
                    if self.handle_alert(&plaintext)?.is_some() {
                        return Err(Error::Closed);
                    }
                }
                _ => {
                    return Err(Error::UnexpectedMessage {
                        state: self.state.name(),
                        got: "record",
                    });
                }
            }
        }
        self.state = HandshakeState::AwaitFinished;

        let message = self.next_handshake_message()?;
        if message.msg_type != MessageType::Finished {
            return Err(Error::UnexpectedMessage {
                state: self.state.name(),
                got: message.msg_type.name(),
            });
        }

        let finished = parse_all(crate::message::Finished::parse(message.body()), "Finished")?;

        let master_secret = self
            .master_secret
            .take()
            .ok_or(Error::Security("no master secret"))?;
        let suite = self.pending_suite.ok_or(Error::Security("no suite"))?;

        // The server's verify_data covers the transcript including our
        // Finished but excluding its own.
        let expected = crate::crypto::prf::finished_verify_data(
            &master_secret[..],
            "server finished",
            &self.transcript,
            suite.hash_algorithm(),
        );

        if !ct_eq(&finished.verify_data, &expected) {
            warn!("server Finished verify_data mismatch");
            return Err(Error::Security("server Finished verification failed"));
        }

        debug!("server Finished verified");
        Ok(())
    }

    /// Pop the next handshake message, reading records as needed. Alerts
    /// are handled in place; anything else is out of order here.
    fn next_handshake_message(&mut self) -> Result<HandshakeMessage, Error> {
        loop {
            if let Some(message) = self.defrag.next_message()? {
                return Ok(message);
            }

            let (content_type, plaintext) = self.records.read_record()?;
            match content_type {
                ContentType::Handshake => self.defrag.push(&plaintext),
                ContentType::Alert => {
                    if self.handle_alert(&plaintext)?.is_some() {
                        return Err(Error::Closed);
                    }
                }
                _ => {
                    return Err(Error::UnexpectedMessage {
                        state: self.state.name(),
                        got: "record",
                    });
                }
            }
        }
    }

    /// Returns `Some(())` for close_notify, errors out on fatal alerts,
    /// and swallows other warnings.
    fn handle_alert(&mut self, plaintext: &[u8]) -> Result<Option<()>, Error> {
        let alert = parse_all(Alert::parse(plaintext), "Alert")?;
        if alert.description == crate::message::AlertDescription::CloseNotify {
            debug!("peer sent close_notify");
            return Ok(Some(()));
        }
        if alert.is_fatal() {
            return Err(Error::AlertReceived(alert.description));
        }
        warn!("ignoring warning alert {:?}", alert.description);
        Ok(None)
    }
}
