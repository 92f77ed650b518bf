use nom::bytes::complete::take;
use nom::number::complete::be_u24;
use nom::IResult;

use crate::suite::KeyExchangeAlgorithm;

use super::{
    Certificate, ClientHello, ClientKeyExchange, Codec, Finished, ServerHello, ServerKeyExchange,
};

pub const HANDSHAKE_HEADER_LEN: usize = 4;

/// Handshake header: 1-byte message type plus a 3-byte body length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub msg_type: MessageType,
    pub length: u32,
}

impl Header {
    pub fn parse(input: &[u8]) -> IResult<&[u8], Header> {
        let (input, msg_type) = MessageType::parse(input)?;
        let (input, length) = be_u24(input)?;
        Ok((input, Header { msg_type, length }))
    }
}

impl Codec for Header {
    fn byte_size(&self) -> usize {
        HANDSHAKE_HEADER_LEN
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.push(self.msg_type.as_u8());
        output.extend_from_slice(&self.length.to_be_bytes()[1..]);
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Handshake<'a> {
    pub header: Header,
    pub body: Body<'a>,
}

impl<'a> Handshake<'a> {
    /// Wrap a body in a header whose length is derived from the body.
    pub fn new(body: Body<'a>) -> Self {
        Handshake {
            header: Header {
                msg_type: body.msg_type(),
                length: body.byte_size() as u32,
            },
            body,
        }
    }

    /// Parse one complete handshake message. `key_exchange` is required
    /// context for bodies whose wire shape depends on the negotiated
    /// suite (ServerKeyExchange, ClientKeyExchange).
    pub fn parse(
        input: &'a [u8],
        key_exchange: Option<KeyExchangeAlgorithm>,
    ) -> IResult<&'a [u8], Handshake<'a>> {
        let (input, header) = Header::parse(input)?;
        let (input, body_bytes) = take(header.length as usize)(input)?;
        let (_, body) = Body::parse(body_bytes, header.msg_type, key_exchange)?;

        Ok((input, Handshake { header, body }))
    }
}

impl Codec for Handshake<'_> {
    fn byte_size(&self) -> usize {
        HANDSHAKE_HEADER_LEN + self.body.byte_size()
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        self.header.serialize(output);
        self.body.serialize(output);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    HelloRequest,
    ClientHello,
    ServerHello,
    Certificate,
    ServerKeyExchange,
    ServerHelloDone,
    ClientKeyExchange,
    Finished,
    Unknown(u8),
}

impl Default for MessageType {
    fn default() -> Self {
        Self::Unknown(0xFF)
    }
}

impl MessageType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => MessageType::HelloRequest,
            1 => MessageType::ClientHello,
            2 => MessageType::ServerHello,
            11 => MessageType::Certificate,
            12 => MessageType::ServerKeyExchange,
            14 => MessageType::ServerHelloDone,
            16 => MessageType::ClientKeyExchange,
            20 => MessageType::Finished,
            _ => MessageType::Unknown(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            MessageType::HelloRequest => 0,
            MessageType::ClientHello => 1,
            MessageType::ServerHello => 2,
            MessageType::Certificate => 11,
            MessageType::ServerKeyExchange => 12,
            MessageType::ServerHelloDone => 14,
            MessageType::ClientKeyExchange => 16,
            MessageType::Finished => 20,
            MessageType::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], MessageType> {
        let (input, byte) = nom::number::complete::be_u8(input)?;
        Ok((input, MessageType::from_u8(byte)))
    }

    pub fn name(&self) -> &'static str {
        match self {
            MessageType::HelloRequest => "HelloRequest",
            MessageType::ClientHello => "ClientHello",
            MessageType::ServerHello => "ServerHello",
            MessageType::Certificate => "Certificate",
            MessageType::ServerKeyExchange => "ServerKeyExchange",
            MessageType::ServerHelloDone => "ServerHelloDone",
            MessageType::ClientKeyExchange => "ClientKeyExchange",
            MessageType::Finished => "Finished",
            MessageType::Unknown(_) => "Unknown",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Body<'a> {
    HelloRequest,
    ClientHello(ClientHello<'a>),
    ServerHello(ServerHello<'a>),
    Certificate(Certificate<'a>),
    ServerKeyExchange(ServerKeyExchange<'a>),
    ServerHelloDone,
    ClientKeyExchange(ClientKeyExchange<'a>),
    Finished(Finished),
}

impl<'a> Body<'a> {
    pub fn parse(
        input: &'a [u8],
        msg_type: MessageType,
        key_exchange: Option<KeyExchangeAlgorithm>,
    ) -> IResult<&'a [u8], Body<'a>> {
        match msg_type {
            MessageType::HelloRequest => Ok((input, Body::HelloRequest)),
            MessageType::ClientHello => {
                let (input, hello) = ClientHello::parse(input)?;
                Ok((input, Body::ClientHello(hello)))
            }
            MessageType::ServerHello => {
                let (input, hello) = ServerHello::parse(input)?;
                Ok((input, Body::ServerHello(hello)))
            }
            MessageType::Certificate => {
                let (input, certificate) = Certificate::parse(input)?;
                Ok((input, Body::Certificate(certificate)))
            }
            MessageType::ServerKeyExchange => {
                let kx = key_exchange.unwrap_or(KeyExchangeAlgorithm::Unknown);
                let (input, skx) = ServerKeyExchange::parse(input, kx)?;
                Ok((input, Body::ServerKeyExchange(skx)))
            }
            MessageType::ServerHelloDone => Ok((input, Body::ServerHelloDone)),
            MessageType::ClientKeyExchange => {
                let kx = key_exchange.unwrap_or(KeyExchangeAlgorithm::Unknown);
                let (input, ckx) = ClientKeyExchange::parse(input, kx)?;
                Ok((input, Body::ClientKeyExchange(ckx)))
            }
            MessageType::Finished => {
                let (input, finished) = Finished::parse(input)?;
                Ok((input, Body::Finished(finished)))
            }
            MessageType::Unknown(_) => Err(nom::Err::Failure(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Switch,
            ))),
        }
    }

    pub fn msg_type(&self) -> MessageType {
        match self {
            Body::HelloRequest => MessageType::HelloRequest,
            Body::ClientHello(_) => MessageType::ClientHello,
            Body::ServerHello(_) => MessageType::ServerHello,
            Body::Certificate(_) => MessageType::Certificate,
            Body::ServerKeyExchange(_) => MessageType::ServerKeyExchange,
            Body::ServerHelloDone => MessageType::ServerHelloDone,
            Body::ClientKeyExchange(_) => MessageType::ClientKeyExchange,
            Body::Finished(_) => MessageType::Finished,
        }
    }
}

impl Codec for Body<'_> {
    fn byte_size(&self) -> usize {
        match self {
            Body::HelloRequest | Body::ServerHelloDone => 0,
            Body::ClientHello(hello) => hello.byte_size(),
            Body::ServerHello(hello) => hello.byte_size(),
            Body::Certificate(certificate) => certificate.byte_size(),
            Body::ServerKeyExchange(skx) => skx.byte_size(),
            Body::ClientKeyExchange(ckx) => ckx.byte_size(),
            Body::Finished(finished) => finished.byte_size(),
        }
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        match self {
            Body::HelloRequest | Body::ServerHelloDone => {}
            Body::ClientHello(hello) => hello.serialize(output),
            Body::ServerHello(hello) => hello.serialize(output),
            Body::Certificate(certificate) => certificate.serialize(output),
            Body::ServerKeyExchange(skx) => skx.serialize(output),
            Body::ClientKeyExchange(ckx) => ckx.serialize(output),
            Body::Finished(finished) => finished.serialize(output),
        }
    }
}
