use std::ops::Deref;

use nom::bytes::complete::take;
use nom::error::{Error, ErrorKind};
use nom::number::complete::be_u8;
use nom::{Err, IResult};

use super::Codec;

/// Legacy session id: an opaque value of at most 32 bytes.
///
/// We never resume sessions, so the client always sends it empty, but the
/// server is free to echo one back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId {
    bytes: [u8; 32],
    len: usize,
}

impl SessionId {
    pub fn empty() -> Self {
        SessionId {
            bytes: [0; 32],
            len: 0,
        }
    }

    pub fn try_new(data: &[u8]) -> Option<Self> {
        if data.len() > 32 {
            return None;
        }
        let mut bytes = [0; 32];
        bytes[..data.len()].copy_from_slice(data);
        Some(SessionId {
            bytes,
            len: data.len(),
        })
    }

    /// Parse the 1-byte length followed by that many bytes.
    pub fn parse(input: &[u8]) -> IResult<&[u8], SessionId> {
        let (input, len) = be_u8(input)?;
        if len > 32 {
            return Err(Err::Failure(Error::new(input, ErrorKind::LengthValue)));
        }
        let (input, data) = take(len as usize)(input)?;

        let mut bytes = [0; 32];
        bytes[..data.len()].copy_from_slice(data);
        Ok((
            input,
            SessionId {
                bytes,
                len: len as usize,
            },
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Codec for SessionId {
    fn byte_size(&self) -> usize {
        1 + self.len
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.push(self.len as u8);
        output.extend_from_slice(&self.bytes[..self.len]);
    }
}

impl Deref for SessionId {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.bytes[..self.len]
    }
}
