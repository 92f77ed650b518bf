use nom::bytes::complete::take;
use nom::error::{Error, ErrorKind};
use nom::number::complete::{be_u16, be_u8};
use nom::{Err, IResult};

use crate::message::Codec;

const NAME_TYPE_HOST_NAME: u8 = 0;

/// server_name (SNI), RFC 6066 section 3. The list grammar permits
/// several entries but only one host_name may appear, so we model
/// exactly that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerNameExtension<'a> {
    pub host_name: &'a [u8],
}

impl<'a> ServerNameExtension<'a> {
    pub fn new(host_name: &'a str) -> Self {
        ServerNameExtension {
            host_name: host_name.as_bytes(),
        }
    }

    pub fn parse(input: &'a [u8]) -> IResult<&'a [u8], ServerNameExtension<'a>> {
        let (input, _list_len) = be_u16(input)?;
        let (input, name_type) = be_u8(input)?;
        if name_type != NAME_TYPE_HOST_NAME {
            return Err(Err::Failure(Error::new(input, ErrorKind::Tag)));
        }
        let (input, name_len) = be_u16(input)?;
        let (input, host_name) = take(name_len)(input)?;

        Ok((input, ServerNameExtension { host_name }))
    }
}

impl Codec for ServerNameExtension<'_> {
    fn byte_size(&self) -> usize {
        5 + self.host_name.len()
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        let entry_len = 3 + self.host_name.len();
        output.extend_from_slice(&(entry_len as u16).to_be_bytes());
        output.push(NAME_TYPE_HOST_NAME);
        output.extend_from_slice(&(self.host_name.len() as u16).to_be_bytes());
        output.extend_from_slice(self.host_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let ext = ServerNameExtension::new("example.ulfheim.net");

        let serialized = ext.to_bytes();
        assert_eq!(&serialized[..5], &[0x00, 0x16, 0x00, 0x00, 0x13]);
        assert_eq!(&serialized[5..], b"example.ulfheim.net");

        let (rest, parsed) = ServerNameExtension::parse(&serialized).unwrap();
        assert!(rest.is_empty());
        assert_eq!(parsed, ext);
    }
}
