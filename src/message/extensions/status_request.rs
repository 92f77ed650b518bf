use nom::bytes::complete::take;
use nom::number::complete::{be_u16, be_u8};
use nom::IResult;

use crate::message::Codec;

const STATUS_TYPE_OCSP: u8 = 1;

/// status_request (OCSP stapling), RFC 6066 section 8. We always send the
/// minimal form: ocsp status type, empty responder list, empty request
/// extensions. Whatever the server staples back is not inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusRequestExtension;

impl StatusRequestExtension {
    pub fn parse(input: &[u8]) -> IResult<&[u8], StatusRequestExtension> {
        let (input, _status_type) = be_u8(input)?;
        let (input, responder_len) = be_u16(input)?;
        let (input, _responders) = take(responder_len)(input)?;
        let (input, extensions_len) = be_u16(input)?;
        let (input, _extensions) = take(extensions_len)(input)?;

        Ok((input, StatusRequestExtension))
    }
}

impl Codec for StatusRequestExtension {
    fn byte_size(&self) -> usize {
        5
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.push(STATUS_TYPE_OCSP);
        output.extend_from_slice(&[0x00, 0x00]); // responder id list
        output.extend_from_slice(&[0x00, 0x00]); // request extensions
    }
}
