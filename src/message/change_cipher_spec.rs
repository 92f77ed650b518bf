use nom::error::{Error, ErrorKind};
use nom::number::complete::be_u8;
use nom::{Err, IResult};

use super::Codec;

/// ChangeCipherSpec: a single byte with value 1. Anything else in a CCS
/// record is a protocol violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeCipherSpec;

impl ChangeCipherSpec {
    pub fn parse(input: &[u8]) -> IResult<&[u8], ChangeCipherSpec> {
        let (input, byte) = be_u8(input)?;
        if byte != 0x01 {
            return Err(Err::Failure(Error::new(input, ErrorKind::Tag)));
        }
        Ok((input, ChangeCipherSpec))
    }
}

impl Codec for ChangeCipherSpec {
    fn byte_size(&self) -> usize {
        1
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.push(0x01);
    }
}
