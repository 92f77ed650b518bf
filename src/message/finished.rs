use nom::bytes::complete::take;
use nom::IResult;

use super::Codec;

/// TLS 1.2 verify_data is always 12 bytes for the suites we speak.
pub const VERIFY_DATA_LEN: usize = 12;

/// The Finished handshake body. Whether the value is *correct* is decided
/// by the state machine against its own transcript, in constant time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finished {
    pub verify_data: [u8; VERIFY_DATA_LEN],
}

impl Finished {
    pub fn new(verify_data: [u8; VERIFY_DATA_LEN]) -> Self {
        Finished { verify_data }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], Finished> {
        let (input, bytes) = take(VERIFY_DATA_LEN)(input)?;
        let mut verify_data = [0u8; VERIFY_DATA_LEN];
        verify_data.copy_from_slice(bytes);
        Ok((input, Finished { verify_data }))
    }
}

impl Codec for Finished {
    fn byte_size(&self) -> usize {
        VERIFY_DATA_LEN
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&self.verify_data);
    }
}
