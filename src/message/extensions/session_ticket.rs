use nom::combinator::rest;
use nom::IResult;

use crate::message::Codec;

/// session_ticket, RFC 5077. The payload is the ticket itself with no
/// inner length prefix. A client with nothing to resume sends it empty;
/// that is the only shape this client produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionTicketExtension<'a> {
    pub ticket: &'a [u8],
}

impl<'a> SessionTicketExtension<'a> {
    pub fn empty() -> Self {
        SessionTicketExtension { ticket: &[] }
    }

    pub fn parse(input: &'a [u8]) -> IResult<&'a [u8], SessionTicketExtension<'a>> {
        let (input, ticket) = rest(input)?;
        Ok((input, SessionTicketExtension { ticket }))
    }
}

impl Codec for SessionTicketExtension<'_> {
    fn byte_size(&self) -> usize {
        self.ticket.len()
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(self.ticket);
    }
}
