use nom::bytes::complete::take;
use nom::number::complete::be_u24;
use nom::IResult;
use tinyvec::ArrayVec;

use super::Codec;

/// A single DER-encoded X.509 certificate, carried opaquely.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Asn1Cert<'a>(pub &'a [u8]);

impl<'a> Asn1Cert<'a> {
    pub fn parse(input: &'a [u8]) -> IResult<&'a [u8], Asn1Cert<'a>> {
        let (input, length) = be_u24(input)?;
        let (input, der) = take(length)(input)?;
        Ok((input, Asn1Cert(der)))
    }

    pub fn der(&self) -> &'a [u8] {
        self.0
    }
}

impl Codec for Asn1Cert<'_> {
    fn byte_size(&self) -> usize {
        3 + self.0.len()
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&(self.0.len() as u32).to_be_bytes()[1..]);
        output.extend_from_slice(self.0);
    }
}

/// The Certificate handshake body: a 3-byte total length followed by the
/// chain, leaf first.
#[derive(Debug, PartialEq, Eq)]
pub struct Certificate<'a> {
    pub certificate_list: ArrayVec<[Asn1Cert<'a>; 8]>,
}

impl<'a> Certificate<'a> {
    pub fn parse(input: &'a [u8]) -> IResult<&'a [u8], Certificate<'a>> {
        let (input, total_len) = be_u24(input)?;
        let (input, list) = take(total_len)(input)?;

        let mut certificate_list = ArrayVec::new();
        let mut rest = list;
        while !rest.is_empty() && certificate_list.len() < 8 {
            let (next, cert) = Asn1Cert::parse(rest)?;
            certificate_list.push(cert);
            rest = next;
        }

        Ok((input, Certificate { certificate_list }))
    }

    /// The end-entity certificate. An empty chain is a protocol violation
    /// the caller must reject.
    pub fn leaf(&self) -> Option<&Asn1Cert<'a>> {
        self.certificate_list.first()
    }
}

impl Codec for Certificate<'_> {
    fn byte_size(&self) -> usize {
        3 + self
            .certificate_list
            .iter()
            .map(|c| c.byte_size())
            .sum::<usize>()
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        let total: usize = self.certificate_list.iter().map(|c| c.byte_size()).sum();
        output.extend_from_slice(&(total as u32).to_be_bytes()[1..]);
        for cert in &self.certificate_list {
            cert.serialize(output);
        }
    }
}
