use std::io::{Read, Write};

use log::{debug, trace};

use crate::crypto::RecordProtection;
use crate::error::Error;
use crate::message::{
    ContentType, ProtocolVersion, MAX_CIPHERTEXT_LEN, MAX_PLAINTEXT_LEN, RECORD_HEADER_LEN,
};

/// The record layer over a blocking byte transport.
///
/// Each direction carries its own protection state and 64-bit sequence
/// number; installing a new protection (at ChangeCipherSpec) resets that
/// direction's sequence to zero.
pub struct RecordLayer<T> {
    transport: T,
    write_version: ProtocolVersion,
    write: Direction,
    read: Direction,
}

struct Direction {
    protection: RecordProtection,
    sequence: u64,
}

impl Direction {
    fn null() -> Self {
        Direction {
            protection: RecordProtection::Null,
            sequence: 0,
        }
    }
}

impl<T: Read + Write> RecordLayer<T> {
    pub fn new(transport: T) -> Self {
        RecordLayer {
            transport,
            // The very first flight goes out as TLS 1.0 for the benefit
            // of version-intolerant middleboxes.
            write_version: ProtocolVersion::TLS1_0,
            write: Direction::null(),
            read: Direction::null(),
        }
    }

    /// Record version for subsequent writes. The handshake driver bumps
    /// this to TLS 1.2 after the first flight.
    pub fn set_write_version(&mut self, version: ProtocolVersion) {
        self.write_version = version;
    }

    /// Install outgoing protection. Takes effect for the next record;
    /// the write sequence restarts at zero.
    pub fn set_write_protection(&mut self, protection: RecordProtection) {
        self.write = Direction {
            protection,
            sequence: 0,
        };
    }

    /// Install incoming protection, from our ChangeCipherSpec's
    /// counterpart on the peer side.
    pub fn set_read_protection(&mut self, protection: RecordProtection) {
        self.read = Direction {
            protection,
            sequence: 0,
        };
    }

    /// Write `plaintext` as one or more records of `content_type`,
    /// splitting at the maximum fragment size.
    pub fn write_record(&mut self, content_type: ContentType, plaintext: &[u8]) -> Result<(), Error> {
        // Empty records are legal (and used by some stacks against CBC
        // attacks); we emit one record even for empty input.
        let mut chunks = plaintext.chunks(MAX_PLAINTEXT_LEN);
        let first = chunks.next().unwrap_or(&[]);
        self.write_one(content_type, first)?;
        for chunk in chunks {
            self.write_one(content_type, chunk)?;
        }
        self.transport.flush()?;
        Ok(())
    }

    fn write_one(&mut self, content_type: ContentType, plaintext: &[u8]) -> Result<(), Error> {
        let fragment = self.write.protection.encrypt(
            self.write.sequence,
            content_type,
            self.write_version,
            plaintext,
        )?;
        self.write.sequence += 1;

        trace!(
            "write record {:?} plaintext={} wire={}",
            content_type,
            plaintext.len(),
            fragment.len()
        );

        let mut header = [0u8; RECORD_HEADER_LEN];
        header[0] = content_type.as_u8();
        header[1..3].copy_from_slice(&self.write_version.as_u16().to_be_bytes());
        header[3..5].copy_from_slice(&(fragment.len() as u16).to_be_bytes());

        self.transport.write_all(&header)?;
        self.transport.write_all(&fragment)?;
        Ok(())
    }

    /// Read exactly one record and return its decrypted content.
    pub fn read_record(&mut self) -> Result<(ContentType, Vec<u8>), Error> {
        let mut header = [0u8; RECORD_HEADER_LEN];
        self.transport.read_exact(&mut header)?;

        let content_type = ContentType::from_u8(header[0]);
        let version = ProtocolVersion::from_u16(u16::from_be_bytes([header[1], header[2]]));
        let length = u16::from_be_bytes([header[3], header[4]]) as usize;

        if length > MAX_CIPHERTEXT_LEN {
            return Err(Error::RecordOverflow(length));
        }

        let mut fragment = vec![0u8; length];
        self.transport.read_exact(&mut fragment)?;

        let plaintext =
            self.read
                .protection
                .decrypt(self.read.sequence, content_type, version, &fragment)?;
        self.read.sequence += 1;

        debug!(
            "read record {:?} wire={} plaintext={}",
            content_type,
            fragment.len(),
            plaintext.len()
        );

        Ok((content_type, plaintext))
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::ExchangeKeys;
    use crate::suite::CipherSuite;
    use std::io::Cursor;

    fn protection_pair(suite: CipherSuite) -> (RecordProtection, RecordProtection) {
        let keys = ExchangeKeys::derive(&[0x03; 48], &[0x01; 32], &[0x02; 32], suite).unwrap();
        (
            RecordProtection::new(suite, &keys.client_key, &keys.client_iv, &keys.client_mac_key)
                .unwrap(),
            RecordProtection::new(suite, &keys.client_key, &keys.client_iv, &keys.client_mac_key)
                .unwrap(),
        )
    }

    #[test]
    fn null_roundtrip_over_buffer() {
        let mut layer = RecordLayer::new(Cursor::new(Vec::new()));
        layer.set_write_version(ProtocolVersion::TLS1_2);
        layer.write_record(ContentType::Handshake, b"hello").unwrap();

        let wire = layer.into_transport().into_inner();
        assert_eq!(&wire[..5], &[0x16, 0x03, 0x03, 0x00, 0x05]);
        assert_eq!(&wire[5..], b"hello");

        let mut reader = RecordLayer::new(Cursor::new(wire));
        let (content_type, plaintext) = reader.read_record().unwrap();
        assert_eq!(content_type, ContentType::Handshake);
        assert_eq!(plaintext, b"hello");
    }

    #[test]
    fn first_record_goes_out_as_tls10() {
        let mut layer = RecordLayer::new(Cursor::new(Vec::new()));
        layer.write_record(ContentType::Handshake, b"x").unwrap();

        let wire = layer.into_transport().into_inner();
        assert_eq!(&wire[1..3], &[0x03, 0x01]);
    }

    #[test]
    fn protected_roundtrip() {
        let (writer_protection, reader_protection) =
            protection_pair(CipherSuite::ECDHE_RSA_AES128_GCM_SHA256);

        let mut layer = RecordLayer::new(Cursor::new(Vec::new()));
        layer.set_write_version(ProtocolVersion::TLS1_2);
        layer.set_write_protection(writer_protection);
        layer
            .write_record(ContentType::ApplicationData, b"secret bytes")
            .unwrap();

        let wire = layer.into_transport().into_inner();
        // 8-byte explicit nonce + ciphertext + 16-byte tag
        assert_eq!(wire.len(), 5 + 8 + 12 + 16);
        assert!(!wire.windows(12).any(|w| w == b"secret bytes"));

        let mut reader = RecordLayer::new(Cursor::new(wire));
        reader.set_read_protection(reader_protection);
        let (content_type, plaintext) = reader.read_record().unwrap();
        assert_eq!(content_type, ContentType::ApplicationData);
        assert_eq!(plaintext, b"secret bytes");
    }

    #[test]
    fn large_payload_is_split_into_records() {
        let payload = vec![0x42u8; MAX_PLAINTEXT_LEN + 100];

        let mut layer = RecordLayer::new(Cursor::new(Vec::new()));
        layer.set_write_version(ProtocolVersion::TLS1_2);
        layer
            .write_record(ContentType::ApplicationData, &payload)
            .unwrap();

        let mut reader = RecordLayer::new(Cursor::new(layer.into_transport().into_inner()));
        let (_, first) = reader.read_record().unwrap();
        let (_, second) = reader.read_record().unwrap();
        assert_eq!(first.len(), MAX_PLAINTEXT_LEN);
        assert_eq!(second.len(), 100);
    }

    #[test]
    fn oversized_record_is_rejected() {
        // 0x5000 = 20480 > MAX_CIPHERTEXT_LEN
        let wire = vec![0x17, 0x03, 0x03, 0x50, 0x00];
        let mut reader = RecordLayer::new(Cursor::new(wire));
        assert!(matches!(
            reader.read_record(),
            Err(Error::RecordOverflow(20480))
        ));
    }

    #[test]
    fn change_of_protection_resets_sequence() {
        let (writer_protection, reader_protection) =
            protection_pair(CipherSuite::ECDHE_RSA_AES128_GCM_SHA256);

        let mut layer = RecordLayer::new(Cursor::new(Vec::new()));
        layer.set_write_version(ProtocolVersion::TLS1_2);
        // A couple of unprotected records first to advance the sequence.
        layer.write_record(ContentType::Handshake, b"a").unwrap();
        layer.write_record(ContentType::Handshake, b"b").unwrap();
        layer.set_write_protection(writer_protection);
        layer.write_record(ContentType::Handshake, b"c").unwrap();

        let wire = layer.into_transport().into_inner();
        let mut reader = RecordLayer::new(Cursor::new(wire));
        reader.read_record().unwrap();
        reader.read_record().unwrap();
        reader.set_read_protection(reader_protection);
        // Decryption only succeeds if the writer used sequence 0 here.
        let (_, plaintext) = reader.read_record().unwrap();
        assert_eq!(plaintext, b"c");
    }
}
