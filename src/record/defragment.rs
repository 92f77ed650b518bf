use log::trace;

use crate::error::Error;
use crate::message::{Header, MessageType, HANDSHAKE_HEADER_LEN};

/// Reassembles handshake messages from record fragments.
///
/// Records and handshake messages do not align: one record can carry
/// several messages and one message can span several records. Fragments
/// go in as they arrive; complete messages come out in order.
#[derive(Default)]
pub struct Defragmenter {
    buffer: Vec<u8>,
}

/// One complete handshake message, carrying its raw bytes (header
/// included) so the handshake transcript can be fed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeMessage {
    pub msg_type: MessageType,
    pub raw: Vec<u8>,
}

impl HandshakeMessage {
    /// The message body without the 4-byte handshake header.
    pub fn body(&self) -> &[u8] {
        &self.raw[HANDSHAKE_HEADER_LEN..]
    }
}

impl Defragmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record's worth of handshake bytes.
    pub fn push(&mut self, fragment: &[u8]) {
        self.buffer.extend_from_slice(fragment);
    }

    /// Pop the next complete message, or `None` if more records are
    /// needed first.
    pub fn next_message(&mut self) -> Result<Option<HandshakeMessage>, Error> {
        if self.buffer.len() < HANDSHAKE_HEADER_LEN {
            return Ok(None);
        }

        let (_, header) = Header::parse(&self.buffer).map_err(|_| Error::Decode("handshake header"))?;

        let total = HANDSHAKE_HEADER_LEN + header.length as usize;
        if self.buffer.len() < total {
            trace!(
                "incomplete {}: have {} of {} bytes",
                header.msg_type.name(),
                self.buffer.len(),
                total
            );
            return Ok(None);
        }

        let raw: Vec<u8> = self.buffer.drain(..total).collect();
        Ok(Some(HandshakeMessage {
            msg_type: header.msg_type,
            raw,
        }))
    }

    /// The type of the next complete buffered message, without removing
    /// it. `None` while the head message is still partial.
    pub fn peek_type(&self) -> Option<MessageType> {
        if self.buffer.len() < HANDSHAKE_HEADER_LEN {
            return None;
        }
        let (_, header) = Header::parse(&self.buffer).ok()?;
        if self.buffer.len() < HANDSHAKE_HEADER_LEN + header.length as usize {
            return None;
        }
        Some(header.msg_type)
    }

    /// Leftover bytes of a partially received message.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_record_one_message() {
        let mut defrag = Defragmenter::new();
        defrag.push(&[0x0E, 0x00, 0x00, 0x00]);

        let message = defrag.next_message().unwrap().unwrap();
        assert_eq!(message.msg_type, MessageType::ServerHelloDone);
        assert_eq!(message.raw, [0x0E, 0x00, 0x00, 0x00]);
        assert!(message.body().is_empty());

        assert!(defrag.next_message().unwrap().is_none());
        assert_eq!(defrag.pending(), 0);
    }

    #[test]
    fn message_spanning_records() {
        let mut defrag = Defragmenter::new();

        // Finished, split mid-body across three fragments.
        defrag.push(&[0x14, 0x00, 0x00, 0x0C, 0x01, 0x02]);
        assert!(defrag.next_message().unwrap().is_none());

        defrag.push(&[0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
        assert!(defrag.next_message().unwrap().is_none());
        assert!(defrag.peek_type().is_none());

        defrag.push(&[0x09, 0x0A, 0x0B, 0x0C]);
        assert_eq!(defrag.peek_type(), Some(MessageType::Finished));
        let message = defrag.next_message().unwrap().unwrap();
        assert_eq!(message.msg_type, MessageType::Finished);
        assert_eq!(message.body().len(), 12);
    }

    #[test]
    fn record_carrying_several_messages() {
        let mut defrag = Defragmenter::new();

        let mut fragment = vec![0x0E, 0x00, 0x00, 0x00];
        fragment.extend_from_slice(&[0x14, 0x00, 0x00, 0x0C]);
        fragment.extend_from_slice(&[0xAB; 12]);
        defrag.push(&fragment);

        let first = defrag.next_message().unwrap().unwrap();
        assert_eq!(first.msg_type, MessageType::ServerHelloDone);

        let second = defrag.next_message().unwrap().unwrap();
        assert_eq!(second.msg_type, MessageType::Finished);
        assert_eq!(second.body(), &[0xAB; 12]);

        assert!(defrag.next_message().unwrap().is_none());
    }

    #[test]
    fn header_split_across_records() {
        let mut defrag = Defragmenter::new();
        defrag.push(&[0x0E, 0x00]);
        assert!(defrag.next_message().unwrap().is_none());
        defrag.push(&[0x00, 0x00]);
        assert!(defrag.next_message().unwrap().is_some());
    }
}
