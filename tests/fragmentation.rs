//! Record/handshake alignment: messages split across records and
//! records carrying several messages, end to end through the record
//! layer and the defragmenter.

use std::io::Cursor;

use tolv::message::{Body, Codec, ContentType, Finished, Handshake, MessageType, ProtocolVersion};
use tolv::record::{Defragmenter, RecordLayer};

fn record(content_type: ContentType, fragment: &[u8]) -> Vec<u8> {
    let mut wire = Vec::new();
    wire.push(content_type.as_u8());
    wire.extend_from_slice(&ProtocolVersion::TLS1_2.as_u16().to_be_bytes());
    wire.extend_from_slice(&(fragment.len() as u16).to_be_bytes());
    wire.extend_from_slice(fragment);
    wire
}

#[test]
fn message_split_across_three_records() {
    let handshake = Handshake::new(Body::Finished(Finished::new([0x5A; 12])));
    let bytes = handshake.to_bytes();

    // Split the 16 bytes awkwardly: mid-header, then mid-body.
    let mut wire = Vec::new();
    wire.extend_from_slice(&record(ContentType::Handshake, &bytes[..3]));
    wire.extend_from_slice(&record(ContentType::Handshake, &bytes[3..10]));
    wire.extend_from_slice(&record(ContentType::Handshake, &bytes[10..]));

    let mut layer = RecordLayer::new(Cursor::new(wire));
    let mut defrag = Defragmenter::new();

    let mut messages = Vec::new();
    for _ in 0..3 {
        let (content_type, plaintext) = layer.read_record().unwrap();
        assert_eq!(content_type, ContentType::Handshake);
        defrag.push(&plaintext);
        while let Some(message) = defrag.next_message().unwrap() {
            messages.push(message);
        }
    }

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].msg_type, MessageType::Finished);
    assert_eq!(messages[0].raw, bytes);
}

#[test]
fn one_record_carrying_a_whole_server_flight() {
    // ServerHelloDone plus a Finished coalesced in a single record, the
    // way servers commonly pack their first flight.
    let done = Handshake::new(Body::ServerHelloDone).to_bytes();
    let finished = Handshake::new(Body::Finished(Finished::new([0x77; 12]))).to_bytes();

    let mut fragment = done.clone();
    fragment.extend_from_slice(&finished);
    let wire = record(ContentType::Handshake, &fragment);

    let mut layer = RecordLayer::new(Cursor::new(wire));
    let mut defrag = Defragmenter::new();

    let (_, plaintext) = layer.read_record().unwrap();
    defrag.push(&plaintext);

    let first = defrag.next_message().unwrap().unwrap();
    assert_eq!(first.msg_type, MessageType::ServerHelloDone);
    assert_eq!(first.raw, done);

    let second = defrag.next_message().unwrap().unwrap();
    assert_eq!(second.msg_type, MessageType::Finished);
    assert_eq!(second.raw, finished);

    assert!(defrag.next_message().unwrap().is_none());
}

#[test]
fn interleaved_split_and_coalesced() {
    let a = Handshake::new(Body::Finished(Finished::new([0x01; 12]))).to_bytes();
    let b = Handshake::new(Body::ServerHelloDone).to_bytes();
    let c = Handshake::new(Body::Finished(Finished::new([0x02; 12]))).to_bytes();

    // Record 1: all of a + first half of b. Record 2: rest of b + all
    // of c.
    let mut all = Vec::new();
    all.extend_from_slice(&a);
    all.extend_from_slice(&b);
    all.extend_from_slice(&c);
    let split_at = a.len() + 2;

    let mut wire = Vec::new();
    wire.extend_from_slice(&record(ContentType::Handshake, &all[..split_at]));
    wire.extend_from_slice(&record(ContentType::Handshake, &all[split_at..]));

    let mut layer = RecordLayer::new(Cursor::new(wire));
    let mut defrag = Defragmenter::new();

    let mut types = Vec::new();
    for _ in 0..2 {
        let (_, plaintext) = layer.read_record().unwrap();
        defrag.push(&plaintext);
        while let Some(message) = defrag.next_message().unwrap() {
            types.push(message.msg_type);
        }
    }

    assert_eq!(
        types,
        [
            MessageType::Finished,
            MessageType::ServerHelloDone,
            MessageType::Finished
        ]
    );
}
