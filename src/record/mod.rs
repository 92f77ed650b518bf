//! The record layer: framing over a byte transport, record protection,
//! and reassembly of handshake messages that span or share records.

mod defragment;
mod layer;

pub use defragment::{Defragmenter, HandshakeMessage};
pub use layer::RecordLayer;
