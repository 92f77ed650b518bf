//! Typed payloads for the extensions the client offers.
//!
//! Each payload type here encodes/decodes the *interior* of an
//! [`super::Extension`]; the outer 2-byte type and length are the
//! generic TLV codec's business.

pub mod ec_point_formats;
pub mod extended_master_secret;
pub mod renegotiation_info;
pub mod server_name;
pub mod session_ticket;
pub mod signature_algorithms;
pub mod signed_certificate_timestamp;
pub mod status_request;
pub mod supported_groups;

pub use ec_point_formats::EcPointFormatsExtension;
pub use extended_master_secret::ExtendedMasterSecretExtension;
pub use renegotiation_info::RenegotiationInfoExtension;
pub use server_name::ServerNameExtension;
pub use session_ticket::SessionTicketExtension;
pub use signature_algorithms::SignatureAlgorithmsExtension;
pub use signed_certificate_timestamp::SignedCertificateTimestampExtension;
pub use status_request::StatusRequestExtension;
pub use supported_groups::SupportedGroupsExtension;
