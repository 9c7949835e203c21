//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are the traits the client core depends on; their implementations
//! live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IRegistrationTransport`] - Delivery of a fully built request to the registration API

pub mod transport;

pub use transport::{
    IRegistrationTransport, OutboundRequest, TransportError, CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE,
    SIGNATURE_HEADER,
};
