//! docreg Core - Domain types and ports for document registration
//!
//! This crate holds everything the rate-limited client needs that does not
//! touch the network:
//!
//! - [`domain`] - Document payload, quota and submission value types
//! - [`ports`] - The transport interface implemented by adapter crates
//! - [`config`] - YAML configuration with validation and a builder

pub mod config;
pub mod domain;
pub mod ports;
