//! cliniq-oracle
//!
//! Boundary to the remote scoring service: the [`client::PredictionClient`]
//! contract, its HTTP implementation, and the wire shapes it decodes.

pub mod client;
pub mod error;
pub mod http;
pub mod wire;
