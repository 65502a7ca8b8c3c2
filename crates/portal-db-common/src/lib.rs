//! Portal DB Common - Domain model and pure logic shared by the persistence layer
//!
//! This crate provides:
//! - Domain aggregates (applications, load balancers, blockchains, pay plans)
//! - Nullable-value adapters and the `Patch<T>` tri-state for partial updates
//! - Business rule validation
//! - Change-notification model and decoder
//! - Identifier generation

#[macro_use]
mod macros;

pub mod decode;
pub mod error;
pub mod model;
pub mod nullable;
pub mod utils;
pub mod validation;

// Re-exports for convenience
pub use decode::{DecodeCounts, DecodeStats, Decoded, decode};
pub use error::ValidationError;
pub use model::*;
pub use nullable::{Nullable, Patch};
pub use utils::generate_id;

/// Length of every generated aggregate identifier
pub const ID_LENGTH: usize = 24;

/// Name of the pub/sub channel carrying change events
pub const EVENTS_CHANNEL: &str = "events";
