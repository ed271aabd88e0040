//! ns-core: stable foundation for the neutron-star workspace.
//!
//! Contains:
//! - units (uom SI types + nuclear/geometric conversions)
//! - numeric (Real + validation + ordering helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::NsError;
pub use numeric::*;
pub use units::*;
