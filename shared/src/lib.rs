//! Shared calculation core for the Commodity Receiving Platform
//!
//! Pure, synchronous computations used by the backend and, through WASM, by
//! receiving stations in the browser:
//!
//! - quality discounts: measured defects against configured thresholds
//! - batch allocation: dried weight split back to receptions by wet-weight share
//! - pricing: discounted weight times price per kilogram
//!
//! Nothing here performs I/O or holds state between calls. Threshold and price
//! configuration is passed in by the caller on every call.

pub mod error;
pub mod models;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use types::*;
pub use validation::*;
