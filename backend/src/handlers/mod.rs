//! HTTP handlers for the Commodity Receiving Platform

pub mod batch;
pub mod discount;
pub mod health;
pub mod pricing;
pub mod reception;

pub use batch::*;
pub use discount::*;
pub use health::*;
pub use pricing::*;
pub use reception::*;
