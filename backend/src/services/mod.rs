//! Business logic services for the Commodity Receiving Platform

pub mod batch;
pub mod discount;
pub mod pricing;
pub mod reception;

pub use batch::{BatchRegistry, BatchService};
pub use discount::DiscountService;
pub use pricing::PricingService;
pub use reception::ReceptionService;
