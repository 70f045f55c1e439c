//! Domain models and calculations for commodity receiving

mod batch;
mod commodity;
mod discount;
mod pricing;
mod quality;
mod settlement;

pub use batch::*;
pub use commodity::*;
pub use discount::*;
pub use pricing::*;
pub use quality::*;
pub use settlement::*;
