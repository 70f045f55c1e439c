//! Reception settlement: quality merge, discount and pricing in one pass

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    combine_quality_metrics, compute_weight_discounts, price_with_lookup, thresholds_for,
    Commodity, DiscountThreshold, LabSample, PriceCalculation, PriceLookup, QualityMeasurements,
    QualityMetric, WeightDiscountResult,
};
use crate::error::EngineResult;

/// Everything known about a reception at weighing time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRequest {
    pub commodity: Commodity,
    pub reception_date: NaiveDate,
    pub gross_weight_kg: Decimal,
    #[serde(default)]
    pub field_measurements: QualityMeasurements,
    #[serde(default)]
    pub lab_samples: Vec<LabSample>,
}

/// Audit record of a settled reception
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceptionSettlement {
    pub commodity: Commodity,
    pub reception_date: NaiveDate,
    /// Field and lab measurements after merging
    pub measurements: QualityMeasurements,
    pub discount: WeightDiscountResult,
    pub pricing: PriceCalculation,
}

/// Settle a reception against a threshold snapshot and a price source
///
/// `required` lists metrics that must be present after merging.
pub fn settle_reception<L: PriceLookup + ?Sized>(
    request: &SettlementRequest,
    thresholds: &[DiscountThreshold],
    required: &[QualityMetric],
    prices: &L,
) -> EngineResult<ReceptionSettlement> {
    let measurements = combine_quality_metrics(&request.field_measurements, &request.lab_samples)?;
    for metric in required {
        measurements.require(*metric)?;
    }

    let applicable = thresholds_for(request.commodity, thresholds);
    let discount = compute_weight_discounts(request.gross_weight_kg, &applicable, &measurements)?;
    let pricing = price_with_lookup(
        prices,
        request.commodity,
        request.reception_date,
        discount.final_weight_kg,
    )?;

    Ok(ReceptionSettlement {
        commodity: request.commodity,
        reception_date: request.reception_date,
        measurements,
        discount,
        pricing,
    })
}
