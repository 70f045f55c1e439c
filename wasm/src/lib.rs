//! WebAssembly module for the Commodity Receiving Platform
//!
//! Lets receiving stations run the same calculations offline in the browser:
//! - Weight discounts from quality measurements
//! - Field and lab measurement merging
//! - Dried weight allocation for a batch
//! - Pricing
//!
//! Decimals cross the boundary as strings so no value passes through `f64`.

use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use wasm_bindgen::prelude::*;

use shared::{
    combine_quality_metrics, compute_weight_discounts, BatchContribution, DiscountThreshold,
    LabSample, QualityMeasurements,
};

#[derive(Deserialize)]
struct DiscountRequest {
    total_weight_kg: Decimal,
    thresholds: Vec<DiscountThreshold>,
    #[serde(default)]
    measurements: QualityMeasurements,
}

#[derive(Deserialize)]
struct CombineRequest {
    #[serde(default)]
    field_measurements: QualityMeasurements,
    #[serde(default)]
    lab_samples: Vec<LabSample>,
}

#[derive(Deserialize)]
struct AllocationRequest {
    contributions: Vec<BatchContribution>,
    total_dried_weight_kg: Decimal,
}

/// Compute weight discounts; returns the result as JSON
#[wasm_bindgen]
pub fn compute_weight_discounts_json(input_json: &str) -> Result<String, JsValue> {
    weight_discounts(input_json).map_err(to_js_error)
}

/// Merge field measurements with lab samples; returns the merged map as JSON
#[wasm_bindgen]
pub fn combine_quality_metrics_json(input_json: &str) -> Result<String, JsValue> {
    combined_metrics(input_json).map_err(to_js_error)
}

/// Preview the dried weight allocation of a batch from its stored shares
#[wasm_bindgen]
pub fn allocate_batch_json(input_json: &str) -> Result<String, JsValue> {
    batch_allocation(input_json).map_err(to_js_error)
}

/// Price a final weight; both arguments are decimal strings
#[wasm_bindgen]
pub fn calculate_price(final_weight_kg: &str, price_per_kg: &str) -> Result<String, JsValue> {
    price(final_weight_kg, price_per_kg).map_err(to_js_error)
}

fn to_js_error(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    js_sys::Error::new(&message).into()
}

fn weight_discounts(input_json: &str) -> Result<String, String> {
    let request: DiscountRequest = parse(input_json)?;
    let result = compute_weight_discounts(
        request.total_weight_kg,
        &request.thresholds,
        &request.measurements,
    )
    .map_err(|e| e.to_string())?;
    to_json(&result)
}

fn combined_metrics(input_json: &str) -> Result<String, String> {
    let request: CombineRequest = parse(input_json)?;
    let merged = combine_quality_metrics(&request.field_measurements, &request.lab_samples)
        .map_err(|e| e.to_string())?;
    to_json(&merged)
}

fn batch_allocation(input_json: &str) -> Result<String, String> {
    let request: AllocationRequest = parse(input_json)?;
    let batch = shared::Batch::restore(Uuid::nil(), request.contributions, None)
        .map_err(|e| e.to_string())?;
    let allocations = batch
        .allocate(request.total_dried_weight_kg)
        .map_err(|e| e.to_string())?;
    to_json(&allocations)
}

fn price(final_weight_kg: &str, price_per_kg: &str) -> Result<String, String> {
    let weight = parse_decimal("final_weight_kg", final_weight_kg)?;
    let price = parse_decimal("price_per_kg", price_per_kg)?;
    let calculation = shared::calculate(weight, price).map_err(|e| e.to_string())?;
    to_json(&calculation)
}

fn parse<T: for<'de> Deserialize<'de>>(input_json: &str) -> Result<T, String> {
    serde_json::from_str(input_json).map_err(|e| format!("Invalid input JSON: {}", e))
}

fn parse_decimal(field: &str, value: &str) -> Result<Decimal, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{} is not a decimal number: {}", field, value))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn decimal_at(value: &Value) -> Decimal {
        value.as_str().unwrap().parse().unwrap()
    }

    #[test]
    fn test_weight_discounts() {
        let output = weight_discounts(
            r#"{
                "total_weight_kg": "1000",
                "thresholds": [{"commodity": "cacao", "metric": "humedad", "threshold_percent": "12"}],
                "measurements": {"humedad": "25"}
            }"#,
        )
        .unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(decimal_at(&value["final_weight_kg"]), Decimal::from(870));
        assert_eq!(value["breakdown"][0]["metric"], "humedad");
    }

    #[test]
    fn test_weight_discounts_rejects_unknown_metric() {
        let err = weight_discounts(
            r#"{"total_weight_kg": "10", "thresholds": [], "measurements": {"acidez": "1"}}"#,
        )
        .unwrap_err();
        assert!(err.starts_with("Invalid input JSON"));
    }

    #[test]
    fn test_combined_metrics() {
        let output = combined_metrics(
            r#"{
                "field_measurements": {"moho": "7"},
                "lab_samples": [{"sample_id": 1, "recorded_at": "2024-03-12T14:00:00Z", "values": {"moho": "10"}}]
            }"#,
        )
        .unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(decimal_at(&value["moho"]), Decimal::from(10));
    }

    #[test]
    fn test_batch_allocation() {
        let output = batch_allocation(
            r#"{
                "contributions": [
                    {"reception_id": "00000000-0000-0000-0000-000000000001", "wet_weight_contribution_kg": "600", "percentage_of_total": "60"},
                    {"reception_id": "00000000-0000-0000-0000-000000000002", "wet_weight_contribution_kg": "400", "percentage_of_total": "40"}
                ],
                "total_dried_weight_kg": "500"
            }"#,
        )
        .unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(decimal_at(&value[0]["proportional_dried_weight_kg"]), Decimal::from(300));
        assert_eq!(decimal_at(&value[1]["proportional_dried_weight_kg"]), Decimal::from(200));
    }

    #[test]
    fn test_batch_allocation_rejects_bad_shares() {
        let err = batch_allocation(
            r#"{
                "contributions": [
                    {"reception_id": "00000000-0000-0000-0000-000000000001", "wet_weight_contribution_kg": "600", "percentage_of_total": "70"}
                ],
                "total_dried_weight_kg": "500"
            }"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_batch_allocation_rejects_out_of_range_shares() {
        let err = batch_allocation(
            r#"{
                "contributions": [
                    {"reception_id": "00000000-0000-0000-0000-000000000001", "wet_weight_contribution_kg": "10", "percentage_of_total": "150"},
                    {"reception_id": "00000000-0000-0000-0000-000000000002", "wet_weight_contribution_kg": "10", "percentage_of_total": "-50"}
                ],
                "total_dried_weight_kg": "100"
            }"#,
        )
        .unwrap_err();
        assert!(err.contains("percentage_of_total"));
    }

    #[test]
    fn test_weight_discounts_rejects_mixed_commodities() {
        let err = weight_discounts(
            r#"{
                "total_weight_kg": "1000",
                "thresholds": [
                    {"commodity": "cacao", "metric": "humedad", "threshold_percent": "12"},
                    {"commodity": "cafe", "metric": "humedad", "threshold_percent": "13"}
                ],
                "measurements": {"humedad": "25"}
            }"#,
        )
        .unwrap_err();
        assert!(err.contains("cannot be applied to one reception"));
    }

    #[test]
    fn test_price() {
        let output = price("820", "2.50").unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(decimal_at(&value["gross_value"]), Decimal::from(2050));

        assert!(price("abc", "2.50").unwrap_err().contains("final_weight_kg"));
        assert!(price("10", "0").is_err());
    }
}
