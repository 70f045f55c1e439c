//! Reception settlement service

use std::sync::Arc;

use crate::config::Config;
use crate::error::AppResult;
use shared::{settle_reception, PriceList, ReceptionSettlement, SettlementRequest};

/// Settles receptions against the configured thresholds and prices
#[derive(Clone)]
pub struct ReceptionService {
    config: Arc<Config>,
    prices: Arc<PriceList>,
}

impl ReceptionService {
    /// Create a new ReceptionService instance
    pub fn new(config: Arc<Config>, prices: Arc<PriceList>) -> Self {
        Self { config, prices }
    }

    /// Merge, discount and price one reception
    pub fn settle(&self, request: SettlementRequest) -> AppResult<ReceptionSettlement> {
        let receiving = &self.config.receiving;
        let required = receiving.required_for(request.commodity);

        let settlement = settle_reception(
            &request,
            &receiving.thresholds,
            &required,
            self.prices.as_ref(),
        )?;

        tracing::info!(
            commodity = %settlement.commodity,
            reception_date = %settlement.reception_date,
            gross_weight_kg = %request.gross_weight_kg,
            final_weight_kg = %settlement.discount.final_weight_kg,
            gross_value = %settlement.pricing.gross_value,
            "Reception settled"
        );

        Ok(settlement)
    }
}
