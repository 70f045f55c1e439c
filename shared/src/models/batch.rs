//! Drying batch models and proportional dried weight allocation

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::types::{checked_total, percent_of, portion_of};
use crate::validation::{validate_non_negative, validate_percentage, validate_percentage_shares};

/// Batch lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Open,
    Completed,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Open => "open",
            BatchStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchStatus::Open => write!(f, "Open"),
            BatchStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// Wet weight a reception puts into a batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContributionInput {
    pub reception_id: Uuid,
    pub wet_weight_kg: Decimal,
}

impl ContributionInput {
    pub fn new(reception_id: Uuid, wet_weight_kg: Decimal) -> Self {
        Self {
            reception_id,
            wet_weight_kg,
        }
    }
}

/// A reception's frozen share of a batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchContribution {
    pub reception_id: Uuid,
    pub wet_weight_contribution_kg: Decimal,
    /// Share of the batch wet weight (0-100), fixed when the batch is created
    pub percentage_of_total: Decimal,
}

/// Dried weight assigned back to a reception
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriedWeightAllocation {
    pub reception_id: Uuid,
    pub percentage_of_total: Decimal,
    pub proportional_dried_weight_kg: Decimal,
}

/// A pool of receptions dried together
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Batch {
    pub id: Uuid,
    pub total_wet_weight_kg: Decimal,
    pub total_dried_weight_kg: Option<Decimal>,
    contributions: Vec<BatchContribution>,
    pub status: BatchStatus,
}

/// Create an open batch and freeze each contribution's percentage share
pub fn create_batch(batch_id: Uuid, contributions: &[ContributionInput]) -> EngineResult<Batch> {
    if contributions.is_empty() {
        return Err(EngineError::EmptyBatch);
    }

    for contribution in contributions {
        validate_non_negative("wet_weight_kg", contribution.wet_weight_kg)?;
    }
    reject_duplicate_receptions(contributions.iter().map(|c| c.reception_id))?;

    let total_wet_weight_kg =
        checked_total("wet_weight_kg", contributions.iter().map(|c| c.wet_weight_kg))?;
    if total_wet_weight_kg <= Decimal::ZERO {
        return Err(EngineError::NonPositiveBatchWeight(total_wet_weight_kg));
    }

    let contributions = contributions
        .iter()
        .map(|c| {
            Ok(BatchContribution {
                reception_id: c.reception_id,
                wet_weight_contribution_kg: c.wet_weight_kg,
                percentage_of_total: percent_of(
                    "wet_weight_kg",
                    c.wet_weight_kg,
                    total_wet_weight_kg,
                )?,
            })
        })
        .collect::<EngineResult<Vec<_>>>()?;

    Ok(Batch {
        id: batch_id,
        total_wet_weight_kg,
        total_dried_weight_kg: None,
        contributions,
        status: BatchStatus::Open,
    })
}

fn reject_duplicate_receptions(ids: impl IntoIterator<Item = Uuid>) -> EngineResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(EngineError::DuplicateReception(id));
        }
    }
    Ok(())
}

impl Batch {
    /// Rebuild a batch from stored parts
    ///
    /// Each share must be a percentage, the shares must sum to 100, wet weights
    /// must be non-negative and a reception may appear only once.
    pub fn restore(
        id: Uuid,
        contributions: Vec<BatchContribution>,
        total_dried_weight_kg: Option<Decimal>,
    ) -> EngineResult<Self> {
        if contributions.is_empty() {
            return Err(EngineError::EmptyBatch);
        }
        for contribution in &contributions {
            validate_percentage("percentage_of_total", contribution.percentage_of_total)?;
            validate_non_negative(
                "wet_weight_contribution_kg",
                contribution.wet_weight_contribution_kg,
            )?;
        }
        reject_duplicate_receptions(contributions.iter().map(|c| c.reception_id))?;
        let shares: Vec<Decimal> = contributions.iter().map(|c| c.percentage_of_total).collect();
        validate_percentage_shares(&shares)?;
        if let Some(dried) = total_dried_weight_kg {
            validate_non_negative("total_dried_weight_kg", dried)?;
        }

        let total_wet_weight_kg = checked_total(
            "wet_weight_contribution_kg",
            contributions.iter().map(|c| c.wet_weight_contribution_kg),
        )?;
        let status = match total_dried_weight_kg {
            Some(_) => BatchStatus::Completed,
            None => BatchStatus::Open,
        };

        Ok(Self {
            id,
            total_wet_weight_kg,
            total_dried_weight_kg,
            contributions,
            status,
        })
    }

    pub fn contributions(&self) -> &[BatchContribution] {
        &self.contributions
    }

    pub fn is_completed(&self) -> bool {
        self.status == BatchStatus::Completed
    }

    /// Index of the contribution that absorbs the allocation remainder
    ///
    /// The largest share; among equal shares, the last one.
    fn remainder_holder(&self) -> Option<usize> {
        self.contributions
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.percentage_of_total.cmp(&b.percentage_of_total))
            .map(|(index, _)| index)
    }

    /// Split a dried weight across contributions without changing the batch
    ///
    /// Every contribution except the remainder holder gets exactly
    /// `percentage_of_total / 100 * total_dried_weight_kg`. The holder gets
    /// whatever is left, so the allocations sum to exactly `total_dried_weight_kg`.
    pub fn allocate(
        &self,
        total_dried_weight_kg: Decimal,
    ) -> EngineResult<Vec<DriedWeightAllocation>> {
        validate_non_negative("total_dried_weight_kg", total_dried_weight_kg)?;
        let holder = self
            .remainder_holder()
            .ok_or(EngineError::BatchWithoutContributions(self.id))?;

        let mut allocations = self
            .contributions
            .iter()
            .map(|c| {
                Ok(DriedWeightAllocation {
                    reception_id: c.reception_id,
                    percentage_of_total: c.percentage_of_total,
                    proportional_dried_weight_kg: portion_of(
                        "total_dried_weight_kg",
                        total_dried_weight_kg,
                        c.percentage_of_total,
                    )?,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let others = checked_total(
            "total_dried_weight_kg",
            allocations
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != holder)
                .map(|(_, a)| a.proportional_dried_weight_kg),
        )?;
        allocations[holder].proportional_dried_weight_kg = total_dried_weight_kg - others;

        Ok(allocations)
    }
}

/// Record the dried weight of an open batch and return every reception's share
///
/// Re-completing a batch is rejected. On error the batch is left untouched.
pub fn complete_batch(
    batch: &mut Batch,
    total_dried_weight_kg: Decimal,
) -> EngineResult<Vec<DriedWeightAllocation>> {
    if batch.is_completed() {
        return Err(EngineError::BatchAlreadyCompleted(batch.id));
    }
    if batch.contributions.is_empty() {
        return Err(EngineError::BatchWithoutContributions(batch.id));
    }

    let allocations = batch.allocate(total_dried_weight_kg)?;

    batch.total_dried_weight_kg = Some(total_dried_weight_kg);
    batch.status = BatchStatus::Completed;

    Ok(allocations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn contribution(weight: &str) -> ContributionInput {
        ContributionInput::new(Uuid::new_v4(), dec(weight))
    }

    #[test]
    fn test_create_batch_freezes_percentages() {
        let batch = create_batch(Uuid::new_v4(), &[contribution("600"), contribution("400")])
            .unwrap();

        assert_eq!(batch.status, BatchStatus::Open);
        assert_eq!(batch.total_wet_weight_kg, dec("1000"));
        assert_eq!(batch.total_dried_weight_kg, None);
        assert_eq!(batch.contributions()[0].percentage_of_total, dec("60"));
        assert_eq!(batch.contributions()[1].percentage_of_total, dec("40"));
    }

    #[test]
    fn test_create_batch_rejects_empty() {
        assert_eq!(create_batch(Uuid::new_v4(), &[]), Err(EngineError::EmptyBatch));
    }

    #[test]
    fn test_create_batch_rejects_zero_total() {
        let result = create_batch(Uuid::new_v4(), &[contribution("0"), contribution("0")]);
        assert_eq!(result, Err(EngineError::NonPositiveBatchWeight(Decimal::ZERO)));
    }

    #[test]
    fn test_create_batch_rejects_negative_weight() {
        let result = create_batch(Uuid::new_v4(), &[contribution("10"), contribution("-1")]);
        assert!(matches!(result, Err(EngineError::NegativeValue { .. })));
    }

    #[test]
    fn test_create_batch_rejects_duplicate_reception() {
        let reception = Uuid::new_v4();
        let result = create_batch(
            Uuid::new_v4(),
            &[
                ContributionInput::new(reception, dec("10")),
                ContributionInput::new(reception, dec("20")),
            ],
        );
        assert_eq!(result, Err(EngineError::DuplicateReception(reception)));
    }

    #[test]
    fn test_complete_batch_splits_by_share() {
        let mut batch =
            create_batch(Uuid::new_v4(), &[contribution("600"), contribution("400")]).unwrap();

        let allocations = complete_batch(&mut batch, dec("500")).unwrap();

        assert_eq!(allocations[0].proportional_dried_weight_kg, dec("300"));
        assert_eq!(allocations[1].proportional_dried_weight_kg, dec("200"));
        assert_eq!(batch.status, BatchStatus::Completed);
        assert_eq!(batch.total_dried_weight_kg, Some(dec("500")));
    }

    #[test]
    fn test_remainder_goes_to_largest_share() {
        let mut batch = create_batch(
            Uuid::new_v4(),
            &[contribution("100"), contribution("100"), contribution("100")],
        )
        .unwrap();

        let allocations = complete_batch(&mut batch, dec("100")).unwrap();

        // Equal shares: the last one absorbs the remainder.
        for allocation in &allocations[..2] {
            let exact =
                portion_of("total_dried_weight_kg", dec("100"), allocation.percentage_of_total)
                    .unwrap();
            assert_eq!(allocation.proportional_dried_weight_kg, exact);
        }
        let others = allocations[0].proportional_dried_weight_kg
            + allocations[1].proportional_dried_weight_kg;
        assert_eq!(allocations[2].proportional_dried_weight_kg, dec("100") - others);
        assert!(
            allocations[2].proportional_dried_weight_kg
                >= allocations[0].proportional_dried_weight_kg
        );
        let total: Decimal = allocations.iter().map(|a| a.proportional_dried_weight_kg).sum();
        assert_eq!(total, dec("100"));
    }

    #[test]
    fn test_zero_weight_contributor_gets_nothing() {
        let mut batch = create_batch(
            Uuid::new_v4(),
            &[contribution("1"), contribution("1"), contribution("0")],
        )
        .unwrap();

        let allocations = complete_batch(&mut batch, dec("0.01")).unwrap();
        assert_eq!(allocations[0].proportional_dried_weight_kg, dec("0.005"));
        assert_eq!(allocations[1].proportional_dried_weight_kg, dec("0.005"));
        assert_eq!(allocations[2].proportional_dried_weight_kg, Decimal::ZERO);
        let total: Decimal = allocations.iter().map(|a| a.proportional_dried_weight_kg).sum();
        assert_eq!(total, dec("0.01"));
        assert!(allocations
            .iter()
            .all(|a| a.proportional_dried_weight_kg >= Decimal::ZERO));
    }

    #[test]
    fn test_complete_twice_rejected_without_mutation() {
        let mut batch =
            create_batch(Uuid::new_v4(), &[contribution("600"), contribution("400")]).unwrap();
        complete_batch(&mut batch, dec("500")).unwrap();
        let snapshot = batch.clone();

        let result = complete_batch(&mut batch, dec("450"));

        assert_eq!(result, Err(EngineError::BatchAlreadyCompleted(batch.id)));
        assert_eq!(batch, snapshot);
    }

    #[test]
    fn test_negative_dried_weight_leaves_batch_open() {
        let mut batch = create_batch(Uuid::new_v4(), &[contribution("10")]).unwrap();

        let result = complete_batch(&mut batch, dec("-5"));

        assert!(matches!(result, Err(EngineError::NegativeValue { .. })));
        assert_eq!(batch.status, BatchStatus::Open);
        assert_eq!(batch.total_dried_weight_kg, None);
    }

    #[test]
    fn test_allocate_does_not_complete() {
        let batch = create_batch(Uuid::new_v4(), &[contribution("3"), contribution("1")]).unwrap();
        let preview = batch.allocate(dec("2")).unwrap();

        assert_eq!(preview[0].proportional_dried_weight_kg, dec("1.5"));
        assert_eq!(preview[1].proportional_dried_weight_kg, dec("0.5"));
        assert!(!batch.is_completed());
    }

    #[test]
    fn test_restore_checks_share_invariant() {
        let bad = vec![BatchContribution {
            reception_id: Uuid::new_v4(),
            wet_weight_contribution_kg: dec("10"),
            percentage_of_total: dec("90"),
        }];
        assert!(Batch::restore(Uuid::new_v4(), bad, None).is_err());

        let good = vec![BatchContribution {
            reception_id: Uuid::new_v4(),
            wet_weight_contribution_kg: dec("10"),
            percentage_of_total: dec("100"),
        }];
        let batch = Batch::restore(Uuid::new_v4(), good, Some(dec("4"))).unwrap();
        assert!(batch.is_completed());
        assert_eq!(batch.total_wet_weight_kg, dec("10"));
    }

    #[test]
    fn test_many_small_shares_are_not_truncated() {
        let inputs: Vec<ContributionInput> = (0..1000).map(|_| contribution("10")).collect();
        let batch = create_batch(Uuid::new_v4(), &inputs).unwrap();

        let allocations = batch.allocate(dec("9.99")).unwrap();

        for allocation in &allocations[..999] {
            assert_eq!(allocation.percentage_of_total, dec("0.1"));
            assert_eq!(allocation.proportional_dried_weight_kg, dec("0.00999"));
        }
        assert_eq!(allocations[999].proportional_dried_weight_kg, dec("0.00999"));
        let total: Decimal = allocations.iter().map(|a| a.proportional_dried_weight_kg).sum();
        assert_eq!(total, dec("9.99"));
    }

    fn stored(percentage: &str, wet_weight: &str) -> BatchContribution {
        BatchContribution {
            reception_id: Uuid::new_v4(),
            wet_weight_contribution_kg: dec(wet_weight),
            percentage_of_total: dec(percentage),
        }
    }

    #[test]
    fn test_restore_rejects_shares_outside_percentage_range() {
        let result = Batch::restore(
            Uuid::new_v4(),
            vec![stored("150", "10"), stored("-50", "10")],
            None,
        );
        assert!(matches!(result, Err(EngineError::PercentOutOfRange { .. })));
    }

    #[test]
    fn test_restore_rejects_negative_wet_weight() {
        let result = Batch::restore(
            Uuid::new_v4(),
            vec![stored("50", "10"), stored("50", "-10")],
            None,
        );
        assert!(matches!(result, Err(EngineError::NegativeValue { .. })));
    }

    #[test]
    fn test_restore_rejects_duplicate_reception() {
        let first = stored("50", "10");
        let mut second = stored("50", "10");
        second.reception_id = first.reception_id;
        let reception = first.reception_id;

        let result = Batch::restore(Uuid::new_v4(), vec![first, second], None);
        assert_eq!(result, Err(EngineError::DuplicateReception(reception)));
    }

    #[test]
    fn test_restore_rejects_negative_dried_weight() {
        let result = Batch::restore(Uuid::new_v4(), vec![stored("100", "10")], Some(dec("-1")));
        assert!(matches!(result, Err(EngineError::NegativeValue { .. })));
    }
}
