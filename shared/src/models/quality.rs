//! Quality measurement models and the field/lab merge rule

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Known quality metrics, measured as a percentage of the sample
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityMetric {
    #[serde(rename = "humedad", alias = "humidity")]
    Humidity,
    #[serde(rename = "moho", alias = "mold")]
    Mold,
    #[serde(rename = "violetas", alias = "violet")]
    Violet,
    #[serde(rename = "basura", alias = "foreign_matter")]
    ForeignMatter,
}

impl QualityMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityMetric::Humidity => "humedad",
            QualityMetric::Mold => "moho",
            QualityMetric::Violet => "violetas",
            QualityMetric::ForeignMatter => "basura",
        }
    }
}

impl std::str::FromStr for QualityMetric {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "humedad" | "humidity" => Ok(QualityMetric::Humidity),
            "moho" | "mold" => Ok(QualityMetric::Mold),
            "violetas" | "violet" => Ok(QualityMetric::Violet),
            "basura" | "foreign_matter" => Ok(QualityMetric::ForeignMatter),
            _ => Err(EngineError::UnknownMetric(s.to_string())),
        }
    }
}

impl std::fmt::Display for QualityMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measured percentage per metric
///
/// Unknown metric keys fail deserialization, so only known metrics reach the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct QualityMeasurements(BTreeMap<QualityMetric, Decimal>);

impl QualityMeasurements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, metric: QualityMetric, value: Decimal) -> Self {
        self.0.insert(metric, value);
        self
    }

    pub fn insert(&mut self, metric: QualityMetric, value: Decimal) -> Option<Decimal> {
        self.0.insert(metric, value)
    }

    pub fn get(&self, metric: QualityMetric) -> Option<Decimal> {
        self.0.get(&metric).copied()
    }

    /// Value of a metric that must be present
    pub fn require(&self, metric: QualityMetric) -> EngineResult<Decimal> {
        self.get(metric).ok_or(EngineError::MissingMetric(metric))
    }

    pub fn iter(&self) -> impl Iterator<Item = (QualityMetric, Decimal)> + '_ {
        self.0.iter().map(|(metric, value)| (*metric, *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(QualityMetric, Decimal)> for QualityMeasurements {
    fn from_iter<I: IntoIterator<Item = (QualityMetric, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A laboratory sample taken from a reception
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabSample {
    pub sample_id: u64,
    pub recorded_at: DateTime<Utc>,
    /// `None` means the lab did not measure that metric
    #[serde(default)]
    pub values: BTreeMap<QualityMetric, Option<Decimal>>,
}

impl LabSample {
    pub fn new(sample_id: u64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            sample_id,
            recorded_at,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, metric: QualityMetric, value: Decimal) -> Self {
        self.values.insert(metric, Some(value));
        self
    }

    /// Ordering key; later keys are more recent
    pub fn recency(&self) -> (DateTime<Utc>, u64) {
        (self.recorded_at, self.sample_id)
    }

    /// Metrics this sample actually measured
    pub fn measured(&self) -> impl Iterator<Item = (QualityMetric, Decimal)> + '_ {
        self.values
            .iter()
            .filter_map(|(metric, value)| value.map(|v| (*metric, v)))
    }
}

/// Merge a field evaluation with lab samples into one measurement set
///
/// Lab values override field values. Among lab samples the most recent one wins,
/// ordered by `(recorded_at, sample_id)` and never by position in `lab_samples`.
pub fn combine_quality_metrics(
    field: &QualityMeasurements,
    lab_samples: &[LabSample],
) -> EngineResult<QualityMeasurements> {
    let mut ordered: Vec<&LabSample> = lab_samples.iter().collect();
    ordered.sort_by_key(|sample| sample.recency());

    let mut merged = field.clone();
    let mut start = 0;
    while start < ordered.len() {
        let key = ordered[start].recency();
        let end = ordered[start..]
            .iter()
            .position(|sample| sample.recency() != key)
            .map_or(ordered.len(), |offset| start + offset);

        // Samples sharing a key cannot be ordered, so they must agree.
        let mut group: BTreeMap<QualityMetric, Decimal> = BTreeMap::new();
        for sample in &ordered[start..end] {
            for (metric, value) in sample.measured() {
                match group.get(&metric) {
                    Some(existing) if *existing != value => {
                        return Err(EngineError::ConflictingLabSamples {
                            sample_id: sample.sample_id,
                            metric,
                        });
                    }
                    _ => {
                        group.insert(metric, value);
                    }
                }
            }
        }

        for (metric, value) in group {
            merged.insert(metric, value);
        }
        start = end;
    }

    Ok(merged)
}
