//! The generated dataset: read-only ground truth for every query.

use std::sync::OnceLock;
use subscription_core::config::GeneratorConfig;
use subscription_core::{AggregatedMetrics, DailyMetrics, DateRange, Filters};
use tracing::info;

use crate::filter::filter_records;
use crate::generator::SubscriptionGenerator;
use crate::metrics::calculate_metrics;

#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<DailyMetrics>,
    range: Option<DateRange>,
}

impl Dataset {
    /// Generate the dataset described by `config`.
    pub fn generate(config: &GeneratorConfig) -> Self {
        let dataset = Self::from_records(SubscriptionGenerator::new(config.clone()).generate());
        info!(
            seed = config.seed,
            records = dataset.len(),
            min = ?dataset.range.map(|r| r.min),
            max = ?dataset.range.map(|r| r.max),
            "Subscription dataset generated"
        );
        dataset
    }

    pub fn from_records(records: Vec<DailyMetrics>) -> Self {
        let min = records.iter().map(|r| r.date).min();
        let max = records.iter().map(|r| r.date).max();
        let range = min.zip(max).map(|(min, max)| DateRange { min, max });
        Self { records, range }
    }

    /// Process-wide dataset for the default configuration, generated on
    /// first access.
    pub fn shared() -> &'static Dataset {
        static SHARED: OnceLock<Dataset> = OnceLock::new();
        SHARED.get_or_init(|| Dataset::generate(&GeneratorConfig::default()))
    }

    /// Every record, unfiltered.
    pub fn raw_data(&self) -> &[DailyMetrics] {
        &self.records
    }

    /// Earliest and latest dates present. `None` for an empty dataset.
    pub fn available_date_range(&self) -> Option<DateRange> {
        self.range
    }

    pub fn filter(&self, filters: &Filters) -> Vec<DailyMetrics> {
        filter_records(&self.records, filters)
    }

    /// Summarize `current` (the result of `filter(filters)`) against the
    /// preceding period of this dataset.
    pub fn calculate_metrics(&self, current: &[DailyMetrics], filters: &Filters) -> AggregatedMetrics {
        calculate_metrics(&self.records, current, filters)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
