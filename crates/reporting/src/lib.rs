//! Subscription analytics pipeline: deterministic synthetic data, filtering,
//! per-date aggregation, period-over-period KPIs, breakdowns, and export.

pub mod aggregate;
pub mod breakdown;
pub mod dashboard;
pub mod dataset;
pub mod export;
pub mod filter;
pub mod generator;
pub mod metrics;
pub mod random;
pub mod raw_table;

pub use aggregate::aggregate_by_date;
pub use breakdown::{plan_breakdown, platform_breakdown};
pub use dashboard::{DashboardSnapshot, FilterRequest, RangePreset, SubscriptionDashboard};
pub use dataset::Dataset;
pub use export::ExportFormat;
pub use filter::filter_records;
pub use generator::SubscriptionGenerator;
pub use metrics::{calc_change, calculate_metrics};
pub use raw_table::{RawTableState, SortDirection, SortField, TableSort};

/// Round to the nearest integer with halves going toward positive infinity.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
