//! Shared value types, configuration, and errors for the subscription
//! analytics pipeline.

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AnalyticsError, AnalyticsResult};
pub use types::{
    AggregatedMetrics, BreakdownEntry, ChartDataPoint, DailyMetrics, DateRange, Filters,
    PlanFilter, PlanType, Platform, PlatformFilter,
};
