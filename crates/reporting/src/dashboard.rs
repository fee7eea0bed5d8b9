//! Subscription dashboard: one-call snapshot of KPIs, trend series, and
//! breakdowns for a filter selection.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use subscription_core::config::DashboardConfig;
use subscription_core::{
    AggregatedMetrics, AnalyticsError, AnalyticsResult, BreakdownEntry, ChartDataPoint,
    DateRange, Filters, PlanFilter, PlatformFilter,
};

use crate::aggregate::aggregate_by_date;
use crate::breakdown::{plan_breakdown, platform_breakdown};
use crate::dataset::Dataset;

/// Quick date-range choices, each ending at the latest available date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePreset {
    Last7Days,
    Last30Days,
    Last90Days,
    LastYear,
}

impl RangePreset {
    pub const ALL: [RangePreset; 4] = [
        RangePreset::Last7Days,
        RangePreset::Last30Days,
        RangePreset::Last90Days,
        RangePreset::LastYear,
    ];

    pub fn days(&self) -> i64 {
        match self {
            RangePreset::Last7Days => 7,
            RangePreset::Last30Days => 30,
            RangePreset::Last90Days => 90,
            RangePreset::LastYear => 365,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RangePreset::Last7Days => "7d",
            RangePreset::Last30Days => "30d",
            RangePreset::Last90Days => "90d",
            RangePreset::LastYear => "1y",
        }
    }
}

impl FromStr for RangePreset {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RangePreset::ALL
            .into_iter()
            .find(|preset| preset.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AnalyticsError::InvalidFilter(format!("unknown range preset '{}'", s)))
    }
}

fn days_before(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_sub_signed(Duration::days(days)).unwrap_or(date)
}

/// Partially specified selection, completed against the dashboard defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterRequest {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub platform: Option<PlatformFilter>,
    pub plan_type: Option<PlanFilter>,
    pub preset: Option<RangePreset>,
}

impl FilterRequest {
    pub fn is_empty(&self) -> bool {
        *self == FilterRequest::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub filters: Filters,
    pub metrics: AggregatedMetrics,
    pub chart: Vec<ChartDataPoint>,
    pub platform_breakdown: [BreakdownEntry; 2],
    pub plan_breakdown: [BreakdownEntry; 2],
    pub record_count: usize,
    pub generated_at: DateTime<Utc>,
}

pub struct SubscriptionDashboard<'a> {
    dataset: &'a Dataset,
    config: DashboardConfig,
}

impl<'a> SubscriptionDashboard<'a> {
    pub fn new(dataset: &'a Dataset, config: DashboardConfig) -> Self {
        Self { dataset, config }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn date_range(&self) -> Option<DateRange> {
        self.dataset.available_date_range()
    }

    /// The last `default_window_days` before the latest date, every platform
    /// and plan. `None` when the dataset is empty.
    pub fn default_filters(&self) -> Option<Filters> {
        let range = self.date_range()?;
        Some(Filters::between(
            days_before(range.max, self.config.default_window_days),
            range.max,
        ))
    }

    /// Apply a preset window to `base`, keeping its platform and plan.
    pub fn preset_filters(&self, preset: RangePreset, base: &Filters) -> Filters {
        match self.date_range() {
            Some(range) => Filters {
                start_date: days_before(range.max, preset.days()),
                end_date: range.max,
                ..*base
            },
            None => *base,
        }
    }

    /// Explicit dates win over a preset, and a preset wins over the default
    /// window. Each date bound is overridden on its own.
    pub fn resolve_filters(&self, request: &FilterRequest) -> AnalyticsResult<Filters> {
        let mut filters = self.default_filters().ok_or(AnalyticsError::EmptyDataset)?;

        if let Some(preset) = request.preset {
            filters = self.preset_filters(preset, &filters);
        }
        if let Some(start) = request.start {
            filters.start_date = start;
        }
        if let Some(end) = request.end {
            filters.end_date = end;
        }
        if filters.start_date > filters.end_date {
            return Err(AnalyticsError::InvalidRange {
                start: filters.start_date,
                end: filters.end_date,
            });
        }
        if let Some(platform) = request.platform {
            filters.platform = platform;
        }
        if let Some(plan_type) = request.plan_type {
            filters.plan_type = plan_type;
        }
        Ok(filters)
    }

    pub fn chart(&self, filters: &Filters) -> Vec<ChartDataPoint> {
        aggregate_by_date(&self.dataset.filter(filters))
    }

    pub fn overview(&self, filters: &Filters) -> DashboardSnapshot {
        let filtered = self.dataset.filter(filters);

        DashboardSnapshot {
            filters: *filters,
            metrics: self.dataset.calculate_metrics(&filtered, filters),
            chart: aggregate_by_date(&filtered),
            platform_breakdown: platform_breakdown(&filtered),
            plan_breakdown: plan_breakdown(&filtered),
            record_count: filtered.len(),
            generated_at: Utc::now(),
        }
    }
}
