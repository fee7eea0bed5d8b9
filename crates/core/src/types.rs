use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AnalyticsError, AnalyticsResult};

/// Date format used everywhere a day is rendered as text.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string into a calendar day.
pub fn parse_date(input: &str) -> AnalyticsResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| AnalyticsError::InvalidDate {
        input: input.to_string(),
    })
}

/// Store platform a subscription was purchased through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    /// Generation order; also the order breakdowns are reported in.
    pub const ALL: [Platform; 2] = [Platform::Ios, Platform::Android];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Monthly,
    Yearly,
}

impl PlanType {
    pub const ALL: [PlanType; 2] = [PlanType::Monthly, PlanType::Yearly];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Monthly => "monthly",
            PlanType::Yearly => "yearly",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform selector of a query. `All` places no restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFilter {
    #[default]
    All,
    Ios,
    Android,
}

impl PlatformFilter {
    pub fn matches(&self, platform: Platform) -> bool {
        match self {
            PlatformFilter::All => true,
            PlatformFilter::Ios => platform == Platform::Ios,
            PlatformFilter::Android => platform == Platform::Android,
        }
    }
}

impl FromStr for PlatformFilter {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(PlatformFilter::All),
            "ios" => Ok(PlatformFilter::Ios),
            "android" => Ok(PlatformFilter::Android),
            other => Err(AnalyticsError::InvalidFilter(format!(
                "unknown platform '{}'",
                other
            ))),
        }
    }
}

/// Plan selector of a query. `All` places no restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanFilter {
    #[default]
    All,
    Monthly,
    Yearly,
}

impl PlanFilter {
    pub fn matches(&self, plan: PlanType) -> bool {
        match self {
            PlanFilter::All => true,
            PlanFilter::Monthly => plan == PlanType::Monthly,
            PlanFilter::Yearly => plan == PlanType::Yearly,
        }
    }
}

impl FromStr for PlanFilter {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(PlanFilter::All),
            "monthly" => Ok(PlanFilter::Monthly),
            "yearly" => Ok(PlanFilter::Yearly),
            other => Err(AnalyticsError::InvalidFilter(format!(
                "unknown plan type '{}'",
                other
            ))),
        }
    }
}

/// One day of metrics for a single (platform, plan) cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetrics {
    pub date: NaiveDate,
    pub active_subscriptions: u64,
    pub new_subscriptions: u64,
    pub churns: u64,
    pub mrr: u64,
    pub trial_conversions: u64,
    pub trial_starts: u64,
    pub platform: Platform,
    pub plan_type: PlanType,
}

/// Query over the dataset. Both date bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub platform: PlatformFilter,
    #[serde(default)]
    pub plan_type: PlanFilter,
}

impl Filters {
    /// Date-only query across every platform and plan.
    pub fn between(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            platform: PlatformFilter::All,
            plan_type: PlanFilter::All,
        }
    }

    pub fn with_platform(mut self, platform: PlatformFilter) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_plan_type(mut self, plan_type: PlanFilter) -> Self {
        self.plan_type = plan_type;
        self
    }

    /// Whether a record falls inside this query.
    pub fn matches(&self, record: &DailyMetrics) -> bool {
        record.date >= self.start_date
            && record.date <= self.end_date
            && self.platform.matches(record.platform)
            && self.plan_type.matches(record.plan_type)
    }
}

/// All cohorts of one calendar day collapsed into a single point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataPoint {
    pub date: NaiveDate,
    pub active_subscriptions: u64,
    pub new_subscriptions: u64,
    pub churns: u64,
    pub mrr: u64,
    /// Whole percent, 0..=100.
    pub trial_conversion_rate: u32,
}

/// Headline KPIs for a period plus their change against the preceding
/// period of equal length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedMetrics {
    pub total_active_subscriptions: u64,
    pub total_new_subscriptions: u64,
    pub total_churns: u64,
    #[serde(rename = "totalMRR")]
    pub total_mrr: u64,
    pub trial_conversion_rate: u32,
    pub active_subscriptions_change: i64,
    pub new_subscriptions_change: i64,
    pub churns_change: i64,
    pub mrr_change: i64,
    /// Percentage points, not percent of percent.
    pub trial_conversion_rate_change: i64,
}

/// One slice of a categorical partition, ready for a pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub name: String,
    pub value: u64,
    pub color: String,
}

impl BreakdownEntry {
    pub fn new(name: &str, value: u64, color: &str) -> Self {
        Self {
            name: name.to_string(),
            value,
            color: color.to_string(),
        }
    }
}

/// Inclusive bounds of the generated dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, platform: Platform, plan_type: PlanType) -> DailyMetrics {
        DailyMetrics {
            date: parse_date(date).unwrap(),
            active_subscriptions: 1,
            new_subscriptions: 0,
            churns: 0,
            mrr: 0,
            trial_conversions: 0,
            trial_starts: 0,
            platform,
            plan_type,
        }
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-03-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert!(matches!(
            parse_date("15/03/2024"),
            Err(AnalyticsError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_filter_selectors_from_str() {
        assert_eq!("iOS".parse::<PlatformFilter>().unwrap(), PlatformFilter::Ios);
        assert_eq!("all".parse::<PlanFilter>().unwrap(), PlanFilter::All);
        assert!("web".parse::<PlatformFilter>().is_err());
        assert!("weekly".parse::<PlanFilter>().is_err());
    }

    #[test]
    fn test_filters_match_inclusive_bounds() {
        let filters = Filters::between(
            parse_date("2024-01-10").unwrap(),
            parse_date("2024-01-12").unwrap(),
        )
        .with_platform(PlatformFilter::Android);

        assert!(filters.matches(&record("2024-01-10", Platform::Android, PlanType::Monthly)));
        assert!(filters.matches(&record("2024-01-12", Platform::Android, PlanType::Yearly)));
        assert!(!filters.matches(&record("2024-01-13", Platform::Android, PlanType::Monthly)));
        assert!(!filters.matches(&record("2024-01-11", Platform::Ios, PlanType::Monthly)));
    }

    #[test]
    fn test_daily_metrics_serializes_camel_case() {
        let json = serde_json::to_value(record("2024-01-01", Platform::Ios, PlanType::Yearly)).unwrap();
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["platform"], "ios");
        assert_eq!(json["planType"], "yearly");
        assert_eq!(json["activeSubscriptions"], 1);
    }

    #[test]
    fn test_aggregated_metrics_mrr_field_name() {
        let json = serde_json::to_value(AggregatedMetrics::default()).unwrap();
        assert!(json.get("totalMRR").is_some());
        assert!(json.get("trialConversionRateChange").is_some());
    }
}
