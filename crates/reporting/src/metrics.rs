//! Headline KPIs with period-over-period comparison.

use chrono::Duration;
use subscription_core::{AggregatedMetrics, DailyMetrics, Filters};
use tracing::debug;

use crate::aggregate::{aggregate_by_date, conversion_rate};
use crate::filter::filter_records;
use crate::round_half_up;

/// Snapshot and totals of one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    /// Active subscriptions on the latest day of the period.
    pub latest_active_subscriptions: u64,
    /// MRR on the latest day of the period.
    pub latest_mrr: u64,
    pub new_subscriptions: u64,
    pub churns: u64,
    pub trial_conversion_rate: u32,
}

impl PeriodTotals {
    pub fn from_records(records: &[DailyMetrics]) -> Self {
        let chart = aggregate_by_date(records);
        let (latest_active_subscriptions, latest_mrr) = chart
            .last()
            .map(|point| (point.active_subscriptions, point.mrr))
            .unwrap_or_default();

        let conversions: u64 = records.iter().map(|r| r.trial_conversions).sum();
        let starts: u64 = records.iter().map(|r| r.trial_starts).sum();

        Self {
            latest_active_subscriptions,
            latest_mrr,
            new_subscriptions: chart.iter().map(|p| p.new_subscriptions).sum(),
            churns: chart.iter().map(|p| p.churns).sum(),
            trial_conversion_rate: conversion_rate(conversions, starts),
        }
    }
}

/// Whole-percent change. A zero baseline reports 100 for any growth, else 0.
pub fn calc_change(current: u64, previous: u64) -> i64 {
    if previous == 0 {
        return if current > 0 { 100 } else { 0 };
    }
    let delta = current as f64 - previous as f64;
    round_half_up((delta / previous as f64) * 100.0) as i64
}

/// The equal-length window ending the day before `filters.start_date`, with
/// the same platform and plan selection.
pub fn previous_period(filters: &Filters) -> Filters {
    let period_days = (filters.end_date - filters.start_date).num_days();
    let start_date = filters
        .start_date
        .checked_sub_signed(Duration::days(period_days))
        .unwrap_or(filters.start_date);
    let end_date = filters
        .start_date
        .pred_opt()
        .unwrap_or(filters.start_date);

    Filters {
        start_date,
        end_date,
        ..*filters
    }
}

/// Summarize `current` (already filtered by `filters`) and compare it with
/// the preceding period drawn from `all_records`.
pub fn calculate_metrics(
    all_records: &[DailyMetrics],
    current: &[DailyMetrics],
    filters: &Filters,
) -> AggregatedMetrics {
    let now = PeriodTotals::from_records(current);

    let previous_filters = previous_period(filters);
    let previous_records = filter_records(all_records, &previous_filters);
    let before = PeriodTotals::from_records(&previous_records);

    debug!(
        current_records = current.len(),
        previous_records = previous_records.len(),
        previous_start = %previous_filters.start_date,
        previous_end = %previous_filters.end_date,
        "Calculated period metrics"
    );

    AggregatedMetrics {
        total_active_subscriptions: now.latest_active_subscriptions,
        total_new_subscriptions: now.new_subscriptions,
        total_churns: now.churns,
        total_mrr: now.latest_mrr,
        trial_conversion_rate: now.trial_conversion_rate,
        active_subscriptions_change: calc_change(
            now.latest_active_subscriptions,
            before.latest_active_subscriptions,
        ),
        new_subscriptions_change: calc_change(now.new_subscriptions, before.new_subscriptions),
        churns_change: calc_change(now.churns, before.churns),
        mrr_change: calc_change(now.latest_mrr, before.latest_mrr),
        trial_conversion_rate_change: now.trial_conversion_rate as i64
            - before.trial_conversion_rate as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subscription_core::types::parse_date;
    use subscription_core::{PlanFilter, PlanType, Platform, PlatformFilter};

    fn record(
        date: &str,
        platform: Platform,
        active: u64,
        new: u64,
        churns: u64,
        mrr: u64,
        trials: (u64, u64),
    ) -> DailyMetrics {
        DailyMetrics {
            date: parse_date(date).unwrap(),
            active_subscriptions: active,
            new_subscriptions: new,
            churns,
            mrr,
            trial_conversions: trials.0,
            trial_starts: trials.1,
            platform,
            plan_type: PlanType::Monthly,
        }
    }

    fn filters(start: &str, end: &str) -> Filters {
        Filters::between(parse_date(start).unwrap(), parse_date(end).unwrap())
    }

    #[test]
    fn test_calc_change() {
        assert_eq!(calc_change(120, 100), 20);
        assert_eq!(calc_change(80, 100), -20);
        assert_eq!(calc_change(0, 0), 0);
        assert_eq!(calc_change(5, 0), 100);
        assert_eq!(calc_change(0, 100), -100);
    }

    #[test]
    fn test_calc_change_rounds_half_up() {
        // -2.5% rounds toward positive infinity.
        assert_eq!(calc_change(975, 1000), -2);
        assert_eq!(calc_change(1025, 1000), 3);
    }

    #[test]
    fn test_previous_period_window() {
        let previous = previous_period(
            &filters("2024-03-11", "2024-03-20").with_platform(PlatformFilter::Ios),
        );
        assert_eq!(previous.start_date, parse_date("2024-03-02").unwrap());
        assert_eq!(previous.end_date, parse_date("2024-03-10").unwrap());
        assert_eq!(previous.platform, PlatformFilter::Ios);
        assert_eq!(previous.plan_type, PlanFilter::All);
    }

    #[test]
    fn test_single_day_period_has_empty_previous_window() {
        let previous = previous_period(&filters("2024-03-11", "2024-03-11"));
        assert!(previous.start_date > previous.end_date);
    }

    #[test]
    fn test_period_totals() {
        let records = vec![
            record("2024-01-01", Platform::Ios, 100, 5, 1, 1_000, (2, 10)),
            record("2024-01-01", Platform::Android, 50, 3, 2, 500, (1, 10)),
            record("2024-01-02", Platform::Ios, 110, 6, 0, 1_100, (3, 10)),
            record("2024-01-02", Platform::Android, 60, 4, 1, 600, (4, 10)),
        ];
        let totals = PeriodTotals::from_records(&records);
        assert_eq!(totals.latest_active_subscriptions, 170);
        assert_eq!(totals.latest_mrr, 1_700);
        assert_eq!(totals.new_subscriptions, 18);
        assert_eq!(totals.churns, 4);
        assert_eq!(totals.trial_conversion_rate, 25);
    }

    #[test]
    fn test_calculate_metrics_against_previous_period() {
        let all = vec![
            record("2024-01-01", Platform::Ios, 100, 10, 4, 1_000, (2, 10)),
            record("2024-01-02", Platform::Ios, 100, 10, 4, 1_000, (2, 10)),
            record("2024-01-03", Platform::Ios, 120, 12, 3, 1_500, (3, 10)),
            record("2024-01-04", Platform::Ios, 125, 12, 3, 1_500, (3, 10)),
        ];
        // 2024-01-03..04 has period length 1, so the previous window is 01-02 only.
        let query = filters("2024-01-03", "2024-01-04");
        let current = filter_records(&all, &query);
        let metrics = calculate_metrics(&all, &current, &query);

        assert_eq!(metrics.total_active_subscriptions, 125);
        assert_eq!(metrics.total_mrr, 1_500);
        assert_eq!(metrics.total_new_subscriptions, 24);
        assert_eq!(metrics.total_churns, 6);
        assert_eq!(metrics.trial_conversion_rate, 30);
        assert_eq!(metrics.active_subscriptions_change, 25);
        assert_eq!(metrics.mrr_change, 50);
        assert_eq!(metrics.new_subscriptions_change, 140);
        assert_eq!(metrics.churns_change, 50);
        assert_eq!(metrics.trial_conversion_rate_change, 10);
    }

    #[test]
    fn test_empty_period_is_all_zero() {
        let all = vec![record("2024-01-01", Platform::Ios, 100, 10, 4, 1_000, (2, 10))];
        let query = filters("2023-06-01", "2023-06-30");
        let current = filter_records(&all, &query);
        let metrics = calculate_metrics(&all, &current, &query);
        assert_eq!(metrics, AggregatedMetrics::default());
    }

    #[test]
    fn test_no_previous_data_reports_full_growth() {
        let all = vec![record("2024-01-01", Platform::Ios, 100, 10, 0, 1_000, (0, 0))];
        let query = filters("2024-01-01", "2024-01-07");
        let current = filter_records(&all, &query);
        let metrics = calculate_metrics(&all, &current, &query);
        assert_eq!(metrics.active_subscriptions_change, 100);
        assert_eq!(metrics.new_subscriptions_change, 100);
        assert_eq!(metrics.churns_change, 0);
        assert_eq!(metrics.trial_conversion_rate_change, 0);
    }
}
