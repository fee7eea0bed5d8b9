//! Collapse per-cohort records into one chart point per calendar day.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use subscription_core::{ChartDataPoint, DailyMetrics};

use crate::round_half_up;

#[derive(Debug, Default)]
struct DayTotals {
    active_subscriptions: u64,
    new_subscriptions: u64,
    churns: u64,
    mrr: u64,
    trial_conversions: u64,
    trial_starts: u64,
}

/// Whole-percent conversion rate, 0 when there were no trial starts.
pub fn conversion_rate(conversions: u64, starts: u64) -> u32 {
    if starts == 0 {
        return 0;
    }
    round_half_up((conversions as f64 / starts as f64) * 100.0) as u32
}

/// Sum every record sharing a date across platform and plan, ascending by
/// date. The trial rate is derived from the summed conversions and starts.
pub fn aggregate_by_date(records: &[DailyMetrics]) -> Vec<ChartDataPoint> {
    let mut days: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();

    for record in records {
        let totals = days.entry(record.date).or_default();
        totals.active_subscriptions += record.active_subscriptions;
        totals.new_subscriptions += record.new_subscriptions;
        totals.churns += record.churns;
        totals.mrr += record.mrr;
        totals.trial_conversions += record.trial_conversions;
        totals.trial_starts += record.trial_starts;
    }

    days.into_iter()
        .map(|(date, totals)| ChartDataPoint {
            date,
            active_subscriptions: totals.active_subscriptions,
            new_subscriptions: totals.new_subscriptions,
            churns: totals.churns,
            mrr: totals.mrr,
            trial_conversion_rate: conversion_rate(totals.trial_conversions, totals.trial_starts),
        })
        .collect()
}
