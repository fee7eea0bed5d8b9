//! CSV and JSON export of raw records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use subscription_core::types::DATE_FORMAT;
use subscription_core::{AnalyticsError, AnalyticsResult, DailyMetrics};

pub const CSV_COLUMNS: [&str; 9] = [
    "date",
    "platform",
    "planType",
    "activeSubscriptions",
    "newSubscriptions",
    "churns",
    "mrr",
    "trialConversions",
    "trialStarts",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(AnalyticsError::InvalidFilter(format!(
                "unknown export format '{}'",
                other
            ))),
        }
    }
}

/// Header line plus one line per record, no trailing newline. Every field
/// is a bare token so no quoting is needed.
pub fn to_csv(records: &[DailyMetrics]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_COLUMNS.join(","));
    for r in records {
        lines.push(format!(
            "{},{},{},{},{},{},{},{},{}",
            r.date.format(DATE_FORMAT),
            r.platform,
            r.plan_type,
            r.active_subscriptions,
            r.new_subscriptions,
            r.churns,
            r.mrr,
            r.trial_conversions,
            r.trial_starts
        ));
    }
    lines.join("\n")
}

pub fn to_json(records: &[DailyMetrics]) -> AnalyticsResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn export(records: &[DailyMetrics], format: ExportFormat) -> AnalyticsResult<String> {
    match format {
        ExportFormat::Csv => Ok(to_csv(records)),
        ExportFormat::Json => to_json(records),
    }
}

/// `subscription_data_YYYY-MM-DD.<ext>`
pub fn export_file_name(format: ExportFormat, on: NaiveDate) -> String {
    format!(
        "subscription_data_{}.{}",
        on.format(DATE_FORMAT),
        format.extension()
    )
}
