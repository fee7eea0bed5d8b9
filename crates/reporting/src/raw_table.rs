//! Sorting and pagination for the raw record table.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use subscription_core::{AnalyticsError, DailyMetrics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Date,
    Platform,
    PlanType,
    ActiveSubscriptions,
    NewSubscriptions,
    Churns,
    Mrr,
    TrialConversions,
    TrialStarts,
}

impl SortField {
    pub const ALL: [SortField; 9] = [
        SortField::Date,
        SortField::Platform,
        SortField::PlanType,
        SortField::ActiveSubscriptions,
        SortField::NewSubscriptions,
        SortField::Churns,
        SortField::Mrr,
        SortField::TrialConversions,
        SortField::TrialStarts,
    ];

    /// Column name as it appears in exports.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Platform => "platform",
            SortField::PlanType => "planType",
            SortField::ActiveSubscriptions => "activeSubscriptions",
            SortField::NewSubscriptions => "newSubscriptions",
            SortField::Churns => "churns",
            SortField::Mrr => "mrr",
            SortField::TrialConversions => "trialConversions",
            SortField::TrialStarts => "trialStarts",
        }
    }

    /// Text columns compare lexicographically, the rest numerically.
    fn compare(&self, a: &DailyMetrics, b: &DailyMetrics) -> Ordering {
        match self {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Platform => a.platform.as_str().cmp(b.platform.as_str()),
            SortField::PlanType => a.plan_type.as_str().cmp(b.plan_type.as_str()),
            SortField::ActiveSubscriptions => a.active_subscriptions.cmp(&b.active_subscriptions),
            SortField::NewSubscriptions => a.new_subscriptions.cmp(&b.new_subscriptions),
            SortField::Churns => a.churns.cmp(&b.churns),
            SortField::Mrr => a.mrr.cmp(&b.mrr),
            SortField::TrialConversions => a.trial_conversions.cmp(&b.trial_conversions),
            SortField::TrialStarts => a.trial_starts.cmp(&b.trial_starts),
        }
    }
}

impl FromStr for SortField {
    type Err = AnalyticsError;

    /// Accepts the camelCase column name or its snake_case form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| *c != '_').collect();
        SortField::ALL
            .into_iter()
            .find(|field| field.column().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| AnalyticsError::UnknownColumn(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for TableSort {
    fn default() -> Self {
        Self {
            field: SortField::Date,
            direction: SortDirection::Descending,
        }
    }
}

impl TableSort {
    /// Clicking the current column flips direction; a new column starts
    /// descending.
    pub fn select(self, field: SortField) -> Self {
        if field == self.field {
            Self {
                field,
                direction: self.direction.toggled(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Descending,
            }
        }
    }

    /// Stable sort; ties keep their input order in both directions.
    pub fn apply(&self, records: &[DailyMetrics]) -> Vec<DailyMetrics> {
        let mut sorted = records.to_vec();
        match self.direction {
            SortDirection::Ascending => sorted.sort_by(|a, b| self.field.compare(a, b)),
            SortDirection::Descending => sorted.sort_by(|a, b| self.field.compare(b, a)),
        }
        sorted
    }
}

/// Sort plus current page of the raw table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTableState {
    pub sort: TableSort,
    pub page: usize,
    pub page_size: usize,
}

impl RawTableState {
    pub fn new(page_size: usize) -> Self {
        Self {
            sort: TableSort::default(),
            page: 1,
            page_size,
        }
    }

    /// Any header selection re-sorts and returns to the first page.
    pub fn select(&mut self, field: SortField) {
        self.sort = self.sort.select(field);
        self.page = 1;
    }

    pub fn go_to(&mut self, page: usize) {
        self.page = page;
    }

    pub fn view(&self, records: &[DailyMetrics]) -> Page<DailyMetrics> {
        paginate(&self.sort.apply(records), self.page, self.page_size)
    }
}

/// One 1-based page of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size);
    let start = page.saturating_sub(1).saturating_mul(page_size);
    let slice: &[T] = if page == 0 || start >= items.len() {
        &[]
    } else {
        &items[start..(start + page_size).min(items.len())]
    };

    Page {
        items: slice.to_vec(),
        page,
        page_size,
        total_items: items.len(),
        total_pages,
    }
}
