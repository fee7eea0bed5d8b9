//! Narrow the dataset to a date window and optional platform/plan.

use subscription_core::{DailyMetrics, Filters};
use tracing::debug;

/// Records matching `filters`, in source order.
pub fn filter_records(records: &[DailyMetrics], filters: &Filters) -> Vec<DailyMetrics> {
    let matched: Vec<DailyMetrics> = records
        .iter()
        .filter(|record| filters.matches(record))
        .cloned()
        .collect();

    debug!(
        start = %filters.start_date,
        end = %filters.end_date,
        platform = ?filters.platform,
        plan_type = ?filters.plan_type,
        matched = matched.len(),
        "Filtered subscription records"
    );

    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SubscriptionGenerator;
    use subscription_core::types::parse_date;
    use subscription_core::{PlanFilter, PlanType, Platform, PlatformFilter};

    fn filters(start: &str, end: &str) -> Filters {
        Filters::between(parse_date(start).unwrap(), parse_date(end).unwrap())
    }

    #[test]
    fn test_full_range_all_returns_everything() {
        let records = SubscriptionGenerator::default().generate();
        let result = filter_records(&records, &filters("2024-01-01", "2025-02-03"));
        assert_eq!(result, records);
    }

    #[test]
    fn test_filter_is_sound_and_complete() {
        let records = SubscriptionGenerator::default().generate();
        let query = filters("2024-03-01", "2024-03-31")
            .with_platform(PlatformFilter::Ios)
            .with_plan_type(PlanFilter::Yearly);
        let result = filter_records(&records, &query);

        assert_eq!(result.len(), 31);
        for record in &result {
            assert_eq!(record.platform, Platform::Ios);
            assert_eq!(record.plan_type, PlanType::Yearly);
            assert!(record.date >= query.start_date && record.date <= query.end_date);
        }
        let expected = records.iter().filter(|r| query.matches(r)).count();
        assert_eq!(result.len(), expected);
    }

    #[test]
    fn test_preserves_source_order() {
        let records = SubscriptionGenerator::default().generate();
        let result = filter_records(
            &records,
            &filters("2024-05-01", "2024-05-03").with_plan_type(PlanFilter::Monthly),
        );
        assert_eq!(result.len(), 6);
        assert!(result.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(result[0].platform, Platform::Ios);
        assert_eq!(result[1].platform, Platform::Android);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let records = SubscriptionGenerator::default().generate();
        assert!(filter_records(&records, &filters("2024-06-10", "2024-06-01")).is_empty());
    }

    #[test]
    fn test_out_of_range_dates_are_empty() {
        let records = SubscriptionGenerator::default().generate();
        assert!(filter_records(&records, &filters("2023-01-01", "2023-12-31")).is_empty());
    }
}
