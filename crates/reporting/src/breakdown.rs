//! Categorical splits of active subscriptions for pie charts.
//!
//! Both breakdowns read the latest date present in the input. Only the
//! platform split falls back to the period total when a latest-day value is
//! zero; the plan split has no fallback.

use subscription_core::{BreakdownEntry, DailyMetrics, PlanType, Platform};

const IOS_COLOR: &str = "#007aff";
const ANDROID_COLOR: &str = "#3ddc84";
const MONTHLY_COLOR: &str = "#6366f1";
const YEARLY_COLOR: &str = "#8b5cf6";

fn latest_records(records: &[DailyMetrics]) -> impl Iterator<Item = &DailyMetrics> {
    let latest = records.iter().map(|r| r.date).max();
    records.iter().filter(move |r| Some(r.date) == latest)
}

fn active_sum<'a>(records: impl Iterator<Item = &'a DailyMetrics>) -> u64 {
    records.map(|r| r.active_subscriptions).sum()
}

pub fn platform_label(platform: Platform) -> &'static str {
    match platform {
        Platform::Ios => "iOS",
        Platform::Android => "Android",
    }
}

pub fn plan_label(plan: PlanType) -> &'static str {
    match plan {
        PlanType::Monthly => "Monthly plan",
        PlanType::Yearly => "Yearly plan",
    }
}

/// Active subscriptions per platform on the latest date, falling back per
/// platform to the whole-period sum when the latest-day value is zero.
pub fn platform_breakdown(records: &[DailyMetrics]) -> [BreakdownEntry; 2] {
    let value = |platform: Platform| {
        let latest = active_sum(latest_records(records).filter(|r| r.platform == platform));
        if latest > 0 {
            latest
        } else {
            active_sum(records.iter().filter(|r| r.platform == platform))
        }
    };

    [
        BreakdownEntry::new(platform_label(Platform::Ios), value(Platform::Ios), IOS_COLOR),
        BreakdownEntry::new(
            platform_label(Platform::Android),
            value(Platform::Android),
            ANDROID_COLOR,
        ),
    ]
}

/// Active subscriptions per plan on the latest date.
pub fn plan_breakdown(records: &[DailyMetrics]) -> [BreakdownEntry; 2] {
    let value = |plan: PlanType| active_sum(latest_records(records).filter(|r| r.plan_type == plan));

    [
        BreakdownEntry::new(
            plan_label(PlanType::Monthly),
            value(PlanType::Monthly),
            MONTHLY_COLOR,
        ),
        BreakdownEntry::new(
            plan_label(PlanType::Yearly),
            value(PlanType::Yearly),
            YEARLY_COLOR,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use subscription_core::types::parse_date;

    fn record(date: &str, platform: Platform, plan_type: PlanType, active: u64) -> DailyMetrics {
        DailyMetrics {
            date: parse_date(date).unwrap(),
            active_subscriptions: active,
            new_subscriptions: 0,
            churns: 0,
            mrr: 0,
            trial_conversions: 0,
            trial_starts: 0,
            platform,
            plan_type,
        }
    }

    fn sample() -> Vec<DailyMetrics> {
        vec![
            record("2024-01-01", Platform::Ios, PlanType::Monthly, 10),
            record("2024-01-01", Platform::Android, PlanType::Yearly, 20),
            record("2024-01-02", Platform::Ios, PlanType::Monthly, 100),
            record("2024-01-02", Platform::Ios, PlanType::Yearly, 50),
            record("2024-01-02", Platform::Android, PlanType::Monthly, 70),
            record("2024-01-02", Platform::Android, PlanType::Yearly, 30),
        ]
    }

    #[test]
    fn test_platform_breakdown_uses_latest_day() {
        let [ios, android] = platform_breakdown(&sample());
        assert_eq!(ios.name, "iOS");
        assert_eq!(ios.value, 150);
        assert_eq!(ios.color, IOS_COLOR);
        assert_eq!(android.name, "Android");
        assert_eq!(android.value, 100);
    }

    #[test]
    fn test_plan_breakdown_uses_latest_day() {
        let [monthly, yearly] = plan_breakdown(&sample());
        assert_eq!(monthly.value, 170);
        assert_eq!(yearly.value, 80);
        assert_eq!(monthly.color, MONTHLY_COLOR);
        assert_eq!(yearly.color, YEARLY_COLOR);
    }

    #[test]
    fn test_latest_date_is_maximum_not_last_position() {
        let mut records = sample();
        records.reverse();
        let [ios, android] = platform_breakdown(&records);
        assert_eq!(ios.value + android.value, 250);
    }

    #[test]
    fn test_platform_falls_back_to_period_total() {
        // Android has no records on the latest day.
        let records = vec![
            record("2024-01-01", Platform::Android, PlanType::Monthly, 40),
            record("2024-01-01", Platform::Android, PlanType::Yearly, 5),
            record("2024-01-02", Platform::Ios, PlanType::Monthly, 90),
        ];
        let [ios, android] = platform_breakdown(&records);
        assert_eq!(ios.value, 90);
        assert_eq!(android.value, 45);
    }

    #[test]
    fn test_plan_breakdown_has_no_fallback() {
        // Kept asymmetric with the platform split: a plan missing on the
        // latest day reports zero even though earlier days have data.
        let records = vec![
            record("2024-01-01", Platform::Android, PlanType::Yearly, 40),
            record("2024-01-02", Platform::Ios, PlanType::Monthly, 90),
        ];
        let [monthly, yearly] = plan_breakdown(&records);
        assert_eq!(monthly.value, 90);
        assert_eq!(yearly.value, 0);
    }

    #[test]
    fn test_empty_input_keeps_two_entries() {
        let platforms = platform_breakdown(&[]);
        let plans = plan_breakdown(&[]);
        assert!(platforms.iter().all(|e| e.value == 0));
        assert!(plans.iter().all(|e| e.value == 0));
        assert_eq!(platforms[1].name, "Android");
        assert_eq!(plans[0].name, "Monthly plan");
    }
}
