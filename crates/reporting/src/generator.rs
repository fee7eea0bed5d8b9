//! Deterministic synthetic subscription data.
//!
//! Draw order per (day, platform, plan), which must not change:
//! 1. active subscriptions: spike draws, then jitter
//! 2. new subscriptions: spike draws, then jitter
//! 3. churns: jitter
//! 4. trial starts: jitter
//! 5. trial conversion rate: jitter
//!
//! Days are the outer loop, then platforms, then plans.

use chrono::{Days, NaiveDate};
use std::f64::consts::PI;
use subscription_core::config::GeneratorConfig;
use subscription_core::{DailyMetrics, PlanType, Platform};
use tracing::warn;

use crate::random::SeededRandom;
use crate::round_half_up;

/// Base level and annual growth rate of one generated metric.
#[derive(Debug, Clone, Copy)]
struct MetricModel {
    base: f64,
    annual_growth: f64,
}

const ACTIVE_SUBSCRIPTIONS: MetricModel = MetricModel {
    base: 8000.0,
    annual_growth: 0.25,
};
const NEW_SUBSCRIPTIONS: MetricModel = MetricModel {
    base: 120.0,
    annual_growth: 0.20,
};
const CHURNS: MetricModel = MetricModel {
    base: 45.0,
    annual_growth: -0.10,
};
const TRIAL_STARTS: MetricModel = MetricModel {
    base: 80.0,
    annual_growth: 0.15,
};

const CAMPAIGN_PERIOD_DAYS: u32 = 45;
const CAMPAIGN_LENGTH_DAYS: u32 = 3;
const MAX_CONVERSION_RATE: f64 = 0.55;

/// Upper bound on the generation window, about a century of days.
pub const MAX_DAYS: u32 = 36_500;

pub fn platform_multiplier(platform: Platform) -> f64 {
    match platform {
        Platform::Ios => 1.4,
        Platform::Android => 1.0,
    }
}

pub fn plan_multiplier(plan: PlanType) -> f64 {
    match plan {
        PlanType::Monthly => 1.0,
        PlanType::Yearly => 0.35,
    }
}

/// Revenue one active subscription contributes per month.
pub fn monthly_price(platform: Platform, plan: PlanType) -> f64 {
    let (monthly, yearly) = match platform {
        Platform::Ios => (980.0, 9800.0),
        Platform::Android => (880.0, 8800.0),
    };
    match plan {
        PlanType::Monthly => monthly,
        PlanType::Yearly => yearly / 12.0,
    }
}

/// Compound growth plus yearly seasonality and a weekly cycle.
pub fn trend(day_index: u32, base: f64, annual_growth: f64) -> f64 {
    let day = day_index as f64;
    let growth = base * (1.0 + annual_growth / 365.0).powf(day);
    let seasonality = ((day / 365.0) * 2.0 * PI).sin() * base * 0.1;
    let weekly = ((day / 7.0) * 2.0 * PI).sin() * base * 0.05;
    growth + seasonality + weekly
}

/// Campaign spikes in the first days of every 45-day period, plus rare
/// smaller random spikes. The campaign draw is only taken inside a window.
fn apply_spikes(value: f64, rng: &mut SeededRandom, day_index: u32) -> f64 {
    if day_index % CAMPAIGN_PERIOD_DAYS < CAMPAIGN_LENGTH_DAYS && rng.next_f64() > 0.5 {
        return value * rng.scaled(1.3, 0.4);
    }
    if rng.next_f64() > 0.92 {
        return value * rng.scaled(1.15, 0.2);
    }
    value
}

fn to_count(value: f64) -> u64 {
    round_half_up(value).max(0.0) as u64
}

pub struct SubscriptionGenerator {
    config: GeneratorConfig,
}

impl SubscriptionGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Configured window length, capped at `MAX_DAYS`.
    pub fn days(&self) -> u32 {
        self.config.days.min(MAX_DAYS)
    }

    /// Produce one record per (day, platform, plan), day-major.
    pub fn generate(&self) -> Vec<DailyMetrics> {
        let days = self.days();
        if days < self.config.days {
            warn!(
                requested = self.config.days,
                days, "Generation window capped"
            );
        }

        let mut rng = SeededRandom::new(self.config.seed);
        let cohorts = Platform::ALL.len() * PlanType::ALL.len();
        let mut records = Vec::with_capacity(days as usize * cohorts);

        for day_index in 0..days {
            let Some(date) = self
                .config
                .start_date
                .checked_add_days(Days::new(day_index as u64))
            else {
                break;
            };
            for platform in Platform::ALL {
                for plan in PlanType::ALL {
                    records.push(self.generate_day(&mut rng, day_index, date, platform, plan));
                }
            }
        }

        records
    }

    fn generate_day(
        &self,
        rng: &mut SeededRandom,
        day_index: u32,
        date: NaiveDate,
        platform: Platform,
        plan: PlanType,
    ) -> DailyMetrics {
        let multiplier = platform_multiplier(platform) * plan_multiplier(plan);
        let scaled_trend =
            |model: MetricModel| trend(day_index, model.base * multiplier, model.annual_growth);

        let active = apply_spikes(scaled_trend(ACTIVE_SUBSCRIPTIONS), rng, day_index);
        let active_subscriptions = to_count(active * rng.scaled(0.95, 0.1));

        let new = apply_spikes(scaled_trend(NEW_SUBSCRIPTIONS), rng, day_index);
        let new_subscriptions = to_count(new * rng.scaled(0.8, 0.4));

        let churns = to_count(scaled_trend(CHURNS) * rng.scaled(0.7, 0.6));

        let mrr = to_count(active_subscriptions as f64 * monthly_price(platform, plan));

        let trial_starts = to_count(scaled_trend(TRIAL_STARTS) * rng.scaled(0.8, 0.4));

        // Conversion improves from 32% to 40% across the window before noise.
        let base_rate = 0.32 + (day_index as f64 / self.days() as f64) * 0.08;
        let rate = base_rate * rng.scaled(0.85, 0.3);
        let trial_conversions = to_count(trial_starts as f64 * rate.min(MAX_CONVERSION_RATE));

        DailyMetrics {
            date,
            active_subscriptions,
            new_subscriptions,
            churns,
            mrr,
            trial_conversions,
            trial_starts,
            platform,
            plan_type: plan,
        }
    }
}

impl Default for SubscriptionGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}
