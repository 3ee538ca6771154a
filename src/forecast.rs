//! Replenishment forecasting primitives.
//!
//! Everything in this module is a pure function over already-fetched data:
//! the reference date is a parameter, there is no I/O, and identical inputs
//! always produce identical outputs. Callers (see `services::forecasting`)
//! are responsible for loading usage history through a repository and for
//! deciding the window size.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default trailing window for usage averaging, in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// The subset of an inventory item the forecasting math needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemProfile {
    pub on_hand: i32,
    pub safety_stock: i32,
    /// Explicit reorder point. When set it always wins over the computed one.
    pub reorder_point: Option<i32>,
    pub max_level: Option<i32>,
    pub lead_time_days: i32,
}

/// One day's consumption for a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsagePoint {
    pub date: NaiveDate,
    pub qty: i64,
}

/// Computed forecast for a single item. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastFigures {
    pub avg_daily_usage: f64,
    /// `None` means no depletion expected (zero usage rate).
    pub days_to_depletion: Option<i64>,
    pub reorder_point: i32,
    pub suggested_order: i32,
}

/// Mean daily consumption over the trailing `window_days` ending at `today`.
///
/// The denominator is the number of calendar days in the window, so days with
/// no recorded usage pull the average down. Returns 0.0 for an empty window
/// or a zero-length one.
pub fn average_daily_usage(points: &[UsagePoint], today: NaiveDate, window_days: u32) -> f64 {
    if window_days == 0 {
        return 0.0;
    }
    let since = today - Duration::days(window_days as i64);
    let total: i64 = points
        .iter()
        .filter(|p| p.date >= since)
        .map(|p| p.qty.max(0))
        .sum();
    total as f64 / window_days as f64
}

/// Reorder point: the explicit override when present, otherwise
/// `ceil(avg_daily_usage * lead_time_days + safety_stock)`.
pub fn reorder_point(profile: &ItemProfile, avg_daily_usage: f64) -> i32 {
    if let Some(explicit) = profile.reorder_point {
        return explicit.max(0);
    }
    let lead = profile.lead_time_days.max(0) as f64;
    let safety = profile.safety_stock.max(0) as f64;
    (avg_daily_usage.max(0.0) * lead + safety).ceil() as i32
}

/// Days until the on-hand balance reaches zero at the current usage rate.
///
/// A non-positive rate yields `None`: the item is not being consumed and no
/// depletion is expected. The division is guarded, so this never produces
/// NaN or infinity.
pub fn days_to_depletion(on_hand: i32, avg_daily_usage: f64) -> Option<i64> {
    if avg_daily_usage <= 0.0 {
        return None;
    }
    Some((on_hand.max(0) as f64 / avg_daily_usage).ceil() as i64)
}

/// Suggested replenishment quantity.
///
/// Zero while on-hand stock sits above the reorder point. Below it, the
/// suggestion fills back up to the item's max level, or to
/// `reorder_point + safety_stock` when no max level is configured.
pub fn suggested_order(profile: &ItemProfile, reorder_point: i32) -> i32 {
    if profile.on_hand > reorder_point {
        return 0;
    }
    let target = profile
        .max_level
        .unwrap_or(reorder_point + profile.safety_stock.max(0));
    (target - profile.on_hand).max(0)
}

/// Full per-item forecast from a usage history snapshot.
pub fn forecast(
    profile: &ItemProfile,
    points: &[UsagePoint],
    today: NaiveDate,
    window_days: u32,
) -> ForecastFigures {
    let avg = average_daily_usage(points, today, window_days);
    let rop = reorder_point(profile, avg);
    ForecastFigures {
        avg_daily_usage: round2(avg),
        days_to_depletion: days_to_depletion(profile.on_hand, avg),
        reorder_point: rop,
        suggested_order: suggested_order(profile, rop),
    }
}

/// Ordinary least-squares slope of `values` against their index,
/// rounded to two decimals. Fewer than two points is a flat trend.
///
/// Positive means rising consumption, negative means decline.
pub fn trend_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let n_f = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    for (i, y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }
    // Indices are distinct, so the denominator is nonzero for n >= 2.
    let slope = (n_f * sum_xy - sum_x * sum_y) / (n_f * sum_x2 - sum_x * sum_x);
    round2(slope)
}

/// Low-stock check applied after every deduction: at or below the reorder
/// point, or projected to deplete within the replenishment lead time
/// (floored at one day). Fires per qualifying event, without deduplication.
pub fn breaches_low_stock(profile: &ItemProfile, figures: &ForecastFigures) -> bool {
    if profile.on_hand <= figures.reorder_point {
        return true;
    }
    match figures.days_to_depletion {
        Some(days) => days <= (profile.lead_time_days.max(1)) as i64,
        None => false,
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
