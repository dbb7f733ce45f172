//! Reward-points scoring.
//!
//! Scoring is a pure function of the receipt. Malformed numeric fields never
//! fail the computation: each rule that needs a value it cannot parse simply
//! contributes nothing. The one exception is the total, which short-circuits
//! everything after the retailer rule.
//!
//! The total is read as an `f64`, so any number a double can hold counts as
//! parsable and the quarter check is a floating-point remainder. Item prices
//! use exact decimal arithmetic when they fit in a `Decimal`.

use super::receipt::Receipt;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

const ROUND_DOLLAR_POINTS: i64 = 50;
const QUARTER_MULTIPLE_POINTS: i64 = 25;
const ITEM_PAIR_POINTS: i64 = 5;
const ODD_DAY_POINTS: i64 = 6;
const AFTERNOON_POINTS: i64 = 10;

/// Purchases from 14:00 up to but excluding 16:00.
const AFTERNOON_HOURS: std::ops::Range<i64> = 14..16;

/// Computes the points earned by a receipt.
pub fn score(receipt: &Receipt) -> i64 {
    let mut points = retailer_points(&receipt.retailer);

    let Ok(total) = receipt.total.parse::<f64>() else {
        return points;
    };

    points += round_dollar_points(total);
    points += quarter_multiple_points(total);
    points += item_pair_points(receipt.items.len());
    points += receipt
        .items
        .iter()
        .map(|item| description_points(&item.short_description, &item.price))
        .sum::<i64>();
    points += odd_day_points(&receipt.purchase_date);
    points += afternoon_points(&receipt.purchase_time);

    points
}

/// One point per ASCII letter or digit.
fn retailer_points(retailer: &str) -> i64 {
    retailer.chars().filter(char::is_ascii_alphanumeric).count() as i64
}

fn round_dollar_points(total: f64) -> i64 {
    if total == total.trunc() {
        ROUND_DOLLAR_POINTS
    } else {
        0
    }
}

fn quarter_multiple_points(total: f64) -> i64 {
    if total % 0.25 == 0.0 {
        QUARTER_MULTIPLE_POINTS
    } else {
        0
    }
}

fn item_pair_points(item_count: usize) -> i64 {
    (item_count / 2) as i64 * ITEM_PAIR_POINTS
}

/// `ceil(price * 0.2)` when the trimmed description length is a non-zero
/// multiple of three. Length is measured in bytes.
fn description_points(description: &str, price: &str) -> i64 {
    let len = description.trim().len();
    if len == 0 || len % 3 != 0 {
        return 0;
    }

    match parse_amount(price) {
        Some(price) => price
            .checked_mul(Decimal::new(2, 1))
            .and_then(|bonus| bonus.ceil().to_i64())
            .unwrap_or(0),
        // Out of Decimal range, but possibly still a number
        None => match price.parse::<f64>() {
            Ok(price) if (price * 0.2).is_finite() => (price * 0.2).ceil() as i64,
            _ => 0,
        },
    }
}

/// Day is the third `-`-separated segment of the date.
fn odd_day_points(purchase_date: &str) -> i64 {
    match purchase_date
        .split('-')
        .nth(2)
        .and_then(|day| day.parse::<i64>().ok())
    {
        Some(day) if day % 2 != 0 => ODD_DAY_POINTS,
        _ => 0,
    }
}

/// Hour is everything before the first `:`.
fn afternoon_points(purchase_time: &str) -> i64 {
    match purchase_time
        .split(':')
        .next()
        .and_then(|hour| hour.parse::<i64>().ok())
    {
        Some(hour) if AFTERNOON_HOURS.contains(&hour) => AFTERNOON_POINTS,
        _ => 0,
    }
}

/// Parses a decimal amount, accepting plain (`"35.35"`) and scientific
/// (`"3.535e1"`) notation.
fn parse_amount(value: &str) -> Option<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}
