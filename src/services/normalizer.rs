// src/services/normalizer.rs
use log::info;

/// Listings in this category never ask more than this; anything above is a
/// price that was emitted in cents.
pub const CENTS_PRICE_THRESHOLD: f64 = 100_000.0;
pub const CENTS_SCALE: f64 = 100.0;

/// Mileage below this, on a vehicle priced below `THOUSANDS_PRICE_THRESHOLD`,
/// was recorded in thousands of miles.
pub const THOUSANDS_MILES_THRESHOLD: u64 = 1_000;
pub const THOUSANDS_PRICE_THRESHOLD: f64 = 10_000.0;
pub const THOUSANDS_SCALE: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizerThresholds {
    pub cents_price: f64,
    pub thousands_miles: u64,
    pub thousands_price: f64,
}

impl Default for NormalizerThresholds {
    fn default() -> Self {
        Self {
            cents_price: CENTS_PRICE_THRESHOLD,
            thousands_miles: THOUSANDS_MILES_THRESHOLD,
            thousands_price: THOUSANDS_PRICE_THRESHOLD,
        }
    }
}

/// Correct the cents and thousands-of-miles artifacts using the default thresholds.
pub fn normalize(raw_miles: u64, raw_price: f64) -> (u64, f64) {
    normalize_with(&NormalizerThresholds::default(), raw_miles, raw_price)
}

/// The price correction runs first; the mileage check reads the corrected price.
pub fn normalize_with(thresholds: &NormalizerThresholds, raw_miles: u64, raw_price: f64) -> (u64, f64) {
    let mut miles = raw_miles;
    let mut price = raw_price;

    if price > thresholds.cents_price {
        price /= CENTS_SCALE;
        info!("Price {} looks like cents, corrected to {}", raw_price, price);
    }

    if miles < thresholds.thousands_miles && price < thresholds.thousands_price {
        miles = miles.saturating_mul(THOUSANDS_SCALE);
        info!("Mileage {} looks like thousands, corrected to {}", raw_miles, miles);
    }

    (miles, price)
}
