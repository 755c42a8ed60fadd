// src/services/depreciation.rs
use ndarray::Array1;
use serde::{Serialize, Deserialize};

use crate::models::{PriceComparison, Verdict};

pub const DEFAULT_REFERENCE_PRICE: f64 = 25_000.0;
pub const DEFAULT_REFERENCE_MILES: u64 = 140_000;
/// Sample count of the plotted depreciation curve.
pub const CURVE_SAMPLES: usize = 50;

/// Mileage values the linear depreciation formula can be evaluated over.
///
/// Scalars yield a scalar, sequences yield a sequence of the same length in the
/// same order, so callers never have to iterate themselves.
pub trait Depreciable {
    type Output;

    fn depreciate(self, reference_price: f64, reference_miles: f64) -> Self::Output;
}

impl Depreciable for f64 {
    type Output = f64;

    fn depreciate(self, reference_price: f64, reference_miles: f64) -> f64 {
        (reference_miles - self) * reference_price / reference_miles
    }
}

impl Depreciable for u64 {
    type Output = f64;

    fn depreciate(self, reference_price: f64, reference_miles: f64) -> f64 {
        (self as f64).depreciate(reference_price, reference_miles)
    }
}

impl<'a> Depreciable for &'a [f64] {
    type Output = Vec<f64>;

    fn depreciate(self, reference_price: f64, reference_miles: f64) -> Vec<f64> {
        self.iter()
            .map(|&m| m.depreciate(reference_price, reference_miles))
            .collect()
    }
}

impl Depreciable for Vec<f64> {
    type Output = Vec<f64>;

    fn depreciate(self, reference_price: f64, reference_miles: f64) -> Vec<f64> {
        self.as_slice().depreciate(reference_price, reference_miles)
    }
}

impl<'a> Depreciable for &'a Array1<f64> {
    type Output = Array1<f64>;

    fn depreciate(self, reference_price: f64, reference_miles: f64) -> Array1<f64> {
        (reference_miles - self) * reference_price / reference_miles
    }
}

impl Depreciable for Array1<f64> {
    type Output = Array1<f64>;

    fn depreciate(self, reference_price: f64, reference_miles: f64) -> Array1<f64> {
        (reference_miles - self) * reference_price / reference_miles
    }
}

/// Expected price of a vehicle (or vehicles) at `miles`, falling linearly from
/// `reference_price` when new to zero at `reference_miles`.
///
/// Mileage outside `[0, reference_miles]` extrapolates without clamping.
pub fn expected_price<M: Depreciable>(reference_price: f64, miles: M, reference_miles: u64) -> M::Output {
    miles.depreciate(reference_price, reference_miles as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepreciationModel {
    pub reference_price: f64,
    pub reference_miles: u64,
}

impl Default for DepreciationModel {
    fn default() -> Self {
        Self {
            reference_price: DEFAULT_REFERENCE_PRICE,
            reference_miles: DEFAULT_REFERENCE_MILES,
        }
    }
}

impl DepreciationModel {
    pub fn new(reference_price: f64, reference_miles: u64) -> Self {
        Self { reference_price, reference_miles }
    }

    pub fn expected_price<M: Depreciable>(&self, miles: M) -> M::Output {
        expected_price(self.reference_price, miles, self.reference_miles)
    }

    /// Evenly spaced `(miles, price)` samples over `[0, reference_miles]`.
    pub fn curve(&self, samples: usize) -> (Array1<f64>, Array1<f64>) {
        let miles = Array1::linspace(0.0, self.reference_miles as f64, samples);
        let prices = self.expected_price(&miles);
        (miles, prices)
    }

    /// Compare a listing against the fair price at its mileage. A listing asking
    /// exactly the fair price counts as saved.
    pub fn compare(&self, actual_miles: u64, actual_price: f64) -> PriceComparison {
        let fair_price = self.expected_price(actual_miles);

        let verdict = if actual_price > fair_price {
            Verdict::Overpriced { added: (actual_price - fair_price).trunc() as i64 }
        } else {
            Verdict::Saved { saved: (fair_price - actual_price).trunc() as i64 }
        };

        PriceComparison {
            actual_miles,
            actual_price,
            fair_price,
            verdict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_default_model_endpoints() {
        let model = DepreciationModel::default();
        assert!(approx_eq(model.expected_price(0u64), 25_000.0));
        assert_eq!(model.expected_price(140_000u64), 0.0);
        assert!(approx_eq(model.expected_price(70_000u64), 12_500.0));
    }

    #[test]
    fn test_extrapolates_outside_reference_range() {
        let model = DepreciationModel::default();
        assert!(approx_eq(model.expected_price(280_000u64), -25_000.0));
        assert!(approx_eq(model.expected_price(-140_000.0), 50_000.0));
    }

    #[test]
    fn test_array_input_matches_shape() {
        let miles = Array1::from(vec![0.0, 35_000.0, 140_000.0, 210_000.0]);
        let prices = expected_price(25_000.0, &miles, 140_000);
        assert_eq!(prices.len(), 4);
        assert!(approx_eq(prices[1], 18_750.0));
        assert!(approx_eq(prices[3], -12_500.0));
    }

    #[test]
    fn test_empty_sequence() {
        let miles: Vec<f64> = Vec::new();
        assert!(expected_price(25_000.0, miles, 140_000).is_empty());
    }

    #[test]
    fn test_curve_spans_reference_range() {
        let model = DepreciationModel::new(30_000.0, 150_000);
        let (miles, prices) = model.curve(CURVE_SAMPLES);
        assert_eq!(miles.len(), CURVE_SAMPLES);
        assert_eq!(prices.len(), CURVE_SAMPLES);
        assert_eq!(miles[0], 0.0);
        assert!(approx_eq(miles[CURVE_SAMPLES - 1], 150_000.0));
        assert!(approx_eq(prices[0], 30_000.0));
        assert!(prices[CURVE_SAMPLES - 1].abs() < 1e-6);
    }

    #[test]
    fn test_compare_overpriced() {
        let model = DepreciationModel::default();
        // fair price at 70,000 miles is 12,500
        let comparison = model.compare(70_000, 13_750.9);
        assert_eq!(comparison.verdict, Verdict::Overpriced { added: 1_250 });
        assert_eq!(comparison.difference_label(), "$1250 added");
    }

    #[test]
    fn test_compare_saved() {
        let model = DepreciationModel::default();
        let comparison = model.compare(70_000, 11_000.5);
        assert_eq!(comparison.verdict, Verdict::Saved { saved: 1_499 });
        assert_eq!(comparison.difference_label(), "$1499 saved");
    }

    #[test]
    fn test_compare_equal_price_is_saved() {
        let model = DepreciationModel::new(20_000.0, 100_000);
        let comparison = model.compare(50_000, 10_000.0);
        assert_eq!(comparison.fair_price, 10_000.0);
        assert_eq!(comparison.verdict, Verdict::Saved { saved: 0 });
    }

    #[test]
    fn test_compare_past_reference_mileage() {
        let model = DepreciationModel::default();
        let comparison = model.compare(168_000, 2_000.0);
        assert!(approx_eq(comparison.fair_price, -5_000.0));
        assert_eq!(comparison.verdict, Verdict::Overpriced { added: 7_000 });
    }

    proptest! {
        #[test]
        fn prop_endpoints(reference_price in 1.0f64..1_000_000.0, reference_miles in 1u64..2_000_000) {
            let at_zero = expected_price(reference_price, 0u64, reference_miles);
            let at_reference = expected_price(reference_price, reference_miles, reference_miles);
            prop_assert!(approx_eq(at_zero, reference_price));
            prop_assert_eq!(at_reference, 0.0);
        }

        #[test]
        fn prop_non_increasing(
            reference_price in 1.0f64..1_000_000.0,
            reference_miles in 1u64..2_000_000,
            a in 0.0f64..1.0,
            b in 0.0f64..1.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo_miles = lo * reference_miles as f64;
            let hi_miles = hi * reference_miles as f64;
            prop_assert!(
                expected_price(reference_price, lo_miles, reference_miles)
                    >= expected_price(reference_price, hi_miles, reference_miles)
            );
        }

        #[test]
        fn prop_vector_matches_scalar(
            reference_price in 1.0f64..1_000_000.0,
            reference_miles in 1u64..2_000_000,
            miles in proptest::collection::vec(-500_000.0f64..3_000_000.0, 0..64),
        ) {
            let array = Array1::from(miles.clone());
            let from_array = expected_price(reference_price, &array, reference_miles);
            let from_slice = expected_price(reference_price, miles.as_slice(), reference_miles);
            for (i, &m) in miles.iter().enumerate() {
                let scalar = expected_price(reference_price, m, reference_miles);
                prop_assert_eq!(from_array[i], scalar);
                prop_assert_eq!(from_slice[i], scalar);
            }
        }
    }
}
