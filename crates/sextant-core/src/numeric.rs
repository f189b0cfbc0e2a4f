// File: crates/sextant-core/src/numeric.rs
// Summary: Rounding, order-of-magnitude, small-integer factorization and length projection helpers.

use serde::Deserialize;

/// Default number of decimal digits kept when snapping computed tick values.
pub const DEFAULT_PRECISION: u32 = 8;

/// Numeric settings threaded through bounds computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumericConfig {
    /// Decimal digits kept by [`NumericConfig::round`].
    pub precision: u32,
}

impl Default for NumericConfig {
    fn default() -> Self {
        Self { precision: DEFAULT_PRECISION }
    }
}

impl NumericConfig {
    pub const fn with_precision(precision: u32) -> Self {
        Self { precision }
    }

    /// Round `value` to this config's precision.
    #[inline]
    pub fn round(&self, value: f64) -> f64 {
        round_with_precision(value, self.precision)
    }

    /// Precision that still separates multiples of `step`: at least the configured
    /// digits, more when the step itself is finer than that.
    pub fn digits_for_step(&self, step: f64) -> u32 {
        let needed = 2 - order_of_magnitude(step).min(0);
        self.precision.max(needed.max(0) as u32)
    }
}

/// Round to `digits` decimal places. Values too large to scale are returned as-is.
pub fn round_with_precision(value: f64, digits: u32) -> f64 {
    let precision = 10f64.powi(digits.min(300) as i32);
    let scaled = (value * precision).round() / precision;
    if scaled.is_finite() {
        // collapse -0.0 so labels never read "-0"
        scaled + 0.0
    } else {
        value
    }
}

/// `floor(log10(|value|))`; zero and non-finite values map to 0.
pub fn order_of_magnitude(value: f64) -> i32 {
    let abs = value.abs();
    if abs == 0.0 || !abs.is_finite() {
        return 0;
    }
    abs.log10().floor() as i32
}

/// Pixel length of `length` value units on an axis of `axis_length` pixels spanning `range`.
#[inline]
pub fn project_length(axis_length: f64, length: f64, range: f64) -> f64 {
    if range == 0.0 {
        return 0.0;
    }
    length / range * axis_length
}

/// Pollard's rho: a factor of `num`, 2 for even numbers and `num` itself for primes
/// (or when the cycle finds no smaller divisor).
pub fn rho(num: u64) -> u64 {
    if num <= 3 {
        return num.max(1);
    }
    if num % 2 == 0 {
        return 2;
    }

    fn gcd(p: u64, q: u64) -> u64 {
        if q == 0 { p } else { gcd(q, p % q) }
    }
    let f = |x: u64| ((x as u128 * x as u128 + 1) % num as u128) as u64;

    let mut x1 = 2u64;
    let mut x2 = 2u64;
    loop {
        x1 = f(x1);
        x2 = f(f(x2));
        let divisor = gcd(x1.abs_diff(x2), num);
        if divisor != 1 {
            return divisor;
        }
    }
}

/// True when `value` is a usable number (finite, not NaN).
#[inline]
pub fn is_numeric(value: f64) -> bool {
    value.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_requested_digits() {
        assert_eq!(round_with_precision(1.23456789, 3), 1.235);
        assert_eq!(round_with_precision(0.1 + 0.2, 8), 0.3);
        assert_eq!(round_with_precision(-0.000_000_001, 3).to_string(), "0");
    }

    #[test]
    fn magnitude_of_small_and_large_values() {
        assert_eq!(order_of_magnitude(0.7), -1);
        assert_eq!(order_of_magnitude(7.0), 0);
        assert_eq!(order_of_magnitude(-250.0), 2);
        assert_eq!(order_of_magnitude(0.0), 0);
    }

    #[test]
    fn rho_finds_factors() {
        assert_eq!(rho(10), 2);
        assert_eq!(rho(9), 3);
        assert_eq!(rho(7), 7);
        assert_eq!(rho(1), 1);
        let f = rho(91);
        assert!(f == 7 || f == 13);
    }

    #[test]
    fn step_digits_grow_for_tiny_steps() {
        let cfg = NumericConfig::default();
        assert_eq!(cfg.digits_for_step(0.5), 8);
        assert_eq!(cfg.digits_for_step(1e-9), 11);
    }

    #[test]
    fn projects_lengths() {
        assert_eq!(project_length(200.0, 2.0, 8.0), 50.0);
        assert_eq!(project_length(200.0, 2.0, 0.0), 0.0);
    }
}
