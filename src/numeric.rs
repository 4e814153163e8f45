//! Small numeric helpers shared by the projection code.

/// Per-period multiplier for a percentage growth rate.
///
/// Clamped at zero: a decline of 100% or more wipes the value out instead of
/// flipping its sign.
#[must_use]
pub fn growth_factor(growth_rate_percent: f64) -> f64 {
    (1.0 + growth_rate_percent / 100.0).max(0.0)
}

/// `base * (1 + rate/100) ^ periods`.
#[must_use]
pub fn compound(base: f64, growth_rate_percent: f64, periods: u32) -> f64 {
    base * growth_factor(growth_rate_percent).powf(f64::from(periods))
}

/// `base * (1 + rate/100 * periods)`, clamped at zero.
#[must_use]
pub fn simple(base: f64, growth_rate_percent: f64, periods: u32) -> f64 {
    base * (1.0 + growth_rate_percent / 100.0 * f64::from(periods)).max(0.0)
}

/// Rounds to two decimal places (currency precision).
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
