/// Rounds to two decimals by formatting with two fixed decimals and parsing the
/// text back.
///
/// Rounding works on the exact binary value, so `1.005` (stored as
/// `1.00499999…`) becomes `1.0` while `2.345` (stored as `2.34500000…02`) becomes
/// `2.35`. Exact ties such as `0.125` round away from zero. Non-finite values pass
/// through unchanged.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // Exact ties at the third decimal are odd multiples of 1/8; `format!` would
    // round those half-to-even.
    let eighths = value.abs() * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        let hundredths = (value.abs() * 100.0 + 0.5).floor();
        return (hundredths / 100.0).copysign(value);
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Arithmetic mean, `None` for an empty input. `NaN` inputs give a `NaN` mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Largest value, `None` for an empty input. Unlike `f64::max`, a `NaN` anywhere
/// makes the result `NaN`.
pub fn max_value(values: &[f64]) -> Option<f64> {
    extreme(values, f64::max)
}

/// Smallest value, `None` for an empty input. A `NaN` anywhere makes the result `NaN`.
pub fn min_value(values: &[f64]) -> Option<f64> {
    extreme(values, f64::min)
}

fn extreme(values: &[f64], pick: fn(f64, f64) -> f64) -> Option<f64> {
    let (first, rest) = values.split_first()?;
    Some(rest.iter().fold(*first, |acc, &value| {
        if acc.is_nan() || value.is_nan() {
            f64::NAN
        } else {
            pick(acc, value)
        }
    }))
}
