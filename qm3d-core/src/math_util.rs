/// Stateless numeric helpers shared by the other modules
use crate::error::{MathError, Result};

/// Round `value` to `digits` significant figures (not decimal places).
///
/// `round_to_significant_digits(3.452, 2)` is `3.5` where rounding to two
/// places would give `3.45`; `round_to_significant_digits(0.034, 2)` keeps
/// `0.034`. Zero is returned unchanged whatever the digit count. Digit
/// counts outside `1..=10` are rejected.
pub fn round_to_significant_digits(value: f64, digits: i32) -> Result<f64> {
    if value == 0.0 {
        return Ok(value);
    }
    if digits <= 0 || digits > 10 {
        return Err(MathError::InvalidArgument(format!(
            "unsupported number of significant digits: {}",
            digits
        )));
    }

    if !value.is_finite() {
        return Err(MathError::InvalidArgument(format!(
            "cannot round non-finite value {}",
            value
        )));
    }

    let magnitude = value.abs();
    let mut power = magnitude.log10().floor() as i32;
    if power_of_ten(power)? > magnitude {
        power -= 1;
    } else if power_of_ten(power + 1)? <= magnitude {
        power += 1;
    }
    let exponent = power - digits + 1;

    // Scale so the kept digits sit left of the decimal point. Powers up to
    // 1e22 are exact doubles; beyond that the shift is split in two so
    // neither factor overflows or underflows.
    let shift = -exponent;
    let scaled = if shift.abs() <= MAX_EXACT_POWER {
        if shift >= 0 {
            magnitude * power_of_ten(shift)?
        } else {
            magnitude / power_of_ten(-shift)?
        }
    } else {
        let half = shift / 2;
        magnitude * power_of_ten(half)? * power_of_ten(shift - half)?
    };
    let mantissa = scaled.round() as u64;

    // Parsing the decimal form gives the double nearest to mantissa * 10^exponent.
    let rounded = power_of_ten_scaled(mantissa, exponent)?;
    if !rounded.is_finite() {
        return Err(MathError::InvalidArgument(format!(
            "{} rounded to {} significant digits is out of range",
            value, digits
        )));
    }
    Ok(if value < 0.0 { -rounded } else { rounded })
}

/// Largest `n` for which `10^n` is exactly representable as an `f64`
const MAX_EXACT_POWER: i32 = 22;

fn power_of_ten(n: i32) -> Result<f64> {
    power_of_ten_scaled(1, n)
}

fn power_of_ten_scaled(mantissa: u64, exponent: i32) -> Result<f64> {
    format!("{}e{}", mantissa, exponent)
        .parse::<f64>()
        .map_err(|e| MathError::InvalidArgument(format!("{}e{}: {}", mantissa, exponent, e)))
}

/// Scientific notation with six fractional digits and a signed, two-digit
/// exponent, as STL writers print it: `-5.000000e-01`.
pub(crate) fn format_scientific(value: f64) -> String {
    let text = format!("{:.6e}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exponent) => {
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exponent.abs())
            }
            Err(_) => text,
        },
        None => text,
    }
}

/// Round `value` to a number of decimal places, half away from zero.
/// Negative `places` round to tens, hundreds, ...
pub fn round_to_places(value: f64, places: i32) -> f64 {
    if places >= 0 {
        let scale = 10f64.powi(places);
        (value * scale).round() / scale
    } else {
        let factor = 10f64.powi(-places);
        (value / factor).round() * factor
    }
}

/// Convert an angle in degrees to radians
pub fn degrees_to_radians(angle: f64) -> f64 {
    angle * std::f64::consts::PI / 180.0
}

/// `(sin, cos)` of an angle given in degrees
pub fn sin_cos_of_degrees(angle: f64) -> (f64, f64) {
    degrees_to_radians(angle).sin_cos()
}
