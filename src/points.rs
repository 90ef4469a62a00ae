//! Reward point table and the lenient number handling used by the edit form.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::WasteType;

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float regex")
});

static INT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+").expect("valid int regex"));

/// Points for `quantity` kilograms of `waste_type`.
///
/// Unknown types, unparseable quantities and non-finite products all yield 0.
pub fn calculate_points(waste_type: &str, quantity: &str) -> f64 {
    let rate = match waste_type.parse::<WasteType>() {
        Ok(kind) => kind.points_per_kg(),
        Err(_) => return 0.0,
    };
    match parse_float(quantity) {
        Some(qty) => {
            let points = rate as f64 * qty;
            if points.is_finite() {
                points
            } else {
                0.0
            }
        }
        None => 0.0,
    }
}

/// Longest leading decimal number in `raw`, ignoring leading whitespace.
/// `"2.5kg"` parses as 2.5, `"kg"` does not parse.
pub fn parse_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let m = FLOAT_PREFIX.find(trimmed)?;
    m.as_str().parse::<f64>().ok()
}

/// Longest leading integer in `raw`, ignoring leading whitespace.
/// `"27.5"` parses as 27.
pub fn parse_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let m = INT_PREFIX.find(trimmed)?;
    m.as_str().parse::<i64>().ok()
}

/// Integral values print without a fractional part, everything else uses the
/// shortest round-trip representation.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// `value` with exactly `digits` decimals. Exact halves round away from zero,
/// so 0.125 renders as "0.13" where `{:.2}` would give "0.12".
pub fn format_fixed(value: f64, digits: usize) -> String {
    // A double lies exactly halfway between two `digits`-decimal numbers
    // only when `value * 2^(digits + 1)` is an odd integer.
    let scaled = value * 2f64.powi(digits as i32 + 1);
    if scaled.is_finite() && scaled.fract() == 0.0 && scaled.abs() < 2f64.powi(53) {
        let odd = scaled.abs() as u128;
        if odd % 2 == 1 {
            let rounded = 5u128
                .checked_pow(digits as u32)
                .and_then(|p| odd.checked_mul(p))
                .map(|n| (n + 1) / 2);
            if let Some(rounded) = rounded {
                let sign = if value < 0.0 { "-" } else { "" };
                let mut text = format!("{:0>width$}", rounded, width = digits + 1);
                if digits > 0 {
                    text.insert(text.len() - digits, '.');
                }
                return format!("{sign}{text}");
            }
        }
    }
    format!("{:.*}", digits, value)
}
