//! Moving plain numbers into the decimal domain.

use polymath_core::{Decimal, DecimalContext};
use tracing::debug;

/// Numbers with more significant digits than this cannot be converted to a
/// decimal without losing the guarantee that the digits are meaningful.
pub const MAX_PROMOTABLE_DIGITS: usize = 15;

/// Significant digits in the shortest round-trip form of `x`.
pub fn significant_digits(x: f64) -> usize {
    let repr = format!("{:e}", x.abs());
    let mantissa = repr.split('e').next().unwrap_or("");
    mantissa.bytes().filter(u8::is_ascii_digit).count()
}

/// Best-effort promotion of `x` into `ctx`.
///
/// `None` means the caller must fall back to plain-number arithmetic; it is
/// not an error.
pub fn try_promote(x: f64, ctx: DecimalContext) -> Option<Decimal> {
    if !x.is_finite() {
        debug!(value = x, "cannot promote non-finite number to decimal");
        return None;
    }
    let digits = significant_digits(x);
    if digits > MAX_PROMOTABLE_DIGITS {
        debug!(value = x, digits, "cannot promote number to decimal without loss");
        return None;
    }
    Decimal::from_f64(x, ctx)
}
