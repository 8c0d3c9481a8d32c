//! Arbitrary-precision decimal numbers.
//!
//! A [`Decimal`] is `coeff * 10^exp` with the coefficient rounded (half away
//! from zero) to the number of significant digits of its [`DecimalContext`].
//! Values are kept normalized: no trailing zeros in the coefficient and zero
//! is always `0e0`, so structural equality is numeric equality.

use crate::error::{MathError, Result};
use num_bigint::{BigInt, Sign};
use num_traits::{Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Precision context shared by every decimal constructed under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecimalContext {
    /// Significant decimal digits kept after every operation.
    pub precision: u32,
}

impl DecimalContext {
    pub const DEFAULT_PRECISION: u32 = 64;

    pub fn new(precision: u32) -> Self {
        Self { precision: precision.max(1) }
    }

    pub fn zero(&self) -> Decimal {
        Decimal::zero(*self)
    }

    pub fn one(&self) -> Decimal {
        Decimal::from_i64(1, *self)
    }
}

impl Default for DecimalContext {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PRECISION)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "DecimalRepr", try_from = "DecimalRepr")]
pub struct Decimal {
    coeff: BigInt,
    exp: i64,
    ctx: DecimalContext,
}

#[derive(Serialize, Deserialize)]
struct DecimalRepr {
    value: String,
    precision: u32,
}

impl From<Decimal> for DecimalRepr {
    fn from(d: Decimal) -> Self {
        DecimalRepr { value: d.to_string(), precision: d.ctx.precision }
    }
}

impl TryFrom<DecimalRepr> for Decimal {
    type Error = MathError;

    fn try_from(repr: DecimalRepr) -> Result<Self> {
        Decimal::parse(&repr.value, DecimalContext::new(repr.precision))
    }
}

// Guard digits carried by the fixed-point exponential.
const EXP_GUARD_DIGITS: u32 = 40;
// Beyond this magnitude the result exponent no longer fits comfortably in i64.
const EXP_ARGUMENT_LIMIT: f64 = 1e15;
// Largest accepted exponent magnitude. Leaves headroom so that exponent
// arithmetic in rounding and addition cannot overflow.
const EXPONENT_LIMIT: i64 = i64::MAX / 4;

fn pow10(n: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u8), n as usize)
}

fn digit_count(n: &BigInt) -> u32 {
    if n.is_zero() {
        1
    } else {
        n.magnitude().to_string().len() as u32
    }
}

impl Decimal {
    fn normalized(coeff: BigInt, exp: i64, ctx: DecimalContext) -> Self {
        let mut d = Decimal { coeff, exp, ctx };
        d.round_to_context();
        d
    }

    fn round_to_context(&mut self) {
        let digits = digit_count(&self.coeff);
        if digits > self.ctx.precision {
            let drop = digits - self.ctx.precision;
            let divisor = pow10(drop);
            let sign = self.coeff.sign();
            let mag = BigInt::from(self.coeff.magnitude().clone());
            let mut q = &mag / &divisor;
            let r = &mag % &divisor;
            if r * BigInt::from(2u8) >= divisor {
                q += 1u32;
            }
            self.coeff = if sign == Sign::Minus { -q } else { q };
            self.exp = self.exp.saturating_add(i64::from(drop));
        }
        if self.coeff.is_zero() {
            self.exp = 0;
            return;
        }
        let ten = BigInt::from(10u8);
        while (&self.coeff % &ten).is_zero() {
            self.coeff /= &ten;
            self.exp = self.exp.saturating_add(1);
        }
    }

    pub fn zero(ctx: DecimalContext) -> Self {
        Decimal { coeff: BigInt::zero(), exp: 0, ctx }
    }

    pub fn from_i64(n: i64, ctx: DecimalContext) -> Self {
        Self::normalized(BigInt::from(n), 0, ctx)
    }

    /// Parses `[-+]digits[.digits][e[-+]digits]`.
    pub fn parse(s: &str, ctx: DecimalContext) -> Result<Self> {
        let invalid = || MathError::InvalidDecimal(s.to_string());
        let t = s.trim();
        let (mantissa, exponent) = match t.find(['e', 'E']) {
            Some(pos) => (&t[..pos], Some(&t[pos + 1..])),
            None => (t, None),
        };
        let (negative, digits) = match mantissa.as_bytes().first() {
            Some(b'-') => (true, &mantissa[1..]),
            Some(b'+') => (false, &mantissa[1..]),
            _ => (false, mantissa),
        };
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let exp = match exponent {
            Some(e) => e.parse::<i64>().map_err(|_| invalid())?,
            None => 0,
        };
        let exp = i64::try_from(frac_part.len())
            .ok()
            .and_then(|frac| exp.checked_sub(frac))
            .filter(|e| (-EXPONENT_LIMIT..=EXPONENT_LIMIT).contains(e))
            .ok_or_else(invalid)?;
        let all_digits = format!("{int_part}{frac_part}");
        let mut coeff = BigInt::from_str(&all_digits).map_err(|_| invalid())?;
        if negative {
            coeff = -coeff;
        }
        Ok(Self::normalized(coeff, exp, ctx))
    }

    /// Exact decimal rendering of the shortest round-trip form of `x`.
    /// Returns `None` for NaN and infinities.
    pub fn from_f64(x: f64, ctx: DecimalContext) -> Option<Self> {
        if !x.is_finite() {
            return None;
        }
        Self::parse(&format!("{x:e}"), ctx).ok()
    }

    /// Nearest `f64` to this value.
    pub fn to_f64(&self) -> f64 {
        format!("{}e{}", self.coeff, self.exp).parse::<f64>().unwrap_or(f64::NAN)
    }

    pub fn context(&self) -> DecimalContext {
        self.ctx
    }

    /// Re-rounds this value into another context.
    pub fn with_context(&self, ctx: DecimalContext) -> Self {
        Self::normalized(self.coeff.clone(), self.exp, ctx)
    }

    pub fn is_zero(&self) -> bool {
        self.coeff.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.coeff.is_negative()
    }

    pub fn is_integer(&self) -> bool {
        self.exp >= 0 || self.coeff.is_zero()
    }

    /// Position of the most significant digit as a power of ten.
    fn magnitude_exp(&self) -> i64 {
        self.exp + digit_count(&self.coeff) as i64 - 1
    }

    /// Sum rounded in the context of `self`.
    pub fn add(&self, other: &Decimal) -> Decimal {
        if other.is_zero() {
            return self.with_context(self.ctx);
        }
        if self.is_zero() {
            return other.with_context(self.ctx);
        }
        // An operand more than precision + 1 digits below the other cannot
        // move the rounded result.
        let gap = self.magnitude_exp() - other.magnitude_exp();
        let limit = i64::from(self.ctx.precision) + 1;
        if gap > limit {
            if digit_count(&self.coeff) <= self.ctx.precision {
                return self.with_context(self.ctx);
            }
            let (unit, exp) = other.sticky_below(self);
            return Self::sum_exact((&self.coeff, self.exp), (&unit, exp), self.ctx);
        }
        if -gap > limit {
            if digit_count(&other.coeff) <= self.ctx.precision {
                return other.with_context(self.ctx);
            }
            let (unit, exp) = self.sticky_below(other);
            return Self::sum_exact((&other.coeff, other.exp), (&unit, exp), self.ctx);
        }
        Self::sum_exact((&self.coeff, self.exp), (&other.coeff, other.exp), self.ctx)
    }

    /// One unit with the sign of `self`, placed below every digit of
    /// `big` and below its rounding position. Stands in for a `self` that
    /// is negligible next to `big`: the rounded sum is the same.
    fn sticky_below(&self, big: &Decimal) -> (BigInt, i64) {
        let rounding = big.magnitude_exp() - i64::from(self.ctx.precision.max(big.ctx.precision)) - 2;
        let exp = big.exp.min(rounding).saturating_sub(1);
        let unit = if self.coeff.is_negative() { BigInt::from(-1) } else { BigInt::from(1) };
        (unit, exp)
    }

    fn sum_exact((a, a_exp): (&BigInt, i64), (b, b_exp): (&BigInt, i64), ctx: DecimalContext) -> Decimal {
        let exp = a_exp.min(b_exp);
        // both differences are bounded by the operands' digit counts and the precision
        let a = a * pow10(u32::try_from(a_exp - exp).unwrap_or(u32::MAX));
        let b = b * pow10(u32::try_from(b_exp - exp).unwrap_or(u32::MAX));
        Self::normalized(a + b, exp, ctx)
    }

    /// Natural exponential in the context of `self`.
    ///
    /// Returns `None` when the argument is too large in magnitude for the
    /// result exponent to be represented.
    pub fn exp(&self) -> Option<Decimal> {
        if self.is_zero() {
            return Some(self.ctx.one());
        }
        if self.to_f64().abs() > EXP_ARGUMENT_LIMIT {
            return None;
        }
        let wp = self.ctx.precision.saturating_add(EXP_GUARD_DIGITS);
        // |x| < 10^-wp: e^x rounds to 1 at any precision below wp
        if self.magnitude_exp() < -i64::from(wp) {
            return Some(self.ctx.one());
        }
        let scale = pow10(wp);

        // x as a fixed-point integer with `wp` fractional digits
        let shift = self.exp + i64::from(wp);
        let x = if shift >= 0 {
            &self.coeff * pow10(u32::try_from(shift).ok()?)
        } else {
            &self.coeff / pow10(u32::try_from(-shift).ok()?)
        };

        // x = k ln 10 + r with 0 <= r < ln 10
        let ln10 = fixed_ln10(&scale);
        let mut k = &x / &ln10;
        if x.is_negative() && &k * &ln10 != x {
            k -= 1u32;
        }
        let r = &x - &k * &ln10;
        let k = k.to_i64()?;

        let e = fixed_exp_small(&r, &scale);
        Some(Self::normalized(e, k.checked_sub(i64::from(wp))?, self.ctx))
    }
}

/// `atanh(1/n)` in fixed point.
fn fixed_atanh_inv(n: u32, scale: &BigInt) -> BigInt {
    let n2 = BigInt::from(n) * BigInt::from(n);
    let mut power = scale / BigInt::from(n);
    let mut sum = power.clone();
    let mut k: u32 = 1;
    loop {
        power = &power / &n2;
        let term = &power / BigInt::from(2 * k + 1);
        if term.is_zero() {
            break;
        }
        sum += term;
        k += 1;
    }
    sum
}

/// ln 10 = 3 ln 2 + ln(5/4), with ln 2 = 2 atanh(1/3) and ln(5/4) = 2 atanh(1/9).
fn fixed_ln10(scale: &BigInt) -> BigInt {
    let ln2 = fixed_atanh_inv(3, scale) * 2u32;
    let ln_five_quarters = fixed_atanh_inv(9, scale) * 2u32;
    ln2 * 3u32 + ln_five_quarters
}

/// e^r for 0 <= r < ln 10, by halving, Taylor series and repeated squaring.
fn fixed_exp_small(r: &BigInt, scale: &BigInt) -> BigInt {
    const HALVINGS: u32 = 8;
    let y = r / BigInt::from(1u32 << HALVINGS);
    let mut sum = scale.clone();
    let mut term = scale.clone();
    let mut n: u32 = 1;
    loop {
        term = &term * &y / scale / BigInt::from(n);
        if term.is_zero() {
            break;
        }
        sum += &term;
        n += 1;
    }
    for _ in 0..HALVINGS {
        sum = &sum * &sum / scale;
    }
    sum
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.coeff == other.coeff && self.exp == other.exp
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.coeff.is_negative() { "-" } else { "" };
        let digits = self.coeff.magnitude().to_string();
        let sci = self.magnitude_exp();
        if sci >= 21 || sci <= -7 {
            let (head, tail) = digits.split_at(1);
            let exp_sign = if sci >= 0 { "+" } else { "" };
            if tail.is_empty() {
                return write!(f, "{sign}{head}e{exp_sign}{sci}");
            }
            return write!(f, "{sign}{head}.{tail}e{exp_sign}{sci}");
        }
        if self.exp >= 0 {
            let zeros = "0".repeat(self.exp as usize);
            return write!(f, "{sign}{digits}{zeros}");
        }
        let frac_len = (-self.exp) as usize;
        if digits.len() > frac_len {
            let (int_part, frac_part) = digits.split_at(digits.len() - frac_len);
            write!(f, "{sign}{int_part}.{frac_part}")
        } else {
            let zeros = "0".repeat(frac_len - digits.len());
            write!(f, "{sign}0.{zeros}{digits}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::parse(s, DecimalContext::default()).unwrap()
    }

    #[test]
    fn parse_and_display() {
        assert_eq!(dec("1.50").to_string(), "1.5");
        assert_eq!(dec("-0.00012").to_string(), "-0.00012");
        assert_eq!(dec("12e3").to_string(), "12000");
        assert_eq!(dec("1e21").to_string(), "1e+21");
        assert_eq!(dec("1.25e-7").to_string(), "1.25e-7");
        assert_eq!(dec("0.000").to_string(), "0");
        assert!(Decimal::parse("1.2.3", DecimalContext::default()).is_err());
        assert!(Decimal::parse("", DecimalContext::default()).is_err());
    }

    #[test]
    fn extreme_exponents_are_rejected() {
        let ctx = DecimalContext::default();
        let extreme = [
            "1.5e-9223372036854775808",
            "1e9223372036854775807",
            "1e-9223372036854775807",
            "1e99999999999999999999",
        ];
        for text in extreme {
            let err = Decimal::parse(text, ctx).unwrap_err();
            assert_eq!(err, MathError::InvalidDecimal(text.to_string()));
        }
        assert_eq!(dec("1e-5000000").to_f64(), 0.0);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let ctx = DecimalContext::new(3);
        assert_eq!(Decimal::parse("1.2345", ctx).unwrap().to_string(), "1.23");
        assert_eq!(Decimal::parse("1.235", ctx).unwrap().to_string(), "1.24");
        assert_eq!(Decimal::parse("-9.995", ctx).unwrap().to_string(), "-10");
    }

    #[test]
    fn addition_is_exact_within_precision() {
        assert_eq!(dec("0.1").add(&dec("0.2")), dec("0.3"));
        assert_eq!(dec("1e-30").add(&dec("1")).to_string(), "1.000000000000000000000000000001");
    }

    #[test]
    fn addition_adopts_left_context() {
        let small = DecimalContext::new(5);
        let a = Decimal::parse("1", small).unwrap();
        let b = dec("0.000001");
        let sum = a.add(&b);
        assert_eq!(sum.context(), small);
        assert_eq!(sum.to_string(), "1");
    }

    #[test]
    fn negligible_operand_still_breaks_ties() {
        let small = DecimalContext::new(3);
        let wide = dec("1.005");
        for tiny in ["1e-40", "1e-4000000000000"] {
            let up = Decimal::parse(tiny, small).unwrap();
            let down = Decimal::parse(&format!("-{tiny}"), small).unwrap();
            assert_eq!(up.add(&wide).to_string(), "1.01", "{tiny}");
            assert_eq!(down.add(&wide).to_string(), "1", "{tiny}");
        }
    }

    #[test]
    fn from_f64_uses_shortest_form() {
        let ctx = DecimalContext::default();
        assert_eq!(Decimal::from_f64(0.1, ctx).unwrap().to_string(), "0.1");
        assert_eq!(Decimal::from_f64(-2.5e10, ctx).unwrap().to_string(), "-25000000000");
        assert!(Decimal::from_f64(f64::NAN, ctx).is_none());
        assert!(Decimal::from_f64(f64::INFINITY, ctx).is_none());
    }

    #[test]
    fn to_f64_is_nearest() {
        assert_eq!(dec("0.1").to_f64(), 0.1);
        assert_eq!(dec("-123.456").to_f64(), -123.456);
    }

    #[test]
    fn exponential() {
        let ctx = DecimalContext::new(20);
        let one = Decimal::from_i64(1, ctx);
        assert_eq!(one.exp().unwrap().to_string(), "2.7182818284590452354");
        let zero = Decimal::zero(ctx);
        assert_eq!(zero.exp().unwrap(), ctx.one());
        let minus = Decimal::parse("-1", ctx).unwrap();
        assert_eq!(minus.exp().unwrap().to_string(), "0.3678794411714423216");
        let big = Decimal::parse("100", ctx).unwrap();
        assert_eq!(big.exp().unwrap().to_string(), "2.6881171418161354484e+43");
    }

    #[test]
    fn exponential_of_tiny_argument_is_one() {
        let ctx = DecimalContext::new(20);
        for text in ["1e-5000000", "-1e-5000000", "3e-61", "-7e-61"] {
            let x = Decimal::parse(text, ctx).unwrap();
            assert_eq!(x.exp().unwrap(), ctx.one(), "{text}");
        }
        // just above the cut-off the series still runs
        let x = Decimal::parse("1e-15", ctx).unwrap();
        assert_eq!(x.exp().unwrap().to_string(), "1.000000000000001");
    }

    #[test]
    fn serde_roundtrip_keeps_precision() {
        let d = Decimal::parse("3.25", DecimalContext::new(10)).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#"{"value":"3.25","precision":10}"#);
        let back: Decimal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
        assert_eq!(back.context().precision, 10);
    }
}
