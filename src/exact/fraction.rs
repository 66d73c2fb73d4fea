//! Rational helpers on top of [`BigRational`].
//!
//! The interesting piece is [`pow_fraction`]: raising a rational to a
//! rational power only sometimes has a rational result, and callers need to
//! know when it doesn't.

use std::f64::consts::LN_2;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};

/// Exact fraction type used throughout the crate.
pub type Fraction = BigRational;

/// Conversion factor from nats (natural log units) to cents.
pub const CENTS_PER_NAT: f64 = 1200.0 / LN_2;

/// Build a fraction from machine integers.
///
/// # Panics
/// Panics if `denominator` is zero.
pub fn fraction(numerator: i64, denominator: i64) -> Fraction {
    Fraction::new(BigInt::from(numerator), BigInt::from(denominator))
}

/// Raise `base` to the power `exponent`, if the result is rational.
///
/// Returns `None` when the exponent's denominator does not evenly root both
/// halves of the base (e.g. `2^(1/2)`), when the base is zero and the exponent
/// is not positive, when an even root of a negative base is requested, or when
/// the exponent is too large to evaluate.
pub fn pow_fraction(base: &Fraction, exponent: &Fraction) -> Option<Fraction> {
    if exponent.is_zero() {
        return Some(Fraction::one());
    }
    if base.is_zero() {
        return if exponent.is_positive() {
            Some(Fraction::zero())
        } else {
            None
        };
    }
    if base.is_one() {
        return Some(Fraction::one());
    }

    let root = exponent.denom().to_u32()?;
    let power = exponent.numer().abs().to_u32()?;

    let numer = exact_root(base.numer(), root)?;
    let denom = exact_root(base.denom(), root)?;

    let numer = numer.pow(power);
    let denom = denom.pow(power);
    if exponent.is_negative() {
        Some(Fraction::new(denom, numer))
    } else {
        Some(Fraction::new(numer, denom))
    }
}

/// Integer `n`-th root of `value`, if it is exact.
fn exact_root(value: &BigInt, n: u32) -> Option<BigInt> {
    if n == 1 {
        return Some(value.clone());
    }
    if value.is_negative() {
        if n % 2 == 0 {
            return None;
        }
        return exact_root(&-value, n).map(|r| -r);
    }
    let root = value.nth_root(n);
    if &root.pow(n) == value {
        Some(root)
    } else {
        None
    }
}

/// Base-2 logarithm of `|n|`, stable for integers beyond `f64` range.
///
/// Exact for powers of two.
fn log2_bigint(n: &BigInt) -> f64 {
    let bits = n.bits();
    if bits == 0 {
        return f64::NEG_INFINITY;
    }
    if bits <= 1000 {
        return n.magnitude().to_f64().map_or(f64::NAN, f64::log2);
    }
    let shift = bits - 64;
    let head = (n.magnitude() >> shift).to_f64().map_or(f64::NAN, f64::log2);
    head + shift as f64
}

fn log2_fraction(f: &Fraction) -> f64 {
    if f.is_negative() {
        return f64::NAN;
    }
    log2_bigint(f.numer()) - log2_bigint(f.denom())
}

/// Natural logarithm of `|n|`, stable for integers beyond `f64` range.
pub fn ln_bigint(n: &BigInt) -> f64 {
    log2_bigint(n) * LN_2
}

/// Natural logarithm of a fraction. NaN for negative values.
pub fn ln_fraction(f: &Fraction) -> f64 {
    log2_fraction(f) * LN_2
}

/// Size of a frequency ratio in cents.
#[inline]
pub fn cents_of(f: &Fraction) -> f64 {
    1200.0 * log2_fraction(f)
}

/// Size of a floating point frequency ratio in cents.
#[inline]
pub fn value_to_cents(value: f64) -> f64 {
    1200.0 * value.log2()
}

/// Frequency ratio of a size in cents.
#[inline]
pub fn cents_to_value(cents: f64) -> f64 {
    (cents / 1200.0).exp2()
}

/// Lossy conversion to `f64`.
pub fn to_f64(f: &Fraction) -> f64 {
    f.to_f64().unwrap_or_else(|| ln_fraction(f).exp())
}

/// Round a float to the nearest integer as a [`BigInt`].
///
/// Returns `None` for NaN and infinities.
pub fn round_to_bigint(value: f64) -> Option<BigInt> {
    BigInt::from_f64(value.round())
}
