//! The extended monzo value type.
//!
//! An [`ExtendedMonzo`] stores an interval as three parts:
//! - `vector`: exact (possibly fractional) exponents of the first `k` primes
//! - `residual`: a rational factor the vector cannot express
//! - `cents`: a floating offset for anything irrational
//!
//! Operations stay exact for as long as they can and only spill into `cents`
//! when a result has no rational form.

use std::fmt;

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::exact::{self, Fraction, MAX_COMPONENTS};

/// An interval in extended monzo form.
///
/// Values are immutable: every operation returns a new monzo. Derived
/// equality is strict (component-wise); use [`ExtendedMonzo::equals`] to
/// compare pitches.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MonzoParts")]
pub struct ExtendedMonzo {
    /// Prime exponents, component 0 being the exponent of 2.
    vector: Vec<Fraction>,
    /// Rational content outside the vector's primes. Always positive.
    residual: Fraction,
    /// Irrational offset in cents.
    cents: f64,
}

/// Unchecked wire form, validated through [`ExtendedMonzo::new`].
#[derive(Deserialize)]
struct MonzoParts {
    vector: Vec<Fraction>,
    residual: Fraction,
    cents: f64,
}

impl TryFrom<MonzoParts> for ExtendedMonzo {
    type Error = MonzoError;

    fn try_from(parts: MonzoParts) -> Result<Self, Self::Error> {
        Self::new(parts.vector, parts.residual, parts.cents)
    }
}

// ============================================================================
// Construction
// ============================================================================

impl ExtendedMonzo {
    /// Create a monzo from its parts.
    pub fn new(vector: Vec<Fraction>, residual: Fraction, cents: f64) -> Result<Self, MonzoError> {
        check_components(vector.len())?;
        if !residual.is_positive() {
            return Err(MonzoError::NonPositive(residual.to_string()));
        }
        Ok(Self { vector, residual, cents })
    }

    /// Create a purely algebraic monzo from integer exponents.
    pub fn from_exponents(exponents: &[i64]) -> Result<Self, MonzoError> {
        let vector = exponents
            .iter()
            .map(|&e| Fraction::from_integer(BigInt::from(e)))
            .collect();
        Self::new(vector, Fraction::one(), 0.0)
    }

    /// The unison (1/1) with `number_of_components` components.
    pub fn unison(number_of_components: usize) -> Result<Self, MonzoError> {
        check_components(number_of_components)?;
        Ok(Self::zeros(number_of_components))
    }

    /// The monzo of the prime at `index`: a single exponent of one.
    pub fn basis(index: usize, number_of_components: usize) -> Result<Self, MonzoError> {
        check_components(number_of_components)?;
        if index >= number_of_components {
            return Err(MonzoError::NeedMoreComponents {
                needed: index + 1,
                got: number_of_components,
            });
        }
        let mut result = Self::zeros(number_of_components);
        result.vector[index] = Fraction::one();
        Ok(result)
    }

    /// Factor a positive integer.
    pub fn from_number<N: Into<BigInt>>(n: N, number_of_components: usize) -> Result<Self, MonzoError> {
        Self::from_fraction(&Fraction::from_integer(n.into()), number_of_components)
    }

    /// Factor the first `number_of_components` primes out of a positive fraction.
    ///
    /// Whatever does not factor is kept in the residual.
    pub fn from_fraction(f: &Fraction, number_of_components: usize) -> Result<Self, MonzoError> {
        check_components(number_of_components)?;
        if !f.is_positive() {
            return Err(MonzoError::NonPositive(f.to_string()));
        }

        let (numer_exponents, numer_rest) = exact::factorize(f.numer(), number_of_components);
        let (denom_exponents, denom_rest) = exact::factorize(f.denom(), number_of_components);

        let vector = numer_exponents
            .iter()
            .zip(&denom_exponents)
            .map(|(n, d)| Fraction::from_integer(BigInt::from(n - d)))
            .collect();

        Ok(Self {
            vector,
            residual: Fraction::new(numer_rest, denom_rest),
            cents: 0.0,
        })
    }

    /// A purely irrational interval of the given size.
    pub fn from_cents(cents: f64, number_of_components: usize) -> Result<Self, MonzoError> {
        check_components(number_of_components)?;
        let mut result = Self::zeros(number_of_components);
        result.cents = cents;
        Ok(result)
    }

    /// `fraction_of_equave` steps of `equave`, e.g. `7/12` of `2/1` for 7\12.
    ///
    /// The equave must factor completely into the available primes.
    pub fn from_equal_temperament(
        fraction_of_equave: &Fraction,
        equave: &Fraction,
        number_of_components: usize,
    ) -> Result<Self, MonzoError> {
        let equave = Self::from_fraction(equave, number_of_components)?;
        if !equave.residual.is_one() {
            return Err(MonzoError::EquaveNotFactorable);
        }
        Ok(equave.mul(fraction_of_equave))
    }

    /// Floating point fallback for a frequency ratio.
    pub fn from_value(value: f64, number_of_components: usize) -> Result<Self, MonzoError> {
        Self::from_cents(exact::value_to_cents(value), number_of_components)
    }

    fn zeros(number_of_components: usize) -> Self {
        Self {
            vector: vec![Fraction::zero(); number_of_components],
            residual: Fraction::one(),
            cents: 0.0,
        }
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl ExtendedMonzo {
    /// Prime exponents.
    #[inline]
    pub fn vector(&self) -> &[Fraction] {
        &self.vector
    }

    /// Rational content outside the vector.
    #[inline]
    pub fn residual(&self) -> &Fraction {
        &self.residual
    }

    /// Irrational offset in cents.
    #[inline]
    pub fn cents(&self) -> f64 {
        self.cents
    }

    #[inline]
    pub fn number_of_components(&self) -> usize {
        self.vector.len()
    }

    /// Replace the cents offset, keeping the exact parts.
    pub fn with_cents(mut self, cents: f64) -> Self {
        self.cents = cents;
        self
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

impl ExtendedMonzo {
    /// Stack two intervals (multiply their ratios).
    pub fn add(&self, other: &Self) -> Result<Self, MonzoError> {
        self.check_length(other)?;
        Ok(Self {
            vector: self.vector.iter().zip(&other.vector).map(|(a, b)| a + b).collect(),
            residual: &self.residual * &other.residual,
            cents: self.cents + other.cents,
        })
    }

    /// Difference of two intervals (divide their ratios).
    pub fn sub(&self, other: &Self) -> Result<Self, MonzoError> {
        self.check_length(other)?;
        Ok(Self {
            vector: self.vector.iter().zip(&other.vector).map(|(a, b)| a - b).collect(),
            residual: &self.residual / &other.residual,
            cents: self.cents - other.cents,
        })
    }

    /// Invert the interval.
    pub fn neg(&self) -> Self {
        Self {
            vector: self.vector.iter().map(|a| -a).collect(),
            residual: self.residual.recip(),
            cents: -self.cents,
        }
    }

    /// Scalar multiplication in pitch space (raise the ratio to `scalar`).
    ///
    /// The residual stays exact when its power is rational. Otherwise it is
    /// folded into the cents offset and reset to one. The existing cents
    /// offset is scaled either way.
    pub fn mul(&self, scalar: &Fraction) -> Self {
        let vector = self.vector.iter().map(|a| a * scalar).collect();
        let factor = exact::to_f64(scalar);
        match exact::pow_fraction(&self.residual, scalar) {
            Some(residual) => Self {
                vector,
                residual,
                cents: self.cents * factor,
            },
            None => Self {
                vector,
                residual: Fraction::one(),
                cents: (self.cents + exact::cents_of(&self.residual)) * factor,
            },
        }
    }

    /// Raise the ratio to an integer power.
    pub fn mul_integer(&self, scalar: i64) -> Self {
        self.mul(&Fraction::from_integer(BigInt::from(scalar)))
    }

    /// Scalar division in pitch space (take the `scalar`-th root).
    pub fn div(&self, scalar: &Fraction) -> Result<Self, MonzoError> {
        if scalar.is_zero() {
            return Err(MonzoError::DivisionByZero);
        }
        Ok(self.mul(&scalar.recip()))
    }

    pub fn div_integer(&self, scalar: i64) -> Result<Self, MonzoError> {
        self.div(&Fraction::from_integer(BigInt::from(scalar)))
    }

    /// Scale the whole pitch by a real factor, as in stretched-octave tunings.
    ///
    /// The exact parts are untouched; the difference goes into `cents`.
    pub fn stretch(&self, scalar: f64) -> Self {
        let mut result = self.clone();
        result.cents += self.total_cents() * (scalar - 1.0);
        result
    }

    /// Remainder with truncating division, like `%` on integers.
    ///
    /// The result has the sign of `self`.
    pub fn modulo(&self, other: &Self) -> Result<Self, MonzoError> {
        self.remainder(other, Rounding::Trunc)
    }

    /// Remainder with flooring division.
    ///
    /// Reduces into `[unison, other)` for a positive `other`, which is the
    /// usual octave reduction when `other` is 2/1.
    pub fn mmod(&self, other: &Self) -> Result<Self, MonzoError> {
        self.remainder(other, Rounding::Floor)
    }

    fn remainder(&self, other: &Self, rounding: Rounding) -> Result<Self, MonzoError> {
        self.check_length(other)?;
        let divisor = other.total_cents();
        if divisor == 0.0 {
            return Err(MonzoError::ModuloByUnison);
        }

        let quotient = match self.exact_quotient(other) {
            Some(exact) => rounding
                .round_exact(&exact)
                .to_integer()
                .to_i64()
                .ok_or(MonzoError::NonFinite)?,
            None => {
                let estimate = rounding.round(self.total_cents() / divisor) as i64;
                // A whole divisor can survive float rounding in the quotient
                let rest = self.sub(&other.mul_integer(estimate))?.total_cents() / divisor;
                estimate + rounding.correction(rest)
            }
        };
        self.sub(&other.mul_integer(quotient))
    }

    /// `self / other` as an exact number, when both are purely algebraic and
    /// their vectors are parallel.
    fn exact_quotient(&self, other: &Self) -> Option<Fraction> {
        if !(self.is_equal_temperament() && other.is_equal_temperament()) {
            return None;
        }
        let mut ratio: Option<Fraction> = None;
        for (a, b) in self.vector.iter().zip(&other.vector) {
            if b.is_zero() {
                if !a.is_zero() {
                    return None;
                }
                continue;
            }
            let component = a / b;
            match &ratio {
                Some(existing) if *existing != component => return None,
                Some(_) => {}
                None => ratio = Some(component),
            }
        }
        ratio
    }

    fn check_length(&self, other: &Self) -> Result<(), MonzoError> {
        if self.vector.len() != other.vector.len() {
            return Err(MonzoError::LengthMismatch {
                left: self.vector.len(),
                right: other.vector.len(),
            });
        }
        Ok(())
    }
}

impl std::ops::Neg for ExtendedMonzo {
    type Output = Self;

    fn neg(self) -> Self::Output {
        ExtendedMonzo::neg(&self)
    }
}

impl std::ops::Neg for &ExtendedMonzo {
    type Output = ExtendedMonzo;

    fn neg(self) -> Self::Output {
        ExtendedMonzo::neg(self)
    }
}

/// Quotient rounding for [`ExtendedMonzo::modulo`] and [`ExtendedMonzo::mmod`].
#[derive(Clone, Copy)]
enum Rounding {
    Trunc,
    Floor,
}

impl Rounding {
    fn round(self, x: f64) -> f64 {
        match self {
            Rounding::Trunc => x.trunc(),
            Rounding::Floor => x.floor(),
        }
    }

    fn round_exact(self, x: &Fraction) -> Fraction {
        match self {
            Rounding::Trunc => x.trunc(),
            Rounding::Floor => x.floor(),
        }
    }

    /// Step to add to the quotient when the remainder, measured in divisors,
    /// is still a whole divisor or more.
    fn correction(self, rest: f64) -> i64 {
        match self {
            _ if rest >= 1.0 => 1,
            Rounding::Trunc if rest <= -1.0 => -1,
            _ => 0,
        }
    }
}

fn check_components(number_of_components: usize) -> Result<(), MonzoError> {
    if number_of_components > MAX_COMPONENTS {
        return Err(MonzoError::TooManyComponents {
            requested: number_of_components,
            available: MAX_COMPONENTS,
        });
    }
    Ok(())
}

// ============================================================================
// Formatting
// ============================================================================

impl fmt::Display for ExtendedMonzo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, component) in self.vector.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", component)?;
        }
        write!(f, ">")?;
        if !self.residual.is_one() {
            write!(f, " * {}", self.residual)?;
        }
        if self.cents != 0.0 {
            write!(f, " + {}c", self.cents)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ExtendedMonzo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExtendedMonzo({} = {:.3}c)", self, self.total_cents())
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors from monzo arithmetic and conversions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MonzoError {
    #[error("Monzos of different length cannot be combined")]
    LengthMismatch { left: usize, right: usize },

    #[error("Unable to convert equave to monzo")]
    EquaveNotFactorable,

    #[error("Unable to convert irrational number to fraction")]
    IrrationalFraction,

    #[error("Unable to convert irrational number to equal temperament")]
    IrrationalEqualTemperament,

    #[error("Unable to convert non-representable fraction to equal temperament")]
    ResidualEqualTemperament,

    #[error("Modulo by unison")]
    ModuloByUnison,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Unable to represent non-positive value {0} as a monzo")]
    NonPositive(String),

    #[error("Unable to approximate non-finite value")]
    NonFinite,

    #[error("Need at least {needed} components, got {got}")]
    NeedMoreComponents { needed: usize, got: usize },

    #[error("Not enough components: {requested} requested but only {available} primes are available")]
    TooManyComponents { requested: usize, available: usize },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exact::fraction;

    fn monzo(n: i64, d: i64) -> ExtendedMonzo {
        ExtendedMonzo::from_fraction(&fraction(n, d), 3).unwrap()
    }

    #[test]
    fn test_from_fraction() {
        let m = monzo(45, 32);
        assert_eq!(m.vector(), &[fraction(-5, 1), fraction(2, 1), fraction(1, 1)][..]);
        assert!(m.residual().is_one());
        assert_eq!(m.cents(), 0.0);
    }

    #[test]
    fn test_from_fraction_keeps_residual() {
        let m = ExtendedMonzo::from_fraction(&fraction(11, 8), 3).unwrap();
        assert_eq!(m.vector()[0], fraction(-3, 1));
        assert_eq!(m.residual(), &fraction(11, 1));
    }

    #[test]
    fn test_from_fraction_rejects_non_positive() {
        assert!(matches!(
            ExtendedMonzo::from_fraction(&fraction(-3, 2), 3),
            Err(MonzoError::NonPositive(_))
        ));
        assert!(ExtendedMonzo::from_number(0, 3).is_err());
    }

    #[test]
    fn test_too_many_components() {
        assert_eq!(
            ExtendedMonzo::from_number(3, MAX_COMPONENTS + 1).unwrap_err(),
            MonzoError::TooManyComponents { requested: MAX_COMPONENTS + 1, available: MAX_COMPONENTS }
        );
    }

    #[test]
    fn test_from_cents() {
        let m = ExtendedMonzo::from_cents(100.0, 3).unwrap();
        assert!(m.vector().iter().all(|c| c.is_zero()));
        assert!(m.residual().is_one());
        assert_eq!(m.cents(), 100.0);
    }

    #[test]
    fn test_from_equal_temperament() {
        let m = ExtendedMonzo::from_equal_temperament(&fraction(7, 12), &fraction(2, 1), 3).unwrap();
        assert_eq!(m.vector()[0], fraction(7, 12));
        assert!((m.total_cents() - 700.0).abs() < 1e-9);

        let tritave = ExtendedMonzo::from_equal_temperament(&fraction(1, 13), &fraction(3, 1), 3).unwrap();
        assert_eq!(tritave.vector()[1], fraction(1, 13));
    }

    #[test]
    fn test_from_equal_temperament_bad_equave() {
        let err = ExtendedMonzo::from_equal_temperament(&fraction(1, 5), &fraction(7, 1), 3).unwrap_err();
        assert_eq!(err, MonzoError::EquaveNotFactorable);
        assert_eq!(err.to_string(), "Unable to convert equave to monzo");
    }

    #[test]
    fn test_add_sub() {
        let fifth = monzo(3, 2);
        let fourth = monzo(4, 3);
        assert_eq!(fifth.add(&fourth).unwrap(), monzo(2, 1));
        assert_eq!(fifth.sub(&fourth).unwrap(), monzo(9, 8));
    }

    #[test]
    fn test_length_mismatch() {
        let a = ExtendedMonzo::from_number(3, 2).unwrap();
        let b = ExtendedMonzo::from_number(3, 3).unwrap();
        let err = a.add(&b).unwrap_err();
        assert_eq!(err.to_string(), "Monzos of different length cannot be combined");
    }

    #[test]
    fn test_neg() {
        let m = ExtendedMonzo::from_fraction(&fraction(11, 6), 2).unwrap().with_cents(3.0);
        let inverted = -&m;
        assert_eq!(inverted.vector(), &[fraction(1, 1), fraction(1, 1)][..]);
        assert_eq!(inverted.residual(), &fraction(1, 11));
        assert_eq!(inverted.cents(), -3.0);
    }

    #[test]
    fn test_mul_keeps_exact_residual() {
        let m = ExtendedMonzo::from_fraction(&fraction(121, 1), 1).unwrap();
        let root = m.mul(&fraction(1, 2));
        assert_eq!(root.residual(), &fraction(11, 1));
        assert_eq!(root.cents(), 0.0);
    }

    #[test]
    fn test_mul_folds_irrational_residual_into_cents() {
        let m = ExtendedMonzo::from_fraction(&fraction(11, 1), 1).unwrap().with_cents(10.0);
        let root = m.mul(&fraction(1, 2));
        assert!(root.residual().is_one());
        let expected = (10.0 + exact::cents_of(&fraction(11, 1))) / 2.0;
        assert!((root.cents() - expected).abs() < 1e-9);
        assert!((root.total_cents() - m.total_cents() / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_div() {
        let m = monzo(9, 4);
        assert_eq!(m.div_integer(2).unwrap(), monzo(3, 2));
        assert_eq!(m.div_integer(0).unwrap_err(), MonzoError::DivisionByZero);
    }

    #[test]
    fn test_stretch_differs_from_mul() {
        let fifth = monzo(3, 2);
        let stretched = fifth.stretch(1.01);
        assert_eq!(stretched.vector(), fifth.vector());
        assert!((stretched.total_cents() - fifth.total_cents() * 1.01).abs() < 1e-9);
        assert!((stretched.cents() - fifth.total_cents() * 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_mmod_octave_reduction() {
        let octave = monzo(2, 1);
        assert_eq!(monzo(3, 1).mmod(&octave).unwrap(), monzo(3, 2));
        assert_eq!(monzo(1, 3).mmod(&octave).unwrap(), monzo(4, 3));
        assert_eq!(monzo(5, 1).mmod(&octave).unwrap(), monzo(5, 4));
        assert_eq!(octave.mmod(&octave).unwrap(), monzo(1, 1));
    }

    #[test]
    fn test_mmod_exact_multiples_reduce_to_unison() {
        let fifth = monzo(3, 2);
        assert_eq!(monzo(27, 8).mmod(&fifth).unwrap(), monzo(1, 1));
        assert_eq!(monzo(27, 1).mmod(&monzo(3, 1)).unwrap(), monzo(1, 1));
        for n in [3, 6, 7, 9, 12] {
            let stack = fifth.mul_integer(n);
            assert_eq!(stack.mmod(&fifth).unwrap(), monzo(1, 1), "(3/2)^{}", n);
            assert_eq!(stack.modulo(&fifth).unwrap(), monzo(1, 1), "(3/2)^{}", n);
            assert_eq!(stack.neg().modulo(&fifth).unwrap(), monzo(1, 1), "(2/3)^{}", n);
        }
    }

    #[test]
    fn test_mmod_residual_multiples_reduce_to_unison() {
        // 11 lives in the residual with three components
        let eleven = monzo(11, 1);
        let cubed = eleven.mul_integer(3);
        assert!(cubed.mmod(&eleven).unwrap().equals(&monzo(1, 1)));
        assert!(cubed.mmod(&eleven).unwrap().residual().is_one());
    }

    #[test]
    fn test_mmod_tritave() {
        let tritave = monzo(3, 1);
        assert_eq!(monzo(5, 1).mmod(&tritave).unwrap(), monzo(5, 3));
        assert_eq!(monzo(1, 5).mmod(&tritave).unwrap(), monzo(9, 5));
        assert_eq!(monzo(9, 1).mmod(&tritave).unwrap(), monzo(1, 1));
    }

    #[test]
    fn test_modulo_truncates() {
        let octave = monzo(2, 1);
        // Truncation keeps the sign of the dividend
        assert_eq!(monzo(1, 3).modulo(&octave).unwrap(), monzo(2, 3));
        assert_eq!(monzo(3, 1).modulo(&octave).unwrap(), monzo(3, 2));
    }

    #[test]
    fn test_mmod_by_unison() {
        let one = ExtendedMonzo::from_exponents(&[1]).unwrap();
        let zero = ExtendedMonzo::from_exponents(&[0]).unwrap();
        let err = one.mmod(&zero).unwrap_err();
        assert_eq!(err, MonzoError::ModuloByUnison);
        assert_eq!(err.to_string(), "Modulo by unison");
        assert_eq!(one.modulo(&zero).unwrap_err(), MonzoError::ModuloByUnison);
    }

    #[test]
    fn test_basis() {
        let three = ExtendedMonzo::basis(1, 3).unwrap();
        assert_eq!(three, monzo(3, 1));
        assert!(ExtendedMonzo::basis(3, 3).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let m = ExtendedMonzo::from_fraction(&fraction(11, 8), 3).unwrap().with_cents(1.5);
        let json = serde_json::to_string(&m).unwrap();
        let back: ExtendedMonzo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_deserialize_validates() {
        let wide = ExtendedMonzo::unison(MAX_COMPONENTS).unwrap();
        let mut value = serde_json::to_value(&wide).unwrap();
        let zero = value["vector"][0].clone();
        value["vector"].as_array_mut().unwrap().push(zero);
        assert!(serde_json::from_value::<ExtendedMonzo>(value).is_err());

        let mut value = serde_json::to_value(monzo(3, 2)).unwrap();
        value["residual"] = serde_json::to_value(fraction(-3, 1)).unwrap();
        let err = serde_json::from_value::<ExtendedMonzo>(value).unwrap_err();
        assert!(err.to_string().contains("non-positive"));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", monzo(3, 2)), "[-1 1 0>");
        let odd = ExtendedMonzo::from_fraction(&fraction(11, 8), 2).unwrap();
        assert_eq!(format!("{}", odd), "[-3 0> * 11");
        let et = ExtendedMonzo::from_equal_temperament(&fraction(7, 12), &fraction(2, 1), 1).unwrap();
        assert_eq!(format!("{}", et), "[7/12>");
    }
}
