//! Conversions out of monzo form, predicates, and pitch comparison.

use std::cmp::Ordering;
use std::f64::consts::LN_2;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::exact::{self, Fraction};
use crate::monzo::{ExtendedMonzo, MonzoError};

impl ExtendedMonzo {
    /// Size of the interval in cents. Always succeeds.
    pub fn total_cents(&self) -> f64 {
        let vector_cents: f64 = self
            .vector()
            .iter()
            .enumerate()
            .map(|(i, component)| exact::to_f64(component) * exact::prime_cents(i))
            .sum();
        self.cents() + exact::cents_of(self.residual()) + vector_cents
    }

    /// Alias of [`ExtendedMonzo::total_cents`].
    #[inline]
    pub fn to_cents(&self) -> f64 {
        self.total_cents()
    }

    /// Size of the interval in nats (natural log units).
    #[inline]
    pub fn total_nats(&self) -> f64 {
        self.total_cents() / 1200.0 * LN_2
    }

    /// The frequency ratio as a float.
    #[inline]
    pub fn value_of(&self) -> f64 {
        exact::cents_to_value(self.total_cents())
    }

    /// The exact frequency ratio.
    ///
    /// Fails when there is a cents offset or a fractional exponent.
    pub fn to_fraction(&self) -> Result<Fraction, MonzoError> {
        if self.cents() != 0.0 {
            return Err(MonzoError::IrrationalFraction);
        }
        let mut numer = BigInt::one();
        let mut denom = BigInt::one();
        for (i, component) in self.vector().iter().enumerate() {
            if !component.is_integer() {
                return Err(MonzoError::IrrationalFraction);
            }
            let exponent = component.to_integer();
            let power = exponent
                .abs()
                .to_u32()
                .ok_or(MonzoError::IrrationalFraction)?;
            let factor = BigInt::from(exact::prime(i)).pow(power);
            if exponent.is_negative() {
                denom *= factor;
            } else {
                numer *= factor;
            }
        }
        Ok(self.residual() * Fraction::new(numer, denom))
    }

    /// Express the interval as `fraction_of_equave` steps of `equave`.
    ///
    /// The returned equave is always at least 1. The unison comes back as
    /// `(0, 1)`.
    pub fn to_equal_temperament(&self) -> Result<(Fraction, Fraction), MonzoError> {
        if self.cents() != 0.0 {
            return Err(MonzoError::IrrationalEqualTemperament);
        }
        if !self.residual().is_one() {
            return Err(MonzoError::ResidualEqualTemperament);
        }

        let denominator = self
            .vector()
            .iter()
            .fold(BigInt::one(), |acc, component| acc.lcm(component.denom()));
        let numerator = self.vector().iter().fold(BigInt::zero(), |acc, component| {
            let scaled = component * Fraction::from_integer(denominator.clone());
            acc.gcd(scaled.numer())
        });

        if numerator.is_zero() {
            return Ok((Fraction::zero(), Fraction::one()));
        }

        let fraction_of_equave = Fraction::new(numerator, denominator);
        let equave = self.div(&fraction_of_equave)?.to_fraction()?;
        if equave < Fraction::one() {
            Ok((-fraction_of_equave, equave.recip()))
        } else {
            Ok((fraction_of_equave, equave))
        }
    }

    /// No cents offset and only integer exponents.
    pub fn is_fractional(&self) -> bool {
        self.cents() == 0.0 && self.vector().iter().all(|c| c.is_integer())
    }

    /// No cents offset and no residual.
    pub fn is_equal_temperament(&self) -> bool {
        self.cents() == 0.0 && self.residual().is_one()
    }

    /// An exact power of two, possibly fractional.
    pub fn is_power_of_two(&self) -> bool {
        self.is_equal_temperament() && self.vector().iter().skip(1).all(|c| c.is_zero())
    }

    /// Same as the derived `==`: every part equal.
    #[inline]
    pub fn strict_equals(&self, other: &Self) -> bool {
        self == other
    }

    /// Equal as pitches, however they are represented.
    pub fn equals(&self, other: &Self) -> bool {
        self.total_cents() == other.total_cents()
    }

    /// Order by pitch.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.total_cents().total_cmp(&other.total_cents())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exact::fraction;

    fn monzo(n: i64, d: i64) -> ExtendedMonzo {
        ExtendedMonzo::from_fraction(&fraction(n, d), 4).unwrap()
    }

    #[test]
    fn test_to_fraction_roundtrip() {
        for (n, d) in [(3, 2), (81, 80), (1, 1), (7, 4), (13, 11), (1024, 675)] {
            assert_eq!(monzo(n, d).to_fraction().unwrap(), fraction(n, d));
        }
    }

    #[test]
    fn test_to_fraction_rejects_irrational() {
        let et = ExtendedMonzo::from_equal_temperament(&fraction(1, 12), &fraction(2, 1), 4).unwrap();
        assert_eq!(et.to_fraction().unwrap_err(), MonzoError::IrrationalFraction);

        let with_cents = monzo(3, 2).with_cents(1.0);
        let err = with_cents.to_fraction().unwrap_err();
        assert_eq!(err.to_string(), "Unable to convert irrational number to fraction");
    }

    #[test]
    fn test_total_cents() {
        assert!((monzo(3, 2).total_cents() - 701.955).abs() < 1e-3);
        assert_eq!(monzo(4, 1).total_cents(), 2400.0);

        let residual = ExtendedMonzo::from_fraction(&fraction(11, 8), 2).unwrap();
        assert!((residual.total_cents() - 551.318).abs() < 1e-3);

        let cents = ExtendedMonzo::from_cents(123.4, 2).unwrap();
        assert_eq!(cents.total_cents(), 123.4);
    }

    #[test]
    fn test_value_of() {
        assert!((monzo(5, 4).value_of() - 1.25).abs() < 1e-12);
        assert!((monzo(2, 1).total_nats() - LN_2).abs() < 1e-12);
    }

    #[test]
    fn test_to_equal_temperament() {
        let step = ExtendedMonzo::from_equal_temperament(&fraction(7, 12), &fraction(2, 1), 3).unwrap();
        assert_eq!(step.to_equal_temperament().unwrap(), (fraction(7, 12), fraction(2, 1)));

        let tritave = ExtendedMonzo::from_equal_temperament(&fraction(3, 13), &fraction(3, 1), 3).unwrap();
        assert_eq!(tritave.to_equal_temperament().unwrap(), (fraction(3, 13), fraction(3, 1)));
    }

    #[test]
    fn test_to_equal_temperament_flips_small_equave() {
        let down = ExtendedMonzo::from_equal_temperament(&fraction(-5, 12), &fraction(2, 1), 3).unwrap();
        assert_eq!(down.to_equal_temperament().unwrap(), (fraction(-5, 12), fraction(2, 1)));

        // A plain 2/3 comes back as -1 steps of 3/2
        assert_eq!(monzo(2, 3).to_equal_temperament().unwrap(), (fraction(-1, 1), fraction(3, 2)));
    }

    #[test]
    fn test_to_equal_temperament_unison() {
        let unison = ExtendedMonzo::unison(3).unwrap();
        assert_eq!(unison.to_equal_temperament().unwrap(), (fraction(0, 1), fraction(1, 1)));
    }

    #[test]
    fn test_to_equal_temperament_errors() {
        let with_cents = ExtendedMonzo::from_cents(100.0, 3).unwrap();
        assert_eq!(
            with_cents.to_equal_temperament().unwrap_err(),
            MonzoError::IrrationalEqualTemperament
        );
        let with_residual = ExtendedMonzo::from_fraction(&fraction(11, 8), 3).unwrap();
        assert_eq!(
            with_residual.to_equal_temperament().unwrap_err(),
            MonzoError::ResidualEqualTemperament
        );
    }

    #[test]
    fn test_predicates() {
        assert!(monzo(9, 8).is_fractional());
        assert!(monzo(9, 8).is_equal_temperament());
        assert!(!monzo(9, 8).is_power_of_two());
        assert!(monzo(4, 1).is_power_of_two());

        let half_octave = ExtendedMonzo::from_equal_temperament(&fraction(1, 2), &fraction(2, 1), 3).unwrap();
        assert!(!half_octave.is_fractional());
        assert!(half_octave.is_power_of_two());

        let eleven = ExtendedMonzo::from_number(11, 3).unwrap();
        assert!(eleven.is_fractional());
        assert!(!eleven.is_equal_temperament());
    }

    #[test]
    fn test_strict_and_loose_equality() {
        let exact = monzo(2, 1);
        let approximate = ExtendedMonzo::from_cents(1200.0, 4).unwrap();
        assert!(exact.equals(&approximate));
        assert!(!exact.strict_equals(&approximate));
        assert_eq!(exact.compare(&approximate), Ordering::Equal);
        assert_eq!(monzo(3, 2).compare(&monzo(4, 3)), Ordering::Greater);
    }
}
