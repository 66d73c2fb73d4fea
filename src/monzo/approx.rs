//! Rational approximations of monzos.
//!
//! Exactly representable monzos expand through their fraction; everything
//! else expands through its floating point value.

use num_bigint::BigInt;
use num_traits::Zero;

use crate::exact::{self, continued, odd_limit, Fraction};
use crate::monzo::{ExtendedMonzo, MonzoError};

impl ExtendedMonzo {
    /// Nearest harmonic `n/denominator`.
    pub fn approximate_harmonic(&self, denominator: u64) -> Result<Fraction, MonzoError> {
        if denominator == 0 {
            return Err(MonzoError::DivisionByZero);
        }
        let numerator = exact::round_to_bigint(self.value_of() * denominator as f64)
            .ok_or(MonzoError::NonFinite)?;
        Ok(Fraction::new(numerator, BigInt::from(denominator)))
    }

    /// Nearest subharmonic `numerator/n`.
    pub fn approximate_subharmonic(&self, numerator: u64) -> Result<Fraction, MonzoError> {
        let denominator = exact::round_to_bigint(numerator as f64 / self.value_of())
            .ok_or(MonzoError::NonFinite)?;
        if denominator.is_zero() {
            return Err(MonzoError::DivisionByZero);
        }
        Ok(Fraction::new(BigInt::from(numerator), denominator))
    }

    /// Nearest fraction within an odd limit.
    pub fn approximate_odd_limit(&self, limit: u32) -> Fraction {
        odd_limit::approximate_odd_limit(self.total_cents(), limit)
    }

    /// Simplest convergent within `epsilon` of the interval's value.
    pub fn approximate_simple(&self, epsilon: f64) -> Result<Fraction, MonzoError> {
        continued::simplify(self.value_of(), epsilon).ok_or(MonzoError::NonFinite)
    }

    /// Convergent from the first `depth + 1` terms of the continued fraction.
    pub fn get_convergent(&self, depth: usize) -> Result<Fraction, MonzoError> {
        continued::convergent(&self.continued_fraction(), depth).ok_or(MonzoError::NonFinite)
    }

    /// The `depth`-th best rational approximation, counting semiconvergents.
    ///
    /// Expansions with fewer approximations yield their last one.
    pub fn get_semiconvergent(&self, depth: usize) -> Result<Fraction, MonzoError> {
        let semis = continued::semiconvergents(&self.continued_fraction(), depth.saturating_add(1));
        let index = depth.min(semis.len().saturating_sub(1));
        semis.get(index).cloned().ok_or(MonzoError::NonFinite)
    }

    fn continued_fraction(&self) -> Vec<BigInt> {
        match self.to_fraction() {
            Ok(value) => continued::continued_fraction(&value),
            Err(_) => continued::continued_fraction_f64(self.value_of()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exact::fraction;

    fn monzo(n: i64, d: i64) -> ExtendedMonzo {
        ExtendedMonzo::from_fraction(&fraction(n, d), 3).unwrap()
    }

    #[test]
    fn test_approximate_harmonic() {
        let fifth = ExtendedMonzo::from_cents(700.0, 3).unwrap();
        assert_eq!(fifth.approximate_harmonic(8).unwrap(), fraction(12, 8));
        assert_eq!(fifth.approximate_harmonic(0).unwrap_err(), MonzoError::DivisionByZero);
    }

    #[test]
    fn test_approximate_subharmonic() {
        let fourth = ExtendedMonzo::from_cents(500.0, 3).unwrap();
        assert_eq!(fourth.approximate_subharmonic(16).unwrap(), fraction(4, 3));
    }

    #[test]
    fn test_approximate_odd_limit() {
        let third = ExtendedMonzo::from_cents(390.0, 3).unwrap();
        assert_eq!(third.approximate_odd_limit(5), fraction(5, 4));
    }

    #[test]
    fn test_approximate_simple() {
        let fifth = ExtendedMonzo::from_cents(701.955, 3).unwrap();
        assert_eq!(fifth.approximate_simple(1e-4).unwrap(), fraction(3, 2));
    }

    #[test]
    fn test_convergents_of_half_octave() {
        let tritone = ExtendedMonzo::from_equal_temperament(&fraction(1, 2), &fraction(2, 1), 1).unwrap();
        assert_eq!(tritone.get_convergent(0).unwrap(), fraction(1, 1));
        assert_eq!(tritone.get_convergent(1).unwrap(), fraction(3, 2));
        assert_eq!(tritone.get_convergent(2).unwrap(), fraction(7, 5));
        assert_eq!(tritone.get_convergent(3).unwrap(), fraction(17, 12));
    }

    #[test]
    fn test_convergents_of_exact_fraction() {
        let m = monzo(45, 32);
        // 45/32 = [1; 2, 2, 6]
        assert_eq!(m.get_convergent(1).unwrap(), fraction(3, 2));
        assert_eq!(m.get_convergent(2).unwrap(), fraction(7, 5));
        assert_eq!(m.get_convergent(3).unwrap(), fraction(45, 32));
        assert_eq!(m.get_convergent(100).unwrap(), fraction(45, 32));
    }

    #[test]
    fn test_semiconvergents_of_pi() {
        let pi = ExtendedMonzo::from_value(std::f64::consts::PI, 0).unwrap();
        let expected = [(3, 1), (13, 4), (16, 5), (19, 6), (22, 7), (179, 57)];
        for (depth, &(n, d)) in expected.iter().enumerate() {
            assert_eq!(pi.get_semiconvergent(depth).unwrap(), fraction(n, d));
        }
    }

    #[test]
    fn test_semiconvergent_past_the_end() {
        let m = monzo(3, 2);
        assert_eq!(m.get_semiconvergent(50).unwrap(), fraction(3, 2));
    }

    #[test]
    fn test_unbounded_depth_yields_exact_value() {
        let m = monzo(45, 32);
        assert_eq!(m.get_convergent(usize::MAX).unwrap(), fraction(45, 32));
        assert_eq!(m.get_semiconvergent(usize::MAX).unwrap(), fraction(45, 32));
    }
}
