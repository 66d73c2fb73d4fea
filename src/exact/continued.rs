//! Continued fraction expansions and the rational approximations built from them.
//!
//! Expansions are stored as their partial quotients `[a0; a1, a2, ...]`. Every
//! quotient after the first is positive.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{FromPrimitive, One, Signed, Zero};

use crate::exact::fraction::{to_f64, Fraction};

/// Maximum number of terms extracted from a floating point value.
pub const MAX_FLOAT_TERMS: usize = 32;

/// A floating point remainder smaller than this ends the expansion.
///
/// Values produced by cents arithmetic carry a little rounding noise, which
/// would otherwise show up as one enormous trailing quotient.
pub const FLOAT_TERM_EPSILON: f64 = 1e-9;

/// Exact expansion of a fraction (Euclid's algorithm).
pub fn continued_fraction(value: &Fraction) -> Vec<BigInt> {
    let mut terms = Vec::new();
    let mut numer = value.numer().clone();
    let mut denom = value.denom().clone();

    while !denom.is_zero() {
        let (quotient, remainder) = numer.div_mod_floor(&denom);
        terms.push(quotient);
        numer = denom;
        denom = remainder;
    }

    terms
}

/// Expansion of a floating point value, up to [`MAX_FLOAT_TERMS`] terms.
///
/// Non-finite input has no expansion.
pub fn continued_fraction_f64(value: f64) -> Vec<BigInt> {
    let mut terms = Vec::new();
    if !value.is_finite() {
        return terms;
    }

    let mut x = value;
    for _ in 0..MAX_FLOAT_TERMS {
        let whole = x.floor();
        let Some(term) = BigInt::from_f64(whole) else {
            break;
        };
        terms.push(term);
        let rest = x - whole;
        if rest < FLOAT_TERM_EPSILON {
            break;
        }
        x = rest.recip();
    }

    terms
}

/// Rebuild the fraction a (truncated) expansion stands for.
///
/// Works from the innermost term outward: `result = 1/result + term`.
/// Returns `None` for an empty expansion or one that would divide by zero.
pub fn from_continued_fraction(terms: &[BigInt]) -> Option<Fraction> {
    let (last, rest) = terms.split_last()?;
    let mut result = Fraction::from_integer(last.clone());
    for term in rest.iter().rev() {
        if result.is_zero() {
            return None;
        }
        result = result.recip() + Fraction::from_integer(term.clone());
    }
    Some(result)
}

/// The convergent made of the first `depth + 1` terms.
///
/// Expansions shorter than that yield their exact value.
pub fn convergent(terms: &[BigInt], depth: usize) -> Option<Fraction> {
    let end = terms.len().min(depth.saturating_add(1));
    from_continued_fraction(&terms[..end])
}

/// All convergents of an expansion, in order.
pub fn convergents(terms: &[BigInt]) -> Vec<Fraction> {
    let mut result = Vec::with_capacity(terms.len());
    let (mut h, mut k) = (BigInt::one(), BigInt::zero());
    let (mut h_prev, mut k_prev) = (BigInt::zero(), BigInt::one());
    for term in terms {
        let h_next = term * &h + &h_prev;
        let k_next = term * &k + &k_prev;
        h_prev = std::mem::replace(&mut h, h_next);
        k_prev = std::mem::replace(&mut k, k_next);
        result.push(Fraction::new(h.clone(), k.clone()));
    }
    result
}

/// Best rational approximations, including semiconvergents, in order of
/// increasing denominator.
///
/// Between convergents `p(n-2)/q(n-2)` and `pn/qn` lie the fractions with
/// partial quotient `j` in place of `an`. Those with `j > an/2` are always
/// best approximations. The halfway one (`j = an/2`) only counts when it beats
/// the previous convergent. At most `max_length` fractions are returned.
pub fn semiconvergents(terms: &[BigInt], max_length: usize) -> Vec<Fraction> {
    let mut result = Vec::new();
    let Some((first, rest)) = terms.split_first() else {
        return result;
    };
    if max_length == 0 {
        return result;
    }

    let Some(target) = from_continued_fraction(terms) else {
        return result;
    };
    result.push(Fraction::from_integer(first.clone()));

    let (mut h_prev, mut k_prev) = (BigInt::one(), BigInt::zero());
    let (mut h, mut k) = (first.clone(), BigInt::one());

    for term in rest {
        let two = BigInt::from(2);
        let mut j = (term + BigInt::one()) / &two;
        while &j <= term {
            let candidate = Fraction::new(&j * &h + &h_prev, &j * &k + &k_prev);
            let halfway = &j * &two == *term;
            let admissible = !halfway || {
                let previous = Fraction::new(h.clone(), k.clone());
                (&candidate - &target).abs() < (&previous - &target).abs()
            };
            if admissible {
                result.push(candidate);
                if result.len() >= max_length {
                    return result;
                }
            }
            j += 1u32;
        }
        let h_next = term * &h + &h_prev;
        let k_next = term * &k + &k_prev;
        h_prev = std::mem::replace(&mut h, h_next);
        k_prev = std::mem::replace(&mut k, k_next);
    }

    result
}

/// Simplest convergent of `value` within `epsilon` of it.
///
/// Falls back to the last convergent available when none is close enough.
pub fn simplify(value: f64, epsilon: f64) -> Option<Fraction> {
    let terms = continued_fraction_f64(value);
    let all = convergents(&terms);
    let close = all
        .iter()
        .find(|candidate| (to_f64(candidate) - value).abs() <= epsilon)
        .cloned();
    close.or_else(|| all.last().cloned())
}
