//! Nearest-fraction search within an odd limit.
//!
//! A fraction is within odd limit `L` when both its numerator and denominator,
//! with all factors of two removed, are at most `L`.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::One;

use crate::exact::fraction::{cents_of, Fraction};

/// The fraction within `limit` whose pitch is closest to `cents`.
///
/// Candidates are octave-reduced odd-limit ratios; the octave of the target
/// is restored afterwards. A limit of zero behaves like a limit of one (pure
/// octaves only).
pub fn approximate_odd_limit(cents: f64, limit: u32) -> Fraction {
    let limit = u64::from(limit.max(1));
    let octaves = (cents / 1200.0).floor();
    let reduced = cents - octaves * 1200.0;

    let mut best = Fraction::one();
    let mut best_shift = 0i64;
    let mut best_error = f64::INFINITY;

    for numerator in (1..=limit).step_by(2) {
        for denominator in (1..=limit).step_by(2) {
            if numerator.gcd(&denominator) != 1 {
                continue;
            }
            let candidate = octave_reduce(numerator, denominator);
            let candidate_cents = cents_of(&candidate);
            for shift in -1i64..=1 {
                let error = (candidate_cents + 1200.0 * shift as f64 - reduced).abs();
                if error < best_error {
                    best_error = error;
                    best = candidate.clone();
                    best_shift = shift;
                }
            }
        }
    }

    let total_shift = octaves as i64 + best_shift;
    let two = BigInt::from(2);
    let power = two.pow(total_shift.unsigned_abs() as u32);
    if total_shift >= 0 {
        best * Fraction::from_integer(power)
    } else {
        best / Fraction::from_integer(power)
    }
}

/// Multiply `n/d` by a power of two so it lands in `[1, 2)`.
fn octave_reduce(numerator: u64, denominator: u64) -> Fraction {
    let mut n = BigInt::from(numerator);
    let mut d = BigInt::from(denominator);
    while n < d {
        n *= 2u32;
    }
    while n >= &d * 2u32 {
        d *= 2u32;
    }
    Fraction::new(n, d)
}
