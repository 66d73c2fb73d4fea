//! The prime table and trial-division factorization.
//!
//! Monzo components are implicitly indexed by this table: component 0 is the
//! exponent of 2, component 1 the exponent of 3, and so on.

use num_bigint::BigInt;
use num_traits::Zero;

/// The first 64 primes in ascending order.
pub const PRIMES: [u32; 64] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293,
    307, 311,
];

/// Largest supported vector length.
pub const MAX_COMPONENTS: usize = PRIMES.len();

/// Get the prime at a component index.
///
/// # Panics
/// Panics if `index >= MAX_COMPONENTS`.
#[inline]
pub fn prime(index: usize) -> u32 {
    PRIMES[index]
}

/// Find the component index of a prime, if it is tabulated.
pub fn prime_index(p: u32) -> Option<usize> {
    PRIMES.binary_search(&p).ok()
}

/// Natural logarithm of the prime at `index`.
#[inline]
pub fn prime_nats(index: usize) -> f64 {
    f64::from(prime(index)).ln()
}

/// Size of the prime at `index` in cents.
#[inline]
pub fn prime_cents(index: usize) -> f64 {
    1200.0 * f64::from(prime(index)).log2()
}

/// Divide the first `number_of_components` primes out of `n`.
///
/// Returns the exponent of each prime and whatever is left over. The sign of
/// `n` stays with the remainder. Zero has no factorization and is returned
/// untouched with all exponents zero.
pub fn factorize(n: &BigInt, number_of_components: usize) -> (Vec<i64>, BigInt) {
    let mut exponents = vec![0i64; number_of_components];
    let mut rest = n.clone();
    if rest.is_zero() {
        return (exponents, rest);
    }

    for (exponent, &p) in exponents.iter_mut().zip(PRIMES.iter()) {
        while (&rest % p).is_zero() {
            rest /= p;
            *exponent += 1;
        }
    }

    (exponents, rest)
}
