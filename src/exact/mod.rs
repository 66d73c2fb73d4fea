//! Exact number primitives.
//!
//! This module provides the building blocks the monzo algebra rests on:
//! - [`Fraction`] - an arbitrary-precision rational ([`num_rational::BigRational`])
//! - [`PRIMES`] - the canonical ascending prime table that monzo components index into
//! - [`continued`] - continued fractions, convergents and semiconvergents
//! - [`odd_limit`] - nearest-fraction search within an odd limit

mod fraction;
mod primes;
pub mod continued;
pub mod odd_limit;

pub use fraction::{
    cents_of, cents_to_value, fraction, ln_bigint, ln_fraction, pow_fraction, round_to_bigint,
    to_f64, value_to_cents, Fraction, CENTS_PER_NAT,
};
pub use primes::{factorize, prime, prime_cents, prime_index, prime_nats, MAX_COMPONENTS, PRIMES};
