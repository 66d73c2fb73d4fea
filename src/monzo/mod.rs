//! Interval values in extended monzo form.
//!
//! This module provides:
//! - [`ExtendedMonzo`] - exact prime exponents with rational and irrational fallbacks
//! - conversions back to fractions, cents and equal temperament steps
//! - continued fraction approximations
//! - [`parse_interval`] - text notation (`3/2`, `7\12`, `701.955`, `[-1 1>`)

mod extended;
mod convert;
mod approx;
pub mod parse;

pub use extended::{ExtendedMonzo, MonzoError};
pub use parse::{parse_fraction, parse_interval, parse_subgroup, ParseError};
