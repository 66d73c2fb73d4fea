//! # Temper Engine
//!
//! Exact interval arithmetic and regular temperament mapping for
//! microtonal tuning.
//!
//! Intervals are [`ExtendedMonzo`]s: exact prime exponents, with a rational
//! residual and a cents offset for whatever the primes cannot express.
//! A [`Mapping`] tempers them, either by removing commas from a prime
//! subgroup or by rounding primes to an equal division.
//!
//! ```
//! use temper::{parse_interval, Mapping};
//!
//! let meantone = Mapping::from_comma_list(
//!     &[parse_interval("81/80", 3).unwrap()],
//!     &[0, 1, 2],
//!     None,
//!     &[],
//! )
//! .unwrap();
//! let fifth = meantone.apply(&parse_interval("3/2", 3).unwrap()).unwrap();
//! assert!((fifth.total_cents() - 697.0).abs() < 1.0);
//! ```

pub mod exact;
pub mod monzo;
pub mod temper;
pub mod scale;
pub mod config;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use exact::{fraction, Fraction};
pub use monzo::{parse_interval, parse_subgroup, ExtendedMonzo, MonzoError, ParseError};
pub use temper::{Mapping, MappingError};
pub use scale::{Scale, ScaleError};
pub use config::{ConfigError, TemperConfig};
