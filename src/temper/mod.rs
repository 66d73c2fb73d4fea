//! Regular temperaments.
//!
//! This module provides:
//! - [`Mapping`] - a tempered image for every prime, built from commas or a val
//! - [`optimize`] - least-angle and minimax tuning of a mapping
//! - [`linalg`] - the small dense vector routines both rely on

pub mod linalg;
pub mod optimize;
mod mapping;

pub use mapping::{Mapping, MappingError};
pub use optimize::{least_angle_temper, minimax};
