//! A periodic scale of intervals above a base frequency.
//!
//! Only what retuning needs: the interval list, its equave, and lookups that
//! wrap around the equave in both directions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::monzo::{ExtendedMonzo, MonzoError};

/// A scale: degrees `1..=size` above the unison, the last being the equave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScaleParts")]
pub struct Scale {
    intervals: Vec<ExtendedMonzo>,
    equave: ExtendedMonzo,
    base_frequency: f64,
}

#[derive(Deserialize)]
struct ScaleParts {
    intervals: Vec<ExtendedMonzo>,
    equave: ExtendedMonzo,
    base_frequency: f64,
}

impl TryFrom<ScaleParts> for Scale {
    type Error = ScaleError;

    fn try_from(parts: ScaleParts) -> Result<Self, Self::Error> {
        Self::new(parts.intervals, parts.equave, parts.base_frequency)
    }
}

impl Scale {
    /// Create a scale with an explicit equave.
    pub fn new(
        intervals: Vec<ExtendedMonzo>,
        equave: ExtendedMonzo,
        base_frequency: f64,
    ) -> Result<Self, ScaleError> {
        if intervals.is_empty() {
            return Err(ScaleError::Empty);
        }
        let components = equave.number_of_components();
        if let Some(bad) = intervals.iter().find(|i| i.number_of_components() != components) {
            return Err(ScaleError::Monzo(MonzoError::LengthMismatch {
                left: bad.number_of_components(),
                right: components,
            }));
        }
        Ok(Self { intervals, equave, base_frequency })
    }

    /// Create a scale whose equave is its last interval.
    pub fn from_intervals(intervals: Vec<ExtendedMonzo>, base_frequency: f64) -> Result<Self, ScaleError> {
        let equave = intervals.last().cloned().ok_or(ScaleError::Empty)?;
        Self::new(intervals, equave, base_frequency)
    }

    /// Number of degrees per equave.
    #[inline]
    pub fn size(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn intervals(&self) -> &[ExtendedMonzo] {
        &self.intervals
    }

    #[inline]
    pub fn equave(&self) -> &ExtendedMonzo {
        &self.equave
    }

    #[inline]
    pub fn base_frequency(&self) -> f64 {
        self.base_frequency
    }

    /// Interval of a degree relative to the unison. Negative degrees go down.
    pub fn get_monzo(&self, index: i64) -> Result<ExtendedMonzo, MonzoError> {
        let size = self.size() as i64;
        let equaves = index.div_euclid(size);
        let degree = index.rem_euclid(size) as usize;
        let within = if degree == 0 {
            ExtendedMonzo::unison(self.equave.number_of_components())?
        } else {
            self.intervals[degree - 1].clone()
        };
        within.add(&self.equave.mul_integer(equaves))
    }

    /// Frequency of a degree in Hz.
    pub fn get_frequency(&self, index: i64) -> Result<f64, MonzoError> {
        Ok(self.base_frequency * self.get_monzo(index)?.value_of())
    }
}

/// Errors from scale construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    #[error("a scale needs at least one interval")]
    Empty,

    #[error(transparent)]
    Monzo(#[from] MonzoError),
}
