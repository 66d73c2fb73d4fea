//! Regular temperament mappings.
//!
//! A [`Mapping`] holds one column per prime: the tempered image of that
//! prime as a monzo. Applying it is a linear combination of columns.
//!
//! Two ways to build one:
//! - [`Mapping::from_comma_list`]: temper out commas over a prime subgroup,
//!   staying as close to just intonation as the commas allow
//! - [`Mapping::from_patent_val`]: round every prime to an equal division

use std::f64::consts::LN_2;

use num_bigint::BigInt;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, TemperConfig};
use crate::exact::{self, Fraction, CENTS_PER_NAT};
use crate::monzo::{ExtendedMonzo, MonzoError};
use crate::scale::{Scale, ScaleError};
use crate::temper::linalg::cross;
use crate::temper::optimize::{least_angle_temper, minimax};

/// A linear map from just intervals to tempered intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MappingParts")]
pub struct Mapping {
    columns: Vec<ExtendedMonzo>,
}

#[derive(Deserialize)]
struct MappingParts {
    columns: Vec<ExtendedMonzo>,
}

impl TryFrom<MappingParts> for Mapping {
    type Error = MappingError;

    fn try_from(parts: MappingParts) -> Result<Self, Self::Error> {
        Self::new(parts.columns)
    }
}

impl Mapping {
    /// Create a mapping from explicit columns, one per component.
    pub fn new(columns: Vec<ExtendedMonzo>) -> Result<Self, MappingError> {
        let k = columns.len();
        if let Some(bad) = columns.iter().find(|c| c.number_of_components() != k) {
            return Err(MonzoError::LengthMismatch {
                left: bad.number_of_components(),
                right: k,
            }
            .into());
        }
        Ok(Self { columns })
    }

    /// The identity: every prime maps to itself.
    pub fn identity(number_of_components: usize) -> Result<Self, MappingError> {
        let columns = (0..number_of_components)
            .map(|i| ExtendedMonzo::basis(i, number_of_components))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { columns })
    }

    /// Tempered image of each prime.
    #[inline]
    pub fn columns(&self) -> &[ExtendedMonzo] {
        &self.columns
    }

    #[inline]
    pub fn number_of_components(&self) -> usize {
        self.columns.len()
    }

    /// Size of each tempered prime in cents.
    pub fn tempered_cents(&self) -> Vec<f64> {
        self.columns.iter().map(ExtendedMonzo::total_cents).collect()
    }

    /// Temper out `commas` over the primes at `subgroup` indices using the
    /// default optimizer settings.
    ///
    /// See [`Mapping::from_comma_list_with`].
    pub fn from_comma_list(
        commas: &[ExtendedMonzo],
        subgroup: &[usize],
        metric: Option<&[f64]>,
        constraints: &[ExtendedMonzo],
    ) -> Result<Self, MappingError> {
        Self::from_comma_list_with(commas, subgroup, metric, constraints, &TemperConfig::default())
    }

    /// Temper out `commas` over the primes at `subgroup` indices.
    ///
    /// `metric` weights each subgroup prime's error; a larger weight makes
    /// that prime's error count less. Every interval in `constraints` is kept
    /// just. Primes outside the subgroup are left alone.
    ///
    /// The component count is taken from the commas or constraints, falling
    /// back to `config.number_of_components` when both lists are empty.
    pub fn from_comma_list_with(
        commas: &[ExtendedMonzo],
        subgroup: &[usize],
        metric: Option<&[f64]>,
        constraints: &[ExtendedMonzo],
        config: &TemperConfig,
    ) -> Result<Self, MappingError> {
        config.validate()?;
        let k = commas
            .iter()
            .chain(constraints)
            .map(ExtendedMonzo::number_of_components)
            .next()
            .unwrap_or(config.number_of_components);

        for comma in commas {
            check_algebraic(comma, k, MappingError::NonAlgebraicComma)?;
        }
        for constraint in constraints {
            check_algebraic(constraint, k, MappingError::NonAlgebraicConstraint)?;
        }
        check_subgroup(subgroup, k)?;

        let weights = match metric {
            Some(metric) => check_metric(metric, subgroup.len())?,
            None => vec![1.0; subgroup.len()],
        };

        let just: Vec<f64> = subgroup.iter().map(|&i| exact::prime_nats(i)).collect();
        let weighted_just: Vec<f64> = just.iter().zip(&weights).map(|(j, w)| j / w).collect();
        let to_coordinates = |interval: &ExtendedMonzo| -> Vec<f64> {
            subgroup
                .iter()
                .zip(&weights)
                .map(|(&i, w)| exact::to_f64(&interval.vector()[i]) * w)
                .collect()
        };
        let comma_coordinates: Vec<Vec<f64>> = commas.iter().map(to_coordinates).collect();
        let constraint_coordinates: Vec<Vec<f64>> = constraints.iter().map(to_coordinates).collect();

        let least_angle = |constraints: &[Vec<f64>]| {
            least_angle_temper(
                &weighted_just,
                &comma_coordinates,
                constraints,
                config.iterations,
                config.step_size,
            )
        };

        let rank = subgroup.len() as isize - commas.len() as isize;
        debug!(
            rank,
            commas = commas.len(),
            constraints = constraints.len(),
            subgroup = ?subgroup,
            "building mapping from comma list"
        );

        let weighted_mapping = if !constraint_coordinates.is_empty() {
            least_angle(&constraint_coordinates)
        } else {
            let closed_form = match rank {
                1 => Some(cross(&comma_coordinates)),
                2 => {
                    let mut vectors = vec![weighted_just.clone()];
                    vectors.extend(comma_coordinates.iter().cloned());
                    let complement = cross(&vectors);
                    vectors[0] = complement;
                    Some(cross(&vectors))
                }
                _ => None,
            };
            match closed_form {
                Some(val) if val.iter().any(|&x| x != 0.0) => minimax(&val, &weighted_just),
                Some(_) => {
                    debug!("commas are linearly dependent, falling back to least-angle tempering");
                    least_angle(&[])
                }
                None => least_angle(&[]),
            }
        };

        let mapping: Vec<f64> = weighted_mapping
            .iter()
            .zip(&weights)
            .map(|(m, w)| m * w)
            .collect();

        let mut offsets = vec![0.0; k];
        for ((&i, mapped), just) in subgroup.iter().zip(&mapping).zip(&just) {
            offsets[i] = (mapped - just) * CENTS_PER_NAT;
        }
        let columns = offsets
            .into_iter()
            .enumerate()
            .map(|(i, offset)| ExtendedMonzo::basis(i, k).map(|column| column.with_cents(offset)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns })
    }

    /// The patent val of `number_of_steps` equal divisions of `equave`,
    /// with `offsets` (warts) added to the rounded step counts.
    ///
    /// Primes past the end of `offsets` get no offset.
    pub fn from_patent_val(
        number_of_steps: u32,
        equave: &Fraction,
        offsets: &[i64],
        number_of_components: usize,
    ) -> Result<Self, MappingError> {
        if number_of_steps == 0 {
            return Err(MonzoError::DivisionByZero.into());
        }
        if offsets.len() > number_of_components {
            return Err(MappingError::NotEnoughComponents {
                needed: offsets.len(),
                got: number_of_components,
            });
        }
        if *equave <= Fraction::one() {
            return Err(MappingError::InvalidEquave(equave.to_string()));
        }

        let val_norm = f64::from(number_of_steps) / exact::ln_fraction(equave);
        let divisions = BigInt::from(number_of_steps);
        let columns = (0..number_of_components)
            .map(|i| {
                let offset = offsets.get(i).copied().unwrap_or(0);
                let steps = (exact::prime_nats(i) * val_norm).round() as i64 + offset;
                let fraction_of_equave = Fraction::new(BigInt::from(steps), divisions.clone());
                ExtendedMonzo::from_equal_temperament(&fraction_of_equave, equave, number_of_components)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns })
    }

    /// Rescale the whole mapping so the first prime maps to a just octave.
    pub fn pure_octaves(&self) -> Result<Self, MappingError> {
        let octave = self
            .columns
            .first()
            .map(ExtendedMonzo::total_nats)
            .filter(|&nats| nats != 0.0 && nats.is_finite())
            .ok_or(MappingError::DegenerateOctave)?;
        let factor = LN_2 / octave;
        Ok(Self {
            columns: self.columns.iter().map(|c| c.stretch(factor)).collect(),
        })
    }

    /// Map an interval. Its residual and cents offset pass through unchanged.
    pub fn apply(&self, interval: &ExtendedMonzo) -> Result<ExtendedMonzo, MappingError> {
        let k = self.number_of_components();
        if interval.number_of_components() != k {
            return Err(MonzoError::LengthMismatch {
                left: interval.number_of_components(),
                right: k,
            }
            .into());
        }

        let mut result = ExtendedMonzo::new(
            vec![Fraction::zero(); k],
            interval.residual().clone(),
            interval.cents(),
        )?;
        for (column, exponent) in self.columns.iter().zip(interval.vector()) {
            if exponent.is_zero() {
                continue;
            }
            result = result.add(&column.mul(exponent))?;
        }
        Ok(result)
    }

    /// Map every interval of a scale, and its equave.
    pub fn apply_scale(&self, scale: &Scale) -> Result<Scale, MappingError> {
        let intervals = scale
            .intervals()
            .iter()
            .map(|interval| self.apply(interval))
            .collect::<Result<Vec<_>, _>>()?;
        let equave = self.apply(scale.equave())?;
        Ok(Scale::new(intervals, equave, scale.base_frequency())?)
    }
}

fn check_algebraic(interval: &ExtendedMonzo, k: usize, error: MappingError) -> Result<(), MappingError> {
    if interval.number_of_components() != k {
        return Err(MonzoError::LengthMismatch {
            left: interval.number_of_components(),
            right: k,
        }
        .into());
    }
    if !interval.residual().is_one() || interval.cents() != 0.0 {
        return Err(error);
    }
    Ok(())
}

fn check_subgroup(subgroup: &[usize], k: usize) -> Result<(), MappingError> {
    for (position, &index) in subgroup.iter().enumerate() {
        if index >= k {
            return Err(MonzoError::NeedMoreComponents { needed: index + 1, got: k }.into());
        }
        if subgroup[..position].contains(&index) {
            return Err(MappingError::InvalidSubgroup(format!(
                "prime {} appears twice",
                exact::prime(index)
            )));
        }
    }
    Ok(())
}

fn check_metric(metric: &[f64], subgroup_size: usize) -> Result<Vec<f64>, MappingError> {
    if metric.len() != subgroup_size {
        return Err(MappingError::InvalidMetric(format!(
            "expected {} weights, got {}",
            subgroup_size,
            metric.len()
        )));
    }
    if let Some(bad) = metric.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
        return Err(MappingError::InvalidMetric(format!(
            "weights must be positive, got {}",
            bad
        )));
    }
    Ok(metric.to_vec())
}

/// Errors from temperament construction and application.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    #[error("Non-algebraic comma")]
    NonAlgebraicComma,

    #[error("Non-algebraic constraint")]
    NonAlgebraicConstraint,

    #[error("Not enough components for {needed} val offsets, only {got} in use")]
    NotEnoughComponents { needed: usize, got: usize },

    #[error("invalid subgroup: {0}")]
    InvalidSubgroup(String),

    #[error("invalid metric: {0}")]
    InvalidMetric(String),

    #[error("equave must be greater than 1, got {0}")]
    InvalidEquave(String),

    #[error("the first prime maps to a unison, pure octaves are undefined")]
    DegenerateOctave,

    #[error(transparent)]
    Monzo(#[from] MonzoError),

    #[error(transparent)]
    Scale(#[from] ScaleError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
