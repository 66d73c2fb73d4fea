//! Tuning optimizers.
//!
//! [`least_angle_temper`] is a fixed-iteration heuristic: it alternates
//! projecting commas out of the mapping with gradient nudges toward just
//! constraints. There is no convergence check; the defaults below are tuned
//! by hand, not derived.

use tracing::trace;

use crate::temper::linalg::{dot, orthonormalize, scale, sub_scaled_in_place};

/// Default number of optimizer sweeps.
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Default gradient step for constraints.
pub const DEFAULT_STEP_SIZE: f64 = 0.5;

/// Move `just_point` the least distance needed to temper out `commas`,
/// while pulling each constraint's mapped size toward its just size.
///
/// All vectors are in the same (possibly weighted) coordinates. The inputs
/// are never modified.
pub fn least_angle_temper(
    just_point: &[f64],
    commas: &[Vec<f64>],
    constraints: &[Vec<f64>],
    iterations: usize,
    step_size: f64,
) -> Vec<f64> {
    // An orthonormal basis removes the whole comma span in one sweep
    let commas = orthonormalize(commas);
    let just_factors: Vec<f64> = constraints.iter().map(|c| dot(c, just_point)).collect();

    let mut mapping = just_point.to_vec();
    for _ in 0..iterations {
        for comma in &commas {
            let projection = dot(&mapping, comma);
            sub_scaled_in_place(&mut mapping, comma, projection);
        }
        for (constraint, just_factor) in constraints.iter().zip(&just_factors) {
            let mapped_factor = dot(constraint, &mapping);
            let step = (mapped_factor - just_factor) * mapped_factor * step_size;
            sub_scaled_in_place(&mut mapping, constraint, step);
        }
    }

    trace!(
        residuals = ?commas.iter().map(|c| dot(&mapping, c)).collect::<Vec<_>>(),
        "least-angle tempering finished"
    );
    mapping
}

/// Uniformly rescale `mapping` to minimize the worst absolute error against
/// `just_point`.
///
/// Each candidate makes the sum of one pair of coordinates (a coordinate may
/// pair with itself) just. Pairs whose mapped sum is zero are skipped. If no
/// pair qualifies the mapping is returned unchanged.
pub fn minimax(mapping: &[f64], just_point: &[f64]) -> Vec<f64> {
    let mut best = mapping.to_vec();
    let mut best_error = f64::INFINITY;

    for i in 0..mapping.len() {
        for j in i..mapping.len() {
            let mapped = mapping[i] + mapping[j];
            if mapped == 0.0 {
                continue;
            }
            let candidate = scale(mapping, (just_point[i] + just_point[j]) / mapped);
            let error = candidate
                .iter()
                .zip(just_point)
                .map(|(c, j)| (c - j).abs())
                .fold(0.0, f64::max);
            if error < best_error {
                best_error = error;
                best = candidate;
            }
        }
    }

    best
}
