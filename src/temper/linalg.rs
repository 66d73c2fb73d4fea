//! Small dense vector helpers for temperament optimization.
//!
//! Dimensions are the size of a prime subgroup (rarely more than ten), so
//! plain slices and cofactor expansion are enough.

/// Dot product.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Euclidean length.
#[inline]
pub fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// `a * scalar` as a new vector.
pub fn scale(a: &[f64], scalar: f64) -> Vec<f64> {
    a.iter().map(|x| x * scalar).collect()
}

/// `target -= v * scalar`, in place.
///
/// Only ever called on working buffers owned by the caller's computation.
#[inline]
pub(crate) fn sub_scaled_in_place(target: &mut [f64], v: &[f64], scalar: f64) {
    for (t, x) in target.iter_mut().zip(v) {
        *t -= x * scalar;
    }
}

/// Orthonormal basis for the span of `vectors` by modified Gram-Schmidt.
///
/// Vectors that are (numerically) dependent on earlier ones are dropped, so
/// the result may be shorter than the input.
pub fn orthonormalize(vectors: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let mut basis: Vec<Vec<f64>> = Vec::with_capacity(vectors.len());
    for vector in vectors {
        let length = norm(vector);
        if length == 0.0 {
            continue;
        }
        let mut residual = vector.clone();
        for unit in &basis {
            let projection = dot(&residual, unit);
            sub_scaled_in_place(&mut residual, unit, projection);
        }
        let remaining = norm(&residual);
        if remaining > length * 1e-9 {
            basis.push(scale(&residual, remaining.recip()));
        }
    }
    basis
}

/// Determinant by recursive cofactor expansion along the first row.
///
/// The empty matrix has determinant 1.
///
/// # Panics
/// Panics if the matrix is not square.
pub fn determinant(matrix: &[Vec<f64>]) -> f64 {
    let n = matrix.len();
    assert!(
        matrix.iter().all(|row| row.len() == n),
        "determinant of a non-square {}-row matrix",
        n
    );
    match n {
        0 => 1.0,
        1 => matrix[0][0],
        2 => matrix[0][0] * matrix[1][1] - matrix[0][1] * matrix[1][0],
        _ => {
            let mut result = 0.0;
            for (j, &entry) in matrix[0].iter().enumerate() {
                if entry == 0.0 {
                    continue;
                }
                let minor = minor(&matrix[1..], j);
                let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
                result += sign * entry * determinant(&minor);
            }
            result
        }
    }
}

/// Generalized cross product of `n - 1` vectors in `n` dimensions.
///
/// The result is orthogonal to every input and vanishes exactly when the
/// inputs are linearly dependent.
///
/// # Panics
/// Panics unless every vector has length `vectors.len() + 1`.
pub fn cross(vectors: &[Vec<f64>]) -> Vec<f64> {
    let n = vectors.len() + 1;
    assert!(
        vectors.iter().all(|v| v.len() == n),
        "cross product needs {} vectors of length {}",
        n - 1,
        n
    );
    (0..n)
        .map(|i| {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            sign * determinant(&minor(vectors, i))
        })
        .collect()
}

/// Rows with column `skip` removed.
fn minor(rows: &[Vec<f64>], skip: usize) -> Vec<Vec<f64>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|&(k, _)| k != skip)
                .map(|(_, &x)| x)
                .collect()
        })
        .collect()
}
