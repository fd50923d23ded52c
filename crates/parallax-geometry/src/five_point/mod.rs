//! Minimal solver for the essential matrix from five correspondences.
//!
//! Implements Nistér's five-point algorithm: the four-dimensional nullspace
//! of the epipolar design matrix is constrained by `det(E) = 0` and the nine
//! trace constraints, and the resulting polynomial system is solved through
//! the eigenvalues of a 10x10 action matrix. Inputs are normalized image
//! coordinates (apply `K⁻¹` to pixels first).

mod polynomial;

use glam::{DMat3, DVec2, DVec3};
use nalgebra::{DMatrix, Schur};

use polynomial::{constraint_matrix, NUM_MONOMIALS};

/// Number of correspondences consumed by one invocation of the solver.
pub const FIVE_POINT_SAMPLE_SIZE: usize = 5;

/// Errors raised by the five-point solver.
#[derive(thiserror::Error, Debug)]
pub enum FivePointError {
    /// The input slices do not hold exactly five correspondences each.
    #[error("five-point solver needs exactly {expected} correspondences per view, got {actual}")]
    SampleSize {
        /// Required correspondence count.
        expected: usize,
        /// Count actually supplied.
        actual: usize,
    },

    /// The sample points coincide and cannot be conditioned.
    #[error("degenerate sample: points coincide")]
    DegenerateSample,

    /// A matrix decomposition failed while reducing the constraint system.
    #[error("numerical failure during {0}")]
    NumericalFailure(&'static str),

    /// The constraint polynomial has no real roots for this sample.
    #[error("constraint system has no real solutions")]
    NoRealSolutions,
}

/// Candidate essential matrices for five normalized correspondences.
///
/// Returns up to ten real solutions satisfying `x2ᵀ · E · x1 = 0` on the
/// sample; the caller disambiguates using further correspondences.
pub fn five_point_relative(
    pts1: &[DVec2],
    pts2: &[DVec2],
) -> Result<Vec<DMat3>, FivePointError> {
    for pts in [pts1, pts2] {
        if pts.len() != FIVE_POINT_SAMPLE_SIZE {
            return Err(FivePointError::SampleSize {
                expected: FIVE_POINT_SAMPLE_SIZE,
                actual: pts.len(),
            });
        }
    }

    let (n1, t1) = condition_points(pts1).ok_or(FivePointError::DegenerateSample)?;
    let (n2, t2) = condition_points(pts2).ok_or(FivePointError::DegenerateSample)?;

    // Nullspace of the 5x9 epipolar design matrix, padded square for SVD.
    let mut a = DMatrix::<f64>::zeros(9, 9);
    for (i, (p1, p2)) in n1.iter().zip(n2.iter()).enumerate() {
        let (x, y) = (p1.x, p1.y);
        let (xp, yp) = (p2.x, p2.y);
        a[(i, 0)] = xp * x;
        a[(i, 1)] = xp * y;
        a[(i, 2)] = xp;
        a[(i, 3)] = yp * x;
        a[(i, 4)] = yp * y;
        a[(i, 5)] = yp;
        a[(i, 6)] = x;
        a[(i, 7)] = y;
        a[(i, 8)] = 1.0;
    }
    let svd = a.svd(true, true);
    let v_t = svd
        .v_t
        .ok_or(FivePointError::NumericalFailure("nullspace extraction"))?;
    let rows = v_t.nrows();
    let basis: Vec<DMat3> = (0..4)
        .map(|k| mat3_from_nullspace_row(&v_t, rows - 4 + k))
        .collect();

    let eqs = constraint_matrix(&basis[0], &basis[1], &basis[2], &basis[3]);

    let mut m = DMatrix::<f64>::zeros(10, NUM_MONOMIALS);
    for (r, row) in eqs.iter().enumerate() {
        for (c, &val) in row.iter().enumerate() {
            m[(r, c)] = val;
        }
    }

    // Eliminate the ten cubic monomials: C expresses each of them in the
    // quotient basis [x², xy, xz, y², yz, z², x, y, z, 1].
    let m1 = m.view((0, 0), (10, 10)).into_owned();
    let m2 = m.view((0, 10), (10, 10)).into_owned();
    let c = m1
        .lu()
        .solve(&(-m2))
        .ok_or(FivePointError::NumericalFailure("polynomial reduction"))?;

    // Action matrix of multiplication by z in the quotient basis. Columns
    // 0..6 reduce through C; the remaining products stay inside the basis.
    let mut action = DMatrix::<f64>::zeros(10, 10);
    let cubic_rows = [2usize, 4, 5, 7, 8, 9];
    for (col, &row) in cubic_rows.iter().enumerate() {
        for r in 0..10 {
            action[(r, col)] = c[(row, r)];
        }
    }
    action[(2, 6)] = 1.0; // z·x  = xz
    action[(4, 7)] = 1.0; // z·y  = yz
    action[(5, 8)] = 1.0; // z·z  = z²
    action[(8, 9)] = 1.0; // z·1  = z

    let schur = Schur::new(action.clone());
    let eigenvalues = schur.complex_eigenvalues();

    let mut solutions = Vec::new();
    for val in eigenvalues.iter() {
        if val.im.abs() > 1e-8 {
            continue;
        }

        // Eigenvector from the nullspace of (A - λI); its tail carries the
        // affine coordinates [x, y, z, 1] up to scale.
        let mut shifted = action.clone();
        for i in 0..10 {
            shifted[(i, i)] -= val.re;
        }
        let svd = shifted.svd(true, true);
        let v_t = svd
            .v_t
            .ok_or(FivePointError::NumericalFailure("eigenvector extraction"))?;
        let vec = v_t.row(v_t.nrows() - 1);

        let w = vec[9];
        if w.abs() < 1e-12 {
            continue;
        }
        let x = vec[6] / w;
        let y = vec[7] / w;
        let z = vec[8] / w;

        let e = basis[0] * x + basis[1] * y + basis[2] * z + basis[3];
        solutions.push(t2.transpose() * e * t1);
    }

    if solutions.is_empty() {
        return Err(FivePointError::NoRealSolutions);
    }
    Ok(solutions)
}

/// Hartley conditioning: translate to the centroid and scale the mean
/// distance to √2. Returns the conditioned points and the transform `T` with
/// `p' = T · (p, 1)`.
fn condition_points(points: &[DVec2]) -> Option<(Vec<DVec2>, DMat3)> {
    let n = points.len() as f64;
    let centroid = points.iter().copied().sum::<DVec2>() / n;
    let mean_dist = points
        .iter()
        .map(|p| (*p - centroid).length())
        .sum::<f64>()
        / n;
    if mean_dist <= f64::EPSILON {
        return None;
    }
    let scale = std::f64::consts::SQRT_2 / mean_dist;
    let t = DMat3::from_cols(
        DVec3::new(scale, 0.0, 0.0),
        DVec3::new(0.0, scale, 0.0),
        DVec3::new(-scale * centroid.x, -scale * centroid.y, 1.0),
    );
    let conditioned = points.iter().map(|p| (*p - centroid) * scale).collect();
    Some((conditioned, t))
}

/// Reshape a 9-entry row of `Vᵀ` (row-major matrix layout) into a `DMat3`.
fn mat3_from_nullspace_row(v_t: &DMatrix<f64>, row: usize) -> DMat3 {
    DMat3::from_cols(
        DVec3::new(v_t[(row, 0)], v_t[(row, 3)], v_t[(row, 6)]),
        DVec3::new(v_t[(row, 1)], v_t[(row, 4)], v_t[(row, 7)]),
        DVec3::new(v_t[(row, 2)], v_t[(row, 5)], v_t[(row, 8)]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(p: DVec3) -> DVec2 {
        DVec2::new(p.x / p.z, p.y / p.z)
    }

    #[test]
    fn recovers_synthetic_relative_pose() {
        let rotation = DMat3::from_rotation_y(-0.05)
            * DMat3::from_rotation_x(0.1)
            * DMat3::from_rotation_z(0.2);
        let translation = DVec3::new(0.1, 0.02, 0.03);

        let world = [
            DVec3::new(0.1, 0.2, 2.0),
            DVec3::new(-0.2, 0.1, 2.5),
            DVec3::new(0.3, -0.1, 3.0),
            DVec3::new(-0.15, -0.2, 2.2),
            DVec3::new(0.05, 0.3, 2.8),
        ];
        let pts1: Vec<DVec2> = world.iter().map(|&p| project(p)).collect();
        let pts2: Vec<DVec2> = world
            .iter()
            .map(|&p| project(rotation * p + translation))
            .collect();

        let solutions = five_point_relative(&pts1, &pts2).unwrap();
        assert!(!solutions.is_empty());

        let best = solutions
            .iter()
            .map(|e| {
                pts1.iter()
                    .zip(pts2.iter())
                    .map(|(p1, p2)| {
                        let v1 = DVec3::new(p1.x, p1.y, 1.0);
                        let v2 = DVec3::new(p2.x, p2.y, 1.0);
                        v2.dot(*e * v1).abs()
                    })
                    .sum::<f64>()
            })
            .fold(f64::INFINITY, f64::min);
        assert!(best < 1e-6, "five-point residual too large: {best}");
    }

    #[test]
    fn wrong_sample_size_is_rejected() {
        let pts = vec![DVec2::ZERO; 4];
        let err = five_point_relative(&pts, &pts).unwrap_err();
        assert!(matches!(
            err,
            FivePointError::SampleSize {
                expected: 5,
                actual: 4
            }
        ));
    }

    #[test]
    fn coincident_points_are_degenerate() {
        let pts = vec![DVec2::new(0.3, -0.2); 5];
        let err = five_point_relative(&pts, &pts).unwrap_err();
        assert!(matches!(err, FivePointError::DegenerateSample));
    }
}
