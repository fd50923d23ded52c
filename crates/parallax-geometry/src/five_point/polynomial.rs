//! Trivariate polynomial arithmetic for the five-point constraint system.
//!
//! The essential-matrix constraints `det(E) = 0` and
//! `2·E·Eᵀ·E - trace(E·Eᵀ)·E = 0` expand into polynomials of degree at most
//! three in the nullspace mixing coefficients (x, y, z). This module provides
//! just enough symbolic arithmetic to build those ten equations.

use std::ops::{Add, Mul, Sub};

use glam::DMat3;

/// Number of monomials of degree ≤ 3 in three unknowns.
pub(crate) const NUM_MONOMIALS: usize = 20;

/// (x, y, z) exponents in graded order: cubics, quadratics, linears, constant.
/// The leading ten cubic monomials are the ones eliminated by the reduction
/// step of the solver; their position in this table is load-bearing.
const MONOMIAL_EXPONENTS: [(u8, u8, u8); NUM_MONOMIALS] = [
    (3, 0, 0),
    (2, 1, 0),
    (2, 0, 1),
    (1, 2, 0),
    (1, 1, 1),
    (1, 0, 2),
    (0, 3, 0),
    (0, 2, 1),
    (0, 1, 2),
    (0, 0, 3),
    (2, 0, 0),
    (1, 1, 0),
    (1, 0, 1),
    (0, 2, 0),
    (0, 1, 1),
    (0, 0, 2),
    (1, 0, 0),
    (0, 1, 0),
    (0, 0, 1),
    (0, 0, 0),
];

fn monomial_index(x: u8, y: u8, z: u8) -> Option<usize> {
    MONOMIAL_EXPONENTS
        .iter()
        .position(|&(mx, my, mz)| mx == x && my == y && mz == z)
}

/// A polynomial in (x, y, z) of degree ≤ 3, coefficients stored in
/// [`MONOMIAL_EXPONENTS`] order.
#[derive(Clone, Copy)]
pub(crate) struct CubicPoly {
    coeffs: [f64; NUM_MONOMIALS],
}

impl CubicPoly {
    pub(crate) fn zero() -> Self {
        Self {
            coeffs: [0.0; NUM_MONOMIALS],
        }
    }

    /// The linear polynomial `c0 + cx·x + cy·y + cz·z`.
    pub(crate) fn linear(c0: f64, cx: f64, cy: f64, cz: f64) -> Self {
        let mut p = Self::zero();
        p.coeffs[19] = c0;
        p.coeffs[16] = cx;
        p.coeffs[17] = cy;
        p.coeffs[18] = cz;
        p
    }

    pub(crate) fn coeffs(&self) -> &[f64; NUM_MONOMIALS] {
        &self.coeffs
    }

    fn scaled(&self, s: f64) -> Self {
        let mut out = *self;
        for c in &mut out.coeffs {
            *c *= s;
        }
        out
    }
}

impl Add for CubicPoly {
    type Output = CubicPoly;

    fn add(self, rhs: CubicPoly) -> CubicPoly {
        let mut out = self;
        for (a, b) in out.coeffs.iter_mut().zip(rhs.coeffs.iter()) {
            *a += b;
        }
        out
    }
}

impl Sub for CubicPoly {
    type Output = CubicPoly;

    fn sub(self, rhs: CubicPoly) -> CubicPoly {
        let mut out = self;
        for (a, b) in out.coeffs.iter_mut().zip(rhs.coeffs.iter()) {
            *a -= b;
        }
        out
    }
}

impl Mul for CubicPoly {
    type Output = CubicPoly;

    /// Polynomial product; terms beyond degree 3 cannot occur in the
    /// constraint construction and are discarded.
    fn mul(self, rhs: CubicPoly) -> CubicPoly {
        let mut out = CubicPoly::zero();
        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0.0 {
                continue;
            }
            let (ix, iy, iz) = MONOMIAL_EXPONENTS[i];
            for (j, &b) in rhs.coeffs.iter().enumerate() {
                if b == 0.0 {
                    continue;
                }
                let (jx, jy, jz) = MONOMIAL_EXPONENTS[j];
                if let Some(idx) = monomial_index(ix + jx, iy + jy, iz + jz) {
                    out.coeffs[idx] += a * b;
                }
            }
        }
        out
    }
}

type PolyMat3 = [[CubicPoly; 3]; 3];

fn poly_mat_mul(a: &PolyMat3, b: &PolyMat3) -> PolyMat3 {
    let mut out = [[CubicPoly::zero(); 3]; 3];
    for (r, out_row) in out.iter_mut().enumerate() {
        for (c, cell) in out_row.iter_mut().enumerate() {
            let mut sum = CubicPoly::zero();
            for k in 0..3 {
                sum = sum + a[r][k] * b[k][c];
            }
            *cell = sum;
        }
    }
    out
}

fn poly_transpose(a: &PolyMat3) -> PolyMat3 {
    let mut out = [[CubicPoly::zero(); 3]; 3];
    for (r, out_row) in out.iter_mut().enumerate() {
        for (c, cell) in out_row.iter_mut().enumerate() {
            *cell = a[c][r];
        }
    }
    out
}

fn poly_det(a: &PolyMat3) -> CubicPoly {
    let m00 = a[0][0] * (a[1][1] * a[2][2] - a[1][2] * a[2][1]);
    let m01 = a[0][1] * (a[1][0] * a[2][2] - a[1][2] * a[2][0]);
    let m02 = a[0][2] * (a[1][0] * a[2][1] - a[1][1] * a[2][0]);
    m00 - m01 + m02
}

fn element(m: &DMat3, r: usize, c: usize) -> f64 {
    m.col(c)[r]
}

/// Build the ten polynomial constraints on `E = x·E1 + y·E2 + z·E3 + E4`.
///
/// Row 0 encodes `det(E) = 0`; rows 1..10 encode the nine entries of
/// `2·E·Eᵀ·E - trace(E·Eᵀ)·E = 0`.
pub(crate) fn constraint_matrix(
    e1: &DMat3,
    e2: &DMat3,
    e3: &DMat3,
    e4: &DMat3,
) -> [[f64; NUM_MONOMIALS]; 10] {
    let mut e = [[CubicPoly::zero(); 3]; 3];
    for (r, row) in e.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = CubicPoly::linear(
                element(e4, r, c),
                element(e1, r, c),
                element(e2, r, c),
                element(e3, r, c),
            );
        }
    }

    let det = poly_det(&e);
    let eet = poly_mat_mul(&e, &poly_transpose(&e));
    let eet_e = poly_mat_mul(&eet, &e);
    let trace = eet[0][0] + eet[1][1] + eet[2][2];

    let mut eqs = [[0.0; NUM_MONOMIALS]; 10];
    eqs[0] = *det.coeffs();
    let mut row = 1;
    for r in 0..3 {
        for c in 0..3 {
            eqs[row] = *(eet_e[r][c].scaled(2.0) - trace * e[r][c]).coeffs();
            row += 1;
        }
    }
    eqs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(p: &CubicPoly, x: f64, y: f64, z: f64) -> f64 {
        MONOMIAL_EXPONENTS
            .iter()
            .zip(p.coeffs().iter())
            .map(|(&(ex, ey, ez), &c)| {
                c * x.powi(ex as i32) * y.powi(ey as i32) * z.powi(ez as i32)
            })
            .sum()
    }

    #[test]
    fn linear_product_matches_expansion() {
        let a = CubicPoly::linear(1.0, 2.0, 0.0, 0.0); // 1 + 2x
        let b = CubicPoly::linear(-3.0, 0.0, 1.0, 0.0); // -3 + y
        let p = a * b;
        for &(x, y, z) in &[(0.5, -1.0, 0.0), (2.0, 3.0, 1.0), (-1.5, 0.25, 2.0)] {
            let expected = (1.0 + 2.0 * x) * (-3.0 + y);
            assert!((eval(&p, x, y, z) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn cubic_products_land_on_the_leading_monomials() {
        let x = CubicPoly::linear(0.0, 1.0, 0.0, 0.0);
        let y = CubicPoly::linear(0.0, 0.0, 1.0, 0.0);
        let z = CubicPoly::linear(0.0, 0.0, 0.0, 1.0);
        let xyz = x * y * z;
        let idx = monomial_index(1, 1, 1).unwrap();
        assert!(idx < 10, "xyz is one of the eliminated cubic monomials");
        assert_eq!(xyz.coeffs()[idx], 1.0);
        assert_eq!(xyz.coeffs().iter().filter(|&&c| c != 0.0).count(), 1);
    }
}
