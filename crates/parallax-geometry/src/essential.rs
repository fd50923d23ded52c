use glam::{DMat3, DVec2, DVec3};

use crate::camera::CameraIntrinsics;

/// An essential matrix relating two calibrated views.
///
/// Uses the convention `x2ᵀ · E · x1 = 0` for normalized image coordinates
/// `x1` in view 1 and `x2` in view 2. Defined up to scale and immutable after
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EssentialMatrix(DMat3);

impl EssentialMatrix {
    /// Wrap a 3x3 matrix as an essential matrix.
    pub fn new(m: DMat3) -> Self {
        Self(m)
    }

    /// The underlying 3x3 matrix.
    pub fn matrix(&self) -> DMat3 {
        self.0
    }
}

/// Build the fundamental matrix induced by an essential matrix and the two
/// views' intrinsics: `F = K2⁻ᵀ · E · K1⁻¹`.
pub fn fundamental_from_essential(
    e: &DMat3,
    k1: &CameraIntrinsics,
    k2: &CameraIntrinsics,
) -> DMat3 {
    k2.k_inverse().transpose() * *e * k1.k_inverse()
}

/// Signed symmetric point-to-epipolar-line distance in pixels.
///
/// For a fundamental matrix `F` and a pixel correspondence `(p1, p2)`, the
/// epipolar lines are `l1 = F·v1` in image 2 and `l2 = Fᵀ·v2` in image 1.
/// The returned value is the algebraic residual scaled by the sum of both
/// lines' inverse norms, i.e. the sum of the point-to-line distances in both
/// images, carrying the residual's sign.
pub fn signed_epipolar_distance(f: &DMat3, p1: DVec2, p2: DVec2) -> f64 {
    let v1 = DVec3::new(p1.x, p1.y, 1.0);
    let v2 = DVec3::new(p2.x, p2.y, 1.0);
    let l1 = *f * v1;
    let l2 = f.transpose() * v2;
    let n1 = (l1.x * l1.x + l1.y * l1.y).sqrt();
    let n2 = (l2.x * l2.x + l2.y * l2.y).sqrt();
    if n1 == 0.0 || n2 == 0.0 {
        return f64::INFINITY;
    }
    v1.dot(l2) * (1.0 / n1 + 1.0 / n2)
}

/// First-order (Sampson) approximation of the squared geometric error for a
/// fundamental matrix and a pixel correspondence.
pub fn sampson_distance(f: &DMat3, p1: DVec2, p2: DVec2) -> f64 {
    let v1 = DVec3::new(p1.x, p1.y, 1.0);
    let v2 = DVec3::new(p2.x, p2.y, 1.0);
    let l1 = *f * v1;
    let l2 = f.transpose() * v2;
    let r = v2.dot(l1);
    let denom = l1.x * l1.x + l1.y * l1.y + l2.x * l2.x + l2.y * l2.y;
    if denom == 0.0 {
        return f64::INFINITY;
    }
    r * r / denom
}
