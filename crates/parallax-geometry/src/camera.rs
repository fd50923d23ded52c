use glam::{DMat3, DVec2, DVec3};

/// Intrinsic parameters of a pinhole camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length in pixels (fx, fy).
    pub focal_length: (f64, f64),
    /// Principal point in pixels (cx, cy).
    pub principal_point: (f64, f64),
    /// Axis skew; zero for square sensor grids.
    pub skew: f64,
}

impl CameraIntrinsics {
    /// Intrinsics with the given focal length and principal point, no skew.
    pub fn new(focal_length: (f64, f64), principal_point: (f64, f64)) -> Self {
        Self {
            focal_length,
            principal_point,
            skew: 0.0,
        }
    }

    /// The 3x3 calibration matrix K.
    pub fn k_matrix(&self) -> DMat3 {
        let (fx, fy) = self.focal_length;
        let (cx, cy) = self.principal_point;
        DMat3::from_cols(
            DVec3::new(fx, 0.0, 0.0),
            DVec3::new(self.skew, fy, 0.0),
            DVec3::new(cx, cy, 1.0),
        )
    }

    /// The inverse calibration matrix K⁻¹.
    pub fn k_inverse(&self) -> DMat3 {
        self.k_matrix().inverse()
    }

    /// Map a pixel location into normalized image coordinates.
    pub fn normalize(&self, p: DVec2) -> DVec2 {
        let v = self.k_inverse() * DVec3::new(p.x, p.y, 1.0);
        DVec2::new(v.x / v.z, v.y / v.z)
    }

    /// Map a normalized image coordinate back to pixels.
    pub fn denormalize(&self, p: DVec2) -> DVec2 {
        let v = self.k_matrix() * DVec3::new(p.x, p.y, 1.0);
        DVec2::new(v.x / v.z, v.y / v.z)
    }
}
