use glam::DVec2;
use parallax_geometry::{CameraIntrinsics, EssentialMatrix};

use crate::algorithm::Algorithm;
use crate::error::EstimationError;

/// Family name shared by all essential-matrix estimators.
pub const ESTIMATE_ESSENTIAL_MATRIX_FAMILY: &str = "estimate_essential_matrix";

/// An algorithm estimating the essential matrix between two calibrated views.
pub trait EstimateEssentialMatrix: Algorithm + Send {
    /// Estimate an essential matrix from pixel correspondences.
    ///
    /// `pts1` and `pts2` are corresponding pixel locations of equal length in
    /// views 1 and 2; `cal1` and `cal2` are the per-view intrinsics;
    /// `inlier_scale` is the pixel-space distance below which a
    /// correspondence counts as an inlier.
    ///
    /// On success returns the matrix together with an inlier mask holding
    /// exactly one entry per input pair, in input order.
    fn estimate(
        &self,
        pts1: &[DVec2],
        pts2: &[DVec2],
        cal1: &CameraIntrinsics,
        cal2: &CameraIntrinsics,
        inlier_scale: f64,
    ) -> Result<(EssentialMatrix, Vec<bool>), EstimationError>;

    /// An independent copy with identical configuration and no shared
    /// mutable state.
    fn clone_boxed(&self) -> Box<dyn EstimateEssentialMatrix>;
}

impl Clone for Box<dyn EstimateEssentialMatrix> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}
