use glam::DVec2;
use log::debug;

use parallax_algo::{
    Algorithm, AlgorithmError, EstimateEssentialMatrix, EstimationError,
    ESTIMATE_ESSENTIAL_MATRIX_FAMILY,
};
use parallax_config::ConfigBlock;
use parallax_geometry::{
    estimate_essential_ransac, fundamental_from_essential, signed_epipolar_distance,
    CameraIntrinsics, EssentialMatrix, EssentialRansacParams, FIVE_POINT_SAMPLE_SIZE,
};

/// Essential-matrix estimation by RANSAC over the five-point minimal solver.
///
/// The consensus search selects the best-supported model; this type then
/// recomputes the caller-visible inlier classification itself, so the
/// reported mask follows a single reproducible rule regardless of the
/// search's internal scoring.
#[derive(Debug, Clone)]
pub struct FivePointEstimator {
    verbose: bool,
    num_ransac_samples: u32,
    random_seed: u64,
}

impl Default for FivePointEstimator {
    fn default() -> Self {
        Self {
            verbose: false,
            num_ransac_samples: 512,
            random_seed: 0,
        }
    }
}

impl Algorithm for FivePointEstimator {
    fn family_name(&self) -> &'static str {
        ESTIMATE_ESSENTIAL_MATRIX_FAMILY
    }

    fn impl_name(&self) -> &'static str {
        "five_point"
    }

    fn description(&self) -> &'static str {
        "RANSAC over the five-point minimal solver with symmetric \
         epipolar-distance inlier classification"
    }

    fn get_configuration(&self) -> ConfigBlock {
        let mut config = ConfigBlock::new();
        config.set_value(
            "verbose",
            self.verbose,
            "If true, write status messages to the log showing debugging information",
        );
        config.set_value(
            "num_ransac_samples",
            self.num_ransac_samples,
            "The number of samples to use in RANSAC",
        );
        config.set_value(
            "random_seed",
            self.random_seed as i64,
            "Seed for the consensus sampler; fixed seeds give reproducible results",
        );
        config
    }

    fn set_configuration(&mut self, config: &ConfigBlock) -> Result<(), AlgorithmError> {
        self.verbose = config.get_value_or("verbose", self.verbose);
        self.num_ransac_samples =
            config.get_value_or("num_ransac_samples", self.num_ransac_samples);
        self.random_seed = config.get_value_or("random_seed", self.random_seed);
        Ok(())
    }

    fn check_configuration(&self, _config: &ConfigBlock) -> bool {
        // Any block is acceptable; out-of-range trial counts are the
        // caller's responsibility.
        true
    }
}

impl EstimateEssentialMatrix for FivePointEstimator {
    fn estimate(
        &self,
        pts1: &[DVec2],
        pts2: &[DVec2],
        cal1: &CameraIntrinsics,
        cal2: &CameraIntrinsics,
        inlier_scale: f64,
    ) -> Result<(EssentialMatrix, Vec<bool>), EstimationError> {
        if pts1.len() != pts2.len() {
            return Err(EstimationError::MismatchedLengths {
                len1: pts1.len(),
                len2: pts2.len(),
            });
        }
        if pts1.len() < FIVE_POINT_SAMPLE_SIZE {
            return Err(EstimationError::InsufficientCorrespondences {
                required: FIVE_POINT_SAMPLE_SIZE,
                actual: pts1.len(),
            });
        }
        if !(inlier_scale > 0.0) {
            return Err(EstimationError::NonPositiveInlierScale {
                value: inlier_scale,
            });
        }

        let params = EssentialRansacParams {
            num_samples: self.num_ransac_samples as usize,
            inlier_scale,
            seed: self.random_seed,
            verbose: self.verbose,
        };
        let result = estimate_essential_ransac(pts1, pts2, cal1, cal2, &params)
            .ok_or(EstimationError::EstimationFailed)?;

        // The search reports E in this library's convention (x2ᵀ·E·x1 = 0);
        // a backend with the transposed convention would be flipped here.
        let e = result.essential;

        // Classify inliers independently of the search's own bookkeeping:
        // one signed symmetric epipolar distance per pair, in input order.
        let f = fundamental_from_essential(&e, cal1, cal2);
        let inliers: Vec<bool> = pts1
            .iter()
            .zip(pts2.iter())
            .map(|(&p1, &p2)| signed_epipolar_distance(&f, p1, p2).abs() < inlier_scale)
            .collect();

        if self.verbose {
            let count = inliers.iter().filter(|&&b| b).count();
            debug!("final inlier classification: {count} / {} pairs", pts1.len());
        }

        Ok((EssentialMatrix::new(e), inliers))
    }

    fn clone_boxed(&self) -> Box<dyn EstimateEssentialMatrix> {
        Box::new(self.clone())
    }
}
