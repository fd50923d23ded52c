//! RANSAC consensus search for the essential matrix.
//!
//! Draws minimal five-point samples, solves each with
//! [`five_point_relative`](crate::five_point_relative), and scores every
//! candidate by symmetric epipolar distance in pixel space. The search runs
//! its full configured trial count; adaptive early exit is left to callers
//! that want it.

use glam::{DMat3, DVec2};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::CameraIntrinsics;
use crate::essential::{fundamental_from_essential, signed_epipolar_distance};
use crate::five_point::{five_point_relative, FIVE_POINT_SAMPLE_SIZE};

/// Parameters of the consensus search.
#[derive(Debug, Clone)]
pub struct EssentialRansacParams {
    /// Number of minimal-sample trials to run.
    pub num_samples: usize,
    /// Inlier threshold: symmetric epipolar distance in pixels. Compared
    /// squared internally.
    pub inlier_scale: f64,
    /// Seed for the sampling RNG; fixed seeds give reproducible runs.
    pub seed: u64,
    /// Emit per-improvement diagnostics through the `log` facade.
    pub verbose: bool,
}

impl Default for EssentialRansacParams {
    fn default() -> Self {
        Self {
            num_samples: 512,
            inlier_scale: 1.0,
            seed: 0,
            verbose: false,
        }
    }
}

/// Best model found by the consensus search.
#[derive(Debug, Clone)]
pub struct EssentialRansacResult {
    /// Winning essential matrix, convention `x̂2ᵀ · E · x̂1 = 0` in
    /// normalized image coordinates.
    pub essential: DMat3,
    /// Indices of the correspondences within threshold of the winner.
    pub inliers: Vec<usize>,
    /// Sum of squared distances over the winning inliers.
    pub score: f64,
}

/// Search for the essential matrix best supported by the correspondences.
///
/// `pts1` and `pts2` are pixel coordinates of equal length, at least the
/// minimal sample size. Returns `None` when no trial yields a model with a
/// consensus of at least the minimal sample size.
pub fn estimate_essential_ransac(
    pts1: &[DVec2],
    pts2: &[DVec2],
    cal1: &CameraIntrinsics,
    cal2: &CameraIntrinsics,
    params: &EssentialRansacParams,
) -> Option<EssentialRansacResult> {
    let n = pts1.len();
    if n != pts2.len() || n < FIVE_POINT_SAMPLE_SIZE {
        return None;
    }

    let norm1: Vec<DVec2> = pts1.iter().map(|&p| cal1.normalize(p)).collect();
    let norm2: Vec<DVec2> = pts2.iter().map(|&p| cal2.normalize(p)).collect();
    let sq_scale = params.inlier_scale * params.inlier_scale;

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut sample1 = vec![DVec2::ZERO; FIVE_POINT_SAMPLE_SIZE];
    let mut sample2 = vec![DVec2::ZERO; FIVE_POINT_SAMPLE_SIZE];

    let mut best: Option<EssentialRansacResult> = None;

    for trial in 0..params.num_samples {
        let sample = rand::seq::index::sample(&mut rng, n, FIVE_POINT_SAMPLE_SIZE);
        for (k, idx) in sample.iter().enumerate() {
            sample1[k] = norm1[idx];
            sample2[k] = norm2[idx];
        }

        let candidates = match five_point_relative(&sample1, &sample2) {
            Ok(c) => c,
            Err(_) => continue, // degenerate sample, draw again
        };

        for e in candidates {
            let f = fundamental_from_essential(&e, cal1, cal2);
            let mut inliers = Vec::new();
            let mut score = 0.0;
            for i in 0..n {
                let d = signed_epipolar_distance(&f, pts1[i], pts2[i]);
                if d * d < sq_scale {
                    inliers.push(i);
                    score += d * d;
                }
            }
            if inliers.len() < FIVE_POINT_SAMPLE_SIZE {
                continue;
            }

            let better = match &best {
                None => true,
                Some(b) => {
                    inliers.len() > b.inliers.len()
                        || (inliers.len() == b.inliers.len() && score < b.score)
                }
            };
            if better {
                if params.verbose {
                    debug!(
                        "trial {trial}: new best model with {} / {n} inliers (score {score:.4})",
                        inliers.len()
                    );
                }
                best = Some(EssentialRansacResult {
                    essential: e,
                    inliers,
                    score,
                });
            }
        }
    }

    if params.verbose {
        match &best {
            Some(b) => info!(
                "consensus search finished: {} / {n} inliers after {} trials",
                b.inliers.len(),
                params.num_samples
            ),
            None => info!(
                "consensus search exhausted {} trials without a model",
                params.num_samples
            ),
        }
    }
    best
}
