#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Pinhole camera intrinsic parameters.
pub mod camera;

/// Essential matrices and epipolar distances.
pub mod essential;

/// Nistér's five-point minimal solver for relative pose.
pub mod five_point;

/// RANSAC consensus search over the five-point solver.
pub mod ransac;

pub use camera::CameraIntrinsics;
pub use essential::{
    fundamental_from_essential, sampson_distance, signed_epipolar_distance, EssentialMatrix,
};
pub use five_point::{five_point_relative, FivePointError, FIVE_POINT_SAMPLE_SIZE};
pub use ransac::{estimate_essential_ransac, EssentialRansacParams, EssentialRansacResult};
