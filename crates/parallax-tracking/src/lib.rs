#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the tracking data structures.
pub mod error;

/// Minimal image container used at the stitching boundary.
pub mod image;

/// A single feature identity followed across frames.
pub mod track;

/// Collections of tracks covering a frame sequence.
pub mod track_set;

pub use error::TrackingError;
pub use image::ImageFrame;
pub use track::{Feature, FrameId, Track, TrackId, TrackState};
pub use track_set::TrackSet;
