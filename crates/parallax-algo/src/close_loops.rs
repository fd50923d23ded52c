use parallax_tracking::{FrameId, ImageFrame, TrackSet};

use crate::algorithm::Algorithm;
use crate::error::CloseLoopsError;

/// Family name shared by all loop-closure implementations.
pub const CLOSE_LOOPS_FAMILY: &str = "close_loops";

/// An algorithm that re-links interrupted feature tracks.
///
/// `stitch` takes ownership of the track set and returns the updated set, so
/// successive closure steps thread a single owner through the pipeline and
/// never alias intermediate sets.
pub trait CloseLoops: Algorithm + Send {
    /// Attempt loop closure on `tracks` at `frame`.
    ///
    /// `image` is the current frame's pixel data; `mask`, when present,
    /// restricts stitching to locations where the mask is positive.
    fn stitch(
        &self,
        frame: FrameId,
        tracks: TrackSet,
        image: &ImageFrame,
        mask: Option<&ImageFrame>,
    ) -> Result<TrackSet, CloseLoopsError>;

    /// An independent copy with identical configuration and no shared
    /// mutable state.
    fn clone_boxed(&self) -> Box<dyn CloseLoops>;
}

impl Clone for Box<dyn CloseLoops> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}
