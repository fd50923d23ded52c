/// Errors raised by the tracking data structures.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TrackingError {
    /// The pixel buffer length does not match the stated dimensions.
    #[error("image data length ({actual}) does not match {width}x{height}")]
    InvalidImageSize {
        /// Stated width in pixels.
        width: usize,
        /// Stated height in pixels.
        height: usize,
        /// Actual buffer length.
        actual: usize,
    },
}
