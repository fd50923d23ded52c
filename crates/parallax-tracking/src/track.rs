use glam::DVec2;

/// Identifier of a frame within an input sequence.
pub type FrameId = i64;

/// Identifier of a track, unique within a [`TrackSet`](crate::TrackSet).
pub type TrackId = u64;

/// A 2D feature observation in a single image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feature {
    /// Image location in pixels.
    pub loc: DVec2,
    /// Detection scale.
    pub scale: f64,
    /// Detector response magnitude.
    pub magnitude: f64,
}

impl Feature {
    /// A feature at `loc` with unit scale and zero magnitude.
    pub fn new(loc: DVec2) -> Self {
        Self {
            loc,
            scale: 1.0,
            magnitude: 0.0,
        }
    }
}

/// One observation of a track in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackState {
    /// The frame this observation belongs to.
    pub frame: FrameId,
    /// The observed feature.
    pub feature: Feature,
}

impl TrackState {
    /// Construct a state for `frame` observing `feature`.
    pub fn new(frame: FrameId, feature: Feature) -> Self {
        Self { frame, feature }
    }
}

/// An ordered sequence of per-frame observations sharing one feature identity.
///
/// States are kept sorted by frame with at most one observation per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    id: TrackId,
    states: Vec<TrackState>,
}

impl Track {
    /// An empty track with the given identity.
    pub fn new(id: TrackId) -> Self {
        Self {
            id,
            states: Vec::new(),
        }
    }

    /// A track with a single initial observation.
    pub fn with_state(id: TrackId, state: TrackState) -> Self {
        Self {
            id,
            states: vec![state],
        }
    }

    /// The track identity.
    pub fn id(&self) -> TrackId {
        self.id
    }

    /// All observations in frame order.
    pub fn states(&self) -> &[TrackState] {
        &self.states
    }

    /// Frame of the earliest observation.
    pub fn first_frame(&self) -> Option<FrameId> {
        self.states.first().map(|s| s.frame)
    }

    /// Frame of the latest observation.
    pub fn last_frame(&self) -> Option<FrameId> {
        self.states.last().map(|s| s.frame)
    }

    /// The observation at `frame`, if any.
    pub fn state_at(&self, frame: FrameId) -> Option<&TrackState> {
        self.states
            .binary_search_by_key(&frame, |s| s.frame)
            .ok()
            .map(|i| &self.states[i])
    }

    /// Append an observation strictly after the current last frame.
    ///
    /// Returns `false` (leaving the track unchanged) when the new state's
    /// frame is not past the end of the track.
    pub fn append(&mut self, state: TrackState) -> bool {
        if let Some(last) = self.last_frame() {
            if state.frame <= last {
                return false;
            }
        }
        self.states.push(state);
        true
    }

    /// Absorb all states of `other`; frame ranges must not overlap.
    ///
    /// Returns `false` (leaving both unchanged) when any frame appears in both
    /// tracks.
    pub(crate) fn absorb(&mut self, other: &Track) -> bool {
        if other
            .states
            .iter()
            .any(|s| self.state_at(s.frame).is_some())
        {
            return false;
        }
        self.states.extend(other.states.iter().copied());
        self.states.sort_by_key(|s| s.frame);
        true
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the track has no observations.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(frame: FrameId, x: f64) -> TrackState {
        TrackState::new(frame, Feature::new(DVec2::new(x, 0.0)))
    }

    #[test]
    fn append_enforces_frame_order() {
        let mut track = Track::with_state(0, state(3, 1.0));
        assert!(track.append(state(5, 2.0)));
        assert!(!track.append(state(5, 3.0)));
        assert!(!track.append(state(1, 4.0)));
        assert_eq!(track.len(), 2);
        assert_eq!(track.first_frame(), Some(3));
        assert_eq!(track.last_frame(), Some(5));
    }

    #[test]
    fn absorb_interleaves_states() {
        let mut a = Track::with_state(0, state(1, 1.0));
        a.append(state(4, 2.0));
        let mut b = Track::with_state(1, state(2, 3.0));
        b.append(state(3, 4.0));

        assert!(a.absorb(&b));
        let frames: Vec<_> = a.states().iter().map(|s| s.frame).collect();
        assert_eq!(frames, vec![1, 2, 3, 4]);
    }

    #[test]
    fn absorb_rejects_overlapping_frames() {
        let mut a = Track::with_state(0, state(1, 1.0));
        let b = Track::with_state(1, state(1, 2.0));
        assert!(!a.absorb(&b));
        assert_eq!(a.len(), 1);
    }
}
