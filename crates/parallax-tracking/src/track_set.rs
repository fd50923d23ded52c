use crate::track::{FrameId, Track, TrackId};

/// An owned collection of [`Track`]s covering a frame sequence.
///
/// Loop closure algorithms take a track set by value and hand back the
/// updated set; intermediate sets are never aliased between pipeline steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackSet {
    tracks: Vec<Track>,
}

impl TrackSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from existing tracks.
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// All tracks in insertion order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Consume the set, yielding its tracks.
    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks
    }

    /// Add a track to the set.
    pub fn insert(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the set holds no tracks.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// The track with the given identity, if present.
    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id() == id)
    }

    /// Largest track identity in the set, for allocating fresh ids.
    pub fn max_track_id(&self) -> Option<TrackId> {
        self.tracks.iter().map(Track::id).max()
    }

    /// Earliest frame observed by any track.
    pub fn first_frame(&self) -> Option<FrameId> {
        self.tracks.iter().filter_map(Track::first_frame).min()
    }

    /// Latest frame observed by any track.
    pub fn last_frame(&self) -> Option<FrameId> {
        self.tracks.iter().filter_map(Track::last_frame).max()
    }

    /// Tracks with an observation at `frame`.
    pub fn tracks_at(&self, frame: FrameId) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(move |t| t.state_at(frame).is_some())
    }

    /// Tracks whose first observation is at `frame`.
    pub fn new_tracks_at(&self, frame: FrameId) -> impl Iterator<Item = &Track> {
        self.tracks
            .iter()
            .filter(move |t| t.first_frame() == Some(frame))
    }

    /// Merge the track `from` into the track `into`, removing `from`.
    ///
    /// The merged track keeps `into`'s identity with the union of both state
    /// sequences. Fails (returning `false`, set unchanged) when either id is
    /// missing, the ids are equal, or the frame ranges overlap.
    pub fn merge_tracks(&mut self, from: TrackId, into: TrackId) -> bool {
        if from == into {
            return false;
        }
        let Some(from_idx) = self.tracks.iter().position(|t| t.id() == from) else {
            return false;
        };
        let Some(into_idx) = self.tracks.iter().position(|t| t.id() == into) else {
            return false;
        };
        let source = self.tracks[from_idx].clone();
        if !self.tracks[into_idx].absorb(&source) {
            return false;
        }
        self.tracks.remove(from_idx);
        true
    }
}
