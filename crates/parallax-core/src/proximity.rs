use glam::DVec2;
use log::debug;

use parallax_algo::{
    Algorithm, AlgorithmError, CloseLoops, CloseLoopsError, CLOSE_LOOPS_FAMILY,
};
use parallax_config::ConfigBlock;
use parallax_tracking::{FrameId, ImageFrame, TrackId, TrackSet};

/// Loop closure by endpoint proximity.
///
/// A track that starts at the current frame may be the continuation of a
/// track that recently terminated, e.g. after an occlusion or a dropped
/// frame. This closer re-links such pairs when the gap is at most
/// `max_frame_gap` frames and the endpoint features lie within
/// `match_radius` pixels, keeping the older track's identity.
#[derive(Debug, Clone)]
pub struct ProximityCloser {
    max_frame_gap: u32,
    match_radius: f64,
}

impl Default for ProximityCloser {
    fn default() -> Self {
        Self {
            max_frame_gap: 5,
            match_radius: 4.0,
        }
    }
}

impl Algorithm for ProximityCloser {
    fn family_name(&self) -> &'static str {
        CLOSE_LOOPS_FAMILY
    }

    fn impl_name(&self) -> &'static str {
        "proximity"
    }

    fn description(&self) -> &'static str {
        "Re-links tracks interrupted for a bounded number of frames when \
         their endpoint features are close in the image"
    }

    fn get_configuration(&self) -> ConfigBlock {
        let mut config = ConfigBlock::new();
        config.set_value(
            "max_frame_gap",
            self.max_frame_gap,
            "Longest interruption, in frames, that may still be bridged",
        );
        config.set_value(
            "match_radius",
            self.match_radius,
            "Maximum pixel distance between track endpoints to link them",
        );
        config
    }

    fn set_configuration(&mut self, config: &ConfigBlock) -> Result<(), AlgorithmError> {
        self.max_frame_gap = config.get_value_or("max_frame_gap", self.max_frame_gap);
        self.match_radius = config.get_value_or("match_radius", self.match_radius);
        Ok(())
    }

    fn check_configuration(&self, config: &ConfigBlock) -> bool {
        config.get_value_or("match_radius", f64::MAX) > 0.0
    }
}

impl CloseLoops for ProximityCloser {
    fn stitch(
        &self,
        frame: FrameId,
        tracks: TrackSet,
        _image: &ImageFrame,
        mask: Option<&ImageFrame>,
    ) -> Result<TrackSet, CloseLoopsError> {
        let mut tracks = tracks;

        // Tracks opening at this frame are candidate continuations; ordered
        // by id so repeated runs link identically.
        let mut openers: Vec<(TrackId, DVec2)> = tracks
            .new_tracks_at(frame)
            .filter_map(|t| t.states().first().map(|s| (t.id(), s.feature.loc)))
            .collect();
        openers.sort_by_key(|&(id, _)| id);

        let earliest = frame - self.max_frame_gap as FrameId;
        let mut linked = 0usize;

        for (new_id, loc) in openers {
            if let Some(mask) = mask {
                if !mask.is_positive_at(loc) {
                    continue;
                }
            }

            // Nearest track that terminated within the bridgeable window.
            // Re-queried per opener: a track extended by an earlier link no
            // longer terminates before this frame.
            let candidate = tracks
                .tracks()
                .iter()
                .filter(|t| {
                    t.last_frame()
                        .is_some_and(|f| f < frame && f >= earliest)
                })
                .filter_map(|t| {
                    let end = t.states().last()?;
                    let dist = (end.feature.loc - loc).length();
                    (dist < self.match_radius).then_some((t.id(), dist))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

            if let Some((old_id, _)) = candidate {
                if tracks.merge_tracks(new_id, old_id) {
                    linked += 1;
                }
            }
        }

        if linked > 0 {
            debug!("proximity closure linked {linked} tracks at frame {frame}");
        }
        Ok(tracks)
    }

    fn clone_boxed(&self) -> Box<dyn CloseLoops> {
        Box::new(self.clone())
    }
}
