use glam::DVec2;
use parallax_algo::{Algorithm, CloseLoops, CLOSE_LOOPS_FAMILY};
use parallax_config::ConfigBlock;
use parallax_core::{default_registry, MultiMethodCloser, ProximityCloser};
use parallax_tracking::{Feature, FrameId, ImageFrame, Track, TrackId, TrackSet, TrackState};

fn track_through(id: TrackId, frames: &[(FrameId, f64, f64)]) -> Track {
    let mut t = Track::new(id);
    for &(frame, x, y) in frames {
        t.append(TrackState::new(frame, Feature::new(DVec2::new(x, y))));
    }
    t
}

fn image() -> ImageFrame {
    ImageFrame::filled(128, 128, 64)
}

/// Two interruptions: one bridgeable at radius 4, the other only at a much
/// wider radius.
fn interrupted_tracks() -> TrackSet {
    TrackSet::from_tracks(vec![
        track_through(0, &[(2, 20.0, 20.0), (3, 21.0, 20.0), (4, 22.0, 20.0)]),
        track_through(1, &[(2, 80.0, 90.0), (4, 81.0, 90.0)]),
        track_through(10, &[(6, 23.0, 20.5)]),
        track_through(11, &[(6, 95.0, 90.0)]),
    ])
}

#[test]
fn zero_methods_return_the_input_unchanged() {
    let registry = default_registry().unwrap();
    let closer = MultiMethodCloser::new(registry);

    let input = interrupted_tracks();
    let output = closer.stitch(6, input.clone(), &image(), None).unwrap();
    assert_eq!(output, input);
}

#[test]
fn sequential_composition_matches_manual_chaining() {
    let registry = default_registry().unwrap();

    let mut config = ConfigBlock::new();
    config.set_value("count", 2u32, "");
    config.set_value("method1.type", "proximity", "");
    config.set_value("method2.type", "proximity", "");
    config.set_value("method2.proximity.match_radius", 20.0f64, "");

    let mut multi = MultiMethodCloser::new(registry.clone());
    multi.set_configuration(&config).unwrap();

    // The same two methods applied by hand, threading the result.
    let method_a = ProximityCloser::default();
    let mut method_b = registry.create_close_loops("proximity").unwrap();
    let mut wide = ConfigBlock::new();
    wide.set_value("match_radius", 20.0f64, "");
    method_b.set_configuration(&wide).unwrap();

    let img = image();
    let composed = multi.stitch(6, interrupted_tracks(), &img, None).unwrap();
    let intermediate = method_a.stitch(6, interrupted_tracks(), &img, None).unwrap();
    let chained = method_b.stitch(6, intermediate, &img, None).unwrap();

    assert_eq!(composed, chained);

    // Both interruptions closed: the narrow method linked the nearby pair,
    // the wide method cleaned up the remaining one.
    assert_eq!(composed.len(), 2);
    assert_eq!(composed.track(0).unwrap().last_frame(), Some(6));
    assert_eq!(composed.track(1).unwrap().last_frame(), Some(6));
}

#[test]
fn later_methods_observe_earlier_results() {
    let registry = default_registry().unwrap();

    // Two identical wide methods: the second must find nothing left to do,
    // not re-link what the first already merged.
    let mut config = ConfigBlock::new();
    config.set_value("count", 2u32, "");
    config.set_value("method1.type", "proximity", "");
    config.set_value("method1.proximity.match_radius", 20.0f64, "");
    config.set_value("method2.type", "proximity", "");
    config.set_value("method2.proximity.match_radius", 20.0f64, "");

    let mut multi = MultiMethodCloser::new(registry);
    multi.set_configuration(&config).unwrap();

    let out = multi.stitch(6, interrupted_tracks(), &image(), None).unwrap();
    assert_eq!(out.len(), 2);
}

#[test]
fn registry_enumeration_lists_default_closers() {
    let registry = default_registry().unwrap();
    let names = registry.implementations(CLOSE_LOOPS_FAMILY);
    assert_eq!(names, vec!["multi_method", "proximity"]);

    let closer = registry.create_close_loops("multi_method").unwrap();
    assert_eq!(closer.family_name(), CLOSE_LOOPS_FAMILY);
    assert_eq!(closer.impl_name(), "multi_method");
    assert!(!closer.description().is_empty());
}

#[test]
fn identity_configuration_is_idempotent() {
    let registry = default_registry().unwrap();
    for name in ["multi_method", "proximity"] {
        let mut closer = registry.create_close_loops(name).unwrap();
        let defaults = closer.get_configuration();
        closer.set_configuration(&defaults).unwrap();
        assert_eq!(closer.get_configuration(), defaults, "{name}");
    }
}

#[test]
fn clones_do_not_share_configuration() {
    let registry = default_registry().unwrap();

    let mut config = ConfigBlock::new();
    config.set_value("count", 1u32, "");
    config.set_value("method1.type", "proximity", "");

    let mut original = registry.create_close_loops("multi_method").unwrap();
    original.set_configuration(&config).unwrap();

    let clone = original.clone_boxed();

    let mut emptied = ConfigBlock::new();
    emptied.set_value("count", 0u32, "");
    original.set_configuration(&emptied).unwrap();

    assert_eq!(
        clone.get_configuration().get_value::<u32>("count").unwrap(),
        1,
        "clone keeps its configured method list"
    );

    // The clone still stitches with its own method list.
    let out = clone.stitch(6, interrupted_tracks(), &image(), None).unwrap();
    assert_eq!(out.len(), 3);
}
