use glam::{DMat3, DVec2, DVec3};
use parallax_algo::{Algorithm, EstimateEssentialMatrix};
use parallax_config::{parse_config_string, write_config_string, ConfigBlock};
use parallax_core::{default_registry, FivePointEstimator};
use parallax_geometry::{
    fundamental_from_essential, signed_epipolar_distance, CameraIntrinsics,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn intrinsics() -> CameraIntrinsics {
    CameraIntrinsics::new((800.0, 800.0), (320.0, 240.0))
}

fn relative_pose() -> (DMat3, DVec3) {
    let rotation = DMat3::from_rotation_y(0.1) * DMat3::from_rotation_x(-0.04);
    let translation = DVec3::new(0.3, 0.05, 0.04);
    (rotation, translation)
}

fn project(cal: &CameraIntrinsics, p: DVec3) -> DVec2 {
    cal.denormalize(DVec2::new(p.x / p.z, p.y / p.z))
}

/// Twenty noise-free correspondences of a planar checkerboard-like grid.
fn planar_scene() -> (Vec<DVec2>, Vec<DVec2>) {
    let cal = intrinsics();
    let (rotation, translation) = relative_pose();

    let mut pts1 = Vec::new();
    let mut pts2 = Vec::new();
    for row in 0..4 {
        for col in 0..5 {
            let p = DVec3::new(
                col as f64 * 0.25 - 0.5,
                row as f64 * 0.25 - 0.375,
                2.5,
            );
            let q = rotation * p + translation;
            pts1.push(project(&cal, p));
            pts2.push(project(&cal, q));
        }
    }
    (pts1, pts2)
}

/// Twenty correspondences of a depth-varying grid, general position.
fn general_scene() -> (Vec<DVec2>, Vec<DVec2>) {
    let cal = intrinsics();
    let (rotation, translation) = relative_pose();

    let mut pts1 = Vec::new();
    let mut pts2 = Vec::new();
    for i in 0..20 {
        let p = DVec3::new(
            (i % 5) as f64 * 0.25 - 0.5,
            (i / 5) as f64 * 0.25 - 0.375,
            2.2 + 0.3 * ((i % 4) as f64),
        );
        let q = rotation * p + translation;
        pts1.push(project(&cal, p));
        pts2.push(project(&cal, q));
    }
    (pts1, pts2)
}

#[test]
fn planar_scene_is_fully_classified_as_inliers() {
    init_logging();
    let (pts1, pts2) = planar_scene();
    let cal = intrinsics();

    let estimator = FivePointEstimator::default();
    let (essential, inliers) = estimator.estimate(&pts1, &pts2, &cal, &cal, 1.0).unwrap();

    assert_eq!(inliers.len(), 20);
    assert!(inliers.iter().all(|&b| b), "all noise-free points are inliers");

    // The recovered model induces sub-threshold epipolar distances
    // everywhere, not just sub-threshold classifications.
    let f = fundamental_from_essential(&essential.matrix(), &cal, &cal);
    for (p1, p2) in pts1.iter().zip(pts2.iter()) {
        assert!(signed_epipolar_distance(&f, *p1, *p2).abs() < 1.0);
    }
}

#[test]
fn outliers_are_excluded_from_the_mask() {
    init_logging();
    let (pts1, mut pts2) = general_scene();
    let cal = intrinsics();

    // Replace four correspondences with locations far off their epipolar
    // lines; the displacement dwarfs the one-pixel threshold.
    let outlier_indices = [3usize, 8, 12, 17];
    for (k, &i) in outlier_indices.iter().enumerate() {
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        pts2[i] += DVec2::new(sign * 120.0, sign * 150.0 + 40.0);
    }

    let estimator = FivePointEstimator::default();
    let (_essential, inliers) = estimator.estimate(&pts1, &pts2, &cal, &cal, 1.0).unwrap();

    assert_eq!(inliers.len(), 20);
    for (i, &inlier) in inliers.iter().enumerate() {
        assert_eq!(
            inlier,
            !outlier_indices.contains(&i),
            "wrong classification at index {i}"
        );
    }
}

#[test]
fn classification_is_monotonic_in_the_inlier_scale() {
    let (pts1, mut pts2) = general_scene();
    let cal = intrinsics();

    // Mild noise puts some points near the decision boundary.
    for (i, p) in pts2.iter_mut().enumerate() {
        let jitter = 0.4 * (((i * 7919) % 13) as f64 / 13.0 - 0.5);
        *p += DVec2::new(jitter, -jitter);
    }

    let estimator = FivePointEstimator::default();
    let (essential, _) = estimator.estimate(&pts1, &pts2, &cal, &cal, 1.0).unwrap();

    // Hold the model fixed and widen the threshold: the inlier set may only
    // grow.
    let f = fundamental_from_essential(&essential.matrix(), &cal, &cal);
    let classify = |scale: f64| -> Vec<bool> {
        pts1.iter()
            .zip(pts2.iter())
            .map(|(&p1, &p2)| signed_epipolar_distance(&f, p1, p2).abs() < scale)
            .collect()
    };
    let narrow = classify(0.5);
    let wide = classify(2.0);
    for (&n, &w) in narrow.iter().zip(wide.iter()) {
        assert!(!n || w, "widening the threshold removed an inlier");
    }
}

#[test]
fn registry_instance_estimates_after_text_configuration() {
    init_logging();
    let registry = default_registry().unwrap();
    let mut estimator = registry.create_essential_estimator("five_point").unwrap();

    let text = "num_ransac_samples = 256  # fewer trials\nverbose = true\n";
    estimator
        .set_configuration(&parse_config_string(text).unwrap())
        .unwrap();
    let config = estimator.get_configuration();
    assert_eq!(config.get_value::<u32>("num_ransac_samples").unwrap(), 256);
    assert!(config.get_value::<bool>("verbose").unwrap());

    let (pts1, pts2) = general_scene();
    let cal = intrinsics();
    let (_, inliers) = estimator.estimate(&pts1, &pts2, &cal, &cal, 1.0).unwrap();
    assert_eq!(inliers.iter().filter(|&&b| b).count(), 20);
}

#[test]
fn identity_configuration_is_idempotent() {
    let mut estimator = FivePointEstimator::default();
    let defaults = estimator.get_configuration();
    estimator.set_configuration(&defaults).unwrap();
    assert_eq!(estimator.get_configuration(), defaults);

    // The text representation round-trips the same block.
    let reparsed = parse_config_string(&write_config_string(&defaults)).unwrap();
    assert_eq!(reparsed, defaults);
}

#[test]
fn clones_are_independent_and_usable_in_parallel() {
    let registry = default_registry().unwrap();
    let mut original = registry.create_essential_estimator("five_point").unwrap();

    let clone = original.clone_boxed();
    let mut update = ConfigBlock::new();
    update.set_value("num_ransac_samples", 32u32, "");
    original.set_configuration(&update).unwrap();
    assert_eq!(
        clone
            .get_configuration()
            .get_value::<u32>("num_ransac_samples")
            .unwrap(),
        512,
        "clone keeps its own configuration"
    );

    // One clone per worker, one call per frame.
    let (pts1, pts2) = general_scene();
    let cal = intrinsics();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            let worker = clone.clone_boxed();
            let (pts1, pts2) = (&pts1, &pts2);
            let cal = &cal;
            scope.spawn(move || {
                let (_, inliers) = worker.estimate(pts1, pts2, cal, cal, 1.0).unwrap();
                assert_eq!(inliers.iter().filter(|&&b| b).count(), 20);
            });
        }
    });
}
