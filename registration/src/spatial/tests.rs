use glam::DQuat;
use strum::IntoEnumIterator;

use super::*;
use crate::error::GraphSide;
use crate::test_utils::{rotating_pair, NUM_TIMEPOINTS};

const THETA: f64 = 0.02;
const LANDMARKS: [&str; 3] = ["head", "tail", "yolk"];

fn assert_rotation_about_z(transform: &SimilarityTransform3D, angle: f64, tolerance: f64) {
    let error = transform
        .rotation()
        .angle_between(DQuat::from_rotation_z(angle));
    assert!(
        error < tolerance,
        "expected rotation {angle:.4} about Z, got {transform} (off by {error:.6})"
    );
    assert!((transform.scale_factor() - 1.0).abs() < tolerance);
}

#[test]
fn fixed_registration_is_time_invariant() -> anyhow::Result<()> {
    common::log_setup::init_test_logging();
    let graphs = rotating_pair(THETA, 3, &[], &[]);

    let registration = FixedRegistration::new(&graphs, &RegistrationConfig::default())?;
    assert_eq!(registration.num_pairs(), 3);
    assert!(registration.rms_error() < 1e-9);

    // Root branches end right before the division at t=5.
    assert_rotation_about_z(&registration.transform(), -8.0 * THETA, 1e-6);
    assert!(registration.transform().translation().length() < 1e-9);

    let reference = registration.transform_between(0, 0)?;
    for (t_a, t_b) in [(0, 9), (3, 3), (9, 0), (100, 7)] {
        assert_eq!(registration.transform_between(t_a, t_b)?, reference);
    }

    Ok(())
}

#[test]
fn dynamic_roots_recover_synthetic_rotation() -> anyhow::Result<()> {
    let graphs = rotating_pair(THETA, 3, &[], &[]);
    let registration = DynamicLandmarkRegistration::from_roots(&graphs, &RegistrationConfig::default())?;
    assert_eq!(registration.num_landmarks(), 3);
    assert_eq!(registration.labels(), ["R1", "R2", "R3"]);

    // Full smoothing window: exact.
    for t in 2..NUM_TIMEPOINTS - 2 {
        let transform = registration.transform_between(t, t)?;
        assert_rotation_about_z(&transform, -2.0 * THETA * t as f64, 1e-6);
    }
    // Truncated window at the ends of the time range.
    for t in 0..NUM_TIMEPOINTS {
        let transform = registration.transform_between(t, t)?;
        assert_rotation_about_z(&transform, -2.0 * THETA * t as f64, 0.1);
    }

    let across = registration.transform_between(3, 5)?;
    assert_rotation_about_z(&across, -8.0 * THETA, 1e-6);

    let clamped = registration.transform_between(NUM_TIMEPOINTS + 20, NUM_TIMEPOINTS + 20)?;
    let last = registration.transform_between(NUM_TIMEPOINTS - 1, NUM_TIMEPOINTS - 1)?;
    assert!(clamped.abs_diff_eq(&last, 1e-12));

    Ok(())
}

#[test]
fn inverse_registration_swaps_and_inverts() -> anyhow::Result<()> {
    let graphs = rotating_pair(THETA, 3, &[], &[]);
    let config = RegistrationConfig::default();
    let forward = DynamicLandmarkRegistration::from_roots(&graphs, &config)?;
    let inverse = InverseRegistration::new(forward.clone());

    for (t_a, t_b) in [(0, 0), (2, 6), (7, 3), (9, 9)] {
        let expected = forward.transform_between(t_b, t_a)?.inverse();
        let actual = inverse.transform_between(t_a, t_b)?;
        assert!(actual.abs_diff_eq(&expected, 1e-12));

        let roundtrip = actual.compose(&forward.transform_between(t_b, t_a)?);
        assert!(roundtrip.abs_diff_eq(&SimilarityTransform3D::identity(), 1e-9));
    }

    // Fitting on the reversed correspondence gives the same mapping.
    let reversed = DynamicLandmarkRegistration::from_roots(&graphs.reversed(), &config)?;
    for t in 2..NUM_TIMEPOINTS - 2 {
        let direct = reversed.transform_between(t, t)?;
        assert!(direct.abs_diff_eq(&inverse.transform_between(t, t)?, 1e-6));
    }

    Ok(())
}

#[test]
fn two_paired_roots_are_not_enough() {
    let graphs = rotating_pair(THETA, 2, &[], &[]);
    let config = RegistrationConfig::default();
    let expected = RegistrationError::InsufficientPairedRoots {
        found: 2,
        required: 3,
    };

    assert_eq!(
        FixedRegistration::new(&graphs, &config).unwrap_err(),
        expected
    );
    assert_eq!(
        DynamicLandmarkRegistration::from_roots(&graphs, &config).unwrap_err(),
        expected
    );

    let stricter = RegistrationConfig {
        min_pairs: 4,
        ..RegistrationConfig::default()
    };
    let graphs = rotating_pair(THETA, 3, &[], &[]);
    assert_eq!(
        FixedRegistration::new(&graphs, &stricter).unwrap_err(),
        RegistrationError::InsufficientPairedRoots {
            found: 3,
            required: 4
        }
    );
}

#[test]
fn landmarks_match_root_subtrees() -> anyhow::Result<()> {
    let graphs = rotating_pair(THETA, 0, &LANDMARKS, &LANDMARKS);
    let config = RegistrationConfig::with_method(SpatialRegistrationMethod::DynamicLandmarks);

    let landmarks = DynamicLandmarkRegistration::from_landmarks(&graphs, &config)?;
    assert_eq!(landmarks.labels(), LANDMARKS);

    // Tagged cells are exactly the root subtrees.
    let roots = rotating_pair(THETA, 3, &[], &[]);
    let roots = DynamicLandmarkRegistration::from_roots(&roots, &config)?;
    for t in 0..NUM_TIMEPOINTS {
        let expected = roots.transform_between(t, t)?;
        assert!(landmarks.transform_between(t, t)?.abs_diff_eq(&expected, 1e-9));
    }

    Ok(())
}

#[test]
fn unusable_landmark_labels_are_skipped() -> anyhow::Result<()> {
    // "spare" exists on both sides but tags no cell.
    let labels = ["head", "tail", "yolk", "spare"];
    let graphs = rotating_pair(THETA, 0, &labels, &labels);

    let registration = DynamicLandmarkRegistration::from_landmarks(
        &graphs,
        &RegistrationConfig::with_method(SpatialRegistrationMethod::DynamicLandmarks),
    )?;
    assert_eq!(registration.labels(), LANDMARKS);

    Ok(())
}

#[test]
fn two_common_landmarks_are_not_enough() {
    let graphs = rotating_pair(
        THETA,
        3,
        &["head", "tail", "left"],
        &["head", "tail", "right"],
    );

    let err = DynamicLandmarkRegistration::from_landmarks(&graphs, &RegistrationConfig::default())
        .unwrap_err();
    assert_eq!(
        err,
        RegistrationError::InsufficientPairedLandmarks {
            found: 2,
            required: 3,
            labels_a: vec!["head".into(), "tail".into(), "left".into()],
            labels_b: vec!["head".into(), "tail".into(), "right".into()],
            unmatched: vec!["left".into(), "right".into()],
        }
    );

    let message = err.to_string();
    assert!(message.contains("at least 3"));
    assert!(message.contains("Unusable: [left, right]"));
}

#[test]
fn landmark_tag_set_must_exist_on_both_sides() {
    let graphs = rotating_pair(THETA, 3, &LANDMARKS, &[]);

    let err = DynamicLandmarkRegistration::from_landmarks(&graphs, &RegistrationConfig::default())
        .unwrap_err();
    assert_eq!(
        err,
        RegistrationError::MissingTagSet {
            side: GraphSide::B,
            graph: "B".to_string(),
            name: "landmarks".to_string(),
        }
    );
}

#[test]
fn factory_builds_every_method() -> anyhow::Result<()> {
    let graphs = rotating_pair(THETA, 3, &LANDMARKS, &LANDMARKS);

    // At t=4 every strategy sees the root branch ends with a full window.
    for method in SpatialRegistrationMethod::iter() {
        let config = RegistrationConfig::with_method(method);
        let registration = create_registration(&graphs, &config)?;
        assert_rotation_about_z(&registration.transform_between(4, 4)?, -8.0 * THETA, 1e-6);

        let shared: Arc<dyn SpatialRegistration> = Arc::from(method.create(&graphs, &config)?);
        let inverse = InverseRegistration::new(shared);
        assert_rotation_about_z(&inverse.transform_between(4, 4)?, 8.0 * THETA, 1e-6);
    }

    Ok(())
}
