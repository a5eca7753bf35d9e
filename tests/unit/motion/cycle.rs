use super::*;

fn assert_close(a: DVec3, b: DVec3) {
    assert!((a - b).length() < 1e-9, "{a:?} vs {b:?}");
}

#[test]
fn transforms_repeat_after_one_duration() {
    let s = AnimationSettings::default();
    for t in [0.0, 1.3, 3.7, 9.99] {
        let a = compute_frame(t, &s);
        let b = compute_frame(t + s.duration, &s);
        assert_close(a.camera_eye, b.camera_eye);
        assert!((a.mesh_roll - b.mesh_roll).abs() < 1e-9);
        assert!((a.mesh_lift - b.mesh_lift).abs() < 1e-9);
        for i in 0..ORBIT_LIGHT_COUNT {
            assert_close(a.lights[i], b.lights[i]);
        }
    }
}

#[test]
fn zero_sway_pins_the_camera_to_the_axis() {
    let s = AnimationSettings {
        sway: 0.0,
        ..AnimationSettings::default()
    };
    for t in [0.0, 2.5, 7.1] {
        let tf = compute_frame(t, &s);
        assert_eq!(tf.camera_eye.x, 0.0);
        assert_eq!(tf.camera_eye.y, 0.0);
    }
}

#[test]
fn zero_depth_flattens_displacement() {
    let s = AnimationSettings {
        depth: 0.0,
        ..AnimationSettings::default()
    };
    assert_eq!(compute_frame(4.2, &s).displacement_scale, 0.0);
}

#[test]
fn hostile_durations_stay_finite() {
    for duration in [0.0, -3.0, f64::NAN, f64::INFINITY] {
        let s = AnimationSettings {
            duration,
            ..AnimationSettings::default()
        };
        let tf = compute_frame(5.0, &s);
        assert!(tf.camera_eye.is_finite());
        assert!(tf.mesh_roll.is_finite());
        assert!(tf.mesh_lift.is_finite());
        for light in tf.lights {
            assert!(light.is_finite());
        }
    }
}

#[test]
fn lights_orbit_with_distinct_phases() {
    let s = AnimationSettings::default();
    let tf = compute_frame(0.0, &s);
    assert_eq!(tf.lights.len(), ORBIT_LIGHT_COUNT);
    assert_ne!(tf.lights[0], tf.lights[1]);
    assert_ne!(tf.lights[1], tf.lights[2]);
}

#[test]
fn exposure_and_target_pass_through() {
    let s = AnimationSettings {
        exposure: 2.0,
        ..AnimationSettings::default()
    };
    let tf = compute_frame(1.0, &s);
    assert_eq!(tf.exposure, 2.0);
    assert_eq!(tf.camera_target, DVec3::ZERO);
}

#[test]
fn restart_is_edge_triggered() {
    let mut phase = MotionPhase::new();
    phase.advance(5.0);
    assert_eq!(phase.elapsed(), 5.0);

    // Unchanged token never resets.
    assert!(!phase.sync_restart(0));
    assert_eq!(phase.elapsed(), 5.0);

    // A new token resets exactly once.
    assert!(phase.sync_restart(3));
    assert_eq!(phase.elapsed(), 0.0);
    assert!(!phase.sync_restart(3));

    phase.advance(1.5);
    assert!(!phase.sync_restart(3));
    assert_eq!(phase.elapsed(), 1.5);
}

#[test]
fn advance_ignores_non_positive_and_non_finite_steps() {
    let mut phase = MotionPhase::new();
    phase.advance(1.0);
    phase.advance(0.0);
    phase.advance(-2.0);
    phase.advance(f64::NAN);
    phase.advance(f64::INFINITY);
    assert_eq!(phase.elapsed(), 1.0);
}
