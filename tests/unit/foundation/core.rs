use super::*;

#[test]
fn fps_new_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_frame_duration_and_rounding() {
    let fps = Fps::new(30, 1).unwrap();
    assert!((fps.frame_duration_secs() - 1.0 / 30.0).abs() < 1e-12);
    assert_eq!(fps.secs_to_frames_round(10.0), 300);
    assert!((fps.frames_to_secs(300) - 10.0).abs() < 1e-9);
}

#[test]
fn fps_ntsc_rounds_to_nearest_frame() {
    let fps = Fps::new(30000, 1001).unwrap();
    // 10 s at 29.97 fps is 299.7 frames.
    assert_eq!(fps.secs_to_frames_round(10.0), 300);
    assert_eq!(fps.secs_to_frames_round(1.0), 30);
}

#[test]
fn canvas_new_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 720).is_err());
    assert!(Canvas::new(1280, 0).is_err());
    let c = Canvas::new(1280, 720).unwrap();
    assert!((c.aspect() - 16.0 / 9.0).abs() < 1e-12);
}

#[test]
fn restart_signal_clones_share_the_counter() {
    let sig = RestartSignal::new();
    let other = sig.clone();
    assert_eq!(sig.value(), 0);
    other.bump();
    other.bump();
    assert_eq!(sig.value(), 2);
}
