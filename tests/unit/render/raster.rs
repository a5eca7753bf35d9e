use super::*;
use crate::render::camera::camera_matrices;
use glam::DVec3;

fn target(w: u32, h: u32) -> RasterTarget {
    RasterTarget::new(Canvas {
        width: w,
        height: h,
    })
}

fn cam(w: u32, h: u32, eye_z: f64) -> CameraMatrices {
    camera_matrices(
        DVec3::new(0.0, 0.0, eye_z),
        DVec3::ZERO,
        Canvas {
            width: w,
            height: h,
        },
    )
}

// Large quad facing +Z, wound like the plane mesh.
fn quad(half: f32, z: f32) -> (Vec<Vec3>, Vec<u32>) {
    let positions = vec![
        Vec3::new(-half, half, z),
        Vec3::new(half, half, z),
        Vec3::new(-half, -half, z),
        Vec3::new(half, -half, z),
    ];
    (positions, vec![0, 2, 3, 0, 3, 1])
}

fn px(t: &RasterTarget, x: u32, y: u32) -> [f32; 3] {
    t.color[(y * t.width + x) as usize]
}

fn depth_at(t: &RasterTarget, x: u32, y: u32) -> f32 {
    t.depth[(y * t.width + x) as usize]
}

#[test]
fn new_frame_is_opaque_black() {
    let frame = FrameRGBA::new(Canvas {
        width: 3,
        height: 2,
    });
    for x in 0..3 {
        for y in 0..2 {
            assert_eq!(frame.pixel(x, y), [0, 0, 0, 255]);
        }
    }
}

#[test]
fn clear_resets_color_and_depth() {
    let mut t = target(4, 4);
    t.depth[5] = 0.25;
    t.clear([0.1, 0.2, 0.3]);
    assert_eq!(px(&t, 1, 1), [0.1, 0.2, 0.3]);
    assert!(t.depth.iter().all(|d| d.is_infinite()));
}

#[test]
fn flat_quad_covers_the_center() {
    let mut t = target(64, 64);
    t.clear([0.0; 3]);
    let cam = cam(64, 64, 3.1);
    let (positions, indices) = quad(2.0, 0.0);
    draw_flat(&mut t, &cam, Mat4::IDENTITY, &positions, &indices, [0.9, 0.1, 0.2]);

    assert_eq!(px(&t, 32, 32), [0.9, 0.1, 0.2]);
    assert!(depth_at(&t, 32, 32).is_finite());
}

#[test]
fn depth_test_keeps_the_nearer_surface() {
    let red = [1.0, 0.0, 0.0];
    let green = [0.0, 1.0, 0.0];
    let cam = cam(64, 64, 3.1);

    // Near-then-far and far-then-near both leave the nearer quad visible.
    for order in [[(0.0, red), (1.0, green)], [(1.0, green), (0.0, red)]] {
        let mut t = target(64, 64);
        t.clear([0.0; 3]);
        for (z, rgb) in order {
            let (positions, indices) = quad(2.0, z);
            draw_flat(&mut t, &cam, Mat4::IDENTITY, &positions, &indices, rgb);
        }
        assert_eq!(px(&t, 32, 32), green);
    }
}

#[test]
fn reversed_winding_still_rasterizes() {
    let mut t = target(64, 64);
    t.clear([0.0; 3]);
    let cam = cam(64, 64, 3.1);
    let (positions, _) = quad(2.0, 0.0);
    let reversed = vec![0, 3, 2, 0, 1, 3];
    draw_flat(&mut t, &cam, Mat4::IDENTITY, &positions, &reversed, [0.5; 3]);
    assert_eq!(px(&t, 32, 32), [0.5; 3]);
}

#[test]
fn triangles_behind_the_near_plane_are_skipped() {
    let mut t = target(64, 64);
    t.clear([0.0; 3]);
    let cam = cam(64, 64, 3.1);
    let (positions, indices) = quad(2.0, 3.05);
    draw_flat(&mut t, &cam, Mat4::IDENTITY, &positions, &indices, [1.0; 3]);
    assert!(t.depth.iter().all(|d| d.is_infinite()));
}

#[test]
fn shade_vertex_falls_back_to_ambient_when_unlit() {
    let light = PointLight {
        pos: Vec3::new(0.0, 0.0, -5.0),
        rgb: [1.0; 3],
    };
    // Light behind the surface: n·l clamps to zero.
    let rgb = shade_vertex(Vec3::ZERO, Vec3::Z, &[light]);
    assert_eq!(rgb, [AMBIENT; 3]);
}

#[test]
fn shade_vertex_adds_attenuated_light() {
    let light = PointLight {
        pos: Vec3::new(0.0, 0.0, 2.0),
        rgb: [1.0, 0.5, 0.25],
    };
    let rgb = shade_vertex(Vec3::ZERO, Vec3::Z, &[light]);
    assert!(rgb[0] > AMBIENT);
    assert!(rgb[1] > AMBIENT);
    // Channel intensity scales with the light color.
    assert!(rgb[0] > rgb[1] && rgb[1] > rgb[2]);
}

#[test]
fn textured_mesh_lights_the_center() {
    let mut t = target(64, 64);
    t.clear([0.0; 3]);
    let cam = cam(64, 64, 3.1);
    let (positions, indices) = quad(2.0, 0.0);
    let normals = vec![Vec3::Z; 4];
    let uvs = vec![Vec2::new(0.5, 0.5); 4];
    let texture = RgbaBitmap {
        width: 1,
        height: 1,
        data: vec![255, 255, 255, 255],
    };
    let lights = [PointLight {
        pos: Vec3::new(0.0, 0.0, 5.0),
        rgb: [1.0; 3],
    }];
    draw_mesh(
        &mut t,
        &cam,
        Mat4::IDENTITY,
        &positions,
        &normals,
        &uvs,
        &indices,
        &texture,
        &lights,
    );

    let center = px(&t, 32, 32);
    assert!(center[0] > AMBIENT);
    assert!(depth_at(&t, 32, 32).is_finite());
}

#[test]
fn point_splats_respect_the_depth_buffer() {
    let cam = cam(64, 64, 3.1);

    let mut t = target(64, 64);
    t.clear([0.0; 3]);
    draw_points(&mut t, &cam, Mat4::IDENTITY, &[Vec3::ZERO], [0.8; 3], 3);
    assert_eq!(px(&t, 32, 32), [0.8; 3]);

    // A quad in front occludes a splat behind it.
    let mut t = target(64, 64);
    t.clear([0.0; 3]);
    let (positions, indices) = quad(2.0, 1.0);
    draw_flat(&mut t, &cam, Mat4::IDENTITY, &positions, &indices, [0.3; 3]);
    draw_points(&mut t, &cam, Mat4::IDENTITY, &[Vec3::ZERO], [0.8; 3], 3);
    assert_eq!(px(&t, 32, 32), [0.3; 3]);
}

#[test]
fn orient2d_is_positive_for_counter_clockwise() {
    assert!(orient2d(0.0, 0.0, 1.0, 0.0, 0.0, 1.0) > 0.0);
    assert!(orient2d(0.0, 0.0, 0.0, 1.0, 1.0, 0.0) < 0.0);
    assert_eq!(orient2d(0.0, 0.0, 1.0, 1.0, 2.0, 2.0), 0.0);
}

#[test]
fn texture_sampling_is_bilinear() {
    let tex = RgbaBitmap {
        width: 2,
        height: 1,
        data: vec![0, 0, 0, 255, 255, 255, 255, 255],
    };
    let mid = sample_texture(&tex, 0.5, 0.0);
    assert!((mid[0] - 0.5).abs() < 1e-4);
    let left = sample_texture(&tex, 0.0, 0.0);
    assert_eq!(left, [0.0; 3]);
}
