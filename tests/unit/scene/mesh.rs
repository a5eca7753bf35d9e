use super::*;

fn uniform_field(value: u8) -> LumaBitmap {
    LumaBitmap {
        width: 2,
        height: 2,
        data: vec![value; 4],
    }
}

#[test]
fn plane_grid_vertex_and_index_counts() {
    let mesh = plane_grid(1.0, 4);
    assert_eq!(mesh.base_positions.len(), 25);
    assert_eq!(mesh.uvs.len(), 25);
    assert_eq!(mesh.indices.len(), 4 * 4 * 6);
    assert!(mesh.indices.iter().all(|&i| (i as usize) < 25));
}

#[test]
fn plane_width_follows_aspect() {
    let mesh = plane_grid(2.0, 2);
    let xs: Vec<f32> = mesh.base_positions.iter().map(|p| p.x).collect();
    let ys: Vec<f32> = mesh.base_positions.iter().map(|p| p.y).collect();
    assert!((xs.iter().cloned().fold(f32::INFINITY, f32::min) + 2.0).abs() < 1e-6);
    assert!((xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max) - 2.0).abs() < 1e-6);
    assert!((ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max) - 1.0).abs() < 1e-6);
}

#[test]
fn uv_zero_is_the_top_left_corner() {
    let mesh = plane_grid(1.0, 2);
    assert_eq!(mesh.uvs[0], Vec2::new(0.0, 0.0));
    // v = 0 maps to the top edge (+y), v = 1 to the bottom edge.
    assert!((mesh.base_positions[0].y - 1.0).abs() < 1e-6);
    let last = mesh.uvs.len() - 1;
    assert_eq!(mesh.uvs[last], Vec2::new(1.0, 1.0));
    assert!((mesh.base_positions[last].y + 1.0).abs() < 1e-6);
}

#[test]
fn triangles_wind_counter_clockwise_seen_from_front() {
    let mesh = plane_grid(1.5, 3);
    for tri in mesh.indices.chunks_exact(3) {
        let a = mesh.base_positions[tri[0] as usize];
        let b = mesh.base_positions[tri[1] as usize];
        let c = mesh.base_positions[tri[2] as usize];
        let cross_z = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
        assert!(cross_z > 0.0);
    }
}

#[test]
fn displace_zero_scale_is_exactly_planar() {
    let mesh = plane_grid(1.0, 3);
    let geo = displace(&mesh, &uniform_field(200), 0.0);
    assert!(geo.positions.iter().all(|p| p.z == 0.0));
    assert!(geo.normals.iter().all(|n| *n == Vec3::Z));
}

#[test]
fn displace_lifts_by_sampled_height_times_scale() {
    let mesh = plane_grid(1.0, 2);
    let geo = displace(&mesh, &uniform_field(255), 0.75);
    for p in &geo.positions {
        assert!((p.z - 0.75).abs() < 1e-6);
    }
    // Uniform height keeps the surface flat, so normals stay +Z.
    assert!(geo.normals.iter().all(|n| (*n - Vec3::Z).length() < 1e-6));
}

#[test]
fn normals_tilt_against_the_slope() {
    // Height ramps up to the right; normals must lean left (negative x).
    let field = LumaBitmap {
        width: 2,
        height: 1,
        data: vec![0, 255],
    };
    let mesh = plane_grid(1.0, 4);
    let geo = displace(&mesh, &field, 1.0);
    let center = geo.normals[(4 / 2) * 5 + 2];
    assert!(center.x < 0.0);
    assert!((center.length() - 1.0).abs() < 1e-5);
}
