use super::*;

#[test]
fn rng_is_deterministic_across_instances() {
    let mut a = Rng64::new(123);
    let mut b = Rng64::new(123);
    for _ in 0..32 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn rng_unit_floats_stay_in_range() {
    let mut rng = Rng64::new(7);
    for _ in 0..1000 {
        let v = rng.next_f32_01();
        assert!((0.0..1.0).contains(&v));
    }
}

#[test]
fn scatter_is_reproducible() {
    let a = Backdrop::new();
    let b = Backdrop::new();
    assert_eq!(a.particles(), b.particles());
    assert_eq!(a.ring_positions(), b.ring_positions());
}

#[test]
fn particles_respect_the_annulus_bounds() {
    let backdrop = Backdrop::new();
    assert_eq!(backdrop.particles().len(), PARTICLE_COUNT);
    for p in backdrop.particles() {
        let radius = (p.x * p.x + p.y * p.y).sqrt();
        assert!(radius >= PARTICLE_RADIUS_MIN - 1e-3);
        assert!(radius <= PARTICLE_RADIUS_MAX + 1e-3);
        assert!(p.z >= PARTICLE_Z_MIN - 1e-6);
        assert!(p.z <= PARTICLE_Z_MAX + 1e-6);
    }
}

#[test]
fn ring_geometry_is_a_closed_annulus() {
    let backdrop = Backdrop::new();
    let positions = backdrop.ring_positions();
    let indices = backdrop.ring_indices();
    assert_eq!(positions.len(), 2 * RING_SEGMENTS as usize);
    assert_eq!(indices.len(), 6 * RING_SEGMENTS as usize);
    assert!(indices.iter().all(|&i| (i as usize) < positions.len()));

    for (i, p) in positions.iter().enumerate() {
        let radius = (p.x * p.x + p.y * p.y).sqrt();
        let expected = if i % 2 == 0 { RING_INNER } else { RING_OUTER };
        assert!((radius - expected).abs() < 1e-4);
        assert!((p.z - RING_Z).abs() < 1e-6);
    }
}

#[test]
fn advance_accumulates_at_fixed_rates() {
    let mut backdrop = Backdrop::new();
    backdrop.advance(2.0);
    assert!((backdrop.ring_angle() - 0.1).abs() < 1e-12);
    assert!((backdrop.particle_angle() - 0.04).abs() < 1e-12);

    backdrop.advance(f64::NAN);
    backdrop.advance(-1.0);
    assert!((backdrop.ring_angle() - 0.1).abs() < 1e-12);
}
