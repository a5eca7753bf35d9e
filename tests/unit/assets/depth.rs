use super::*;

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaBitmap {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        data.extend_from_slice(&rgba);
    }
    RgbaBitmap {
        width,
        height,
        data,
    }
}

#[test]
fn luminance_uses_rec601_weights() {
    let mut src = solid(3, 1, [0, 0, 0, 255]);
    src.data[0..4].copy_from_slice(&[255, 0, 0, 255]);
    src.data[4..8].copy_from_slice(&[0, 255, 0, 255]);
    src.data[8..12].copy_from_slice(&[0, 0, 255, 255]);

    let luma = luminance_map(&src);
    assert_eq!(luma.data, vec![76, 150, 29]);
}

#[test]
fn luminance_extremes() {
    assert_eq!(luminance_map(&solid(2, 2, [255, 255, 255, 255])).data, vec![255; 4]);
    assert_eq!(luminance_map(&solid(2, 2, [0, 0, 0, 255])).data, vec![0; 4]);
}

#[test]
fn blur_radius_zero_is_identity() {
    let luma = LumaBitmap {
        width: 3,
        height: 1,
        data: vec![0, 128, 255],
    };
    let out = blur_luma(&luma, 0, 1.2).unwrap();
    assert_eq!(out.data, luma.data);
}

#[test]
fn blur_preserves_flat_fields() {
    let luma = LumaBitmap {
        width: 8,
        height: 8,
        data: vec![128; 64],
    };
    let out = blur_luma(&luma, 2, 1.2).unwrap();
    assert_eq!(out.data, vec![128; 64]);
}

#[test]
fn blur_softens_an_edge() {
    let mut data = vec![0u8; 16];
    data[8..].fill(255);
    let luma = LumaBitmap {
        width: 4,
        height: 4,
        data,
    };
    let out = blur_luma(&luma, 1, 1.0).unwrap();
    // Rows adjacent to the edge pick up energy from the other side.
    assert!(out.data[4] > 0);
    assert!(out.data[8] < 255);
}

#[test]
fn blur_rejects_bad_sigma() {
    let luma = LumaBitmap {
        width: 2,
        height: 2,
        data: vec![0; 4],
    };
    assert!(blur_luma(&luma, 1, 0.0).is_err());
    assert!(blur_luma(&luma, 1, f32::NAN).is_err());
}

#[test]
fn kernel_q16_sums_to_one_and_is_symmetric() {
    let k = gaussian_kernel_q16(3, 1.2).unwrap();
    assert_eq!(k.len(), 7);
    assert_eq!(k.iter().map(|&w| u64::from(w)).sum::<u64>(), 65536);
    for i in 0..k.len() / 2 {
        assert_eq!(k[i], k[k.len() - 1 - i]);
    }
}

#[test]
fn sample_bilinear_interpolates_and_clamps() {
    let luma = LumaBitmap {
        width: 2,
        height: 1,
        data: vec![0, 255],
    };
    assert!((luma.sample_bilinear(0.0, 0.0) - 0.0).abs() < 1e-6);
    assert!((luma.sample_bilinear(1.0, 0.0) - 1.0).abs() < 1e-6);
    assert!((luma.sample_bilinear(0.5, 0.0) - 0.5).abs() < 1e-6);
    // Out-of-range coordinates clamp to the edge texels.
    assert!((luma.sample_bilinear(-2.0, 0.5) - 0.0).abs() < 1e-6);
    assert!((luma.sample_bilinear(5.0, 0.5) - 1.0).abs() < 1e-6);
}
