use super::*;

fn photo_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn small_images_keep_their_resolution() {
    let bytes = photo_png(64, 48, [200, 180, 160, 255]);
    let img = prepare(&bytes, "desk", &PrepareOpts::default()).unwrap();
    assert_eq!((img.width, img.height), (64, 48));
    assert!((img.aspect - 64.0 / 48.0).abs() < 1e-12);
    assert_eq!(img.display_name, "desk");
}

#[test]
fn oversized_images_are_bounded_with_aspect_from_source() {
    let bytes = photo_png(300, 150, [90, 90, 90, 255]);
    let opts = PrepareOpts {
        max_dimension: 100,
        ..PrepareOpts::default()
    };
    let img = prepare(&bytes, "wide", &opts).unwrap();
    assert_eq!((img.width, img.height), (100, 50));
    // Aspect is recorded from the source dimensions, not the resized ones.
    assert!((img.aspect - 2.0).abs() < 1e-12);
}

#[test]
fn empty_display_name_falls_back() {
    let bytes = photo_png(8, 8, [0, 0, 0, 255]);
    let img = prepare(&bytes, "", &PrepareOpts::default()).unwrap();
    assert_eq!(img.display_name, "photo");
}

#[test]
fn garbage_bytes_fail_with_decode_error() {
    let err = prepare(b"nope", "x", &PrepareOpts::default()).unwrap_err();
    assert!(matches!(err, DepthloopError::Decode(_)));
}

#[test]
fn zero_max_dimension_is_rejected() {
    let bytes = photo_png(8, 8, [0, 0, 0, 255]);
    let opts = PrepareOpts {
        max_dimension: 0,
        ..PrepareOpts::default()
    };
    assert!(prepare(&bytes, "x", &opts).is_err());
}

#[test]
fn both_planes_decode_at_working_resolution() {
    let bytes = photo_png(32, 16, [255, 255, 255, 255]);
    let img = prepare(&bytes, "x", &PrepareOpts::default()).unwrap();

    let color = img.decode_color().unwrap();
    assert_eq!((color.width, color.height), (32, 16));

    let displacement = img.decode_displacement().unwrap();
    assert_eq!((displacement.width, displacement.height), (32, 16));
    // A uniform white photo derives a uniform full-height displacement map.
    assert!(displacement.data.iter().all(|&v| v == 255));
}

#[test]
fn preparing_the_same_bytes_twice_yields_distinct_ids() {
    let bytes = photo_png(8, 8, [10, 20, 30, 255]);
    let a = prepare(&bytes, "x", &PrepareOpts::default()).unwrap();
    let b = prepare(&bytes, "x", &PrepareOpts::default()).unwrap();
    assert_ne!(a.id, b.id);
}
