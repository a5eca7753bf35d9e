use super::*;
use std::io::Cursor;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_preserves_pixels() {
    let mut img = image::RgbaImage::new(3, 2);
    img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    img.put_pixel(2, 1, image::Rgba([0, 0, 255, 255]));
    let bitmap = decode_rgba8(&png_bytes(img)).unwrap();

    assert_eq!(bitmap.width, 3);
    assert_eq!(bitmap.height, 2);
    assert_eq!(bitmap.pixel_clamped(0, 0), [255, 0, 0, 255]);
    assert_eq!(bitmap.pixel_clamped(2, 1), [0, 0, 255, 255]);
}

#[test]
fn decode_garbage_is_a_decode_error() {
    let err = decode_rgba8(b"definitely not an image").unwrap_err();
    assert!(matches!(err, DepthloopError::Decode(_)));
}

#[test]
fn pixel_clamped_sticks_to_edges() {
    let bitmap = RgbaBitmap {
        width: 2,
        height: 1,
        data: vec![10, 11, 12, 255, 20, 21, 22, 255],
    };
    assert_eq!(bitmap.pixel_clamped(-5, 0), [10, 11, 12, 255]);
    assert_eq!(bitmap.pixel_clamped(9, 0), [20, 21, 22, 255]);
    assert_eq!(bitmap.pixel_clamped(1, -3), [20, 21, 22, 255]);
    assert_eq!(bitmap.pixel_clamped(0, 7), [10, 11, 12, 255]);
}
