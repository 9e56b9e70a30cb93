use std::io::Cursor;
use std::path::PathBuf;

use super::*;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 50, 100, 128]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn transcode_to_png_keeps_dimensions() {
    let out = transcode(&png_bytes(3, 2), ImageFormat::Png).unwrap();
    assert_eq!(image::guess_format(&out).unwrap(), image::ImageFormat::Png);
    let decoded = image::load_from_memory(&out).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (3, 2));
}

#[test]
fn transcode_to_jpg_drops_alpha() {
    let out = transcode(&png_bytes(3, 2), ImageFormat::Jpg).unwrap();
    assert_eq!(image::guess_format(&out).unwrap(), image::ImageFormat::Jpeg);
    let decoded = image::load_from_memory(&out).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (3, 2));
    assert!(!decoded.color().has_alpha());
}

#[test]
fn transcode_rejects_non_image_bytes() {
    assert!(transcode(b"definitely not pixels", ImageFormat::Png).is_err());
}

#[test]
fn image_paths_are_deterministic_per_format() {
    assert_eq!(
        image_path("hero", ImageFormat::Png),
        PathBuf::from("images/png/hero.png")
    );
    assert_eq!(
        image_path("hero", ImageFormat::Jpg),
        PathBuf::from("images/jpg/hero.jpg")
    );
}
