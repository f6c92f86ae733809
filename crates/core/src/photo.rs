use std::io::Cursor;

use fast_image_resize::{self as fir, images::Image as FirImage};
use image::codecs::jpeg::JpegEncoder;
use image::error::{ParameterError, ParameterErrorKind};
use image::{DynamicImage, ImageError, ImageResult, RgbImage};

use crate::domain::PhotoInfo;

/// Default bound on the longest side of a stored photo.
pub const DEFAULT_MAX_DIMENSION: u32 = 1024;
/// Accepted range for the configurable bound.
pub const MIN_DIMENSION: u32 = 64;
pub const MAX_DIMENSION: u32 = 8192;

const JPEG_QUALITY: u8 = 85;

/// Decode an uploaded photo, apply its EXIF orientation, shrink it so the
/// longest side is at most `max_dim`, and re-encode it as JPEG.
///
/// Images already within bounds keep their size; nothing is upscaled.
pub fn normalize(bytes: &[u8], max_dim: u32) -> ImageResult<Vec<u8>> {
    let img = image::load_from_memory(bytes)?;
    let img = apply_orientation(img, read_exif_orientation(bytes));
    let rgb = img.to_rgb8();

    let (w, h) = rgb.dimensions();
    let (target_w, target_h) = bounded_dimensions(w, h, max_dim);
    let rgb = if (target_w, target_h) == (w, h) {
        rgb
    } else {
        resize_rgb(rgb, target_w, target_h)?
    };

    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))?;
    Ok(out)
}

/// Decode a stored photo payload.
pub fn decode(bytes: &[u8]) -> ImageResult<DynamicImage> {
    image::load_from_memory(bytes)
}

pub fn info(bytes: &[u8]) -> ImageResult<PhotoInfo> {
    let img = decode(bytes)?;
    Ok(PhotoInfo {
        width: img.width(),
        height: img.height(),
        bytes: bytes.len(),
    })
}

/// Scale (w, h) down so neither side exceeds `max_dim`, keeping the aspect ratio.
pub fn bounded_dimensions(w: u32, h: u32, max_dim: u32) -> (u32, u32) {
    let longest = w.max(h);
    if longest <= max_dim || longest == 0 {
        return (w, h);
    }
    let scale = max_dim as f64 / longest as f64;
    let scaled = |v: u32| ((v as f64 * scale).round() as u32).max(1);
    (scaled(w), scaled(h))
}

fn resize_rgb(rgb: RgbImage, w: u32, h: u32) -> ImageResult<RgbImage> {
    let (src_w, src_h) = rgb.dimensions();
    let src = FirImage::from_vec_u8(src_w, src_h, rgb.into_raw(), fir::PixelType::U8x3)
        .map_err(resize_error)?;
    let mut dst = FirImage::new(w, h, fir::PixelType::U8x3);
    fir::Resizer::new()
        .resize(&src, &mut dst, None)
        .map_err(resize_error)?;

    RgbImage::from_raw(w, h, dst.buffer().to_vec())
        .ok_or_else(|| resize_error("resized buffer has wrong length"))
}

fn resize_error(e: impl ToString) -> ImageError {
    ImageError::Parameter(ParameterError::from_kind(ParameterErrorKind::Generic(
        e.to_string(),
    )))
}

/// Read EXIF orientation tag (1-8). Returns 1 (normal) if missing or unreadable.
fn read_exif_orientation(bytes: &[u8]) -> u8 {
    let read = || -> Option<u8> {
        let mut cursor = Cursor::new(bytes);
        let exif = exif::Reader::new().read_from_container(&mut cursor).ok()?;
        let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
        field.value.get_uint(0).map(|v| v as u8)
    };
    read().unwrap_or(1)
}

/// Orientations:
/// 1: Normal                    5: Mirror + rotate 90° CW
/// 2: Mirror horizontal         6: Rotate 90° CW
/// 3: Rotate 180°               7: Mirror + rotate 90° CCW
/// 4: Mirror vertical           8: Rotate 90° CCW
fn apply_orientation(img: DynamicImage, orientation: u8) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(w, h, |x, y| image::Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_bounded_dimensions_within_limit() {
        assert_eq!(bounded_dimensions(800, 600, 1024), (800, 600));
        assert_eq!(bounded_dimensions(1024, 1024, 1024), (1024, 1024));
    }

    #[test]
    fn test_bounded_dimensions_landscape_and_portrait() {
        assert_eq!(bounded_dimensions(4000, 3000, 1000), (1000, 750));
        assert_eq!(bounded_dimensions(3000, 4000, 1000), (750, 1000));
    }

    #[test]
    fn test_bounded_dimensions_extreme_aspect_keeps_one_pixel() {
        assert_eq!(bounded_dimensions(10000, 2, 100), (100, 1));
    }

    #[test]
    fn test_normalize_downscales_and_reencodes_as_jpeg() {
        let jpeg = normalize(&png_bytes(300, 200), 100).unwrap();
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);

        let info = info(&jpeg).unwrap();
        assert_eq!((info.width, info.height), (100, 67));
    }

    #[test]
    fn test_normalize_keeps_small_images() {
        let jpeg = normalize(&png_bytes(40, 30), 100).unwrap();
        let info = info(&jpeg).unwrap();
        assert_eq!((info.width, info.height), (40, 30));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize(b"definitely not a picture", 100).is_err());
    }

    #[test]
    fn test_orientation_six_swaps_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 2));
        let rotated = apply_orientation(img, 6);
        assert_eq!((rotated.width(), rotated.height()), (2, 4));
    }

    #[test]
    fn test_missing_exif_is_normal_orientation() {
        assert_eq!(read_exif_orientation(&png_bytes(4, 4)), 1);
    }
}
