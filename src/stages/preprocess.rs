//! Canvas normalization.

use image::{imageops, RgbImage};

/// Width of the normalized analysis canvas
pub const CANVAS_WIDTH: u32 = 800;
/// Height of the normalized analysis canvas
pub const CANVAS_HEIGHT: u32 = 600;

/// Stretch the input onto the fixed analysis canvas.
///
/// Aspect ratio is not preserved: every downstream threshold is tuned against
/// the fixed canvas, not the source geometry. Produces a copy; the caller's
/// image is never touched.
pub fn normalize(image: &RgbImage) -> RgbImage {
    imageops::resize(
        image,
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        imageops::FilterType::Triangle,
    )
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    #[test]
    fn test_normalize_stretches_to_canvas() {
        let image = RgbImage::from_pixel(64, 480, Rgb([10, 20, 30]));
        let normalized = normalize(&image);
        assert_eq!(normalized.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
    }

    #[test]
    fn test_normalize_preserves_solid_color() {
        let image = RgbImage::from_pixel(100, 100, Rgb([200, 50, 50]));
        let normalized = normalize(&image);
        assert_eq!(normalized.get_pixel(400, 300), &Rgb([200, 50, 50]));
    }

    #[test]
    fn test_normalize_accepts_single_pixel() {
        let image = RgbImage::from_pixel(1, 1, Rgb([0, 0, 0]));
        let normalized = normalize(&image);
        assert_eq!(normalized.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
        assert_eq!(normalized.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }
}
