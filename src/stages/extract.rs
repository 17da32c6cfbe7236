//! Candle-body extraction from the normalized chart image.

use image::{imageops, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::filter::gaussian_blur_f32;
use imageproc::point::Point;
use tracing::trace;

use crate::params::ExtractParams;
use crate::CandleBox;

/// Locate distinct candle-body blobs, ordered left to right.
///
/// Grayscale, Gaussian blur, inverse binary threshold, then outer contours and
/// their axis-aligned bounding boxes. Assumes a light chart background with
/// darker or saturated bodies; the height/width filter drops short noise blobs
/// and wide background shapes. Left-to-right order is chronological order.
pub fn extract_candles(image: &RgbImage, params: &ExtractParams) -> Vec<CandleBox> {
    let gray = imageops::grayscale(image);
    let blurred = gaussian_blur_f32(&gray, params.blur_sigma);
    let mask = threshold(&blurred, params.body_threshold, ThresholdType::BinaryInverted);

    let contours = find_contours::<u32>(&mask);
    let candidates = contours.len();

    let mut bodies: Vec<CandleBox> = contours
        .iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .filter_map(|contour| bounding_box(&contour.points))
        .filter(|body| body.height > params.min_body_height && body.width < params.max_body_width)
        .collect();
    bodies.sort_by_key(|body| body.x);

    trace!(candidates, bodies = bodies.len(), "candle extraction");
    bodies
}

/// Axis-aligned bounding box of a contour's boundary points.
fn bounding_box(points: &[Point<u32>]) -> Option<CandleBox> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for point in &points[1..] {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }
    Some(CandleBox::new(
        min_x,
        min_y,
        max_x - min_x + 1,
        max_y - min_y + 1,
    ))
}
