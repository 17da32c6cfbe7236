//! Color-dominance sentiment detection.
//!
//! Works on the normalized color image, not the binary mask: candle fill color
//! is the only bullish/bearish cue available without price calibration.

use image::RgbImage;
use tracing::trace;

use crate::params::SentimentParams;
use crate::Sentiment;

/// Classify green/red pixel dominance into a market sentiment.
///
/// A pixel only counts toward a band when it is saturated and bright enough;
/// the winning color must beat the other band by `dominance_ratio` AND cover
/// at least `min_coverage` of the canvas. Sparse or near-monochrome charts
/// therefore stay neutral.
pub fn detect(image: &RgbImage, params: &SentimentParams) -> Sentiment {
    let mut green_count: u64 = 0;
    let mut red_count: u64 = 0;

    for pixel in image.pixels() {
        let [r, g, b] = pixel.0;
        let (h, s, v) = rgb_to_hsv(r, g, b);
        if s < params.min_saturation || v < params.min_value {
            continue;
        }
        if params.green.contains(h) {
            green_count += 1;
        } else if params.red_low.contains(h) || params.red_high.contains(h) {
            red_count += 1;
        }
    }

    trace!(green_count, red_count, "color band counts");
    classify_counts(
        green_count,
        red_count,
        u64::from(image.width()) * u64::from(image.height()),
        params,
    )
}

/// Dominance decision over raw band counts.
pub fn classify_counts(
    green_count: u64,
    red_count: u64,
    total_pixels: u64,
    params: &SentimentParams,
) -> Sentiment {
    let min_significant = total_pixels as f64 * params.min_coverage;
    let (green, red) = (green_count as f64, red_count as f64);

    if green > red * params.dominance_ratio && green > min_significant {
        Sentiment::Bullish
    } else if red > green * params.dominance_ratio && red > min_significant {
        Sentiment::Bearish
    } else {
        Sentiment::Neutral
    }
}

/// RGB to HSV with hue on the half-degree scale the band constants use:
/// hue in 0..=180, saturation and value in 0..=255.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    if max == 0 {
        return (0, 0, 0);
    }

    let delta = f32::from(max) - f32::from(min);
    let s = (delta * 255.0 / f32::from(max)).round() as u8;
    if delta == 0.0 {
        return (0, 0, v);
    }

    let mut h = if max == r {
        30.0 * (f32::from(g) - f32::from(b)) / delta
    } else if max == g {
        60.0 + 30.0 * (f32::from(b) - f32::from(r)) / delta
    } else {
        120.0 + 30.0 * (f32::from(r) - f32::from(g)) / delta
    };
    if h < 0.0 {
        h += 180.0;
    }

    (h.round() as u8, s, v)
}
