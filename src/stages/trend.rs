//! Trend-slope estimation over extracted candle bodies.

use tracing::trace;

use crate::params::TrendParams;
use crate::{CandleBox, TrendDirection, TrendResult, MIN_CANDLES};

/// Cap on reported trend confidence
pub const MAX_CONFIDENCE: u8 = 90;
/// Confidence reported for a neutral (flat) trend
pub const NEUTRAL_CONFIDENCE: u8 = 50;

/// Fit a least-squares line through the candle bottom edges and classify it.
///
/// The bottom edge `y + h` stands in for the closing price; body orientation
/// is not disambiguated at this stage. Fewer than [`MIN_CANDLES`] bodies
/// degrade to a neutral result (the facade short-circuits that case before
/// calling here, but the fallback keeps this function total).
pub fn analyze_trend(candles: &[CandleBox], params: &TrendParams) -> TrendResult {
    if candles.len() < MIN_CANDLES {
        return TrendResult::neutral();
    }

    let slope = bottom_edge_slope(candles);
    trace!(slope, "fitted bottom-edge slope");

    let direction = if slope < -params.slope_threshold {
        TrendDirection::Downtrend
    } else if slope > params.slope_threshold {
        TrendDirection::Uptrend
    } else {
        TrendDirection::Neutral
    };

    let confidence = match direction {
        TrendDirection::Neutral => NEUTRAL_CONFIDENCE,
        _ => slope_confidence(slope),
    };

    TrendResult {
        direction,
        confidence,
    }
}

/// First-degree ordinary-least-squares slope of bottom edges against bar index.
fn bottom_edge_slope(candles: &[CandleBox]) -> f64 {
    let n = candles.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = candles.iter().map(|c| f64::from(c.bottom())).sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, candle) in candles.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (f64::from(candle.bottom()) - y_mean);
        denominator += dx * dx;
    }
    numerator / denominator
}

/// Map slope magnitude onto the confidence scale, capped at [`MAX_CONFIDENCE`].
fn slope_confidence(slope: f64) -> u8 {
    (slope.abs() * 100.0).floor().min(f64::from(MAX_CONFIDENCE)) as u8
}
