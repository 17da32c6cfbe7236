//! Volatility-regime classification from candle heights.

use crate::params::PriceActionParams;
use crate::{AnalysisError, CandleBox, PriceAction, Result};

/// Classify the candle-height distribution into a price-action regime.
///
/// A single body dwarfing the average reads as a breakout impulse; near-uniform
/// heights read as a flat, low-volatility market; everything else is moderate
/// consolidation. The breakout test wins over the ranging test.
///
/// An empty or all-zero-height sequence makes the ratio undefined and surfaces
/// as a degenerate fault rather than an arbitrary label.
pub fn classify(candles: &[CandleBox], params: &PriceActionParams) -> Result<PriceAction> {
    if candles.is_empty() {
        return Err(AnalysisError::Degenerate("no candle bodies to classify"));
    }

    let heights: Vec<f64> = candles.iter().map(|c| f64::from(c.height)).collect();
    let n = heights.len() as f64;
    let mean = heights.iter().sum::<f64>() / n;
    if mean <= f64::EPSILON {
        return Err(AnalysisError::Degenerate("candle heights average to zero"));
    }

    let tallest = heights.iter().copied().fold(0.0_f64, f64::max);
    if tallest / mean > params.breakout_ratio {
        return Ok(PriceAction::Trending);
    }

    let variance = heights.iter().map(|h| (h - mean) * (h - mean)).sum::<f64>() / n;
    if variance.sqrt() < params.ranging_std {
        Ok(PriceAction::Ranging)
    } else {
        Ok(PriceAction::Consolidating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_heights(heights: &[u32]) -> Vec<CandleBox> {
        heights
            .iter()
            .enumerate()
            .map(|(i, &h)| CandleBox::new(i as u32 * 30, 100, 10, h))
            .collect()
    }

    #[test]
    fn test_uniform_heights_are_ranging() {
        let candles = with_heights(&[40, 40, 40, 40, 40]);
        let action = classify(&candles, &PriceActionParams::default()).unwrap();
        assert_eq!(action, PriceAction::Ranging);
    }

    #[test]
    fn test_single_giant_candle_is_trending() {
        // One body ten times the others trips the breakout test no matter
        // what the std-dev says
        let candles = with_heights(&[20, 20, 200, 20, 20]);
        let action = classify(&candles, &PriceActionParams::default()).unwrap();
        assert_eq!(action, PriceAction::Trending);
    }

    #[test]
    fn test_moderate_spread_is_consolidating() {
        // max/mean = 45/30 = 1.5, std ~ 11
        let candles = with_heights(&[15, 25, 30, 35, 45]);
        let action = classify(&candles, &PriceActionParams::default()).unwrap();
        assert_eq!(action, PriceAction::Consolidating);
    }

    #[test]
    fn test_breakout_wins_over_ranging() {
        // Near-zero spread among the small candles, but the outlier decides
        let candles = with_heights(&[10, 10, 10, 10, 90]);
        let action = classify(&candles, &PriceActionParams::default()).unwrap();
        assert_eq!(action, PriceAction::Trending);
    }

    #[test]
    fn test_zero_heights_are_degenerate() {
        let candles = with_heights(&[0, 0, 0]);
        let err = classify(&candles, &PriceActionParams::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::Degenerate(_)));
    }

    #[test]
    fn test_empty_sequence_is_degenerate() {
        let err = classify(&[], &PriceActionParams::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::Degenerate(_)));
    }

    #[test]
    fn test_ranging_boundary_uses_population_std() {
        // Heights 38,40,42 over 3 candles: population variance 8/3, std ~1.63
        let candles = with_heights(&[38, 40, 42]);
        let action = classify(&candles, &PriceActionParams::default()).unwrap();
        assert_eq!(action, PriceAction::Ranging);
    }
}
