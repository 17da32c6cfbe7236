//! Signal fusion: trend, price action, and sentiment into one decision.

use crate::params::FusionParams;
use crate::{PriceAction, Sentiment, Signal, TrendDirection, TrendResult};

/// Floor applied to the fused base confidence
const BASE_FLOOR: u8 = 50;

/// Combine the three stage outputs into a final signal and confidence.
///
/// Trend direction contributes its confidence scaled by `trend_weight`,
/// sentiment adds or subtracts `sentiment_weight`, then the price-action
/// regime modulates the total before thresholding: a ranging market damps
/// weak scores, a trending market amplifies everything, and consolidation
/// leaves the score alone. Pure function: identical inputs always yield
/// identical outputs.
pub fn fuse(
    trend: TrendResult,
    action: PriceAction,
    sentiment: Sentiment,
    params: &FusionParams,
) -> (Signal, u8) {
    let trend_push = f64::from(trend.confidence) / 100.0 * params.trend_weight;
    let mut score = match trend.direction {
        TrendDirection::Uptrend => trend_push,
        TrendDirection::Downtrend => -trend_push,
        _ => 0.0,
    };

    score += match sentiment {
        Sentiment::Bullish => params.sentiment_weight,
        Sentiment::Bearish => -params.sentiment_weight,
        Sentiment::Neutral => 0.0,
    };

    if action == PriceAction::Ranging && score.abs() < params.weak_score_cutoff {
        score *= params.ranging_damp;
    } else if action == PriceAction::Trending {
        score *= params.trending_boost;
    }

    let base = trend.confidence.max(BASE_FLOOR);
    if score >= params.strong_threshold {
        (Signal::StrongBuy, (base + 20).min(90))
    } else if score >= params.entry_threshold {
        (Signal::Buy, (base + 15).min(85))
    } else if score <= -params.strong_threshold {
        (Signal::StrongSell, (base + 20).min(90))
    } else if score <= -params.entry_threshold {
        (Signal::Sell, (base + 15).min(85))
    } else {
        (Signal::Hold, (base - 10).max(BASE_FLOOR))
    }
}
