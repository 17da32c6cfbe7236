//! End-to-end pipeline tests over synthetic drawn charts.
//!
//! These validate the facade contract: the documented fusion outcomes for
//! clear-cut charts, the fixed fallback record, and totality over degenerate
//! inputs.

use chartsight::prelude::*;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const CANDLE_GREEN: Rgb<u8> = Rgb([0, 200, 0]);
const CANDLE_RED: Rgb<u8> = Rgb([200, 0, 0]);

fn blank_canvas() -> RgbImage {
    RgbImage::from_pixel(800, 600, WHITE)
}

/// Draw a candle body whose bottom edge sits at `bottom`.
fn draw_candle(
    image: &mut RgbImage,
    x: i32,
    bottom: i32,
    width: u32,
    height: u32,
    color: Rgb<u8>,
) {
    let top = bottom - height as i32;
    draw_filled_rect_mut(image, Rect::at(x, top).of_size(width, height), color);
}

fn analyzer() -> ChartAnalyzer {
    AnalyzerBuilder::new().build().unwrap()
}

// ============================================================
// FALLBACK PATHS
// ============================================================

#[test]
fn test_single_candle_reports_insufficient_data() {
    let mut chart = blank_canvas();
    draw_candle(&mut chart, 400, 300, 10, 60, BLACK);

    let result = analyzer().analyze(&chart);

    assert_eq!(result.signal, Signal::Hold);
    assert_eq!(result.confidence, 50);
    assert_eq!(result.trend, TrendDirection::Unknown);
    assert_eq!(result.trend_confidence, 0);
    assert_eq!(result.price_action, PriceAction::Unclear);
    assert_eq!(result.sentiment, Sentiment::Neutral);
    assert_eq!(result.analysis_quality, Quality::Poor);
    assert_eq!(result.error.as_deref(), Some("Too few candles detected"));
}

#[test]
fn test_two_candles_still_insufficient() {
    let mut chart = blank_canvas();
    draw_candle(&mut chart, 200, 300, 10, 60, BLACK);
    draw_candle(&mut chart, 500, 350, 10, 60, BLACK);

    let result = analyzer().analyze(&chart);
    assert!(result.is_fallback());
    assert_eq!(result.error.as_deref(), Some("Too few candles detected"));
}

#[test]
fn test_blank_chart_is_total() {
    let result = analyzer().analyze(&blank_canvas());
    assert_eq!(result.signal, Signal::Hold);
    assert_eq!(result.analysis_quality, Quality::Poor);
}

#[test]
fn test_noise_chart_is_total() {
    let mut chart = RgbImage::new(800, 600);
    for (x, y, pixel) in chart.enumerate_pixels_mut() {
        let v = ((x * 7 + y * 13) % 256) as u8;
        *pixel = Rgb([v, v.wrapping_mul(3), v ^ 0x5a]);
    }

    let result = analyzer().analyze(&chart);
    assert!((50..=90).contains(&result.confidence));
}

// ============================================================
// CLEAR-CUT SIGNALS
// ============================================================

#[test]
fn test_rising_bottoms_on_neutral_colors_is_strong_buy() {
    // Five uniform candles whose bottom edges rise 50 px per bar: the fitted
    // slope saturates trend confidence, uniform heights read as ranging, and
    // black bodies carry no color sentiment. Score 0.9 * 3 = 2.7 escapes the
    // ranging damp and clears the strong threshold.
    let mut chart = blank_canvas();
    for (i, bottom) in [100, 150, 200, 250, 300].into_iter().enumerate() {
        draw_candle(&mut chart, 100 + i as i32 * 100, bottom, 10, 40, BLACK);
    }

    let result = analyzer().analyze(&chart);

    assert_eq!(result.signal, Signal::StrongBuy);
    assert_eq!(result.confidence, 90);
    assert_eq!(result.trend, TrendDirection::Uptrend);
    assert_eq!(result.trend_confidence, 90);
    assert_eq!(result.price_action, PriceAction::Ranging);
    assert_eq!(result.sentiment, Sentiment::Neutral);
    assert_eq!(result.analysis_quality, Quality::Good);
    assert_eq!(result.error, None);
}

#[test]
fn test_falling_bottoms_on_red_chart_is_strong_sell() {
    // Heavy red coverage (5 * 14 * 100 px, well past 1% of the canvas) plus a
    // steep downtrend: score -2.7 - 1 = -3.7.
    let mut chart = blank_canvas();
    for (i, bottom) in [520, 470, 420, 370, 320].into_iter().enumerate() {
        draw_candle(&mut chart, 100 + i as i32 * 100, bottom, 14, 100, CANDLE_RED);
    }

    let result = analyzer().analyze(&chart);

    assert_eq!(result.signal, Signal::StrongSell);
    assert_eq!(result.confidence, 90);
    assert_eq!(result.trend, TrendDirection::Downtrend);
    assert_eq!(result.trend_confidence, 90);
    assert_eq!(result.price_action, PriceAction::Ranging);
    assert_eq!(result.sentiment, Sentiment::Bearish);
    assert_eq!(result.analysis_quality, Quality::Good);
    assert_eq!(result.error, None);
}

#[test]
fn test_rising_bottoms_on_green_chart_is_strong_buy_bullish() {
    let mut chart = blank_canvas();
    for (i, bottom) in [520, 470, 420, 370, 320].into_iter().rev().enumerate() {
        draw_candle(&mut chart, 100 + i as i32 * 100, bottom, 14, 100, CANDLE_GREEN);
    }

    let result = analyzer().analyze(&chart);

    assert_eq!(result.signal, Signal::StrongBuy);
    assert_eq!(result.sentiment, Sentiment::Bullish);
    assert_eq!(result.trend, TrendDirection::Uptrend);
    assert_eq!(result.error, None);
}

#[test]
fn test_breakout_candle_reads_trending() {
    // One body ten times taller than the rest with flat bottoms: no trend,
    // no sentiment, so the boosted score stays at zero and the call is HOLD
    // in a trending regime.
    let mut chart = blank_canvas();
    let heights = [30, 30, 300, 30, 30];
    for (i, height) in heights.into_iter().enumerate() {
        draw_candle(&mut chart, 100 + i as i32 * 100, 400, 10, height, BLACK);
    }

    let result = analyzer().analyze(&chart);

    assert_eq!(result.price_action, PriceAction::Trending);
    assert_eq!(result.trend, TrendDirection::Neutral);
    assert_eq!(result.signal, Signal::Hold);
    assert_eq!(result.confidence, 50);
    assert_eq!(result.analysis_quality, Quality::Medium);
    assert_eq!(result.error, None);
}

// ============================================================
// PREPROCESSING
// ============================================================

#[test]
fn test_off_canvas_input_is_normalized_before_analysis() {
    // Twice the canvas width: candles drawn 24 px wide land at 12 px after
    // the stretch and still pass the body-width filter.
    let mut chart = RgbImage::from_pixel(1600, 600, WHITE);
    for (i, bottom) in [100, 150, 200, 250, 300].into_iter().enumerate() {
        draw_candle(&mut chart, 200 + i as i32 * 240, bottom, 24, 80, BLACK);
    }

    let result = analyzer().analyze(&chart);

    assert_eq!(result.signal, Signal::StrongBuy);
    assert_eq!(result.trend, TrendDirection::Uptrend);
    assert_eq!(result.trend_confidence, 90);
    assert_eq!(result.error, None);
}

#[test]
fn test_input_image_is_not_mutated() {
    let mut chart = blank_canvas();
    draw_candle(&mut chart, 400, 300, 10, 60, CANDLE_GREEN);
    let before = chart.clone();

    let _ = analyzer().analyze(&chart);
    assert_eq!(chart, before);
}

// ============================================================
// BATCH API
// ============================================================

#[test]
fn test_parallel_batch_keeps_order_and_results() {
    let mut uptrend = blank_canvas();
    for (i, bottom) in [100, 150, 200, 250, 300].into_iter().enumerate() {
        draw_candle(&mut uptrend, 100 + i as i32 * 100, bottom, 10, 40, BLACK);
    }
    let empty = blank_canvas();

    let analyzer = analyzer();
    let charts: Vec<(&str, &RgbImage)> = vec![("uptrend", &uptrend), ("empty", &empty)];
    let reports = analyze_parallel(&analyzer, charts);

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].name, "uptrend");
    assert_eq!(reports[0].result.signal, Signal::StrongBuy);
    assert_eq!(reports[1].name, "empty");
    assert!(reports[1].result.is_fallback());
}
