//! # Chartsight
//!
//! Heuristic trading-signal inference from candlestick chart images.
//!
//! Feed it a decoded screenshot of a price chart and get back a signal
//! (STRONG BUY / BUY / HOLD / SELL / STRONG SELL) with a confidence score.
//! The pipeline is a single deterministic pass: detect candle bodies, fit a
//! trend slope, classify the volatility regime, read green/red color
//! dominance, and fuse everything through a hand-tuned scoring formula.
//! Analysis is purely geometric - no axis calibration, no real price units.
//!
//! ## Quick Start
//!
//! ```rust
//! use chartsight::prelude::*;
//! use image::{Rgb, RgbImage};
//!
//! // A blank chart has no candle bodies, so analysis falls back to HOLD.
//! let chart = RgbImage::from_pixel(320, 240, Rgb([250, 250, 250]));
//!
//! let analyzer = AnalyzerBuilder::new().build().unwrap();
//! let report = analyzer.analyze(&chart);
//!
//! assert_eq!(report.signal, Signal::Hold);
//! assert_eq!(report.analysis_quality, Quality::Poor);
//! ```
//!
//! `analyze` is total: any fault inside the pipeline is converted into a
//! fallback HOLD record with the failure description attached, never a panic.

use image::{DynamicImage, RgbImage};
use tracing::debug;

pub mod params;
pub mod stages;

use params::AnalyzerParams;

pub mod prelude {
    pub use crate::{
        // Batch
        analyze_parallel,
        // Parameters
        params::{
            AnalyzerParams, ExtractParams, FusionParams, HueBand, ParamMeta, PriceActionParams,
            SentimentParams, TrendParams, TunableParams,
        },
        // Stages
        stages,
        // Errors
        AnalysisError,
        // Types
        AnalysisResult,
        AnalyzerBuilder,
        CandleBox,
        CandleSequence,
        ChartAnalyzer,
        ChartReport,
        PriceAction,
        Quality,
        Result,
        Sentiment,
        Signal,
        TrendDirection,
        TrendResult,
        MIN_CANDLES,
    };
}

/// Minimum number of detected candle bodies required for analysis
pub const MIN_CANDLES: usize = 3;

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur during chart analysis or analyzer configuration
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Fewer than [`MIN_CANDLES`] candle bodies were found in the image
    #[error("Too few candles detected")]
    TooFewCandles,

    /// A stage hit mathematically undefined input
    #[error("Degenerate chart data: {0}")]
    Degenerate(&'static str),
}

// ============================================================
// LABEL TYPES
// ============================================================

/// Final trading recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Signal {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
}

impl Signal {
    #[inline]
    pub fn is_buy(self) -> bool {
        matches!(self, Signal::StrongBuy | Signal::Buy)
    }

    #[inline]
    pub fn is_sell(self) -> bool {
        matches!(self, Signal::StrongSell | Signal::Sell)
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::StrongBuy => write!(f, "STRONG BUY"),
            Signal::Buy => write!(f, "BUY"),
            Signal::Hold => write!(f, "HOLD"),
            Signal::Sell => write!(f, "SELL"),
            Signal::StrongSell => write!(f, "STRONG SELL"),
        }
    }
}

/// Direction of the fitted candle trend
///
/// `Unknown` appears only in the fallback record, never from the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Uptrend,
    Downtrend,
    Neutral,
    Unknown,
}

impl TrendDirection {
    #[inline]
    pub fn is_up(self) -> bool {
        matches!(self, TrendDirection::Uptrend)
    }

    #[inline]
    pub fn is_down(self) -> bool {
        matches!(self, TrendDirection::Downtrend)
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Uptrend => write!(f, "uptrend"),
            TrendDirection::Downtrend => write!(f, "downtrend"),
            TrendDirection::Neutral => write!(f, "neutral"),
            TrendDirection::Unknown => write!(f, "unknown"),
        }
    }
}

/// Volatility regime read from the candle-height distribution
///
/// `Unclear` is the fallback-record label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceAction {
    Trending,
    Ranging,
    Consolidating,
    Unclear,
}

impl std::fmt::Display for PriceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceAction::Trending => write!(f, "trending"),
            PriceAction::Ranging => write!(f, "ranging"),
            PriceAction::Consolidating => write!(f, "consolidating"),
            PriceAction::Unclear => write!(f, "unclear"),
        }
    }
}

/// Bullish/bearish lean read from dominant candle color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, Sentiment::Bullish)
    }

    #[inline]
    pub fn is_bearish(self) -> bool {
        matches!(self, Sentiment::Bearish)
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Bullish => write!(f, "bullish"),
            Sentiment::Bearish => write!(f, "bearish"),
            Sentiment::Neutral => write!(f, "neutral"),
        }
    }
}

/// Overall quality of an analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Good,
    Medium,
    Poor,
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quality::Good => write!(f, "good"),
            Quality::Medium => write!(f, "medium"),
            Quality::Poor => write!(f, "poor"),
        }
    }
}

// ============================================================
// CANDLE GEOMETRY
// ============================================================

/// A detected candlestick body in normalized-canvas pixel coordinates
///
/// Origin is the top-left corner; `y` increases downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CandleBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CandleBox {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge of the body, the close-price proxy used by trend fitting
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    #[inline]
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }
}

/// Candle bodies ordered by ascending `x` (left-to-right = chronological)
pub type CandleSequence = Vec<CandleBox>;

// ============================================================
// RESULT RECORDS
// ============================================================

/// Output of the trend stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TrendResult {
    pub direction: TrendDirection,
    /// Certainty score in 0..=90; not a probability
    pub confidence: u8,
}

impl TrendResult {
    /// The flat-trend result, also used as the short-input fallback
    pub const fn neutral() -> Self {
        Self {
            direction: TrendDirection::Neutral,
            confidence: stages::trend::NEUTRAL_CONFIDENCE,
        }
    }
}

/// Final analysis record returned to the caller
///
/// Created once per [`ChartAnalyzer::analyze`] call and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisResult {
    pub signal: Signal,
    pub confidence: u8,
    pub trend: TrendDirection,
    pub trend_confidence: u8,
    pub price_action: PriceAction,
    pub sentiment: Sentiment,
    pub analysis_quality: Quality,
    /// Failure description when the pipeline fell back; `None` on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// The fixed fallback record for a failed analysis
    pub fn fallback(error: AnalysisError) -> Self {
        Self {
            signal: Signal::Hold,
            confidence: 50,
            trend: TrendDirection::Unknown,
            trend_confidence: 0,
            price_action: PriceAction::Unclear,
            sentiment: Sentiment::Neutral,
            analysis_quality: Quality::Poor,
            error: Some(error.to_string()),
        }
    }

    #[inline]
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

// ============================================================
// ANALYZER FACADE
// ============================================================

/// Chart analysis facade
///
/// Owns a validated parameter set and runs the full pipeline per call. Holds
/// no cross-call state: concurrent callers may share one analyzer freely.
#[derive(Debug, Clone)]
pub struct ChartAnalyzer {
    params: AnalyzerParams,
}

impl Default for ChartAnalyzer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ChartAnalyzer {
    /// Analyzer with the empirically tuned default parameters
    pub fn with_defaults() -> Self {
        Self {
            params: AnalyzerParams::default(),
        }
    }

    pub fn params(&self) -> &AnalyzerParams {
        &self.params
    }

    /// Analyze a decoded chart image.
    ///
    /// Total function: every pipeline fault is converted into the fallback
    /// HOLD record carrying the failure description. The input image is only
    /// read, never mutated.
    pub fn analyze(&self, image: &RgbImage) -> AnalysisResult {
        self.run(image).unwrap_or_else(AnalysisResult::fallback)
    }

    /// Convenience wrapper for images straight out of a decoder.
    pub fn analyze_dynamic(&self, image: &DynamicImage) -> AnalysisResult {
        self.analyze(&image.to_rgb8())
    }

    fn run(&self, image: &RgbImage) -> Result<AnalysisResult> {
        let normalized = stages::preprocess::normalize(image);

        let candles = stages::extract::extract_candles(&normalized, &self.params.extract);
        debug!(candles = candles.len(), "extracted candle bodies");
        if candles.len() < MIN_CANDLES {
            return Err(AnalysisError::TooFewCandles);
        }

        // The three mid stages depend only on the extraction output and the
        // normalized image, not on each other.
        let trend = stages::trend::analyze_trend(&candles, &self.params.trend);
        let price_action = stages::price_action::classify(&candles, &self.params.price_action)?;
        let sentiment = stages::sentiment::detect(&normalized, &self.params.sentiment);

        let (signal, confidence) =
            stages::fusion::fuse(trend, price_action, sentiment, &self.params.fusion);
        debug!(%signal, confidence, %price_action, %sentiment, "chart analysis complete");

        Ok(AnalysisResult {
            signal,
            confidence,
            trend: trend.direction,
            trend_confidence: trend.confidence,
            price_action,
            sentiment,
            analysis_quality: if confidence > 60 {
                Quality::Good
            } else {
                Quality::Medium
            },
            error: None,
        })
    }
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for [`ChartAnalyzer`] instances
pub struct AnalyzerBuilder {
    params: AnalyzerParams,
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            params: AnalyzerParams::default(),
        }
    }

    /// Replace the whole parameter set
    pub fn params(mut self, params: AnalyzerParams) -> Self {
        self.params = params;
        self
    }

    pub fn extract(mut self, params: params::ExtractParams) -> Self {
        self.params.extract = params;
        self
    }

    pub fn trend(mut self, params: params::TrendParams) -> Self {
        self.params.trend = params;
        self
    }

    pub fn price_action(mut self, params: params::PriceActionParams) -> Self {
        self.params.price_action = params;
        self
    }

    pub fn sentiment(mut self, params: params::SentimentParams) -> Self {
        self.params.sentiment = params;
        self
    }

    pub fn fusion(mut self, params: params::FusionParams) -> Self {
        self.params.fusion = params;
        self
    }

    /// Build the analyzer, validating every stage's parameters
    pub fn build(self) -> Result<ChartAnalyzer> {
        self.params.validate()?;
        Ok(ChartAnalyzer {
            params: self.params,
        })
    }
}

// ============================================================
// PARALLEL ANALYSIS
// ============================================================

use rayon::prelude::*;

/// Result of analyzing a single named chart
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChartReport {
    pub name: String,
    pub result: AnalysisResult,
}

/// Analyze multiple charts in parallel.
///
/// Each analysis is stateless and independent; results come back in input
/// order. Every entry gets a well-formed result, failures included.
pub fn analyze_parallel<'a, I>(analyzer: &ChartAnalyzer, charts: I) -> Vec<ChartReport>
where
    I: IntoParallelIterator<Item = (&'a str, &'a RgbImage)>,
{
    charts
        .into_par_iter()
        .map(|(name, image)| ChartReport {
            name: name.to_string(),
            result: analyzer.analyze(image),
        })
        .collect()
}

// ============================================================
// TESTS
// ============================================================
