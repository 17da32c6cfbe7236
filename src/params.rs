//! Tuning parameters for the analysis pipeline stages.
//!
//! Every threshold in the pipeline was tuned empirically against chart
//! screenshots rather than derived from first principles. The `Default` impls
//! carry those tuned values verbatim; [`ParamMeta`] describes the range each
//! one can be swept over, enabling:
//! - Grid search optimization
//! - Parameter documentation
//! - Automatic configuration UI generation
//!
//! # Example
//!
//! ```rust
//! use chartsight::params::{ExtractParams, TunableParams};
//!
//! for param in ExtractParams::param_meta() {
//!     println!("{}: default {} - {}", param.name, param.default, param.description);
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{AnalysisError, Result};

// ============================================================
// PARAMETER METADATA
// ============================================================

/// Metadata for a single tunable parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
    /// Parameter name (e.g., "body_threshold")
    pub name: &'static str,
    /// Default value
    pub default: f64,
    /// Range for optimization: (min, max, step)
    pub range: (f64, f64, f64),
    /// Human-readable description
    pub description: &'static str,
}

impl ParamMeta {
    pub const fn new(
        name: &'static str,
        default: f64,
        range: (f64, f64, f64),
        description: &'static str,
    ) -> Self {
        Self {
            name,
            default,
            range,
            description,
        }
    }

    /// Generate all values for grid search
    pub fn generate_grid(&self) -> Vec<f64> {
        let (min, max, step) = self.range;
        let mut values = Vec::new();
        let mut v = min;
        while v <= max + f64::EPSILON {
            values.push(v);
            v += step;
        }
        values
    }

    /// Validate a value against this parameter's sweep range
    pub fn validate(&self, value: f64) -> Result<()> {
        let (min, max, _) = self.range;
        if value < min || value > max {
            return Err(AnalysisError::OutOfRange {
                field: self.name,
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}

// ============================================================
// TUNABLE PARAMS TRAIT
// ============================================================

/// Trait for stage parameter sets that support tuning
///
/// Implementing this trait enables:
/// - Discovery of available parameters
/// - Creation of parameter sets with custom values
/// - Grid search optimization
pub trait TunableParams: Sized {
    /// Returns metadata for all configurable parameters
    fn param_meta() -> &'static [ParamMeta];

    /// Creates a parameter set from a name->value map
    ///
    /// Missing parameters use their default values.
    fn with_params(params: &HashMap<&str, f64>) -> Result<Self>;
}

/// Helper to get an f64 value from params with default fallback
fn get_value(params: &HashMap<&str, f64>, key: &str, default: f64) -> f64 {
    params.get(key).copied().unwrap_or(default)
}

/// Helper to get a pixel-count param; must be a non-negative integer
fn get_pixels(params: &HashMap<&str, f64>, key: &str, default: u32) -> Result<u32> {
    let value = get_value(params, key, f64::from(default));
    if !(0.0..=f64::from(u32::MAX)).contains(&value) || value.fract() != 0.0 {
        return Err(AnalysisError::InvalidValue(
            "pixel parameters must be non-negative integers",
        ));
    }
    Ok(value as u32)
}

/// Helper to get an 8-bit level param; must be an integer in 0..=255
fn get_level(params: &HashMap<&str, f64>, key: &str, default: u8) -> Result<u8> {
    let value = get_value(params, key, f64::from(default));
    if !(0.0..=255.0).contains(&value) || value.fract() != 0.0 {
        return Err(AnalysisError::InvalidValue(
            "level parameters must be integers in 0..=255",
        ));
    }
    Ok(value as u8)
}

// ============================================================
// EXTRACTION
// ============================================================

/// Candle-body extraction parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractParams {
    /// Inverse binary threshold level: pixels darker than this become foreground
    pub body_threshold: u8,
    /// Gaussian blur sigma. 1.1 is the auto-derived sigma for a 5x5 kernel
    /// (`0.3 * ((k - 1) * 0.5 - 1) + 0.8`).
    pub blur_sigma: f32,
    /// Bounding boxes must be strictly taller than this to count as bodies
    pub min_body_height: u32,
    /// Bounding boxes must be strictly narrower than this to count as bodies
    pub max_body_width: u32,
}

impl Default for ExtractParams {
    fn default() -> Self {
        Self {
            body_threshold: 200,
            blur_sigma: 1.1,
            min_body_height: 5,
            max_body_width: 20,
        }
    }
}

impl ExtractParams {
    pub fn validate(&self) -> Result<()> {
        if !self.blur_sigma.is_finite() || self.blur_sigma <= 0.0 {
            return Err(AnalysisError::InvalidValue("blur_sigma must be finite and > 0"));
        }
        if self.max_body_width == 0 {
            return Err(AnalysisError::InvalidValue("max_body_width must be > 0"));
        }
        if self.body_threshold == 0 || self.body_threshold == 255 {
            return Err(AnalysisError::InvalidValue(
                "body_threshold must leave both foreground and background reachable",
            ));
        }
        Ok(())
    }
}

impl TunableParams for ExtractParams {
    fn param_meta() -> &'static [ParamMeta] {
        const META: &[ParamMeta] = &[
            ParamMeta::new(
                "body_threshold",
                200.0,
                (120.0, 240.0, 10.0),
                "Inverse threshold level separating dark candle bodies from a light background",
            ),
            ParamMeta::new(
                "blur_sigma",
                1.1,
                (0.5, 3.0, 0.1),
                "Gaussian sigma used to suppress speckle noise before thresholding",
            ),
            ParamMeta::new(
                "min_body_height",
                5.0,
                (2.0, 20.0, 1.0),
                "Shorter blobs are discarded as noise",
            ),
            ParamMeta::new(
                "max_body_width",
                20.0,
                (8.0, 40.0, 2.0),
                "Wider blobs are discarded as background shapes",
            ),
        ];
        META
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let built = Self {
            body_threshold: get_level(params, "body_threshold", 200)?,
            blur_sigma: get_value(params, "blur_sigma", 1.1) as f32,
            min_body_height: get_pixels(params, "min_body_height", 5)?,
            max_body_width: get_pixels(params, "max_body_width", 20)?,
        };
        built.validate()?;
        Ok(built)
    }
}

// ============================================================
// TREND
// ============================================================

/// Trend-slope classification parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendParams {
    /// Slopes with magnitude at or below this classify as neutral
    pub slope_threshold: f64,
}

impl Default for TrendParams {
    fn default() -> Self {
        Self { slope_threshold: 0.5 }
    }
}

impl TrendParams {
    pub fn validate(&self) -> Result<()> {
        if !self.slope_threshold.is_finite() || self.slope_threshold <= 0.0 {
            return Err(AnalysisError::InvalidValue(
                "slope_threshold must be finite and > 0",
            ));
        }
        Ok(())
    }
}

impl TunableParams for TrendParams {
    fn param_meta() -> &'static [ParamMeta] {
        const META: &[ParamMeta] = &[ParamMeta::new(
            "slope_threshold",
            0.5,
            (0.1, 2.0, 0.1),
            "Minimum fitted slope magnitude (pixels per bar) for a directional trend",
        )];
        META
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let built = Self {
            slope_threshold: get_value(params, "slope_threshold", 0.5),
        };
        built.validate()?;
        Ok(built)
    }
}

// ============================================================
// PRICE ACTION
// ============================================================

/// Volatility-regime classification parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceActionParams {
    /// max(height) / mean(height) above this reads as a breakout candle
    pub breakout_ratio: f64,
    /// Population std-dev of heights below this reads as a flat market
    pub ranging_std: f64,
}

impl Default for PriceActionParams {
    fn default() -> Self {
        Self {
            breakout_ratio: 2.0,
            ranging_std: 3.0,
        }
    }
}

impl PriceActionParams {
    pub fn validate(&self) -> Result<()> {
        if !self.breakout_ratio.is_finite() || self.breakout_ratio <= 1.0 {
            return Err(AnalysisError::InvalidValue(
                "breakout_ratio must be finite and > 1",
            ));
        }
        if !self.ranging_std.is_finite() || self.ranging_std <= 0.0 {
            return Err(AnalysisError::InvalidValue("ranging_std must be finite and > 0"));
        }
        Ok(())
    }
}

impl TunableParams for PriceActionParams {
    fn param_meta() -> &'static [ParamMeta] {
        const META: &[ParamMeta] = &[
            ParamMeta::new(
                "breakout_ratio",
                2.0,
                (1.5, 4.0, 0.25),
                "Tallest-to-average height ratio that signals an impulse move",
            ),
            ParamMeta::new(
                "ranging_std",
                3.0,
                (1.0, 8.0, 0.5),
                "Height std-dev below which candle sizes read as near-uniform",
            ),
        ];
        META
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let built = Self {
            breakout_ratio: get_value(params, "breakout_ratio", 2.0),
            ranging_std: get_value(params, "ranging_std", 3.0),
        };
        built.validate()?;
        Ok(built)
    }
}

// ============================================================
// SENTIMENT
// ============================================================

/// Inclusive hue interval on the 0..=180 half-degree scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HueBand {
    pub lo: u8,
    pub hi: u8,
}

impl HueBand {
    pub const fn new(lo: u8, hi: u8) -> Self {
        Self { lo, hi }
    }

    #[inline]
    pub fn contains(self, hue: u8) -> bool {
        self.lo <= hue && hue <= self.hi
    }

    pub fn validate(self) -> Result<()> {
        if self.lo > self.hi {
            return Err(AnalysisError::InvalidValue("hue band lo must be <= hi"));
        }
        if self.hi > 180 {
            return Err(AnalysisError::InvalidValue("hue band must lie in 0..=180"));
        }
        Ok(())
    }
}

/// Color-sentiment detection parameters
///
/// Red wraps around the hue circle, hence two sub-bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentParams {
    pub green: HueBand,
    pub red_low: HueBand,
    pub red_high: HueBand,
    /// Pixels below this saturation are ignored as washed out
    pub min_saturation: u8,
    /// Pixels below this value are ignored as too dark
    pub min_value: u8,
    /// Winning band must beat the other by this factor
    pub dominance_ratio: f64,
    /// Winning band must cover at least this fraction of the canvas
    pub min_coverage: f64,
}

impl Default for SentimentParams {
    fn default() -> Self {
        Self {
            green: HueBand::new(35, 85),
            red_low: HueBand::new(0, 10),
            red_high: HueBand::new(160, 180),
            min_saturation: 50,
            min_value: 50,
            dominance_ratio: 1.5,
            min_coverage: 0.01,
        }
    }
}

impl SentimentParams {
    pub fn validate(&self) -> Result<()> {
        self.green.validate()?;
        self.red_low.validate()?;
        self.red_high.validate()?;
        if !self.dominance_ratio.is_finite() || self.dominance_ratio < 1.0 {
            return Err(AnalysisError::InvalidValue(
                "dominance_ratio must be finite and >= 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_coverage) {
            return Err(AnalysisError::OutOfRange {
                field: "min_coverage",
                value: self.min_coverage,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(())
    }
}

impl TunableParams for SentimentParams {
    fn param_meta() -> &'static [ParamMeta] {
        const META: &[ParamMeta] = &[
            ParamMeta::new("green_lo", 35.0, (20.0, 60.0, 5.0), "Lower hue bound of the green band"),
            ParamMeta::new("green_hi", 85.0, (60.0, 110.0, 5.0), "Upper hue bound of the green band"),
            ParamMeta::new(
                "red_low_hi",
                10.0,
                (5.0, 20.0, 1.0),
                "Upper hue bound of the low red sub-band (lower bound pinned at 0)",
            ),
            ParamMeta::new(
                "red_high_lo",
                160.0,
                (140.0, 175.0, 5.0),
                "Lower hue bound of the high red sub-band (upper bound pinned at 180)",
            ),
            ParamMeta::new(
                "min_saturation",
                50.0,
                (20.0, 120.0, 10.0),
                "Minimum saturation for a pixel to count toward a band",
            ),
            ParamMeta::new(
                "min_value",
                50.0,
                (20.0, 120.0, 10.0),
                "Minimum brightness for a pixel to count toward a band",
            ),
            ParamMeta::new(
                "dominance_ratio",
                1.5,
                (1.1, 3.0, 0.1),
                "Relative dominance required before a color wins",
            ),
            ParamMeta::new(
                "min_coverage",
                0.01,
                (0.001, 0.05, 0.001),
                "Absolute canvas coverage required before a color wins",
            ),
        ];
        META
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let built = Self {
            green: HueBand::new(
                get_level(params, "green_lo", 35)?,
                get_level(params, "green_hi", 85)?,
            ),
            red_low: HueBand::new(0, get_level(params, "red_low_hi", 10)?),
            red_high: HueBand::new(get_level(params, "red_high_lo", 160)?, 180),
            min_saturation: get_level(params, "min_saturation", 50)?,
            min_value: get_level(params, "min_value", 50)?,
            dominance_ratio: get_value(params, "dominance_ratio", 1.5),
            min_coverage: get_value(params, "min_coverage", 0.01),
        };
        built.validate()?;
        Ok(built)
    }
}

// ============================================================
// FUSION
// ============================================================

/// Signal-fusion scoring parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionParams {
    /// Weight of the trend contribution (scaled by trend confidence / 100)
    pub trend_weight: f64,
    /// Weight of the sentiment contribution
    pub sentiment_weight: f64,
    /// Multiplier applied to weak scores in a ranging market
    pub ranging_damp: f64,
    /// Multiplier applied to every score in a trending market
    pub trending_boost: f64,
    /// Scores with magnitude below this count as weak for ranging damping
    pub weak_score_cutoff: f64,
    /// Score magnitude at or above this yields a STRONG signal
    pub strong_threshold: f64,
    /// Score magnitude at or above this yields a directional signal
    pub entry_threshold: f64,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self {
            trend_weight: 3.0,
            sentiment_weight: 1.0,
            ranging_damp: 0.5,
            trending_boost: 1.2,
            weak_score_cutoff: 2.0,
            strong_threshold: 2.0,
            entry_threshold: 1.0,
        }
    }
}

impl FusionParams {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("trend_weight", self.trend_weight),
            ("sentiment_weight", self.sentiment_weight),
            ("ranging_damp", self.ranging_damp),
            ("trending_boost", self.trending_boost),
            ("weak_score_cutoff", self.weak_score_cutoff),
            ("strong_threshold", self.strong_threshold),
            ("entry_threshold", self.entry_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::OutOfRange {
                    field,
                    value,
                    min: 0.0,
                    max: f64::MAX,
                });
            }
        }
        if self.ranging_damp > 1.0 {
            return Err(AnalysisError::InvalidValue("ranging_damp must be <= 1"));
        }
        if self.trending_boost < 1.0 {
            return Err(AnalysisError::InvalidValue("trending_boost must be >= 1"));
        }
        if self.entry_threshold > self.strong_threshold {
            return Err(AnalysisError::InvalidValue(
                "entry_threshold must be <= strong_threshold",
            ));
        }
        Ok(())
    }
}

impl TunableParams for FusionParams {
    fn param_meta() -> &'static [ParamMeta] {
        const META: &[ParamMeta] = &[
            ParamMeta::new("trend_weight", 3.0, (1.0, 5.0, 0.5), "Trend contribution weight"),
            ParamMeta::new(
                "sentiment_weight",
                1.0,
                (0.5, 2.0, 0.25),
                "Sentiment contribution weight",
            ),
            ParamMeta::new(
                "ranging_damp",
                0.5,
                (0.25, 1.0, 0.05),
                "Damping factor for weak signals in a flat market",
            ),
            ParamMeta::new(
                "trending_boost",
                1.2,
                (1.0, 2.0, 0.1),
                "Amplification factor in a trending market",
            ),
            ParamMeta::new(
                "weak_score_cutoff",
                2.0,
                (1.0, 3.0, 0.25),
                "Score magnitude below which ranging damping applies",
            ),
            ParamMeta::new(
                "strong_threshold",
                2.0,
                (1.5, 3.0, 0.25),
                "Score magnitude for STRONG BUY / STRONG SELL",
            ),
            ParamMeta::new(
                "entry_threshold",
                1.0,
                (0.5, 1.5, 0.25),
                "Score magnitude for BUY / SELL",
            ),
        ];
        META
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let built = Self {
            trend_weight: get_value(params, "trend_weight", 3.0),
            sentiment_weight: get_value(params, "sentiment_weight", 1.0),
            ranging_damp: get_value(params, "ranging_damp", 0.5),
            trending_boost: get_value(params, "trending_boost", 1.2),
            weak_score_cutoff: get_value(params, "weak_score_cutoff", 2.0),
            strong_threshold: get_value(params, "strong_threshold", 2.0),
            entry_threshold: get_value(params, "entry_threshold", 1.0),
        };
        built.validate()?;
        Ok(built)
    }
}

// ============================================================
// AGGREGATE
// ============================================================

/// Full parameter set for a [`crate::ChartAnalyzer`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyzerParams {
    pub extract: ExtractParams,
    pub trend: TrendParams,
    pub price_action: PriceActionParams,
    pub sentiment: SentimentParams,
    pub fusion: FusionParams,
}

impl AnalyzerParams {
    pub fn validate(&self) -> Result<()> {
        self.extract.validate()?;
        self.trend.validate()?;
        self.price_action.validate()?;
        self.sentiment.validate()?;
        self.fusion.validate()?;
        Ok(())
    }
}

// ============================================================
// TESTS
// ============================================================
