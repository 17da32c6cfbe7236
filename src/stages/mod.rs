//! Pipeline stages for chart-image analysis.
//!
//! Data flows through the stages in order:
//!
//! 1. [`preprocess::normalize`] - stretch the input onto the fixed canvas
//! 2. [`extract::extract_candles`] - locate candle-body blobs
//! 3. [`trend::analyze_trend`] - fit a slope through the body bottom edges
//! 4. [`price_action::classify`] - classify the volatility regime
//! 5. [`sentiment::detect`] - measure green/red color dominance
//! 6. [`fusion::fuse`] - combine everything into one signal
//!
//! Stages 3-5 depend only on stage 2's output (and the normalized image) and
//! are mutually independent. Each stage is a pure function over immutable
//! inputs; the facade in the crate root wires them together and owns failure
//! fallback.

pub mod extract;
pub mod fusion;
pub mod preprocess;
pub mod price_action;
pub mod sentiment;
pub mod trend;
