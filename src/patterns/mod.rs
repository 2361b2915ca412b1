//! Built-in candlestick pattern catalog
//!
//! 37 patterns grouped by lookback arity:
//!
//! - **Single-bar (13)**: Doji family, Hammer family, big candles,
//!   Marubozu, Spinning Top, Belt Hold
//! - **Two-bar (8)**: Engulfing, Piercing / Dark Cloud Cover, Harami,
//!   Tweezers
//! - **Three-bar (6)**: Morning / Evening Star, Three White Soldiers /
//!   Black Crows, Rising / Falling Three Methods
//! - **Multi-bar (10)**: Flags, Pennants, Wedges, Double Top / Bottom,
//!   Head-and-Shoulders
//!
//! Multi-bar breakout patterns come in two variants selected by
//! [`BreakoutMode`]; everything else is mode-independent.

pub mod multi_bar;
pub mod single_bar;
pub mod three_bar;
pub mod two_bar;

use crate::{BreakoutMode, PatternDescriptor};

/// The full built-in registry, in catalog order
pub fn builtin(mode: BreakoutMode) -> Vec<PatternDescriptor> {
    let mut descriptors = Vec::with_capacity(37);
    descriptors.extend(single_bar::all());
    descriptors.extend(two_bar::all());
    descriptors.extend(three_bar::all());
    descriptors.extend(multi_bar::all(mode));
    descriptors
}
