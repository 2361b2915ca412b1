//! Trend, statistics and shape helpers shared across pattern predicates.
//!
//! Everything here is a pure function of a bar window. The extremum finder
//! and the composite detectors (`is_double_pattern`, head-and-shoulders)
//! are the building blocks of the multi-bar patterns; the slope and
//! consolidation tests serve the flag/pennant/wedge family.

use crate::Bar;

/// Default symmetric window for the extremum finder
pub const EXTREMUM_WINDOW: usize = 3;
/// Default relative threshold for the consolidation test
pub const CONSOLIDATION_THRESHOLD: f64 = 0.05;
/// Default relative price tolerance for double tops/bottoms
pub const DOUBLE_TOLERANCE: f64 = 0.03;
/// Maximum relative difference between the two shoulders
pub const SHOULDER_TOLERANCE: f64 = 0.05;
/// Minimum bars between the head and each shoulder
pub const SHOULDER_SPACING: usize = 3;

/// Which price to fit a trend line through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    High,
    Low,
}

/// A local price extremum: bar index and the extreme value there
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum {
    pub index: usize,
    pub value: f64,
}

/// Cheap directional estimate: midpoint of the last bar minus midpoint of
/// the first, divided by the window length. Not a regression.
/// Returns 0 for windows shorter than 2 bars.
#[inline]
pub fn simple_slope(bars: &[Bar]) -> f64 {
    if bars.len() < 2 {
        return 0.0;
    }
    let first = bars[0].range_mid();
    let last = bars[bars.len() - 1].range_mid();
    (last - first) / bars.len() as f64
}

/// Ordinary least-squares slope of the chosen price against bar index.
/// Returns 0 for windows shorter than 3 bars.
pub fn least_squares_trend(bars: &[Bar], field: PriceField) -> f64 {
    let n = bars.len();
    if n < 3 {
        return 0.0;
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        let x = i as f64;
        let y = match field {
            PriceField::High => bar.high,
            PriceField::Low => bar.low,
        };
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let n = n as f64;
    (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x)
}

/// True when the midpoint spread over the window stays under `threshold`
/// relative to the window minimum. Requires at least 3 bars.
pub fn is_consolidating(bars: &[Bar], threshold: f64) -> bool {
    if bars.len() < 3 {
        return false;
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for bar in bars {
        let mid = bar.range_mid();
        min = min.min(mid);
        max = max.max(mid);
    }
    min > 0.0 && (max - min) / min < threshold
}

/// True when the second half of the window trades on average below 0.8×
/// the first half's volume. Zero/missing volumes are ignored; needs at
/// least 2 usable samples.
pub fn has_volume_decrease(bars: &[Bar]) -> bool {
    if bars.len() < 3 {
        return false;
    }
    let volumes: Vec<f64> = bars
        .iter()
        .filter_map(|b| b.volume)
        .filter(|v| *v > 0.0)
        .collect();
    if volumes.len() < 2 {
        return false;
    }

    let split = volumes.len() / 2;
    let avg_first = volumes[..split].iter().sum::<f64>() / split as f64;
    let avg_second = volumes[split..].iter().sum::<f64>() / (volumes.len() - split) as f64;

    avg_second < avg_first * 0.8
}

/// Strict local minima of `low` with a symmetric window. Bar `i` qualifies
/// only if its low is strictly below every other low in
/// `[i - window, i + window]`; indices closer than `window` to either end
/// are never candidates. Ascending index order.
pub fn find_local_minima(bars: &[Bar], window: usize) -> Vec<Extremum> {
    let mut minima = Vec::new();
    if bars.len() <= 2 * window {
        return minima;
    }

    for i in window..bars.len() - window {
        let current = bars[i].low;
        let is_minimum = (i - window..=i + window)
            .filter(|&j| j != i)
            .all(|j| bars[j].low > current);
        if is_minimum {
            minima.push(Extremum {
                index: i,
                value: current,
            });
        }
    }
    minima
}

/// Strict local maxima of `high`; mirror of [`find_local_minima`].
pub fn find_local_maxima(bars: &[Bar], window: usize) -> Vec<Extremum> {
    let mut maxima = Vec::new();
    if bars.len() <= 2 * window {
        return maxima;
    }

    for i in window..bars.len() - window {
        let current = bars[i].high;
        let is_maximum = (i - window..=i + window)
            .filter(|&j| j != i)
            .all(|j| bars[j].high < current);
        if is_maximum {
            maxima.push(Extremum {
                index: i,
                value: current,
            });
        }
    }
    maxima
}

/// Double top/bottom test over the *last two* extrema: relative price
/// difference under `tolerance` and an index gap of 5..=25 bars.
pub fn is_double_pattern(points: &[Extremum], tolerance: f64) -> bool {
    if points.len() < 2 {
        return false;
    }
    let first = points[points.len() - 2];
    let second = points[points.len() - 1];

    let base = first.value.min(second.value);
    if base <= 0.0 {
        return false;
    }
    let price_diff = (first.value - second.value).abs() / base;
    let gap = second.index - first.index;

    price_diff < tolerance && (5..=25).contains(&gap)
}

/// Head-and-shoulders test over the *last three* maxima as
/// (left shoulder, head, right shoulder): the head strictly above both
/// shoulders, shoulders within [`SHOULDER_TOLERANCE`] of each other, and
/// the head at least [`SHOULDER_SPACING`] bars from each shoulder.
pub fn is_head_and_shoulders(peaks: &[Extremum]) -> bool {
    if peaks.len() < 3 {
        return false;
    }
    let left = peaks[peaks.len() - 3];
    let head = peaks[peaks.len() - 2];
    let right = peaks[peaks.len() - 1];

    let head_is_highest = head.value > left.value && head.value > right.value;

    let lower = left.value.min(right.value);
    let shoulders_level = lower > 0.0 && (left.value - right.value).abs() / lower < SHOULDER_TOLERANCE;

    let spacing = head.index - left.index >= SHOULDER_SPACING
        && right.index - head.index >= SHOULDER_SPACING;

    head_is_highest && shoulders_level && spacing
}

/// Inverse head-and-shoulders over the *last three* minima: head strictly
/// below both shoulders, shoulders level within tolerance (relative to the
/// higher one), same spacing rule.
pub fn is_inverse_head_and_shoulders(troughs: &[Extremum]) -> bool {
    if troughs.len() < 3 {
        return false;
    }
    let left = troughs[troughs.len() - 3];
    let head = troughs[troughs.len() - 2];
    let right = troughs[troughs.len() - 1];

    let head_is_lowest = head.value < left.value && head.value < right.value;

    let higher = left.value.max(right.value);
    let shoulders_level =
        higher > 0.0 && (left.value - right.value).abs() / higher < SHOULDER_TOLERANCE;

    let spacing = head.index - left.index >= SHOULDER_SPACING
        && right.index - head.index >= SHOULDER_SPACING;

    head_is_lowest && shoulders_level && spacing
}
