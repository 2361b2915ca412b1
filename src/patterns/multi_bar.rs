//! Multi-bar patterns built on the analysis helpers: flags, pennants,
//! wedges, double tops/bottoms and head-and-shoulders formations.
//!
//! The flag/pennant/wedge breakouts exist in two variants: the default
//! accepts a price breakout alone, the volume-confirmed variant also
//! requires the breakout bar to trade above the consolidation's average
//! volume. [`BreakoutMode`] picks which variant enters the registry.

use crate::analysis::{
    find_local_maxima, find_local_minima, has_volume_decrease, is_consolidating,
    is_double_pattern, is_head_and_shoulders, is_inverse_head_and_shoulders, least_squares_trend,
    PriceField, DOUBLE_TOLERANCE,
};
use crate::{
    Bar, BreakoutMode, Direction, PatternDescriptor, PatternId, PatternKind, SignalStrength,
};

/// Flag geometry: 3 pole bars + 4 consolidation bars + the breakout bar
pub const FLAG_WINDOW: usize = 8;
const FLAGPOLE_LEN: usize = 3;
/// Minimum relative move over the flagpole
pub const FLAGPOLE_MIN_MOVE: f64 = 0.045;
const FLAG_CONSOLIDATION_THRESHOLD: f64 = 0.09;
/// The flag's swing must stay inside this share of the pole's swing
const FLAG_RANGE_RATIO: f64 = 0.7;

/// Pennant window, breakout bar included
pub const PENNANT_WINDOW: usize = 8;
/// A boundary counts as flat when its slope stays under this share of price
const PENNANT_FLAT_RATIO: f64 = 0.0015;
/// Converging: the last bar's range under this share of the first bar's
const PENNANT_CONVERGE_RATIO: f64 = 0.7;

/// Wedge window, breakout bar included
pub const WEDGE_WINDOW: usize = 10;
/// The faster boundary must outpace the slower by this factor
const WEDGE_CONVERGE_RATIO: f64 = 1.2;
/// Breakout margin past the projected trend line
const WEDGE_BREAK_MARGIN: f64 = 0.015;

/// Double top/bottom lookback and geometry
pub const DOUBLE_MIN_HISTORY: usize = 20;
const DOUBLE_EXTREMUM_WINDOW: usize = 2;
const DOUBLE_BREAK_MARGIN: f64 = 0.005;
/// Second-extremum volume may not exceed the first's by more than this
const DOUBLE_VOLUME_RATIO: f64 = 1.15;
/// Pattern height floor, relative to the base price
const DOUBLE_MIN_HEIGHT: f64 = 0.05;

/// Head-and-shoulders lookback and geometry
pub const HS_MIN_HISTORY: usize = 30;
const HS_BREAK_MARGIN: f64 = 0.005;
/// Pattern height floor, relative to the neckline
const HS_MIN_HEIGHT: f64 = 0.08;
/// Bars past the right shoulder searched for the neckline anchor
const HS_RIGHT_EXTENSION: usize = 5;

/// Volume-confirmed mode: breakout volume must exceed this multiple of the
/// consolidation average
const BREAKOUT_VOLUME_RATIO: f64 = 1.2;

pub(crate) fn all(mode: BreakoutMode) -> Vec<PatternDescriptor> {
    vec![
        bull_flag(mode),
        bear_flag(mode),
        ascending_pennant(mode),
        descending_pennant(mode),
        rising_wedge(mode),
        falling_wedge(mode),
        double_bottom(),
        double_top(),
        head_and_shoulders_top(),
        head_and_shoulders_bottom(),
    ]
}

// ============================================================
// SHARED HELPERS
// ============================================================

fn max_high(bars: &[Bar]) -> f64 {
    bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max)
}

fn min_low(bars: &[Bar]) -> f64 {
    bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min)
}

fn max_low(bars: &[Bar]) -> f64 {
    bars.iter().map(|b| b.low).fold(f64::NEG_INFINITY, f64::max)
}

/// Average of the window's usable (positive) volumes
fn avg_volume(bars: &[Bar]) -> Option<f64> {
    let volumes: Vec<f64> = bars
        .iter()
        .filter_map(|b| b.volume)
        .filter(|v| *v > 0.0)
        .collect();
    if volumes.is_empty() {
        return None;
    }
    Some(volumes.iter().sum::<f64>() / volumes.len() as f64)
}

/// Breakout bar trading above the consolidation's average volume.
/// Missing volume data fails the confirmation.
fn breakout_volume_confirmed(current: &Bar, consolidation: &[Bar]) -> bool {
    let Some(avg) = avg_volume(consolidation) else {
        return false;
    };
    match current.volume {
        Some(v) => v > avg * BREAKOUT_VOLUME_RATIO,
        None => false,
    }
}

// ============================================================
// FLAGS
// ============================================================

fn bull_flag_core(current: &Bar, history: &[Bar], confirm_volume: bool) -> bool {
    if history.len() < FLAG_WINDOW {
        return false;
    }
    let recent = &history[history.len() - FLAG_WINDOW..];
    let pole = &recent[..FLAGPOLE_LEN];
    let flag = &recent[FLAGPOLE_LEN..FLAG_WINDOW - 1];

    // Flagpole: three consecutive strong bullish bars
    if pole[0].close <= 0.0 {
        return false;
    }
    let rise = pole[FLAGPOLE_LEN - 1].close / pole[0].close - 1.0;
    if rise <= FLAGPOLE_MIN_MOVE || !pole.iter().all(Bar::is_bullish) {
        return false;
    }

    // Flag: tight consolidation drifting mildly against the pole
    let high_trend = least_squares_trend(flag, PriceField::High);
    let low_trend = least_squares_trend(flag, PriceField::Low);
    if (high_trend + low_trend) / 2.0 >= 0.0 {
        return false;
    }
    if !is_consolidating(flag, FLAG_CONSOLIDATION_THRESHOLD) {
        return false;
    }

    // The flag's swing must stay well inside the pole's
    let pole_range = max_high(pole) - min_low(pole);
    let flag_range = max_high(flag) - min_low(flag);
    if flag_range > pole_range * FLAG_RANGE_RATIO {
        return false;
    }

    if !has_volume_decrease(flag) {
        return false;
    }

    // Breakout above the flag
    if current.close <= max_high(flag) {
        return false;
    }

    !confirm_volume || breakout_volume_confirmed(current, flag)
}

fn bull_flag_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, history: &[Bar]) -> bool {
    bull_flag_core(current, history, false)
}

fn bull_flag_confirmed_check(
    current: &Bar,
    _: Option<&Bar>,
    _: Option<&Bar>,
    history: &[Bar],
) -> bool {
    bull_flag_core(current, history, true)
}

fn bear_flag_core(current: &Bar, history: &[Bar], confirm_volume: bool) -> bool {
    if history.len() < FLAG_WINDOW {
        return false;
    }
    let recent = &history[history.len() - FLAG_WINDOW..];
    let pole = &recent[..FLAGPOLE_LEN];
    let flag = &recent[FLAGPOLE_LEN..FLAG_WINDOW - 1];

    if pole[0].close <= 0.0 {
        return false;
    }
    let drop = 1.0 - pole[FLAGPOLE_LEN - 1].close / pole[0].close;
    if drop <= FLAGPOLE_MIN_MOVE || !pole.iter().all(Bar::is_bearish) {
        return false;
    }

    let high_trend = least_squares_trend(flag, PriceField::High);
    let low_trend = least_squares_trend(flag, PriceField::Low);
    if (high_trend + low_trend) / 2.0 <= 0.0 {
        return false;
    }
    if !is_consolidating(flag, FLAG_CONSOLIDATION_THRESHOLD) {
        return false;
    }

    let pole_range = max_high(pole) - min_low(pole);
    let flag_range = max_high(flag) - min_low(flag);
    if flag_range > pole_range * FLAG_RANGE_RATIO {
        return false;
    }

    if !has_volume_decrease(flag) {
        return false;
    }

    if current.close >= min_low(flag) {
        return false;
    }

    !confirm_volume || breakout_volume_confirmed(current, flag)
}

fn bear_flag_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, history: &[Bar]) -> bool {
    bear_flag_core(current, history, false)
}

fn bear_flag_confirmed_check(
    current: &Bar,
    _: Option<&Bar>,
    _: Option<&Bar>,
    history: &[Bar],
) -> bool {
    bear_flag_core(current, history, true)
}

// ============================================================
// PENNANTS
// ============================================================

fn ascending_pennant_core(current: &Bar, history: &[Bar], confirm_volume: bool) -> bool {
    if history.len() < PENNANT_WINDOW {
        return false;
    }
    let recent = &history[history.len() - PENNANT_WINDOW..];

    // Flat resistance, rising support
    let high_trend = least_squares_trend(recent, PriceField::High);
    let low_trend = least_squares_trend(recent, PriceField::Low);
    let horizontal_highs = high_trend.abs() < max_high(recent) * PENNANT_FLAT_RATIO;
    let rising_lows = low_trend > max_low(recent) * PENNANT_FLAT_RATIO;
    if !(horizontal_highs && rising_lows) {
        return false;
    }

    // Converging range
    let first_range = recent[0].range();
    let last_range = recent[recent.len() - 1].range();
    if last_range >= first_range * PENNANT_CONVERGE_RATIO {
        return false;
    }

    // Breakout past the resistance set before the current bar
    let body = &recent[..recent.len() - 1];
    if current.close <= max_high(body) {
        return false;
    }

    !confirm_volume || breakout_volume_confirmed(current, body)
}

fn ascending_pennant_check(
    current: &Bar,
    _: Option<&Bar>,
    _: Option<&Bar>,
    history: &[Bar],
) -> bool {
    ascending_pennant_core(current, history, false)
}

fn ascending_pennant_confirmed_check(
    current: &Bar,
    _: Option<&Bar>,
    _: Option<&Bar>,
    history: &[Bar],
) -> bool {
    ascending_pennant_core(current, history, true)
}

fn descending_pennant_core(current: &Bar, history: &[Bar], confirm_volume: bool) -> bool {
    if history.len() < PENNANT_WINDOW {
        return false;
    }
    let recent = &history[history.len() - PENNANT_WINDOW..];

    // Flat support, falling resistance
    let high_trend = least_squares_trend(recent, PriceField::High);
    let low_trend = least_squares_trend(recent, PriceField::Low);
    let horizontal_lows = low_trend.abs() < max_low(recent) * PENNANT_FLAT_RATIO;
    let falling_highs = high_trend < -max_high(recent) * PENNANT_FLAT_RATIO;
    if !(horizontal_lows && falling_highs) {
        return false;
    }

    let first_range = recent[0].range();
    let last_range = recent[recent.len() - 1].range();
    if last_range >= first_range * PENNANT_CONVERGE_RATIO {
        return false;
    }

    let body = &recent[..recent.len() - 1];
    if current.close >= min_low(body) {
        return false;
    }

    !confirm_volume || breakout_volume_confirmed(current, body)
}

fn descending_pennant_check(
    current: &Bar,
    _: Option<&Bar>,
    _: Option<&Bar>,
    history: &[Bar],
) -> bool {
    descending_pennant_core(current, history, false)
}

fn descending_pennant_confirmed_check(
    current: &Bar,
    _: Option<&Bar>,
    _: Option<&Bar>,
    history: &[Bar],
) -> bool {
    descending_pennant_core(current, history, true)
}

// ============================================================
// WEDGES
// ============================================================

fn rising_wedge_core(current: &Bar, history: &[Bar], confirm_volume: bool) -> bool {
    if history.len() < WEDGE_WINDOW {
        return false;
    }
    let recent = &history[history.len() - WEDGE_WINDOW..];

    // Both boundaries rising, support rising faster: converging upward
    let high_trend = least_squares_trend(recent, PriceField::High);
    let low_trend = least_squares_trend(recent, PriceField::Low);
    if high_trend <= 0.0 || low_trend <= 0.0 {
        return false;
    }
    if low_trend <= high_trend * WEDGE_CONVERGE_RATIO {
        return false;
    }

    if !has_volume_decrease(recent) {
        return false;
    }

    // Breakdown through the projected support line
    let support = recent[0].low + low_trend * (recent.len() - 1) as f64;
    if current.close >= support * (1.0 - WEDGE_BREAK_MARGIN) {
        return false;
    }

    !confirm_volume || breakout_volume_confirmed(current, &recent[..recent.len() - 1])
}

fn rising_wedge_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, history: &[Bar]) -> bool {
    rising_wedge_core(current, history, false)
}

fn rising_wedge_confirmed_check(
    current: &Bar,
    _: Option<&Bar>,
    _: Option<&Bar>,
    history: &[Bar],
) -> bool {
    rising_wedge_core(current, history, true)
}

fn falling_wedge_core(current: &Bar, history: &[Bar], confirm_volume: bool) -> bool {
    if history.len() < WEDGE_WINDOW {
        return false;
    }
    let recent = &history[history.len() - WEDGE_WINDOW..];

    // Both boundaries falling, resistance falling faster: converging downward
    let high_trend = least_squares_trend(recent, PriceField::High);
    let low_trend = least_squares_trend(recent, PriceField::Low);
    if high_trend >= 0.0 || low_trend >= 0.0 {
        return false;
    }
    if high_trend.abs() <= low_trend.abs() * WEDGE_CONVERGE_RATIO {
        return false;
    }

    if !has_volume_decrease(recent) {
        return false;
    }

    // Breakout through the projected resistance line
    let resistance = recent[0].high + high_trend * (recent.len() - 1) as f64;
    if current.close <= resistance * (1.0 + WEDGE_BREAK_MARGIN) {
        return false;
    }

    !confirm_volume || breakout_volume_confirmed(current, &recent[..recent.len() - 1])
}

fn falling_wedge_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, history: &[Bar]) -> bool {
    falling_wedge_core(current, history, false)
}

fn falling_wedge_confirmed_check(
    current: &Bar,
    _: Option<&Bar>,
    _: Option<&Bar>,
    history: &[Bar],
) -> bool {
    falling_wedge_core(current, history, true)
}

// ============================================================
// DOUBLE TOP / BOTTOM
// ============================================================

fn double_bottom_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, history: &[Bar]) -> bool {
    if history.len() < DOUBLE_MIN_HISTORY {
        return false;
    }
    let minima = find_local_minima(history, DOUBLE_EXTREMUM_WINDOW);
    if !is_double_pattern(&minima, DOUBLE_TOLERANCE) {
        return false;
    }
    let first = minima[minima.len() - 2];
    let second = minima[minima.len() - 1];

    // The rebound peak between the two troughs
    let middle_high = max_high(&history[first.index..=second.index]);
    let breakout = current.close > middle_high * (1.0 + DOUBLE_BREAK_MARGIN);

    // Selling pressure fading into the second trough
    let volume_ok = match (history[first.index].volume, history[second.index].volume) {
        (Some(a), Some(b)) => b < a * DOUBLE_VOLUME_RATIO,
        _ => true,
    };

    let base = first.value.min(second.value);
    let significant = base > 0.0 && middle_high - base > base * DOUBLE_MIN_HEIGHT;

    breakout && volume_ok && significant
}

fn double_top_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, history: &[Bar]) -> bool {
    if history.len() < DOUBLE_MIN_HISTORY {
        return false;
    }
    let maxima = find_local_maxima(history, DOUBLE_EXTREMUM_WINDOW);
    if !is_double_pattern(&maxima, DOUBLE_TOLERANCE) {
        return false;
    }
    let first = maxima[maxima.len() - 2];
    let second = maxima[maxima.len() - 1];

    // The pullback trough between the two peaks
    let middle_low = min_low(&history[first.index..=second.index]);
    let breakdown = current.close < middle_low * (1.0 - DOUBLE_BREAK_MARGIN);

    let volume_ok = match (history[first.index].volume, history[second.index].volume) {
        (Some(a), Some(b)) => b < a * DOUBLE_VOLUME_RATIO,
        _ => true,
    };

    let top = first.value.max(second.value);
    let significant = middle_low > 0.0 && top - middle_low > middle_low * DOUBLE_MIN_HEIGHT;

    breakdown && volume_ok && significant
}

// ============================================================
// HEAD AND SHOULDERS
// ============================================================

fn head_and_shoulders_top_check(
    current: &Bar,
    _: Option<&Bar>,
    _: Option<&Bar>,
    history: &[Bar],
) -> bool {
    if history.len() < HS_MIN_HISTORY {
        return false;
    }
    let maxima = find_local_maxima(history, DOUBLE_EXTREMUM_WINDOW);
    if !is_head_and_shoulders(&maxima) {
        return false;
    }
    let left = maxima[maxima.len() - 3];
    let head = maxima[maxima.len() - 2];
    let right = maxima[maxima.len() - 1];

    // Neckline: the higher of the troughs flanking the head
    let left_trough = min_low(&history[left.index..head.index]);
    let right_end = (right.index + HS_RIGHT_EXTENSION).min(history.len());
    let right_trough = min_low(&history[head.index..right_end]);
    let neckline = left_trough.max(right_trough);
    if neckline <= 0.0 {
        return false;
    }

    let breakdown = current.close < neckline * (1.0 - HS_BREAK_MARGIN);
    let significant = head.value - neckline > neckline * HS_MIN_HEIGHT;

    breakdown && significant
}

fn head_and_shoulders_bottom_check(
    current: &Bar,
    _: Option<&Bar>,
    _: Option<&Bar>,
    history: &[Bar],
) -> bool {
    if history.len() < HS_MIN_HISTORY {
        return false;
    }
    let minima = find_local_minima(history, DOUBLE_EXTREMUM_WINDOW);
    if !is_inverse_head_and_shoulders(&minima) {
        return false;
    }
    let left = minima[minima.len() - 3];
    let head = minima[minima.len() - 2];
    let right = minima[minima.len() - 1];

    // Neckline: the lower of the peaks flanking the head
    let left_peak = max_high(&history[left.index..head.index]);
    let right_end = (right.index + HS_RIGHT_EXTENSION).min(history.len());
    let right_peak = max_high(&history[head.index..right_end]);
    let neckline = left_peak.min(right_peak);
    if neckline <= 0.0 {
        return false;
    }

    let breakout = current.close > neckline * (1.0 + HS_BREAK_MARGIN);
    let significant = neckline - head.value > neckline * HS_MIN_HEIGHT;

    breakout && significant
}

// ============================================================
// DESCRIPTORS
// ============================================================

fn breakout_predicate(mode: BreakoutMode, lenient: crate::Predicate, confirmed: crate::Predicate) -> crate::Predicate {
    match mode {
        BreakoutMode::Lenient => lenient,
        BreakoutMode::VolumeConfirmed => confirmed,
    }
}

pub fn bull_flag(mode: BreakoutMode) -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("bull_flag"),
        name: "Bull Flag",
        local_name: "上升旗型",
        kind: PatternKind::Continuation,
        strength: SignalStrength::Moderate,
        bias: Direction::Bullish,
        description: "Sharp rally, tight down-sloping pause, breakout to new highs",
        detail: "Three strong green bars form the pole, a shallow drifting consolidation on \
                 shrinking volume forms the flag, and the close above the flag's high resumes \
                 the advance.",
        predicate: breakout_predicate(mode, bull_flag_check, bull_flag_confirmed_check),
    }
}

pub fn bear_flag(mode: BreakoutMode) -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("bear_flag"),
        name: "Bear Flag",
        local_name: "下降旗型",
        kind: PatternKind::Continuation,
        strength: SignalStrength::Moderate,
        bias: Direction::Bearish,
        description: "Sharp sell-off, tight up-sloping pause, breakdown to new lows",
        detail: "Three strong red bars form the pole, a shallow drifting consolidation on \
                 shrinking volume forms the flag, and the close below the flag's low resumes \
                 the decline.",
        predicate: breakout_predicate(mode, bear_flag_check, bear_flag_confirmed_check),
    }
}

pub fn ascending_pennant(mode: BreakoutMode) -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("ascending_pennant"),
        name: "Ascending Pennant",
        local_name: "上升三角旗",
        kind: PatternKind::Continuation,
        strength: SignalStrength::Moderate,
        bias: Direction::Bullish,
        description: "Flat resistance with rising lows converging, then an upside breakout",
        detail: "Highs hold a level while lows climb into it; once the range has tightened, \
                 a close above the resistance carries the trend on.",
        predicate: breakout_predicate(
            mode,
            ascending_pennant_check,
            ascending_pennant_confirmed_check,
        ),
    }
}

pub fn descending_pennant(mode: BreakoutMode) -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("descending_pennant"),
        name: "Descending Pennant",
        local_name: "下降三角旗",
        kind: PatternKind::Continuation,
        strength: SignalStrength::Moderate,
        bias: Direction::Bearish,
        description: "Flat support with falling highs converging, then a downside break",
        detail: "Lows hold a level while highs sink into it; once the range has tightened, \
                 a close below the support carries the trend on.",
        predicate: breakout_predicate(
            mode,
            descending_pennant_check,
            descending_pennant_confirmed_check,
        ),
    }
}

pub fn rising_wedge(mode: BreakoutMode) -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("rising_wedge"),
        name: "Rising Wedge",
        local_name: "上升楔型",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Moderate,
        bias: Direction::Bearish,
        description: "Both boundaries rising but converging; breaks downward",
        detail: "Price keeps making higher highs and higher lows, but the advance narrows as \
                 volume fades; the close under the support trend line signals the turn.",
        predicate: breakout_predicate(mode, rising_wedge_check, rising_wedge_confirmed_check),
    }
}

pub fn falling_wedge(mode: BreakoutMode) -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("falling_wedge"),
        name: "Falling Wedge",
        local_name: "下降楔型",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Moderate,
        bias: Direction::Bullish,
        description: "Both boundaries falling but converging; breaks upward",
        detail: "Price keeps making lower highs and lower lows, but the decline narrows as \
                 volume fades; the close over the resistance trend line signals the turn.",
        predicate: breakout_predicate(mode, falling_wedge_check, falling_wedge_confirmed_check),
    }
}

pub fn double_bottom() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("double_bottom"),
        name: "Double Bottom",
        local_name: "W底（雙重底）",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Strong,
        bias: Direction::Bullish,
        description: "Two matching troughs forming a W, confirmed above the middle peak",
        detail: "Two lows at nearly the same price with a rebound between them; volume eases \
                 into the second low and the close above the middle peak confirms the turn.",
        predicate: double_bottom_check,
    }
}

pub fn double_top() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("double_top"),
        name: "Double Top",
        local_name: "M頭（雙重頂）",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Strong,
        bias: Direction::Bearish,
        description: "Two matching peaks forming an M, confirmed below the middle trough",
        detail: "Two highs at nearly the same price with a pullback between them; volume eases \
                 into the second high and the close below the middle trough confirms the turn.",
        predicate: double_top_check,
    }
}

pub fn head_and_shoulders_top() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("head_and_shoulders_top"),
        name: "Head and Shoulders Top",
        local_name: "頭肩頂",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Strong,
        bias: Direction::Bearish,
        description: "Three peaks with the middle one highest; breaks the neckline downward",
        detail: "Two level shoulders flank a higher head; the neckline joins the troughs \
                 between them, and a close below it completes one of the most reliable \
                 topping formations.",
        predicate: head_and_shoulders_top_check,
    }
}

pub fn head_and_shoulders_bottom() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("head_and_shoulders_bottom"),
        name: "Head and Shoulders Bottom",
        local_name: "頭肩底",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Strong,
        bias: Direction::Bullish,
        description: "Three troughs with the middle one lowest; breaks the neckline upward",
        detail: "The inverted form: two level shoulders flank a deeper head, the neckline \
                 joins the peaks between them, and a close above it completes the base.",
        predicate: head_and_shoulders_bottom_check,
    }
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn last_of(history: &[Bar]) -> &Bar {
        history.last().unwrap()
    }

    fn run(predicate: crate::Predicate, history: &[Bar]) -> bool {
        let n = history.len();
        predicate(
            last_of(history),
            n.checked_sub(2).map(|i| &history[i]),
            n.checked_sub(3).map(|i| &history[i]),
            history,
        )
    }

    fn bull_flag_history(breakout_volume: f64) -> Vec<Bar> {
        vec![
            // pole: +4.95% over three green bars
            Bar::new(100.0, 101.5, 99.5, 101.0).with_volume(1000.0),
            Bar::new(101.0, 104.5, 100.5, 104.0).with_volume(1000.0),
            Bar::new(104.0, 106.5, 103.5, 106.0).with_volume(1000.0),
            // flag: drifting down on shrinking volume
            Bar::new(105.8, 106.0, 105.0, 105.2).with_volume(500.0),
            Bar::new(105.5, 105.8, 104.8, 105.0).with_volume(450.0),
            Bar::new(105.3, 105.6, 104.6, 104.8).with_volume(300.0),
            Bar::new(105.0, 105.4, 104.4, 104.6).with_volume(250.0),
            // breakout above the flag high (106.0)
            Bar::new(105.0, 107.5, 104.8, 107.2).with_volume(breakout_volume),
        ]
    }

    #[test]
    fn test_bull_flag() {
        let history = bull_flag_history(800.0);
        assert!(run(bull_flag_check, &history));

        // No breakout: close back inside the flag
        let mut stalled = history.clone();
        stalled[7] = Bar::new(105.0, 105.9, 104.8, 105.5).with_volume(800.0);
        assert!(!run(bull_flag_check, &stalled));

        // Short history
        assert!(!run(bull_flag_check, &history[2..]));
    }

    #[test]
    fn test_bull_flag_volume_confirmation() {
        // Flag volume averages 375; confirmation needs > 450
        let confirmed = bull_flag_history(800.0);
        assert!(run(bull_flag_confirmed_check, &confirmed));

        let weak_volume = bull_flag_history(300.0);
        assert!(run(bull_flag_check, &weak_volume));
        assert!(!run(bull_flag_confirmed_check, &weak_volume));
    }

    fn bear_flag_history() -> Vec<Bar> {
        vec![
            // pole: -5.24% over three red bars
            Bar::new(106.0, 106.5, 104.5, 105.0).with_volume(1000.0),
            Bar::new(105.0, 105.5, 101.5, 102.0).with_volume(1000.0),
            Bar::new(102.0, 102.5, 99.0, 99.5).with_volume(1000.0),
            // flag: drifting up on shrinking volume
            Bar::new(99.8, 100.6, 99.6, 100.4).with_volume(500.0),
            Bar::new(100.0, 100.8, 99.8, 100.6).with_volume(450.0),
            Bar::new(100.2, 101.0, 100.0, 100.8).with_volume(300.0),
            Bar::new(100.4, 101.2, 100.2, 101.0).with_volume(250.0),
            // breakdown below the flag low (99.6)
            Bar::new(100.0, 100.2, 98.0, 98.5).with_volume(800.0),
        ]
    }

    #[test]
    fn test_bear_flag() {
        assert!(run(bear_flag_check, &bear_flag_history()));

        // A green pole bar kills the pattern
        let mut broken = bear_flag_history();
        broken[1] = Bar::new(105.0, 105.5, 101.5, 105.2).with_volume(1000.0);
        assert!(!run(bear_flag_check, &broken));
    }

    fn ascending_pennant_history() -> Vec<Bar> {
        let lows = [104.0, 104.5, 105.0, 105.5, 106.0, 106.5, 107.0];
        let mut bars: Vec<Bar> = lows
            .iter()
            .map(|&low| Bar::new(low + 0.5, 110.0, low, low + 1.5).with_volume(400.0))
            .collect();
        // breakout above the 110 resistance with a converged range
        bars.push(Bar::new(107.5, 110.6, 107.2, 110.5).with_volume(800.0));
        bars
    }

    #[test]
    fn test_ascending_pennant() {
        assert!(run(ascending_pennant_check, &ascending_pennant_history()));

        // Close under the resistance: no pattern
        let mut stalled = ascending_pennant_history();
        stalled[7] = Bar::new(107.5, 109.8, 107.2, 109.5).with_volume(800.0);
        assert!(!run(ascending_pennant_check, &stalled));
    }

    #[test]
    fn test_ascending_pennant_volume_confirmation() {
        assert!(run(
            ascending_pennant_confirmed_check,
            &ascending_pennant_history()
        ));

        let mut quiet = ascending_pennant_history();
        quiet[7] = Bar::new(107.5, 110.6, 107.2, 110.5).with_volume(300.0);
        assert!(run(ascending_pennant_check, &quiet));
        assert!(!run(ascending_pennant_confirmed_check, &quiet));
    }

    fn descending_pennant_history() -> Vec<Bar> {
        let highs = [106.0, 105.5, 105.0, 104.5, 104.0, 103.5, 103.0];
        let mut bars: Vec<Bar> = highs
            .iter()
            .map(|&high| Bar::new(high - 1.5, high, 100.0, high - 0.5).with_volume(400.0))
            .collect();
        // breakdown below the 100 support with a converged range
        bars.push(Bar::new(100.0, 100.2, 99.3, 99.5).with_volume(800.0));
        bars
    }

    #[test]
    fn test_descending_pennant() {
        assert!(run(descending_pennant_check, &descending_pennant_history()));

        let mut stalled = descending_pennant_history();
        stalled[7] = Bar::new(100.5, 100.9, 100.2, 100.4).with_volume(800.0);
        assert!(!run(descending_pennant_check, &stalled));
    }

    fn rising_wedge_history(breakdown_volume: f64) -> Vec<Bar> {
        let volumes = [1000.0, 950.0, 900.0, 850.0, 800.0, 500.0, 450.0, 400.0, 350.0];
        let mut bars: Vec<Bar> = (0..9)
            .map(|i| {
                let low = 100.0 + i as f64;
                let high = 110.0 + i as f64 * 0.5;
                Bar::new(low + 0.5, high, low, high - 0.5).with_volume(volumes[i])
            })
            .collect();
        // breakdown through the projected support (~106.05)
        bars.push(Bar::new(111.0, 112.0, 103.0, 103.5).with_volume(breakdown_volume));
        bars
    }

    #[test]
    fn test_rising_wedge() {
        assert!(run(rising_wedge_check, &rising_wedge_history(300.0)));

        // Close holding above the support line: no pattern
        let mut holding = rising_wedge_history(300.0);
        holding[9] = Bar::new(111.0, 112.0, 108.0, 111.5).with_volume(300.0);
        assert!(!run(rising_wedge_check, &holding));
    }

    #[test]
    fn test_rising_wedge_volume_confirmation() {
        // Window volume averages ~689; confirmation needs > ~827
        assert!(!run(
            rising_wedge_confirmed_check,
            &rising_wedge_history(300.0)
        ));
        assert!(run(
            rising_wedge_confirmed_check,
            &rising_wedge_history(900.0)
        ));
    }

    fn falling_wedge_history() -> Vec<Bar> {
        let volumes = [1000.0, 950.0, 900.0, 850.0, 800.0, 500.0, 450.0, 400.0, 350.0];
        let mut bars: Vec<Bar> = (0..9)
            .map(|i| {
                let high = 120.0 - i as f64;
                let low = 110.0 - i as f64 * 0.5;
                Bar::new(low + 0.5, high, low, high - 0.5).with_volume(volumes[i])
            })
            .collect();
        // breakout through the projected resistance (~113.95)
        bars.push(Bar::new(108.0, 117.0, 107.0, 116.0).with_volume(300.0));
        bars
    }

    #[test]
    fn test_falling_wedge() {
        assert!(run(falling_wedge_check, &falling_wedge_history()));

        let mut stalled = falling_wedge_history();
        stalled[9] = Bar::new(108.0, 112.0, 107.0, 111.0).with_volume(300.0);
        assert!(!run(falling_wedge_check, &stalled));
    }

    fn double_bottom_history(second_trough_volume: f64, breakout_close: f64) -> Vec<Bar> {
        let lows = [
            100.0, 98.0, 96.0, 94.0, 92.0, 90.0, 92.0, 93.5, 95.0, 96.0, 96.5, 95.5, 94.0, 92.0,
            90.5, 92.5, 94.0, 95.0, 96.0, 96.5,
        ];
        let mut bars: Vec<Bar> = lows
            .iter()
            .enumerate()
            .map(|(i, &low)| {
                let volume = if i == 5 { 1500.0 } else if i == 14 { second_trough_volume } else { 1000.0 };
                Bar::new(low + 0.5, low + 2.0, low, low + 1.5).with_volume(volume)
            })
            .collect();
        // middle peak high is 98.5 (index 10); breakout needs close > 98.99
        bars.push(Bar::new(97.2, breakout_close.max(100.0), 97.0, breakout_close).with_volume(1200.0));
        bars
    }

    #[test]
    fn test_double_bottom() {
        assert!(run(double_bottom_check, &double_bottom_history(1000.0, 99.5)));

        // No breakout above the middle peak
        assert!(!run(double_bottom_check, &double_bottom_history(1000.0, 98.0)));

        // Volume expanding into the second trough
        assert!(!run(double_bottom_check, &double_bottom_history(2000.0, 99.5)));
    }

    fn double_top_history(breakdown_close: f64) -> Vec<Bar> {
        let highs = [
            100.0, 102.0, 104.0, 106.0, 108.0, 110.0, 108.0, 106.5, 105.0, 104.0, 103.5, 104.5,
            106.0, 108.0, 110.5, 108.5, 107.0, 106.0, 105.0, 104.0,
        ];
        let mut bars: Vec<Bar> = highs
            .iter()
            .enumerate()
            .map(|(i, &high)| {
                let volume = if i == 5 { 1500.0 } else { 1000.0 };
                Bar::new(high - 1.5, high, high - 2.0, high - 0.5).with_volume(volume)
            })
            .collect();
        // middle trough low is 101.5 (index 10); breakdown needs close < 100.99
        bars.push(
            Bar::new(101.5, 102.0, breakdown_close.min(100.0), breakdown_close).with_volume(1200.0),
        );
        bars
    }

    #[test]
    fn test_double_top() {
        assert!(run(double_top_check, &double_top_history(100.5)));
        assert!(!run(double_top_check, &double_top_history(101.4)));
    }

    fn hs_top_history(breakdown_close: f64) -> Vec<Bar> {
        let highs = [
            98.0, 99.0, 100.0, 101.0, 102.0, 102.5, 103.0, 104.0, 105.0, 103.0, 101.0, 100.0,
            102.0, 104.0, 108.0, 112.0, 108.0, 104.0, 101.5, 100.5, 102.0, 103.5, 104.5, 103.0,
            101.5, 101.0, 100.8, 100.6, 100.5, 100.4,
        ];
        let mut bars: Vec<Bar> = highs
            .iter()
            .map(|&high| Bar::new(high - 1.5, high, high - 2.0, high - 0.5))
            .collect();
        // neckline = max(left trough 98.0, right trough 98.5) = 98.5;
        // breakdown needs close < 98.0075
        bars.push(Bar::new(98.2, 98.4, 97.0, breakdown_close));
        bars
    }

    #[test]
    fn test_head_and_shoulders_top() {
        assert!(run(head_and_shoulders_top_check, &hs_top_history(97.5)));

        // Close holding above the neckline
        assert!(!run(head_and_shoulders_top_check, &hs_top_history(98.3)));

        // Too little history
        let history = hs_top_history(97.5);
        assert!(!run(head_and_shoulders_top_check, &history[10..]));
    }

    fn hs_bottom_history(breakout_close: f64) -> Vec<Bar> {
        let lows = [
            102.0, 101.0, 100.0, 99.0, 98.0, 97.5, 97.0, 96.0, 95.0, 97.0, 99.0, 100.0, 98.0,
            96.0, 92.0, 88.0, 92.0, 96.0, 98.5, 99.5, 98.0, 96.5, 95.3, 97.0, 99.0, 100.5, 101.0,
            101.5, 102.0, 102.5,
        ];
        let mut bars: Vec<Bar> = lows
            .iter()
            .map(|&low| Bar::new(low + 1.5, low + 2.0, low, low + 0.5))
            .collect();
        // neckline = min(left peak 102.0, right peak 103.0) = 102.0;
        // breakout needs close > 102.51
        bars.push(Bar::new(102.2, breakout_close.max(103.5), 102.0, breakout_close));
        bars
    }

    #[test]
    fn test_head_and_shoulders_bottom() {
        assert!(run(head_and_shoulders_bottom_check, &hs_bottom_history(103.0)));
        assert!(!run(head_and_shoulders_bottom_check, &hs_bottom_history(102.2)));
    }
}
