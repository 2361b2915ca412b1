//! Two-bar patterns: Engulfing, Piercing / Dark Cloud Cover, Harami,
//! Tweezers.

use crate::{Bar, Direction, PatternDescriptor, PatternId, PatternKind, SignalStrength};

use super::single_bar::DOJI_BODY_RATIO;

/// Tweezers: highs/lows must match within this relative tolerance
pub const TWEEZER_TOLERANCE: f64 = 0.005;
/// Tweezers: second bar body must stay within this ratio band of the first
pub const TWEEZER_BODY_MIN_RATIO: f64 = 0.5;
pub const TWEEZER_BODY_MAX_RATIO: f64 = 2.0;
/// Tweezers: a shadow this much longer than the body counts as rejection
pub const TWEEZER_SHADOW_RATIO: f64 = 1.2;

pub(crate) fn all() -> Vec<PatternDescriptor> {
    vec![
        bullish_engulfing(),
        bearish_engulfing(),
        piercing(),
        dark_cloud_cover(),
        harami(),
        harami_cross(),
        tweezers_top(),
        tweezers_bottom(),
    ]
}

// ============================================================
// PREDICATES
// ============================================================

fn bullish_engulfing_check(current: &Bar, prev: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    prev.is_bearish()
        && current.is_bullish()
        && current.open < prev.close
        && current.close > prev.open
        && current.body() > prev.body()
}

fn bearish_engulfing_check(current: &Bar, prev: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    prev.is_bullish()
        && current.is_bearish()
        && current.open > prev.close
        && current.close < prev.open
        && current.body() > prev.body()
}

fn piercing_check(current: &Bar, prev: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    // Gap below the prior low, then a close past the prior body midpoint
    // but short of a full engulf
    prev.is_bearish()
        && current.is_bullish()
        && current.open < prev.low
        && current.close > prev.body_mid()
        && current.close < prev.open
}

fn dark_cloud_cover_check(current: &Bar, prev: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    prev.is_bullish()
        && current.is_bearish()
        && current.open > prev.high
        && current.close < prev.body_mid()
        && current.close > prev.open
}

fn harami_check(current: &Bar, prev: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    let prev_top = prev.open.max(prev.close);
    let prev_bottom = prev.open.min(prev.close);
    let cur_top = current.open.max(current.close);
    let cur_bottom = current.open.min(current.close);

    let opposite = (prev.is_bearish() && current.is_bullish())
        || (prev.is_bullish() && current.is_bearish());

    prev.is_body_long() && opposite && cur_top < prev_top && cur_bottom > prev_bottom
}

fn harami_cross_check(current: &Bar, prev: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    let range = current.range();
    let is_doji = range > 0.0 && current.body() < range * DOJI_BODY_RATIO;

    let prev_top = prev.open.max(prev.close);
    let prev_bottom = prev.open.min(prev.close);

    // The whole doji, shadows included, sits inside the prior body
    prev.is_body_long() && is_doji && current.high < prev_top && current.low > prev_bottom
}

fn tweezers_top_check(current: &Bar, prev: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    if prev.high <= 0.0 {
        return false;
    }
    let similar_highs = (current.high - prev.high).abs() / prev.high < TWEEZER_TOLERANCE;
    let body_ratio = current.body() / (prev.body() + 1e-6);
    let body_similar = body_ratio > TWEEZER_BODY_MIN_RATIO && body_ratio < TWEEZER_BODY_MAX_RATIO;
    let second_bearish = current.is_bearish()
        || current.upper_shadow() > current.body() * TWEEZER_SHADOW_RATIO;

    similar_highs && prev.is_bullish() && second_bearish && body_similar
}

fn tweezers_bottom_check(current: &Bar, prev: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    if prev.low <= 0.0 {
        return false;
    }
    let similar_lows = (current.low - prev.low).abs() / prev.low < TWEEZER_TOLERANCE;
    let body_ratio = current.body() / (prev.body() + 1e-6);
    let body_similar = body_ratio > TWEEZER_BODY_MIN_RATIO && body_ratio < TWEEZER_BODY_MAX_RATIO;
    let second_bullish = current.is_bullish()
        || current.lower_shadow() > current.body() * TWEEZER_SHADOW_RATIO;

    similar_lows && prev.is_bearish() && second_bullish && body_similar
}

// ============================================================
// DESCRIPTORS
// ============================================================

pub fn bullish_engulfing() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("bullish_engulfing"),
        name: "Bullish Engulfing",
        local_name: "看漲吞噬",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Strong,
        bias: Direction::Bullish,
        description: "Green body completely swallows the prior red body",
        detail: "Buyers overwhelm sellers: the second bar opens below the prior close and \
                 closes above the prior open, engulfing the whole body.",
        predicate: bullish_engulfing_check,
    }
}

pub fn bearish_engulfing() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("bearish_engulfing"),
        name: "Bearish Engulfing",
        local_name: "看跌吞噬",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Strong,
        bias: Direction::Bearish,
        description: "Red body completely swallows the prior green body",
        detail: "Sellers overwhelm buyers: the second bar opens above the prior close and \
                 closes below the prior open, engulfing the whole body.",
        predicate: bearish_engulfing_check,
    }
}

pub fn piercing() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("piercing"),
        name: "Piercing Pattern",
        local_name: "刺透型態",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Moderate,
        bias: Direction::Bullish,
        description: "Gap down, then a close above the prior body midpoint",
        detail: "After a red bar, the next bar opens below its low but rallies to close past \
                 the midpoint of the red body without fully engulfing it.",
        predicate: piercing_check,
    }
}

pub fn dark_cloud_cover() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("dark_cloud_cover"),
        name: "Dark Cloud Cover",
        local_name: "烏雲蓋頂",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Moderate,
        bias: Direction::Bearish,
        description: "Gap up, then a close below the prior body midpoint",
        detail: "After a green bar, the next bar opens above its high but sells off to close \
                 past the midpoint of the green body without fully engulfing it.",
        predicate: dark_cloud_cover_check,
    }
}

pub fn harami() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("harami"),
        name: "Harami",
        local_name: "孕育線",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Weak,
        bias: Direction::Neutral,
        description: "Small opposite-colored body inside the prior long body",
        detail: "Momentum stalls: the second body is completely contained in the first. \
                 Direction needs confirmation from what follows.",
        predicate: harami_check,
    }
}

pub fn harami_cross() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("harami_cross"),
        name: "Harami Cross",
        local_name: "十字孕育線",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Moderate,
        bias: Direction::Neutral,
        description: "Doji contained entirely within the prior long body",
        detail: "A stronger harami: the inside bar is a doji, showing complete hesitation \
                 right after a committed move.",
        predicate: harami_cross_check,
    }
}

pub fn tweezers_top() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("tweezers_top"),
        name: "Tweezers Top",
        local_name: "鑷子頂部",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Weak,
        bias: Direction::Bearish,
        description: "Two bars with matching highs, resistance at the same level",
        detail: "Price fails twice at the same high; the second bar closes weak or leaves a \
                 long upper shadow, suggesting the advance is exhausted.",
        predicate: tweezers_top_check,
    }
}

pub fn tweezers_bottom() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("tweezers_bottom"),
        name: "Tweezers Bottom",
        local_name: "鑷子底部",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Weak,
        bias: Direction::Bullish,
        description: "Two bars with matching lows, support at the same level",
        detail: "Price holds twice at the same low; the second bar closes firm or leaves a \
                 long lower shadow, suggesting the decline is exhausted.",
        predicate: tweezers_bottom_check,
    }
}

// ============================================================
// TESTS
// ============================================================
