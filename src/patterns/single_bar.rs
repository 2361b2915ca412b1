//! Single-bar patterns: Doji family, Hammer family, big candles,
//! Marubozu, Spinning Top, Belt Hold.
//!
//! The Hanging Man and Inverted Hammer share their shape with the Hammer
//! and Shooting Star but additionally read the prior bar's direction.

use crate::{Bar, Direction, PatternDescriptor, PatternId, PatternKind, SignalStrength};

/// Doji body: under this share of the range
pub const DOJI_BODY_RATIO: f64 = 0.1;
/// Hammer family: dominant shadow at least this multiple of the body
pub const SHADOW_TO_BODY_MIN: f64 = 2.0;
/// Hammer family: opposite shadow at most this multiple of the body
pub const OPPOSITE_SHADOW_MAX: f64 = 0.5;
/// Hammer family body bounds, as a share of the range
pub const HAMMER_BODY_MIN: f64 = 0.1;
pub const HAMMER_BODY_MAX: f64 = 0.3;
/// Marubozu: body share above, shadow share below
pub const MARUBOZU_BODY_RATIO: f64 = 0.8;
pub const MARUBOZU_SHADOW_RATIO: f64 = 0.1;
/// One-sided doji (gravestone/dragonfly): dominant and opposite shadow shares
pub const ONE_SIDED_SHADOW_MIN: f64 = 0.7;
pub const ONE_SIDED_SHADOW_MAX: f64 = 0.1;
/// Belt hold body share
pub const BELT_BODY_RATIO: f64 = 0.7;
/// Spinning top: each shadow must exceed this multiple of the body
pub const SPINNING_SHADOW_MIN: f64 = 0.5;

pub(crate) fn all() -> Vec<PatternDescriptor> {
    vec![
        doji(),
        hammer(),
        hanging_man(),
        shooting_star(),
        inverted_hammer(),
        big_green_candle(),
        big_red_candle(),
        spinning_top(),
        belt_hold(),
        gravestone_doji(),
        dragonfly_doji(),
        bullish_marubozu(),
        bearish_marubozu(),
    ]
}

// ============================================================
// SHAPE HELPERS
// ============================================================

/// Small body near the top of the range with a long lower shadow
fn hammer_shape(bar: &Bar) -> bool {
    let range = bar.range();
    if range <= 0.0 {
        return false;
    }
    let body = bar.body();
    bar.lower_shadow() >= body * SHADOW_TO_BODY_MIN
        && bar.upper_shadow() <= body * OPPOSITE_SHADOW_MAX
        && body >= range * HAMMER_BODY_MIN
        && body <= range * HAMMER_BODY_MAX
}

/// Small body near the bottom of the range with a long upper shadow
fn inverted_hammer_shape(bar: &Bar) -> bool {
    let range = bar.range();
    if range <= 0.0 {
        return false;
    }
    let body = bar.body();
    bar.upper_shadow() >= body * SHADOW_TO_BODY_MIN
        && bar.lower_shadow() <= body * OPPOSITE_SHADOW_MAX
        && body >= range * HAMMER_BODY_MIN
        && body <= range * HAMMER_BODY_MAX
}

fn is_doji_bar(bar: &Bar) -> bool {
    let range = bar.range();
    range > 0.0 && bar.body() < range * DOJI_BODY_RATIO
}

// ============================================================
// PREDICATES
// ============================================================

fn doji_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    is_doji_bar(current)
}

fn hammer_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    hammer_shape(current)
}

fn hanging_man_check(current: &Bar, prev: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    // Same shape as the hammer, but arriving on a rising close
    hammer_shape(current) && prev.close < current.close
}

fn shooting_star_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    inverted_hammer_shape(current)
}

fn inverted_hammer_check(current: &Bar, prev: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    // Shooting-star shape arriving on a falling close
    inverted_hammer_shape(current) && prev.close > current.close
}

fn big_green_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    current.is_bullish() && current.is_body_long()
}

fn big_red_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    current.is_bearish() && current.is_body_long()
}

fn spinning_top_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    let body = current.body();
    current.is_body_short()
        && current.upper_shadow() > body * SPINNING_SHADOW_MIN
        && current.lower_shadow() > body * SPINNING_SHADOW_MIN
}

fn belt_hold_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    let range = current.range();
    if range <= 0.0 || current.body() <= range * BELT_BODY_RATIO {
        return false;
    }
    let bullish_belt = current.is_bullish() && current.lower_shadow() <= f64::EPSILON;
    let bearish_belt = current.is_bearish() && current.upper_shadow() <= f64::EPSILON;
    bullish_belt || bearish_belt
}

fn gravestone_doji_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    let range = current.range();
    range > 0.0
        && current.body() < range * DOJI_BODY_RATIO
        && current.upper_shadow() > range * ONE_SIDED_SHADOW_MIN
        && current.lower_shadow() < range * ONE_SIDED_SHADOW_MAX
}

fn dragonfly_doji_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    let range = current.range();
    range > 0.0
        && current.body() < range * DOJI_BODY_RATIO
        && current.lower_shadow() > range * ONE_SIDED_SHADOW_MIN
        && current.upper_shadow() < range * ONE_SIDED_SHADOW_MAX
}

fn bullish_marubozu_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    let range = current.range();
    current.is_bullish()
        && current.body() > range * MARUBOZU_BODY_RATIO
        && current.upper_shadow() < range * MARUBOZU_SHADOW_RATIO
        && current.lower_shadow() < range * MARUBOZU_SHADOW_RATIO
}

fn bearish_marubozu_check(current: &Bar, _: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
    let range = current.range();
    current.is_bearish()
        && current.body() > range * MARUBOZU_BODY_RATIO
        && current.upper_shadow() < range * MARUBOZU_SHADOW_RATIO
        && current.lower_shadow() < range * MARUBOZU_SHADOW_RATIO
}

// ============================================================
// DESCRIPTORS
// ============================================================

pub fn doji() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("doji"),
        name: "Doji",
        local_name: "十字星",
        kind: PatternKind::Indecision,
        strength: SignalStrength::Moderate,
        bias: Direction::Neutral,
        description: "Open and close nearly equal; buyers and sellers in balance",
        detail: "A doji marks hesitation and often appears at turning points: near a top in \
                 an uptrend, near a bottom in a downtrend.",
        predicate: doji_check,
    }
}

pub fn hammer() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("hammer"),
        name: "Hammer",
        local_name: "錘子線",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Strong,
        bias: Direction::Bullish,
        description: "Small body with a long lower shadow, typical of downtrend exhaustion",
        detail: "The long lower shadow shows sellers ran out of force and buyers stepped in. \
                 The lower shadow is at least twice the body and the upper shadow is minimal.",
        predicate: hammer_check,
    }
}

pub fn hanging_man() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("hanging_man"),
        name: "Hanging Man",
        local_name: "上吊線",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Moderate,
        bias: Direction::Bearish,
        description: "Hammer shape appearing while price is still rising",
        detail: "Same geometry as the hammer but printed on a rising close, hinting at a \
                 possible top. Needs confirmation from the following bar.",
        predicate: hanging_man_check,
    }
}

pub fn shooting_star() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("shooting_star"),
        name: "Shooting Star",
        local_name: "射擊之星",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Moderate,
        bias: Direction::Bearish,
        description: "Small body with a long upper shadow, typical near uptrend tops",
        detail: "Buyers pushed the price up but met resistance; the upper shadow is at least \
                 twice the body, warning of a possible decline.",
        predicate: shooting_star_check,
    }
}

pub fn inverted_hammer() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("inverted_hammer"),
        name: "Inverted Hammer",
        local_name: "倒錘子線",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Moderate,
        bias: Direction::Bullish,
        description: "Shooting-star shape appearing while price is still falling",
        detail: "Selling pressure is fading even though buyers have not taken control; a \
                 first sign of a rebound that needs the next bar to confirm.",
        predicate: inverted_hammer_check,
    }
}

pub fn big_green_candle() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("big_green_candle"),
        name: "Big Green Candle",
        local_name: "大陽線",
        kind: PatternKind::Continuation,
        strength: SignalStrength::Strong,
        bias: Direction::Bullish,
        description: "Bullish bar whose body dominates its range",
        detail: "Strong buying pressure driving price sharply higher; usually the uptrend \
                 continues.",
        predicate: big_green_check,
    }
}

pub fn big_red_candle() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("big_red_candle"),
        name: "Big Red Candle",
        local_name: "大陰線",
        kind: PatternKind::Continuation,
        strength: SignalStrength::Strong,
        bias: Direction::Bearish,
        description: "Bearish bar whose body dominates its range",
        detail: "Strong selling pressure driving price sharply lower; usually the downtrend \
                 continues.",
        predicate: big_red_check,
    }
}

pub fn spinning_top() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("spinning_top"),
        name: "Spinning Top",
        local_name: "紡錘線",
        kind: PatternKind::Indecision,
        strength: SignalStrength::Weak,
        bias: Direction::Neutral,
        description: "Small body with meaningful shadows on both sides",
        detail: "Neither side is in control; read it together with other signals before \
                 drawing a direction from it.",
        predicate: spinning_top_check,
    }
}

pub fn belt_hold() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("belt_hold"),
        name: "Belt Hold",
        local_name: "捉腰帶線",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Moderate,
        bias: Direction::Neutral,
        description: "Long body opening exactly at the high or the low",
        detail: "The bullish form opens at the session low, the bearish form at the session \
                 high; a one-sided session that often precedes a turn.",
        predicate: belt_hold_check,
    }
}

pub fn gravestone_doji() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("gravestone_doji"),
        name: "Gravestone Doji",
        local_name: "墓碑線",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Strong,
        bias: Direction::Bearish,
        description: "Doji with a long upper shadow and almost no lower shadow",
        detail: "Bulls attacked and failed, closing back at the open near the low; a strong \
                 warning near tops.",
        predicate: gravestone_doji_check,
    }
}

pub fn dragonfly_doji() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("dragonfly_doji"),
        name: "Dragonfly Doji",
        local_name: "蜻蜓線",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Strong,
        bias: Direction::Bullish,
        description: "Doji with a long lower shadow and almost no upper shadow",
        detail: "Bears attacked and failed, closing back at the open near the high; a strong \
                 signal near bottoms.",
        predicate: dragonfly_doji_check,
    }
}

pub fn bullish_marubozu() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("bullish_marubozu"),
        name: "Bullish Marubozu",
        local_name: "長陽線",
        kind: PatternKind::Continuation,
        strength: SignalStrength::Strong,
        bias: Direction::Bullish,
        description: "Bullish bar with virtually no shadows",
        detail: "Buyers controlled the whole session from open to close; the uptrend usually \
                 extends.",
        predicate: bullish_marubozu_check,
    }
}

pub fn bearish_marubozu() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("bearish_marubozu"),
        name: "Bearish Marubozu",
        local_name: "長陰線",
        kind: PatternKind::Continuation,
        strength: SignalStrength::Strong,
        bias: Direction::Bearish,
        description: "Bearish bar with virtually no shadows",
        detail: "Sellers controlled the whole session from open to close; the downtrend \
                 usually extends.",
        predicate: bearish_marubozu_check,
    }
}

// ============================================================
// TESTS
// ============================================================
