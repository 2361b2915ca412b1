//! Three-bar patterns: Morning / Evening Star, Three White Soldiers /
//! Black Crows, Rising / Falling Three Methods.

use crate::{Bar, Direction, PatternDescriptor, PatternId, PatternKind, SignalStrength};

/// Star patterns: the final body must exceed this share of the first body
pub const STAR_FINAL_BODY_RATIO: f64 = 0.5;
/// Three methods: the final body must exceed this share of the first body
pub const METHODS_FINAL_BODY_RATIO: f64 = 0.7;

pub(crate) fn all() -> Vec<PatternDescriptor> {
    vec![
        morning_star(),
        evening_star(),
        three_white_soldiers(),
        three_black_crows(),
        rising_three_methods(),
        falling_three_methods(),
    ]
}

// ============================================================
// PREDICATES
// ============================================================

fn morning_star_check(current: &Bar, prev: Option<&Bar>, prev2: Option<&Bar>, _: &[Bar]) -> bool {
    let (Some(prev), Some(prev2)) = (prev, prev2) else {
        return false;
    };
    let first_is_big_red = prev2.is_bearish() && prev2.is_body_long();
    let second_is_small = prev.is_body_short();
    let third_is_green = current.is_bullish() && current.body() > prev2.body() * STAR_FINAL_BODY_RATIO;
    let penetration = current.close > prev2.body_mid();

    first_is_big_red && second_is_small && third_is_green && penetration
}

fn evening_star_check(current: &Bar, prev: Option<&Bar>, prev2: Option<&Bar>, _: &[Bar]) -> bool {
    let (Some(prev), Some(prev2)) = (prev, prev2) else {
        return false;
    };
    let first_is_big_green = prev2.is_bullish() && prev2.is_body_long();
    let second_is_small = prev.is_body_short();
    let third_is_red = current.is_bearish() && current.body() > prev2.body() * STAR_FINAL_BODY_RATIO;
    let penetration = current.close < prev2.body_mid();

    first_is_big_green && second_is_small && third_is_red && penetration
}

/// Open strictly inside the prior real body
fn opens_inside(bar: &Bar, prior: &Bar) -> bool {
    bar.open > prior.open.min(prior.close) && bar.open < prior.open.max(prior.close)
}

fn three_white_soldiers_check(
    current: &Bar,
    prev: Option<&Bar>,
    prev2: Option<&Bar>,
    _: &[Bar],
) -> bool {
    let (Some(prev), Some(prev2)) = (prev, prev2) else {
        return false;
    };
    let all_green = prev2.is_bullish() && prev.is_bullish() && current.is_bullish();
    let ascending = prev2.close < prev.close && prev.close < current.close;
    let reasonable_size =
        !prev2.is_body_short() && !prev.is_body_short() && !current.is_body_short();
    let staircase = opens_inside(prev, prev2) && opens_inside(current, prev);

    all_green && ascending && reasonable_size && staircase
}

fn three_black_crows_check(
    current: &Bar,
    prev: Option<&Bar>,
    prev2: Option<&Bar>,
    _: &[Bar],
) -> bool {
    let (Some(prev), Some(prev2)) = (prev, prev2) else {
        return false;
    };
    let all_red = prev2.is_bearish() && prev.is_bearish() && current.is_bearish();
    let descending = prev2.close > prev.close && prev.close > current.close;
    let reasonable_size =
        !prev2.is_body_short() && !prev.is_body_short() && !current.is_body_short();
    let staircase = opens_inside(prev, prev2) && opens_inside(current, prev);

    all_red && descending && reasonable_size && staircase
}

fn rising_three_methods_check(
    current: &Bar,
    prev: Option<&Bar>,
    prev2: Option<&Bar>,
    _: &[Bar],
) -> bool {
    let (Some(prev), Some(prev2)) = (prev, prev2) else {
        return false;
    };
    let first_big_green = prev2.is_bullish() && prev2.is_body_long();
    let middle_small_red = prev.is_bearish() && prev.is_body_short();
    // The pullback stays inside the first bar's range
    let contained = prev.high < prev2.high && prev.low > prev2.low;
    let final_big_green =
        current.is_bullish() && current.body() > prev2.body() * METHODS_FINAL_BODY_RATIO;
    let breakout = current.close > prev2.high;

    first_big_green && middle_small_red && contained && final_big_green && breakout
}

fn falling_three_methods_check(
    current: &Bar,
    prev: Option<&Bar>,
    prev2: Option<&Bar>,
    _: &[Bar],
) -> bool {
    let (Some(prev), Some(prev2)) = (prev, prev2) else {
        return false;
    };
    let first_big_red = prev2.is_bearish() && prev2.is_body_long();
    let middle_small_green = prev.is_bullish() && prev.is_body_short();
    let contained = prev.high < prev2.high && prev.low > prev2.low;
    let final_big_red =
        current.is_bearish() && current.body() > prev2.body() * METHODS_FINAL_BODY_RATIO;
    let breakdown = current.close < prev2.low;

    first_big_red && middle_small_green && contained && final_big_red && breakdown
}

// ============================================================
// DESCRIPTORS
// ============================================================

pub fn morning_star() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("morning_star"),
        name: "Morning Star",
        local_name: "早晨之星",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Strong,
        bias: Direction::Bullish,
        description: "Big red bar, small pause bar, then a big green recovery",
        detail: "The third bar must close above the midpoint of the first red body, showing \
                 buyers reclaiming the lost ground.",
        predicate: morning_star_check,
    }
}

pub fn evening_star() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("evening_star"),
        name: "Evening Star",
        local_name: "黃昏之星",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Strong,
        bias: Direction::Bearish,
        description: "Big green bar, small pause bar, then a big red decline",
        detail: "The third bar must close below the midpoint of the first green body, showing \
                 sellers reclaiming the gained ground.",
        predicate: evening_star_check,
    }
}

pub fn three_white_soldiers() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("three_white_soldiers"),
        name: "Three White Soldiers",
        local_name: "白色三兵",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Strong,
        bias: Direction::Bullish,
        description: "Three green bars, each closing higher, each opening inside the prior body",
        detail: "Sustained buying after a decline: advancing closes with orderly staircase \
                 opens, none of the bodies trivially small.",
        predicate: three_white_soldiers_check,
    }
}

pub fn three_black_crows() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("three_black_crows"),
        name: "Three Black Crows",
        local_name: "黑三鴉",
        kind: PatternKind::Reversal,
        strength: SignalStrength::Strong,
        bias: Direction::Bearish,
        description: "Three red bars, each closing lower, each opening inside the prior body",
        detail: "Sustained selling after an advance: declining closes with orderly staircase \
                 opens, none of the bodies trivially small.",
        predicate: three_black_crows_check,
    }
}

pub fn rising_three_methods() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("rising_three_methods"),
        name: "Rising Three Methods",
        local_name: "上升三法",
        kind: PatternKind::Continuation,
        strength: SignalStrength::Moderate,
        bias: Direction::Bullish,
        description: "Big green bar, small red pullback inside it, green breakout to new highs",
        detail: "A rest inside the prior advance: the pullback holds within the first bar's \
                 range and the final bar closes above its high.",
        predicate: rising_three_methods_check,
    }
}

pub fn falling_three_methods() -> PatternDescriptor {
    PatternDescriptor {
        id: PatternId("falling_three_methods"),
        name: "Falling Three Methods",
        local_name: "下降三法",
        kind: PatternKind::Continuation,
        strength: SignalStrength::Moderate,
        bias: Direction::Bearish,
        description: "Big red bar, small green bounce inside it, red breakdown to new lows",
        detail: "A rest inside the prior decline: the bounce holds within the first bar's \
                 range and the final bar closes below its low.",
        predicate: falling_three_methods_check,
    }
}

// ============================================================
// TESTS
// ============================================================
