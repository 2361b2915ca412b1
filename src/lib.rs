//! # candlescan
//!
//! Candlestick pattern recognition engine: 37 built-in patterns, historical
//! scanning and ranking.
//!
//! ## Quick Start
//!
//! ```rust
//! use candlescan::prelude::*;
//!
//! let bars = vec![
//!     Bar::new(100.0, 102.0, 98.0, 99.0),
//!     Bar::new(100.0, 101.0, 99.0, 100.05), // doji
//! ];
//!
//! // Engine with the full built-in registry
//! let engine = EngineBuilder::new().with_builtins().build();
//!
//! // All patterns active on the latest bar
//! let matched = engine.detect(&bars).unwrap();
//! assert!(matched.iter().any(|p| p.id == PatternId("doji")));
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub mod analysis;
pub mod patterns;
pub mod stats;

pub mod prelude {
    pub use crate::{
        // Helpers
        analysis::{
            find_local_maxima, find_local_minima, has_volume_decrease, is_consolidating,
            is_double_pattern, is_head_and_shoulders, is_inverse_head_and_shoulders,
            least_squares_trend, simple_slope, Extremum, PriceField,
        },
        // Ranking
        filter_kind,
        patterns::builtin,
        rank,
        // Parallel
        scan_parallel,
        sort_matches,
        stats::ScanStats,
        top_n,
        Bar,
        BreakoutMode,
        Direction,
        EngineBuilder,
        EngineConfig,
        HasPattern,
        HistoricalMatch,
        KindFilter,
        PatternDescriptor,
        PatternEngine,
        PatternError,
        PatternId,
        PatternKind,
        Predicate,
        Registry,
        Result,
        ScanParams,
        SignalStrength,
        SortKey,
        SymbolScan,
        SymbolScanError,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, PatternError>;

/// Errors that can occur during pattern detection
#[derive(Debug, Clone, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: &'static str },
}

// ============================================================
// BAR - one OHLCV period
// ============================================================

/// Body is long when it covers more than this share of the bar's range
pub const BODY_LONG_RATIO: f64 = 0.6;
/// Body is short when it covers less than this share of the bar's range
pub const BODY_SHORT_RATIO: f64 = 0.3;

/// One OHLCV bar. Series are ordered oldest → newest.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date: None,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    #[inline]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    #[inline]
    pub fn upper_shadow(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    #[inline]
    pub fn lower_shadow(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    #[inline]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Body covers more than [`BODY_LONG_RATIO`] of the range.
    /// Written in multiplied form: a zero-range bar never qualifies.
    #[inline]
    pub fn is_body_long(&self) -> bool {
        self.body() > self.range() * BODY_LONG_RATIO
    }

    /// Body covers less than [`BODY_SHORT_RATIO`] of the range.
    /// Zero-range bars never qualify.
    #[inline]
    pub fn is_body_short(&self) -> bool {
        let range = self.range();
        range > 0.0 && self.body() < range * BODY_SHORT_RATIO
    }

    /// Midpoint of the real body
    #[inline]
    pub fn body_mid(&self) -> f64 {
        (self.open + self.close) / 2.0
    }

    /// Midpoint of the full range
    #[inline]
    pub fn range_mid(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// Validate bar geometry: the high/low envelope must contain the body,
    /// all prices finite.
    pub fn validate(&self) -> Result<()> {
        if self.high < self.low {
            return Err(PatternError::InvalidBar {
                index: 0,
                reason: "high < low",
            });
        }
        if self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan() {
            return Err(PatternError::InvalidBar {
                index: 0,
                reason: "NaN price",
            });
        }
        if self.open.is_infinite()
            || self.high.is_infinite()
            || self.low.is_infinite()
            || self.close.is_infinite()
        {
            return Err(PatternError::InvalidBar {
                index: 0,
                reason: "infinite price",
            });
        }
        if self.high < self.open.max(self.close) {
            return Err(PatternError::InvalidBar {
                index: 0,
                reason: "high below body",
            });
        }
        if self.low > self.open.min(self.close) {
            return Err(PatternError::InvalidBar {
                index: 0,
                reason: "low above body",
            });
        }
        Ok(())
    }
}

// ============================================================
// CLASSIFICATION ENUMS
// ============================================================

/// Expected trend behavior after the pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Reversal,
    Continuation,
    Indecision,
}

/// Signal strength, totally ordered: Strong > Moderate > Weak
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SignalStrength {
    Weak,
    Moderate,
    Strong,
}

/// Directional bias of a pattern. Neutral is a first-class value
/// (Doji, Harami), not the absence of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Neutral,
    Bearish,
}

impl Direction {
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, Direction::Bullish)
    }

    #[inline]
    pub fn is_bearish(self) -> bool {
        matches!(self, Direction::Bearish)
    }
}

// ============================================================
// PATTERN DESCRIPTOR
// ============================================================

/// Unique identifier for a pattern type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternId(pub &'static str);

impl PatternId {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Pure predicate over the most recent bars.
///
/// Arguments: current bar, previous bar, the bar before that, and the full
/// history up to and including the current bar (oldest first). Must be
/// deterministic and must not panic: missing lookback means `false`.
pub type Predicate = fn(&Bar, Option<&Bar>, Option<&Bar>, &[Bar]) -> bool;

/// A pattern: metadata plus its predicate
#[derive(Debug, Clone, Copy)]
pub struct PatternDescriptor {
    pub id: PatternId,
    pub name: &'static str,
    /// Localized display name
    pub local_name: &'static str,
    pub kind: PatternKind,
    pub strength: SignalStrength,
    pub bias: Direction,
    pub description: &'static str,
    pub detail: &'static str,
    pub predicate: Predicate,
}

impl PatternDescriptor {
    #[inline]
    pub fn matches(
        &self,
        current: &Bar,
        prev: Option<&Bar>,
        prev2: Option<&Bar>,
        history: &[Bar],
    ) -> bool {
        (self.predicate)(current, prev, prev2, history)
    }
}

// ============================================================
// REGISTRY
// ============================================================

/// Breakout confirmation policy for the flag/pennant/wedge family.
///
/// The documented form of these patterns requires expanding volume on the
/// breakout bar; `VolumeConfirmed` enforces it, `Lenient` (the default)
/// accepts the breakout on price alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakoutMode {
    #[default]
    Lenient,
    VolumeConfirmed,
}

/// Ordered pattern catalog: builtins first, then caller-supplied customs
#[derive(Debug, Clone, Default)]
pub struct Registry {
    descriptors: Vec<PatternDescriptor>,
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// All 37 built-in patterns with lenient breakouts
    pub fn builtin() -> Self {
        Self::builtin_with(BreakoutMode::default())
    }

    pub fn builtin_with(mode: BreakoutMode) -> Self {
        Self {
            descriptors: patterns::builtin(mode),
        }
    }

    pub fn push(&mut self, descriptor: PatternDescriptor) {
        self.descriptors.push(descriptor);
    }

    pub fn descriptors(&self) -> &[PatternDescriptor] {
        &self.descriptors
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

// ============================================================
// MATCHES AND RANKING
// ============================================================

/// A dated pattern occurrence found by the historical scanner
#[derive(Debug, Clone)]
pub struct HistoricalMatch {
    pub pattern: PatternDescriptor,
    pub index: usize,
    pub date: String,
}

/// Anything carrying a [`PatternDescriptor`]; lets the ranking pipeline
/// serve both current-bar results and historical matches.
pub trait HasPattern {
    fn pattern(&self) -> &PatternDescriptor;
}

impl HasPattern for PatternDescriptor {
    fn pattern(&self) -> &PatternDescriptor {
        self
    }
}

impl HasPattern for HistoricalMatch {
    fn pattern(&self) -> &PatternDescriptor {
        &self.pattern
    }
}

/// Pattern-kind filter: everything, or a single kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Only(PatternKind),
}

/// Sort key for ranked output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Strength,
    Name,
}

/// Scan parameters: day window, result cap, filter and sort order
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ScanParams {
    pub historical_days: i64,
    pub max_patterns: usize,
    pub filter: KindFilter,
    pub sort: SortKey,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            historical_days: 30,
            max_patterns: 10,
            filter: KindFilter::All,
            sort: SortKey::Strength,
        }
    }
}

/// Keep only items of the requested kind; `All` is the identity.
pub fn filter_kind<T: HasPattern>(items: Vec<T>, filter: KindFilter) -> Vec<T> {
    match filter {
        KindFilter::All => items,
        KindFilter::Only(kind) => items
            .into_iter()
            .filter(|item| item.pattern().kind == kind)
            .collect(),
    }
}

/// Stable sort: strength descending, or name ascending.
/// Equal keys keep their registry/match order.
pub fn sort_matches<T: HasPattern>(items: &mut [T], key: SortKey) {
    match key {
        SortKey::Strength => items.sort_by(|a, b| b.pattern().strength.cmp(&a.pattern().strength)),
        SortKey::Name => items.sort_by(|a, b| a.pattern().name.cmp(b.pattern().name)),
    }
}

/// Truncate to the first `n` entries
pub fn top_n<T>(mut items: Vec<T>, n: usize) -> Vec<T> {
    items.truncate(n);
    items
}

/// filter → sort → truncate, per `params`
pub fn rank<T: HasPattern>(items: Vec<T>, params: &ScanParams) -> Vec<T> {
    let mut items = filter_kind(items, params.filter);
    sort_matches(&mut items, params.sort);
    top_n(items, params.max_patterns)
}

// ============================================================
// PATTERN ENGINE
// ============================================================

/// Engine configuration
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub validate_data: bool,
    pub breakout_mode: BreakoutMode,
}

/// Stateless pattern matcher and historical scanner over a bar series
#[derive(Debug, Clone)]
pub struct PatternEngine {
    registry: Registry,
    config: EngineConfig,
}

impl PatternEngine {
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Evaluate the registry against the latest bar.
    /// Returns matching descriptors in registry order; empty series → empty.
    pub fn detect(&self, bars: &[Bar]) -> Result<Vec<PatternDescriptor>> {
        if self.config.validate_data {
            self.validate_bars(bars)?;
        }
        let Some(last) = bars.len().checked_sub(1) else {
            return Ok(Vec::new());
        };
        Ok(self.eval_index(bars, last))
    }

    /// [`detect`](Self::detect) followed by filter/sort/top-N
    pub fn detect_ranked(
        &self,
        bars: &[Bar],
        params: &ScanParams,
    ) -> Result<Vec<PatternDescriptor>> {
        Ok(rank(self.detect(bars)?, params))
    }

    /// Re-run the matcher at every bar whose date falls within
    /// `[now - days, now]`. Bars with missing or unparseable dates are
    /// skipped. Result is sorted by index descending (most recent first).
    pub fn scan_history(
        &self,
        bars: &[Bar],
        now: DateTime<Utc>,
        days: i64,
    ) -> Result<Vec<HistoricalMatch>> {
        if self.config.validate_data {
            self.validate_bars(bars)?;
        }
        let start = now - chrono::Duration::days(days);
        let mut matches = Vec::new();

        for (index, bar) in bars.iter().enumerate() {
            let Some(raw) = bar.date.as_deref() else {
                continue;
            };
            let Some(at) = parse_bar_date(raw) else {
                continue;
            };
            if at < start || at > now {
                continue;
            }
            for descriptor in self.eval_index(bars, index) {
                matches.push(HistoricalMatch {
                    pattern: descriptor,
                    index,
                    date: raw.to_string(),
                });
            }
        }

        matches.sort_by(|a, b| b.index.cmp(&a.index));
        Ok(matches)
    }

    /// [`scan_history`](Self::scan_history) followed by filter/sort/top-N
    pub fn scan_history_ranked(
        &self,
        bars: &[Bar],
        now: DateTime<Utc>,
        params: &ScanParams,
    ) -> Result<Vec<HistoricalMatch>> {
        Ok(rank(
            self.scan_history(bars, now, params.historical_days)?,
            params,
        ))
    }

    fn eval_index(&self, bars: &[Bar], index: usize) -> Vec<PatternDescriptor> {
        let current = &bars[index];
        let prev = index.checked_sub(1).map(|i| &bars[i]);
        let prev2 = index.checked_sub(2).map(|i| &bars[i]);
        let history = &bars[..=index];

        self.registry
            .iter()
            .filter(|d| d.matches(current, prev, prev2, history))
            .copied()
            .collect()
    }

    fn validate_bars(&self, bars: &[Bar]) -> Result<()> {
        for (index, bar) in bars.iter().enumerate() {
            bar.validate().map_err(|e| match e {
                PatternError::InvalidBar { reason, .. } => {
                    PatternError::InvalidBar { index, reason }
                }
            })?;
        }
        Ok(())
    }
}

/// Parse a bar date: RFC 3339, then `%Y-%m-%d %H:%M:%S`, then `%Y-%m-%d`.
/// Naive timestamps are taken as UTC.
fn parse_bar_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0)?));
    }
    None
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for [`PatternEngine`] instances
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    use_builtins: bool,
    custom: Vec<PatternDescriptor>,
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include the 37 built-in patterns (under the configured breakout mode)
    pub fn with_builtins(mut self) -> Self {
        self.use_builtins = true;
        self
    }

    /// Append a caller-supplied pattern after the builtins
    pub fn add_custom(mut self, descriptor: PatternDescriptor) -> Self {
        self.custom.push(descriptor);
        self
    }

    pub fn breakout_mode(mut self, mode: BreakoutMode) -> Self {
        self.config.breakout_mode = mode;
        self
    }

    /// Enable the bar-geometry validation pass on every call
    pub fn validate_data(mut self, enable: bool) -> Self {
        self.config.validate_data = enable;
        self
    }

    pub fn build(self) -> PatternEngine {
        let mut registry = if self.use_builtins {
            Registry::builtin_with(self.config.breakout_mode)
        } else {
            Registry::empty()
        };
        for descriptor in self.custom {
            registry.push(descriptor);
        }
        PatternEngine {
            registry,
            config: self.config,
        }
    }
}

// ============================================================
// PARALLEL SCANNING
// ============================================================

use rayon::prelude::*;

/// Result of scanning a single instrument
#[derive(Debug)]
pub struct SymbolScan {
    pub symbol: String,
    pub patterns: Vec<PatternDescriptor>,
}

/// Error from scanning a single instrument
#[derive(Debug)]
pub struct SymbolScanError {
    pub symbol: String,
    pub error: PatternError,
}

/// Run the current-bar matcher over many instruments in parallel.
/// Safe because the engine is immutable and every call is pure.
pub fn scan_parallel<'a, I>(
    engine: &PatternEngine,
    instruments: I,
) -> (Vec<SymbolScan>, Vec<SymbolScanError>)
where
    I: IntoParallelIterator<Item = (&'a str, &'a [Bar])>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, bars)| {
            engine
                .detect(bars)
                .map(|patterns| SymbolScan {
                    symbol: symbol.to_string(),
                    patterns,
                })
                .map_err(|error| SymbolScanError {
                    symbol: symbol.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_geometry() {
        let bar = Bar::new(100.0, 110.0, 90.0, 105.0);
        assert_eq!(bar.body(), 5.0);
        assert_eq!(bar.range(), 20.0);
        assert_eq!(bar.upper_shadow(), 5.0);
        assert_eq!(bar.lower_shadow(), 10.0);
        assert!(bar.is_bullish());
        assert!(!bar.is_bearish());
    }

    #[test]
    fn test_geometry_invariants() {
        let bar = Bar::new(100.0, 110.0, 90.0, 105.0);
        assert!(bar.range() >= 0.0);
        assert!(bar.body() <= bar.range());
        assert!(bar.upper_shadow() >= 0.0);
        assert!(bar.lower_shadow() >= 0.0);
    }

    #[test]
    fn test_zero_range_bar_classifies_nothing() {
        let flat = Bar::new(100.0, 100.0, 100.0, 100.0);
        assert!(!flat.is_body_long());
        assert!(!flat.is_body_short());
        assert!(!flat.is_bullish());
        assert!(!flat.is_bearish());
    }

    #[test]
    fn test_bar_validation() {
        assert!(Bar::new(100.0, 110.0, 90.0, 105.0).validate().is_ok());
        assert!(Bar::new(100.0, 90.0, 110.0, 105.0).validate().is_err()); // high < low
        assert!(Bar::new(100.0, 102.0, 98.0, 103.0).validate().is_err()); // close above high
        assert!(Bar::new(97.0, 102.0, 98.0, 100.0).validate().is_err()); // open below low
        assert!(Bar::new(f64::NAN, 102.0, 98.0, 100.0).validate().is_err());
    }

    #[test]
    fn test_validation_reports_bar_index() {
        let bars = vec![
            Bar::new(100.0, 102.0, 98.0, 101.0),
            Bar::new(100.0, 90.0, 110.0, 105.0),
        ];
        let engine = EngineBuilder::new()
            .with_builtins()
            .validate_data(true)
            .build();
        match engine.detect(&bars) {
            Err(PatternError::InvalidBar { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidBar, got {other:?}"),
        }
    }

    #[test]
    fn test_strength_total_order() {
        assert!(SignalStrength::Strong > SignalStrength::Moderate);
        assert!(SignalStrength::Moderate > SignalStrength::Weak);
    }

    #[test]
    fn test_builtin_registry_has_37_patterns() {
        assert_eq!(Registry::builtin().len(), 37);
    }

    #[test]
    fn test_registry_custom_appended_after_builtins() {
        fn always(_: &Bar, _: Option<&Bar>, _: Option<&Bar>, _: &[Bar]) -> bool {
            true
        }
        let custom = PatternDescriptor {
            id: PatternId("custom"),
            name: "Custom",
            local_name: "Custom",
            kind: PatternKind::Indecision,
            strength: SignalStrength::Weak,
            bias: Direction::Neutral,
            description: "",
            detail: "",
            predicate: always,
        };
        let engine = EngineBuilder::new()
            .with_builtins()
            .add_custom(custom)
            .build();
        assert_eq!(engine.registry().len(), 38);
        assert_eq!(
            engine.registry().descriptors().last().unwrap().id,
            PatternId("custom")
        );
    }

    #[test]
    fn test_detect_empty_series() {
        let engine = EngineBuilder::new().with_builtins().build();
        assert!(engine.detect(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_detect_is_idempotent() {
        let bars: Vec<Bar> = (0..30)
            .map(|i| {
                let base = 100.0 + (i % 7) as f64;
                Bar::new(base, base + 2.0, base - 2.0, base + 0.5).with_volume(1000.0)
            })
            .collect();
        let engine = EngineBuilder::new().with_builtins().build();
        let a = engine.detect(&bars).unwrap();
        let b = engine.detect(&bars).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.id, y.id);
        }
    }

    #[test]
    fn test_filter_kind_subset_and_identity() {
        let all: Vec<PatternDescriptor> = Registry::builtin().descriptors().to_vec();

        let reversals = filter_kind(all.clone(), KindFilter::Only(PatternKind::Reversal));
        assert!(!reversals.is_empty());
        assert!(reversals.len() < all.len());
        assert!(reversals.iter().all(|d| d.kind == PatternKind::Reversal));

        let identity = filter_kind(all.clone(), KindFilter::All);
        assert_eq!(identity.len(), all.len());
    }

    #[test]
    fn test_sort_by_strength_is_stable_descending() {
        let mut items: Vec<PatternDescriptor> = Registry::builtin().descriptors().to_vec();
        sort_matches(&mut items, SortKey::Strength);
        for pair in items.windows(2) {
            assert!(pair[0].strength >= pair[1].strength);
        }
        // Stability: the first Strong entry is still the registry's first Strong
        let first_strong_in_registry = Registry::builtin()
            .descriptors()
            .iter()
            .find(|d| d.strength == SignalStrength::Strong)
            .unwrap()
            .id;
        assert_eq!(items[0].id, first_strong_in_registry);
    }

    #[test]
    fn test_sort_by_name() {
        let mut items: Vec<PatternDescriptor> = Registry::builtin().descriptors().to_vec();
        sort_matches(&mut items, SortKey::Name);
        for pair in items.windows(2) {
            assert!(pair[0].name <= pair[1].name);
        }
    }

    #[test]
    fn test_top_n_truncates() {
        let items: Vec<PatternDescriptor> = Registry::builtin().descriptors().to_vec();
        assert_eq!(top_n(items.clone(), 5).len(), 5);
        assert_eq!(top_n(items.clone(), 0).len(), 0);
        assert_eq!(top_n(items.clone(), 1000).len(), items.len());
    }

    #[test]
    fn test_parse_bar_date_formats() {
        assert!(parse_bar_date("2024-01-15").is_some());
        assert!(parse_bar_date("2024-01-15 09:30:00").is_some());
        assert!(parse_bar_date("2024-01-15T09:30:00Z").is_some());
        assert!(parse_bar_date("Jan 15, 2024").is_none());
        assert!(parse_bar_date("").is_none());
    }

    #[test]
    fn test_bar_serde_roundtrip() {
        let bar = Bar::new(100.0, 102.0, 98.0, 101.0)
            .with_volume(5000.0)
            .with_date("2024-01-15");
        let json = serde_json::to_string(&bar).unwrap();
        let back: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, back);
    }

    #[test]
    fn test_bar_serde_optional_fields_absent() {
        let bar: Bar =
            serde_json::from_str(r#"{"open":1.0,"high":2.0,"low":0.5,"close":1.5}"#).unwrap();
        assert!(bar.date.is_none());
        assert!(bar.volume.is_none());
    }
}
