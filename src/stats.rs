//! Aggregation of historical scan results: totals, per-kind and
//! per-strength counts, and a per-date time distribution. Plain data for
//! callers to render however they like.

use std::collections::BTreeMap;

use crate::{HistoricalMatch, PatternKind, SignalStrength};

/// Summary of a historical scan
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ScanStats {
    pub total: usize,
    pub reversals: usize,
    pub continuations: usize,
    pub indecisions: usize,
    pub strong: usize,
    pub moderate: usize,
    pub weak: usize,
    /// Match count per date, ascending by date string
    pub time_distribution: Vec<(String, usize)>,
}

impl ScanStats {
    pub fn from_matches(matches: &[HistoricalMatch]) -> Self {
        let mut stats = Self {
            total: matches.len(),
            ..Self::default()
        };

        let mut by_date: BTreeMap<&str, usize> = BTreeMap::new();
        for m in matches {
            match m.pattern.kind {
                PatternKind::Reversal => stats.reversals += 1,
                PatternKind::Continuation => stats.continuations += 1,
                PatternKind::Indecision => stats.indecisions += 1,
            }
            match m.pattern.strength {
                SignalStrength::Strong => stats.strong += 1,
                SignalStrength::Moderate => stats.moderate += 1,
                SignalStrength::Weak => stats.weak += 1,
            }
            *by_date.entry(m.date.as_str()).or_default() += 1;
        }

        stats.time_distribution = by_date
            .into_iter()
            .map(|(date, count)| (date.to_string(), count))
            .collect();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::single_bar::{doji, hammer, spinning_top};

    fn match_at(pattern: crate::PatternDescriptor, index: usize, date: &str) -> HistoricalMatch {
        HistoricalMatch {
            pattern,
            index,
            date: date.to_string(),
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = ScanStats::from_matches(&[]);
        assert_eq!(stats, ScanStats::default());
    }

    #[test]
    fn test_counts_and_distribution() {
        let matches = vec![
            match_at(doji(), 7, "2024-01-10"),
            match_at(hammer(), 7, "2024-01-10"),
            match_at(spinning_top(), 3, "2024-01-04"),
        ];
        let stats = ScanStats::from_matches(&matches);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.reversals, 1); // hammer
        assert_eq!(stats.indecisions, 2); // doji, spinning top
        assert_eq!(stats.continuations, 0);
        assert_eq!(stats.strong, 1);
        assert_eq!(stats.moderate, 1);
        assert_eq!(stats.weak, 1);
        assert_eq!(
            stats.time_distribution,
            vec![
                ("2024-01-04".to_string(), 1),
                ("2024-01-10".to_string(), 2),
            ]
        );
    }
}
