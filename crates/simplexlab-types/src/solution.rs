use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Terminal verdict of a solve
///
/// Every driver ends in exactly one of these. The cap variants are terminal
/// and reported, never silent (see the error module notes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    IterationLimit,
    NodeLimit,
    CutLimit,
}

impl SolveStatus {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }
}

/// Result of a solve in original-variable space
///
/// `x` maps variable labels to values; a `BTreeMap` keeps the entries sorted
/// by label, which is the order the result files print them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Objective value in the original sense (min problems un-negated)
    pub z: f64,

    /// Original variable values keyed by label
    pub x: BTreeMap<String, f64>,

    pub status: SolveStatus,

    /// Optional driver note, e.g. the reason a cut loop stopped early
    pub note: Option<String>,
}

impl Solution {
    /// A solution that carries only a verdict (infeasible, unbounded, caps)
    pub fn verdict(status: SolveStatus) -> Self {
        Solution {
            z: 0.0,
            x: BTreeMap::new(),
            status,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Value of one variable, 0 when absent
    pub fn value(&self, label: &str) -> f64 {
        self.x.get(label).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_has_no_values() {
        let s = Solution::verdict(SolveStatus::Infeasible);
        assert_eq!(s.status, SolveStatus::Infeasible);
        assert!(s.x.is_empty());
        assert_eq!(s.value("X1"), 0.0);
    }

    #[test]
    fn test_labels_iterate_sorted() {
        let mut s = Solution::verdict(SolveStatus::Optimal);
        s.x.insert("X2".to_string(), 6.0);
        s.x.insert("X1".to_string(), 2.0);
        let labels: Vec<_> = s.x.keys().cloned().collect();
        assert_eq!(labels, vec!["X1", "X2"]);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut s = Solution::verdict(SolveStatus::Optimal).with_note("basis unchanged");
        s.z = 36.0;
        s.x.insert("X1".to_string(), 2.0);

        let json = serde_json::to_string(&s).unwrap();
        let back: Solution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
