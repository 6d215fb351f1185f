//! The pool of statistics waiting to be turned into posts.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Candidate statistics plus the subset already posted.
///
/// Stored as `{"statistics": [...], "used": [...]}`. Both fields default to
/// empty so the `{}` returned for a missing object reads as a fresh document.
///
/// # Examples
///
/// ```
/// use statpost_core::StatisticsDocument;
///
/// let mut doc = StatisticsDocument::new(vec!["A".into(), "B".into()]);
/// doc.mark_used("A");
/// assert_eq!(doc.unused().collect::<Vec<_>>(), vec!["B"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct StatisticsDocument {
    /// Candidate statistics in provider order
    #[serde(default)]
    statistics: Vec<String>,
    /// Statistics that already produced a post
    #[serde(default)]
    used: Vec<String>,
}

impl StatisticsDocument {
    /// Fresh document with nothing used yet.
    pub fn new(statistics: Vec<String>) -> Self {
        Self {
            statistics,
            used: Vec::new(),
        }
    }

    /// Document with an explicit used set, as read back from storage.
    pub fn with_used(statistics: Vec<String>, used: Vec<String>) -> Self {
        Self { statistics, used }
    }

    /// True when there are no candidate statistics at all.
    pub fn is_empty(&self) -> bool {
        self.statistics.is_empty()
    }

    /// Whether `statistic` has already been posted.
    pub fn is_used(&self, statistic: &str) -> bool {
        self.used.iter().any(|used| used == statistic)
    }

    /// Statistics not yet posted, in provider order.
    pub fn unused(&self) -> impl Iterator<Item = &str> {
        self.statistics
            .iter()
            .map(String::as_str)
            .filter(|statistic| !self.is_used(statistic))
    }

    /// True when every candidate has been posted (or there are none).
    pub fn is_exhausted(&self) -> bool {
        self.unused().next().is_none()
    }

    /// Record `statistic` as posted.
    ///
    /// Marking a statistic twice is a no-op.
    pub fn mark_used(&mut self, statistic: impl Into<String>) {
        let statistic = statistic.into();
        if !self.is_used(&statistic) {
            debug!(statistic = %statistic, "Marking statistic as used");
            self.used.push(statistic);
        }
    }

    /// Replace the pool with a fresh batch and forget the used set.
    pub fn refill(&mut self, statistics: Vec<String>) {
        debug!(count = statistics.len(), "Refilling statistics pool");
        self.statistics = statistics;
        self.used.clear();
    }
}
