//! Policies for choosing the next statistic to post.

use crate::StatisticsDocument;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};

/// Picks the next statistic from a document.
///
/// Implementations must only return statistics that are not yet used, and
/// must return `None` exactly when the document is exhausted.
pub trait SelectionPolicy: Send + Sync {
    /// Choose an unused statistic.
    fn select<'a>(&self, document: &'a StatisticsDocument) -> Option<&'a str>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// First unused statistic in provider order.
///
/// # Examples
///
/// ```
/// use statpost_core::{FirstUnused, SelectionPolicy, StatisticsDocument};
///
/// let doc = StatisticsDocument::with_used(
///     vec!["A".into(), "B".into(), "C".into()],
///     vec!["A".into()],
/// );
/// assert_eq!(FirstUnused.select(&doc), Some("B"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstUnused;

impl SelectionPolicy for FirstUnused {
    fn select<'a>(&self, document: &'a StatisticsDocument) -> Option<&'a str> {
        document.unused().next()
    }

    fn name(&self) -> &'static str {
        "first_unused"
    }
}

/// Uniformly random unused statistic.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUnused;

impl SelectionPolicy for RandomUnused {
    fn select<'a>(&self, document: &'a StatisticsDocument) -> Option<&'a str> {
        document.unused().choose(&mut rand::thread_rng())
    }

    fn name(&self) -> &'static str {
        "random_unused"
    }
}

/// Configurable choice of [`SelectionPolicy`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SelectionStrategy {
    /// Deterministic, provider order
    #[default]
    FirstUnused,
    /// Random among unused
    RandomUnused,
}

impl SelectionStrategy {
    /// Policy implementing this strategy.
    pub fn policy(self) -> Box<dyn SelectionPolicy> {
        match self {
            Self::FirstUnused => Box::new(FirstUnused),
            Self::RandomUnused => Box::new(RandomUnused),
        }
    }
}
