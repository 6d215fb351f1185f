//! Log of previously generated posts.

use chrono::{SecondsFormat, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Publishing outcome of a recorded post.
///
/// Records written before statuses existed carry no `status` field and read
/// back as [`PostStatus::Published`].
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
pub enum PostStatus {
    /// Generated and recorded, publish not yet attempted
    Pending,
    /// Accepted by the platform
    #[default]
    Published,
    /// Publishing disabled for this run
    Skipped,
    /// Publishing failed in a way a later attempt may fix
    Failed,
    /// Platform refused the post for good; never retried
    Rejected,
}

impl PostStatus {
    /// Whether a later run should try to publish this record again.
    pub fn is_resumable(self) -> bool {
        matches!(self, Self::Pending | Self::Failed)
    }
}

/// One generated post.
///
/// # Examples
///
/// ```
/// use statpost_core::{PostRecord, PostStatus};
///
/// let record: PostRecord =
///     serde_json::from_str(r#"{"timestamp": "2024-09-01T10:00:00", "post": "Hello"}"#).unwrap();
/// assert_eq!(record.post(), "Hello");
/// assert_eq!(*record.status(), PostStatus::Published);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PostRecord {
    /// ISO-8601 creation time
    timestamp: String,
    /// Post text
    post: String,
    /// Publishing outcome
    #[serde(default)]
    status: PostStatus,
    /// Platform id, once published
    #[serde(default, skip_serializing_if = "Option::is_none")]
    post_id: Option<String>,
    /// Statistic the post was written from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    statistic: Option<String>,
    /// Publish attempts made so far
    #[serde(default, skip_serializing_if = "is_zero")]
    attempts: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl PostRecord {
    /// Record stamped with an explicit time.
    pub fn new(timestamp: impl Into<String>, post: impl Into<String>, status: PostStatus) -> Self {
        Self {
            timestamp: timestamp.into(),
            post: post.into(),
            status,
            post_id: None,
            statistic: None,
            attempts: 0,
        }
    }

    /// Remember the statistic the post was written from.
    pub fn with_statistic(mut self, statistic: impl Into<String>) -> Self {
        self.statistic = Some(statistic.into());
        self
    }

    /// Record stamped with the current UTC time.
    pub fn now(post: impl Into<String>, status: PostStatus) -> Self {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        Self::new(timestamp, post, status)
    }

    /// Mark the record as accepted by the platform.
    pub fn mark_published(&mut self, post_id: impl Into<String>) {
        self.status = PostStatus::Published;
        self.post_id = Some(post_id.into());
    }

    /// Count one publish attempt.
    pub fn record_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    /// Mark the last attempt as failed but worth retrying.
    pub fn mark_failed(&mut self) {
        self.status = PostStatus::Failed;
    }

    /// Mark the record as refused for good.
    pub fn mark_rejected(&mut self) {
        self.status = PostStatus::Rejected;
    }

    /// Whether a later run should publish this record again, given the
    /// per-post attempt budget.
    pub fn should_resume(&self, max_attempts: u32) -> bool {
        self.status.is_resumable() && self.attempts < max_attempts
    }
}

/// Chronological list of generated posts.
///
/// Serialized as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostHistory(Vec<PostRecord>);

impl PostHistory {
    /// Empty history.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Read history from a stored document.
    ///
    /// Anything that is not an array of records (the `{}` of a missing
    /// object included) is treated as empty history.
    pub fn from_value(value: serde_json::Value) -> Self {
        if !value.is_array() {
            debug!("Stored history is not an array, starting empty");
            return Self::new();
        }
        match serde_json::from_value(value) {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "Stored history is malformed, starting empty");
                Self::new()
            }
        }
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[PostRecord] {
        &self.0
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no post was ever recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The newest `count` records, oldest of them first.
    pub fn recent(&self, count: usize) -> &[PostRecord] {
        let start = self.0.len().saturating_sub(count);
        &self.0[start..]
    }

    /// Text of the newest `count` posts, oldest first.
    pub fn recent_posts(&self, count: usize) -> Vec<&str> {
        self.recent(count)
            .iter()
            .map(|record| record.post.as_str())
            .collect()
    }

    /// Append a record.
    pub fn push(&mut self, record: PostRecord) {
        self.0.push(record);
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&PostRecord> {
        self.0.last()
    }

    /// Mutable access to the most recent record.
    pub fn last_mut(&mut self) -> Option<&mut PostRecord> {
        self.0.last_mut()
    }

    /// Drop the oldest records so at most `max_entries` remain.
    ///
    /// `0` keeps everything. Returns how many records were removed.
    pub fn truncate_oldest(&mut self, max_entries: usize) -> usize {
        if max_entries == 0 || self.0.len() <= max_entries {
            return 0;
        }
        let excess = self.0.len() - max_entries;
        self.0.drain(..excess);
        debug!(removed = excess, "Trimmed post history");
        excess
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn history(posts: &[&str]) -> PostHistory {
        let mut h = PostHistory::new();
        for (i, post) in posts.iter().enumerate() {
            h.push(PostRecord::new(
                format!("2024-01-0{}T00:00:00", i + 1),
                *post,
                PostStatus::Published,
            ));
        }
        h
    }

    #[test]
    fn empty_object_reads_as_empty_history() {
        assert!(PostHistory::from_value(json!({})).is_empty());
    }

    #[test]
    fn legacy_records_read_back() {
        let h = PostHistory::from_value(json!([
            {"timestamp": "2024-09-01T10:00:00.123456", "post": "first"},
            {"timestamp": "2024-09-02T10:00:00.123456", "post": "second"}
        ]));
        assert_eq!(h.recent_posts(5), vec!["first", "second"]);
        assert!(h.records().iter().all(|r| *r.status() == PostStatus::Published));
    }

    #[test]
    fn recent_keeps_chronological_order() {
        let h = history(&["1", "2", "3", "4", "5", "6", "7"]);
        assert_eq!(h.recent_posts(5), vec!["3", "4", "5", "6", "7"]);
        assert_eq!(history(&["1", "2"]).recent_posts(5), vec!["1", "2"]);
    }

    #[test]
    fn truncate_drops_oldest() {
        let mut h = history(&["1", "2", "3", "4"]);
        assert_eq!(h.truncate_oldest(2), 2);
        assert_eq!(h.recent_posts(10), vec!["3", "4"]);
        assert_eq!(h.truncate_oldest(0), 0);
    }

    #[test]
    fn pending_record_serializes_status() {
        let record = PostRecord::new("t", "p", PostStatus::Pending);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"timestamp": "t", "post": "p", "status": "pending"})
        );
    }

    #[test]
    fn statistic_and_attempts_round_trip() {
        let mut record = PostRecord::new("t", "p", PostStatus::Pending).with_statistic("A");
        record.record_attempt();
        record.mark_failed();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"timestamp": "t", "post": "p", "status": "failed", "statistic": "A", "attempts": 1})
        );
        let back: PostRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back.statistic().as_deref(), Some("A"));
        assert_eq!(*back.attempts(), 1);
    }

    #[test]
    fn resume_respects_status_and_attempt_budget() {
        let mut record = PostRecord::new("t", "p", PostStatus::Pending);
        assert!(record.should_resume(3));
        for _ in 0..3 {
            record.record_attempt();
        }
        record.mark_failed();
        assert!(!record.should_resume(3));
        assert!(record.should_resume(4));

        let mut refused = PostRecord::new("t", "p", PostStatus::Pending);
        refused.record_attempt();
        refused.mark_rejected();
        assert!(!refused.should_resume(3));
    }

    #[test]
    fn publishing_updates_status_and_id() {
        let mut record = PostRecord::new("t", "p", PostStatus::Failed);
        assert!(record.status().is_resumable());
        record.mark_published("123");
        assert_eq!(*record.status(), PostStatus::Published);
        assert_eq!(record.post_id().as_deref(), Some("123"));
    }
}
