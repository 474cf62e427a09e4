//! Review snapshot builder
//!
//! Reviewers may review a pull request many times. The snapshot keeps one
//! effective review per reviewer: the one with the latest submission time.
//!
//! # Tie-break
//!
//! - A timestamped review always supersedes one without a timestamp.
//! - Equal timestamps, or two reviews without timestamps, resolve to the one
//!   seen last in input order.
//!
//! Records without a reviewer or with an unknown state are dropped with a
//! warning; one malformed record never blocks the rest.

use chrono::{DateTime, Utc};
use gh_client::{ReviewRecord, ReviewState};
use log::warn;
use std::collections::BTreeMap;

/// One reviewer's stated position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub reviewer: String,
    pub state: ReviewState,
    /// Head commit the review was made against
    pub commit_id: Option<String>,
    /// Review ID, used for dismissal
    pub review_id: u64,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Review {
    pub fn is_approval(&self) -> bool {
        self.state == ReviewState::Approved
    }

    /// Whether this review should replace `current` in a snapshot
    fn supersedes(&self, current: &Review) -> bool {
        match (self.submitted_at, current.submitted_at) {
            (Some(candidate), Some(existing)) => candidate >= existing,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => true,
        }
    }
}

impl TryFrom<ReviewRecord> for Review {
    type Error = String;

    fn try_from(record: ReviewRecord) -> Result<Self, Self::Error> {
        let reviewer = record
            .reviewer
            .filter(|r| !r.is_empty())
            .ok_or_else(|| "missing reviewer".to_string())?;
        let state = record
            .state
            .ok_or_else(|| "missing state".to_string())?
            .parse::<ReviewState>()?;

        Ok(Review {
            reviewer,
            state,
            commit_id: record.commit_id,
            review_id: record.id,
            submitted_at: record.submitted_at,
        })
    }
}

/// Latest review per reviewer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSnapshot {
    reviews: BTreeMap<String, Review>,
}

impl ReviewSnapshot {
    /// Build a snapshot from raw API records
    pub fn build(records: impl IntoIterator<Item = ReviewRecord>) -> Self {
        Self::from_reviews(records.into_iter().filter_map(|record| {
            let review_id = record.id;
            match Review::try_from(record) {
                Ok(review) => Some(review),
                Err(reason) => {
                    warn!("Discarding review {}: {}", review_id, reason);
                    None
                }
            }
        }))
    }

    /// Build a snapshot from already parsed reviews
    pub fn from_reviews(reviews: impl IntoIterator<Item = Review>) -> Self {
        let mut latest: BTreeMap<String, Review> = BTreeMap::new();

        for review in reviews {
            match latest.get(&review.reviewer) {
                Some(current) if !review.supersedes(current) => {}
                _ => {
                    latest.insert(review.reviewer.clone(), review);
                }
            }
        }

        Self { reviews: latest }
    }

    pub fn get(&self, reviewer: &str) -> Option<&Review> {
        self.reviews.get(reviewer)
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    /// Reviews ordered by reviewer identity
    pub fn reviews(&self) -> impl Iterator<Item = &Review> {
        self.reviews.values()
    }

    /// Effective reviews that are approvals
    pub fn approvals(&self) -> impl Iterator<Item = &Review> {
        self.reviews().filter(|r| r.is_approval())
    }

    /// Whether the head has moved past any approval
    ///
    /// An approval without a recorded commit counts as stale.
    pub fn has_commit_after_approval(&self, head_sha: &str) -> bool {
        self.approvals()
            .any(|review| review.commit_id.as_deref() != Some(head_sha))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2021, 10, 12, 10, minute, 0).unwrap())
    }

    fn record(id: u64, reviewer: &str, state: &str, submitted_at: Option<DateTime<Utc>>) -> ReviewRecord {
        ReviewRecord {
            id,
            reviewer: Some(reviewer.to_string()),
            state: Some(state.to_string()),
            commit_id: Some("c1".to_string()),
            submitted_at,
        }
    }

    #[test]
    fn test_latest_review_wins_regardless_of_order() {
        let snapshot = ReviewSnapshot::build(vec![
            record(3, "alice", "APPROVED", at(30)),
            record(1, "alice", "CHANGES_REQUESTED", at(10)),
            record(2, "bob", "COMMENTED", at(20)),
        ]);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("alice").unwrap().review_id, 3);
        assert_eq!(snapshot.get("alice").unwrap().state, ReviewState::Approved);
        assert_eq!(snapshot.get("bob").unwrap().state, ReviewState::Commented);
    }

    #[test]
    fn test_timestamped_review_supersedes_pending() {
        let snapshot = ReviewSnapshot::build(vec![
            record(1, "alice", "APPROVED", at(10)),
            record(2, "alice", "PENDING", None),
        ]);
        assert_eq!(snapshot.get("alice").unwrap().review_id, 1);

        let reversed = ReviewSnapshot::build(vec![
            record(2, "alice", "PENDING", None),
            record(1, "alice", "APPROVED", at(10)),
        ]);
        assert_eq!(reversed.get("alice").unwrap().review_id, 1);
    }

    #[test]
    fn test_ties_resolve_last_seen() {
        let snapshot = ReviewSnapshot::build(vec![
            record(1, "alice", "APPROVED", at(10)),
            record(2, "alice", "COMMENTED", at(10)),
        ]);
        assert_eq!(snapshot.get("alice").unwrap().review_id, 2);

        let untimed = ReviewSnapshot::build(vec![
            record(1, "bob", "PENDING", None),
            record(2, "bob", "PENDING", None),
        ]);
        assert_eq!(untimed.get("bob").unwrap().review_id, 2);
    }

    #[test]
    fn test_malformed_records_are_discarded() {
        let mut no_user = record(1, "x", "APPROVED", at(1));
        no_user.reviewer = None;
        let mut no_state = record(2, "carol", "APPROVED", at(2));
        no_state.state = None;
        let unknown_state = record(3, "dave", "LGTM", at(3));

        let snapshot = ReviewSnapshot::build(vec![
            no_user,
            no_state,
            unknown_state,
            record(4, "alice", "APPROVED", at(4)),
        ]);

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.get("alice").is_some());
    }

    #[test]
    fn test_rebuilding_snapshot_is_idempotent() {
        let snapshot = ReviewSnapshot::build(vec![
            record(1, "alice", "CHANGES_REQUESTED", at(10)),
            record(2, "alice", "APPROVED", at(20)),
            record(3, "bob", "PENDING", None),
            record(4, "bob", "COMMENTED", at(5)),
        ]);

        let rebuilt = ReviewSnapshot::from_reviews(snapshot.reviews().cloned());
        assert_eq!(rebuilt, snapshot);
    }

    #[test]
    fn test_one_entry_per_reviewer_with_max_timestamp() {
        let records: Vec<ReviewRecord> = (0..30u64)
            .map(|i| {
                let reviewer = ["alice", "bob", "carol"][(i % 3) as usize];
                // Non-monotonic timestamps
                let minute = ((i * 7) % 30) as u32;
                record(i, reviewer, "COMMENTED", at(minute))
            })
            .collect();

        let snapshot = ReviewSnapshot::build(records.clone());
        assert_eq!(snapshot.len(), 3);

        for reviewer in ["alice", "bob", "carol"] {
            let max = records
                .iter()
                .filter(|r| r.reviewer.as_deref() == Some(reviewer))
                .map(|r| r.submitted_at)
                .max()
                .unwrap();
            assert_eq!(snapshot.get(reviewer).unwrap().submitted_at, max);
        }
    }

    #[test]
    fn test_has_commit_after_approval() {
        let mut approval = record(1, "alice", "APPROVED", at(1));
        approval.commit_id = Some("c1".to_string());
        let mut comment = record(2, "bob", "COMMENTED", at(2));
        comment.commit_id = Some("c0".to_string());

        let snapshot = ReviewSnapshot::build(vec![approval, comment]);
        assert!(!snapshot.has_commit_after_approval("c1"));
        assert!(snapshot.has_commit_after_approval("c2"));
    }
}
