//! Approval evaluator
//!
//! Decides whether every required reviewer has approved. Pure and
//! deterministic.

use crate::error::{Blocker, PolicyViolation};
use crate::registry::RequiredReviewers;
use crate::snapshot::ReviewSnapshot;

/// Outcome of evaluating a snapshot against the required reviewers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Approval {
    Approved,
    Incomplete(PolicyViolation),
}

impl Approval {
    pub fn is_approved(&self) -> bool {
        matches!(self, Approval::Approved)
    }
}

/// Evaluate a snapshot against the required reviewers
///
/// An empty snapshot is always incomplete. Otherwise blockers are collected
/// in required-reviewer order, so the first one named is the first required
/// reviewer that has not approved.
pub fn evaluate(snapshot: &ReviewSnapshot, required: &RequiredReviewers) -> Approval {
    if snapshot.is_empty() {
        return Approval::Incomplete(PolicyViolation::NoReviews);
    }

    let blocking: Vec<Blocker> = required
        .iter()
        .filter_map(|reviewer| match snapshot.get(reviewer) {
            Some(review) if review.is_approval() => None,
            Some(review) => Some(Blocker {
                reviewer: reviewer.to_string(),
                state: Some(review.state),
            }),
            None => Some(Blocker {
                reviewer: reviewer.to_string(),
                state: None,
            }),
        })
        .collect();

    if blocking.is_empty() {
        Approval::Approved
    } else {
        Approval::Incomplete(PolicyViolation::MissingApprovals { blocking })
    }
}
