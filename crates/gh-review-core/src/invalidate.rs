//! Approval invalidator
//!
//! Dismisses every approving review once trust verification failed. Each
//! dismissal is attempted even if earlier ones failed; the failures are
//! reported together at the end.

use crate::context::CheckContext;
use crate::error::{Result, ReviewGateError};
use crate::metadata::PullRequestMetadata;
use crate::registry::RequiredReviewers;
use crate::snapshot::ReviewSnapshot;
use gh_client::GitHubClient;
use log::{info, warn};
use std::sync::Arc;

/// Message posted with each dismissal
pub fn dismiss_message(required: &RequiredReviewers) -> String {
    format!("New commit pushed, please re-review {}", required.mentions())
}

/// Dismisses stale approvals after a failed trust check
pub struct ApprovalInvalidator {
    client: Arc<dyn GitHubClient>,
}

impl ApprovalInvalidator {
    pub fn new(client: Arc<dyn GitHubClient>) -> Self {
        Self { client }
    }

    /// Dismiss every approval in the snapshot
    ///
    /// Returns the number of dismissed reviews. Cancellation aborts the
    /// remaining dismissals immediately.
    pub async fn invalidate(
        &self,
        ctx: &CheckContext,
        pr: &PullRequestMetadata,
        snapshot: &ReviewSnapshot,
        message: &str,
    ) -> Result<usize> {
        let target = pr.target();
        let approvals: Vec<_> = snapshot.approvals().collect();
        let mut failures = Vec::new();

        for review in &approvals {
            let dismissal = ctx
                .remote(
                    "DismissReview",
                    &target,
                    self.client.dismiss_review(
                        pr.repo_owner(),
                        pr.repo_name(),
                        pr.number(),
                        review.review_id,
                        message,
                    ),
                )
                .await;

            match dismissal {
                Ok(()) => info!(
                    "{}: dismissed review {} by {}",
                    target, review.review_id, review.reviewer
                ),
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    let cause = e.source_chain();
                    warn!(
                        "{}: failed to dismiss review {} by {}: {}",
                        target, review.review_id, review.reviewer, cause
                    );
                    failures.push(format!(
                        "review {} by {}: {}",
                        review.review_id, review.reviewer, cause
                    ));
                }
            }
        }

        if failures.is_empty() {
            Ok(approvals.len())
        } else {
            Err(ReviewGateError::PartialCleanup {
                target,
                action: "review dismissals",
                attempted: approvals.len(),
                failures,
            })
        }
    }
}
