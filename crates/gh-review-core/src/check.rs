//! Check orchestrator
//!
//! Runs one check cycle for a pull request:
//!
//! ```text
//! START -> PRUNED -> REVIEWS_FETCHED -> APPROVED_TERMINAL
//!                                    -> INCOMPLETE_TERMINAL
//!                                    -> (approved, new commit, external)
//!                                         -> TRUST_OK_TERMINAL
//!                                         -> TRUST_FAILED_TERMINAL
//! ```
//!
//! Pruning never decides the outcome; its errors are logged, except
//! cancellation which aborts the cycle like everywhere else.

use crate::approval::{evaluate, Approval};
use crate::context::CheckContext;
use crate::error::{Result, ReviewGateError};
use crate::invalidate::{dismiss_message, ApprovalInvalidator};
use crate::metadata::PullRequestMetadata;
use crate::prune::{PruneReport, StaleRunPruner};
use crate::registry::{Contributor, ReviewerRegistry};
use crate::snapshot::ReviewSnapshot;
use crate::trust::{TrustDecision, TrustVerifier};
use gh_client::GitHubClient;
use log::{info, warn};
use std::fmt;
use std::sync::Arc;

/// States of one check cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Start,
    Pruned,
    ReviewsFetched,
    ApprovedTerminal,
    IncompleteTerminal,
    TrustOkTerminal,
    TrustFailedTerminal,
}

impl CheckState {
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            CheckState::Start | CheckState::Pruned | CheckState::ReviewsFetched
        )
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckState::Start => "START",
            CheckState::Pruned => "PRUNED",
            CheckState::ReviewsFetched => "REVIEWS_FETCHED",
            CheckState::ApprovedTerminal => "APPROVED_TERMINAL",
            CheckState::IncompleteTerminal => "INCOMPLETE_TERMINAL",
            CheckState::TrustOkTerminal => "TRUST_OK_TERMINAL",
            CheckState::TrustFailedTerminal => "TRUST_FAILED_TERMINAL",
        };
        f.write_str(name)
    }
}

/// A passing check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// `ApprovedTerminal` or `TrustOkTerminal`
    pub state: CheckState,
    /// `None` when pruning failed
    pub pruned: Option<PruneReport>,
}

/// Drives one pull request through the check state machine
pub struct CheckOrchestrator {
    client: Arc<dyn GitHubClient>,
    registry: ReviewerRegistry,
    pruner: StaleRunPruner,
    verifier: TrustVerifier,
    invalidator: ApprovalInvalidator,
}

impl CheckOrchestrator {
    /// # Arguments
    ///
    /// * `client` - Platform client shared by every step
    /// * `registry` - Reviewer assignments
    /// * `check_workflow` - Name of the workflow whose stale runs are pruned
    /// * `bot_committer` - Marker a trusted commit's payload must contain
    pub fn new(
        client: Arc<dyn GitHubClient>,
        registry: ReviewerRegistry,
        check_workflow: impl Into<String>,
        bot_committer: impl Into<String>,
    ) -> Self {
        Self {
            pruner: StaleRunPruner::new(Arc::clone(&client), check_workflow),
            verifier: TrustVerifier::new(Arc::clone(&client), bot_committer),
            invalidator: ApprovalInvalidator::new(Arc::clone(&client)),
            registry,
            client,
        }
    }

    /// Run one check cycle
    ///
    /// `Ok` means the pull request passes. A failing check is an
    /// `Err(ReviewGateError::Policy)`; when stale approvals also could not
    /// be dismissed it is `Err(ReviewGateError::InvalidationFailed)`.
    pub async fn run(&self, ctx: &CheckContext, pr: &PullRequestMetadata) -> Result<CheckOutcome> {
        let target = pr.target();
        let mut state = CheckState::Start;
        let policy = self.registry.resolve(pr.author())?;
        info!(
            "{}: checking {} author {} against {}",
            target,
            policy.contributor,
            pr.author(),
            policy.required.mentions()
        );

        let pruned = match self
            .pruner
            .prune(ctx, pr.repo_owner(), pr.repo_name(), pr.branch_name())
            .await
        {
            Ok(report) => Some(report),
            Err(e) if e.is_cancelled() => return Err(e),
            Err(e) => {
                warn!("{}: pruning stale runs failed: {}", target, e.source_chain());
                None
            }
        };
        transition(&target, &mut state, CheckState::Pruned);

        let records = ctx
            .remote(
                "ListReviews",
                &target,
                self.client
                    .list_reviews(pr.repo_owner(), pr.repo_name(), pr.number()),
            )
            .await?;
        let snapshot = ReviewSnapshot::build(records);
        transition(&target, &mut state, CheckState::ReviewsFetched);

        if let Approval::Incomplete(violation) = evaluate(&snapshot, &policy.required) {
            transition(&target, &mut state, CheckState::IncompleteTerminal);
            return Err(ReviewGateError::Policy { target, violation });
        }

        if !snapshot.has_commit_after_approval(pr.head_sha()) {
            transition(&target, &mut state, CheckState::ApprovedTerminal);
            return Ok(CheckOutcome { state, pruned });
        }

        if policy.contributor == Contributor::Internal {
            info!(
                "{}: new commit {} by internal author, approvals stand",
                target,
                pr.head_sha()
            );
            transition(&target, &mut state, CheckState::ApprovedTerminal);
            return Ok(CheckOutcome { state, pruned });
        }

        match self.verifier.verify(ctx, pr).await? {
            TrustDecision::Trusted => {
                transition(&target, &mut state, CheckState::TrustOkTerminal);
                Ok(CheckOutcome { state, pruned })
            }
            TrustDecision::Untrusted(violation) => {
                transition(&target, &mut state, CheckState::TrustFailedTerminal);
                let cause = ReviewGateError::Policy {
                    target: target.clone(),
                    violation,
                };

                let message = dismiss_message(&policy.required);
                match self.invalidator.invalidate(ctx, pr, &snapshot, &message).await {
                    Ok(dismissed) => {
                        info!("{}: dismissed {} stale approval(s)", target, dismissed);
                        Err(cause)
                    }
                    Err(invalidation) => Err(ReviewGateError::InvalidationFailed {
                        cause: Box::new(cause),
                        invalidation: Box::new(invalidation),
                    }),
                }
            }
        }
    }
}

fn transition(target: &str, state: &mut CheckState, next: CheckState) {
    info!("{}: {} -> {}", target, state, next);
    *state = next;
}
