//! Review governance core for gh-review-bot
//!
//! Decides whether a pull request's approvals still count and keeps the
//! check workflow's run history tidy.
//!
//! # Architecture
//!
//! ```text
//! CheckOrchestrator
//!   ├── StaleRunPruner        (best-effort cleanup)
//!   ├── ReviewSnapshot        (latest review per reviewer)
//!   ├── approval::evaluate    (all required reviewers approved?)
//!   ├── TrustVerifier         (new commit content-free and bot-signed?)
//!   └── ApprovalInvalidator   (dismiss approvals on trust failure)
//! ```
//!
//! Every component takes its `GitHubClient` handle at construction and
//! every remote call runs through a [`CheckContext`] so one deadline
//! bounds the whole invocation.

pub mod approval;
pub mod assign;
pub mod check;
pub mod context;
pub mod error;
pub mod invalidate;
pub mod metadata;
pub mod prune;
pub mod registry;
pub mod snapshot;
pub mod trust;

#[cfg(test)]
mod test_utils;

pub use approval::{evaluate, Approval};
pub use assign::ReviewerAssigner;
pub use check::{CheckOrchestrator, CheckOutcome, CheckState};
pub use context::CheckContext;
pub use error::{Blocker, PolicyViolation, Result, ReviewGateError};
pub use invalidate::{dismiss_message, ApprovalInvalidator};
pub use metadata::PullRequestMetadata;
pub use prune::{plan_deletions, PruneReport, RepositoryPruner, StaleRunPruner};
pub use registry::{Contributor, RequiredReviewers, ResolvedPolicy, ReviewerRegistry};
pub use snapshot::{Review, ReviewSnapshot};
pub use trust::{TrustDecision, TrustVerifier};
