//! Error types for review governance
//!
//! Errors fall into a small number of kinds that callers act on differently:
//!
//! - **Configuration** - missing or invalid input, fatal and never retried
//! - **RemoteApi** - the platform call failed, surfaced as-is
//! - **Policy** - the pull request does not satisfy the review policy. This
//!   is the expected failure of a check, not a bug.
//! - **PartialCleanup** - some items of a best-effort batch failed
//! - **Cancelled** - the invocation deadline passed or the caller gave up
//!
//! Every variant carries the `owner/repo#number` (or `owner/repo`) target so
//! an error can be acted on without re-querying the platform.

use gh_client::ReviewState;
use gh_review_config::ConfigError;
use std::fmt;
use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, ReviewGateError>;

/// Errors produced by the review governance core
#[derive(Debug, Error)]
pub enum ReviewGateError {
    /// Missing or invalid required input
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// A remote platform call failed
    #[error("{operation} failed for {target}")]
    RemoteApi {
        operation: &'static str,
        target: String,
        #[source]
        source: anyhow::Error,
    },

    /// The pull request violates the review policy
    #[error("{target}: {violation}")]
    Policy {
        target: String,
        violation: PolicyViolation,
    },

    /// Some items of a best-effort batch failed
    #[error(
        "{target}: {} of {attempted} {action} failed: {}",
        .failures.len(),
        .failures.join("; ")
    )]
    PartialCleanup {
        target: String,
        action: &'static str,
        attempted: usize,
        failures: Vec<String>,
    },

    /// The invocation was cancelled before the operation completed
    #[error("{target}: cancelled during {operation}")]
    Cancelled {
        target: String,
        operation: &'static str,
    },

    /// Trust verification failed and the stale approvals could not all be
    /// dismissed
    #[error("{cause}; dismissing stale approvals also failed: {invalidation}")]
    InvalidationFailed {
        cause: Box<ReviewGateError>,
        invalidation: Box<ReviewGateError>,
    },
}

impl ReviewGateError {
    /// Whether this error is (or wraps) a cancellation
    pub fn is_cancelled(&self) -> bool {
        match self {
            ReviewGateError::Cancelled { .. } => true,
            ReviewGateError::InvalidationFailed {
                cause,
                invalidation,
            } => cause.is_cancelled() || invalidation.is_cancelled(),
            _ => false,
        }
    }

    /// This error and its causes, joined with `: `
    pub fn source_chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }

    /// The policy violation behind this error, if any
    pub fn violation(&self) -> Option<&PolicyViolation> {
        match self {
            ReviewGateError::Policy { violation, .. } => Some(violation),
            ReviewGateError::InvalidationFailed { cause, .. } => cause.violation(),
            _ => None,
        }
    }
}

/// A required reviewer who has not approved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocker {
    /// Reviewer identity
    pub reviewer: String,
    /// State of the reviewer's latest review, `None` if they never reviewed
    pub state: Option<ReviewState>,
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            Some(state) => write!(f, "{} ({})", self.reviewer, state),
            None => write!(f, "{} (no review)", self.reviewer),
        }
    }
}

/// Ways a pull request can fail the review policy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("no reviews submitted")]
    NoReviews,

    /// Blockers are listed in required-reviewer order
    #[error(
        "all required reviewers have not yet approved, waiting on {}",
        describe_blockers(.blocking)
    )]
    MissingApprovals { blocking: Vec<Blocker> },

    #[error(
        "detected file change: commit {head_sha} changes {} file(s) since {base_sha}",
        .files.len()
    )]
    FilesChanged {
        base_sha: String,
        head_sha: String,
        files: Vec<String>,
    },

    #[error("commit {head_sha} is not verified and/or is not signed by GitHub ({detail})")]
    UntrustedCommit { head_sha: String, detail: String },
}

impl PolicyViolation {
    /// The first reviewer blocking approval, if this is an approval failure
    pub fn first_blocker(&self) -> Option<&Blocker> {
        match self {
            PolicyViolation::MissingApprovals { blocking } => blocking.first(),
            _ => None,
        }
    }

    /// Whether this violation came from commit trust verification
    pub fn is_trust_failure(&self) -> bool {
        matches!(
            self,
            PolicyViolation::FilesChanged { .. } | PolicyViolation::UntrustedCommit { .. }
        )
    }
}

fn describe_blockers(blocking: &[Blocker]) -> String {
    blocking
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
