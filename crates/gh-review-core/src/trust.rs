//! Commit trust verifier
//!
//! A commit pushed after approval is trusted only when it changes no files
//! and carries a valid signature from the platform's own committer, as
//! produced by the "Update branch" button. Anything else may be an attacker
//! sneaking content past the reviewers.

use crate::context::CheckContext;
use crate::error::{PolicyViolation, Result};
use crate::metadata::PullRequestMetadata;
use gh_client::GitHubClient;
use log::{debug, info};
use std::sync::Arc;

/// Outcome of verifying the head commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustDecision {
    Trusted,
    Untrusted(PolicyViolation),
}

/// Verifies that the head commit is a trusted, content-free commit
pub struct TrustVerifier {
    client: Arc<dyn GitHubClient>,
    bot_committer: String,
}

impl TrustVerifier {
    /// # Arguments
    ///
    /// * `client` - Platform client
    /// * `bot_committer` - Marker the signed payload must contain
    pub fn new(client: Arc<dyn GitHubClient>, bot_committer: impl Into<String>) -> Self {
        Self {
            client,
            bot_committer: bot_committer.into(),
        }
    }

    /// Verify the pull request's head commit
    ///
    /// The comparison runs first; a non-empty file list is untrusted whatever
    /// the signature says and the commit is not fetched. Remote failures are
    /// returned as errors, not as an untrusted decision.
    pub async fn verify(
        &self,
        ctx: &CheckContext,
        pr: &PullRequestMetadata,
    ) -> Result<TrustDecision> {
        let target = pr.target();

        debug!("Comparing {}...{} for {}", pr.base_sha(), pr.head_sha(), target);
        let comparison = ctx
            .remote(
                "CompareCommits",
                &target,
                self.client.compare_commits(
                    pr.repo_owner(),
                    pr.repo_name(),
                    pr.base_sha(),
                    pr.head_sha(),
                ),
            )
            .await?;

        if !comparison.changed_files.is_empty() {
            info!(
                "{}: {} file(s) changed between {} and {}",
                target,
                comparison.changed_files.len(),
                pr.base_sha(),
                pr.head_sha()
            );
            return Ok(TrustDecision::Untrusted(PolicyViolation::FilesChanged {
                base_sha: pr.base_sha().to_string(),
                head_sha: pr.head_sha().to_string(),
                files: comparison.changed_files,
            }));
        }

        let verification = ctx
            .remote(
                "GetCommit",
                &target,
                self.client
                    .fetch_commit_verification(pr.repo_owner(), pr.repo_name(), pr.head_sha()),
            )
            .await?;

        let signed_by_bot = verification
            .payload
            .as_deref()
            .is_some_and(|payload| payload.contains(&self.bot_committer));

        if verification.verified && signed_by_bot {
            return Ok(TrustDecision::Trusted);
        }

        let detail = if !verification.verified {
            format!(
                "verification: {}",
                verification.reason.as_deref().unwrap_or("not verified")
            )
        } else {
            "payload lacks platform committer".to_string()
        };
        Ok(TrustDecision::Untrusted(PolicyViolation::UntrustedCommit {
            head_sha: pr.head_sha().to_string(),
            detail,
        }))
    }
}
