//! Reviewer assignment
//!
//! Requests reviews from the reviewers resolved for the pull request's
//! author when the pull request is opened. Pull requests from forks cannot
//! request reviewers with their own token, so `assign_all` sweeps every open
//! pull request of the repository from a scheduled run instead.

use crate::context::CheckContext;
use crate::error::{Result, ReviewGateError};
use crate::metadata::PullRequestMetadata;
use crate::registry::{RequiredReviewers, ReviewerRegistry};
use gh_client::GitHubClient;
use log::{info, warn};
use std::sync::Arc;

/// Requests reviews from the author's required reviewers
pub struct ReviewerAssigner {
    client: Arc<dyn GitHubClient>,
    registry: ReviewerRegistry,
}

impl ReviewerAssigner {
    pub fn new(client: Arc<dyn GitHubClient>, registry: ReviewerRegistry) -> Self {
        Self { client, registry }
    }

    /// Request reviews from the author's required reviewers
    ///
    /// Returns the reviewers that were requested.
    pub async fn assign(
        &self,
        ctx: &CheckContext,
        pr: &PullRequestMetadata,
    ) -> Result<RequiredReviewers> {
        let target = pr.target();
        let policy = self.registry.resolve(pr.author())?;

        ctx.remote(
            "RequestReviewers",
            &target,
            self.client.request_reviewers(
                pr.repo_owner(),
                pr.repo_name(),
                pr.number(),
                policy.required.as_slice(),
            ),
        )
        .await?;

        info!(
            "{}: requested reviews from {} for {} author {}",
            target,
            policy.required.mentions(),
            policy.contributor,
            pr.author()
        );
        Ok(policy.required)
    }

    /// Assign reviewers on every open pull request of `owner/repo`
    ///
    /// Every pull request is attempted. Invalid listings and failed requests
    /// are collected into a single `PartialCleanup` error at the end.
    pub async fn assign_all(
        &self,
        ctx: &CheckContext,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<(PullRequestMetadata, RequiredReviewers)>> {
        let target = format!("{}/{}", owner, repo);
        let pulls = ctx
            .remote(
                "ListPullRequests",
                &target,
                self.client.list_pull_requests(owner, repo),
            )
            .await?;
        info!("{}: assigning reviewers on {} open pull request(s)", target, pulls.len());

        let mut assigned = Vec::new();
        let mut failures = Vec::new();
        for pull in &pulls {
            let result = match PullRequestMetadata::from_pull(pull) {
                Ok(pr) => self.assign(ctx, &pr).await.map(|required| (pr, required)),
                Err(e) => Err(e),
            };

            match result {
                Ok(entry) => assigned.push(entry),
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    warn!("{}#{}: assigning reviewers failed: {}", target, pull.number, e);
                    failures.push(format!("#{}: {}", pull.number, e.source_chain()));
                }
            }
        }

        if failures.is_empty() {
            Ok(assigned)
        } else {
            Err(ReviewGateError::PartialCleanup {
                target,
                action: "reviewer assignments",
                attempted: pulls.len(),
                failures,
            })
        }
    }
}
