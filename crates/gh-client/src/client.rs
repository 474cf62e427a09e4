//! GitHub client trait
//!
//! This module defines the core `GitHubClient` trait that all client
//! implementations must satisfy. The review bot only ever talks to the
//! platform through this trait, so tests can substitute a scripted client.

use crate::types::{
    CommitComparison, CommitVerification, PullRequest, ReviewRecord, Workflow, WorkflowRun,
};
use async_trait::async_trait;

/// GitHub API client trait
///
/// Defines the interface for interacting with the GitHub API.
/// Every call is a single remote round trip (or a paginated sequence of
/// them); implementations must not cache responses.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single handle can be shared
/// by every component of the bot.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{GitHubClient, ReviewRecord};
///
/// async fn reviews(client: &dyn GitHubClient) -> anyhow::Result<Vec<ReviewRecord>> {
///     client.list_reviews("gravitational", "teleport", 42).await
/// }
/// ```
#[async_trait]
pub trait GitHubClient: Send + Sync {
    // === Reviews ===

    /// List every review submitted on a pull request
    ///
    /// Records are returned as reported by the platform, including repeated
    /// reviews by the same reviewer and pending reviews without a
    /// submission time.
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner (user or organization)
    /// * `repo` - Repository name
    /// * `pr_number` - Pull request number
    async fn list_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<ReviewRecord>>;

    /// Dismiss a single review
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `pr_number` - Pull request number
    /// * `review_id` - ID of the review to dismiss
    /// * `message` - Dismissal message shown on the pull request
    async fn dismiss_review(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        review_id: u64,
        message: &str,
    ) -> anyhow::Result<()>;

    /// Request reviews from the given users
    async fn request_reviewers(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        reviewers: &[String],
    ) -> anyhow::Result<()>;

    /// List open pull requests for a repository
    async fn list_pull_requests(&self, owner: &str, repo: &str)
        -> anyhow::Result<Vec<PullRequest>>;

    // === Commits ===

    /// Compare two commits
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `base_sha` - Base of the comparison
    /// * `head_sha` - Head of the comparison
    ///
    /// # Returns
    ///
    /// The names of the files changed between the two commits.
    async fn compare_commits(
        &self,
        owner: &str,
        repo: &str,
        base_sha: &str,
        head_sha: &str,
    ) -> anyhow::Result<CommitComparison>;

    /// Fetch the signature verification record of a commit
    async fn fetch_commit_verification(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> anyhow::Result<CommitVerification>;

    // === Actions ===

    /// List the workflows defined in a repository
    async fn list_workflows(&self, owner: &str, repo: &str) -> anyhow::Result<Vec<Workflow>>;

    /// List runs of a workflow, filtered to a branch
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `workflow_id` - Workflow ID as returned by `list_workflows`
    /// * `branch` - Only runs triggered for this branch are returned
    async fn list_workflow_runs(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: u64,
        branch: &str,
    ) -> anyhow::Result<Vec<WorkflowRun>>;

    /// Delete a workflow run
    ///
    /// Issued as a plain authenticated DELETE since octocrab has no typed
    /// endpoint for it.
    async fn delete_workflow_run(&self, owner: &str, repo: &str, run_id: u64)
        -> anyhow::Result<()>;
}
