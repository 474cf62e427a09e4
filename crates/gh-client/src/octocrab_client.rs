//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab library.
//! All calls go through octocrab's raw route helpers with our own wire types,
//! so only the fields the bot reads have to be present in a response.

use crate::client::GitHubClient;
use crate::types::{
    CommitComparison, CommitVerification, PullRequest, ReviewRecord, Workflow, WorkflowRun,
};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Page size used for every paginated listing
const PER_PAGE: u8 = 100;

/// Upper bound on pages fetched for a single listing
const MAX_PAGES: u32 = 20;

/// Direct GitHub API client using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Create a client authenticated with a personal access token
    pub fn from_token(token: impl Into<String>) -> anyhow::Result<Self> {
        let octocrab = Octocrab::builder()
            .personal_token(token.into())
            .build()
            .context("Failed to build Octocrab client")?;
        Ok(Self::new(Arc::new(octocrab)))
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }
}

#[derive(Debug, Serialize)]
struct PageParams<'a> {
    per_page: u8,
    page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

impl<'a> PageParams<'a> {
    fn new(page: u32) -> Self {
        Self {
            per_page: PER_PAGE,
            page,
            state: None,
            branch: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct WireReview {
    id: u64,
    user: Option<WireUser>,
    state: Option<String>,
    commit_id: Option<String>,
    submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct WireComparison {
    #[serde(default)]
    files: Vec<WireFile>,
}

#[derive(Debug, Deserialize)]
struct WireFile {
    filename: String,
}

#[derive(Debug, Deserialize)]
struct WireCommit {
    commit: WireCommitDetail,
}

#[derive(Debug, Deserialize)]
struct WireCommitDetail {
    verification: Option<WireVerification>,
}

#[derive(Debug, Deserialize)]
struct WireVerification {
    verified: bool,
    reason: Option<String>,
    payload: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireWorkflows {
    workflows: Vec<Workflow>,
}

#[derive(Debug, Deserialize)]
struct WireWorkflowRuns {
    workflow_runs: Vec<WireWorkflowRun>,
}

#[derive(Debug, Deserialize)]
struct WireWorkflowRun {
    id: u64,
    head_branch: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct WirePull {
    number: u64,
    user: Option<WireUser>,
    head: WireRef,
    base: WireRef,
}

#[derive(Debug, Deserialize)]
struct WireRef {
    #[serde(rename = "ref")]
    ref_field: String,
    sha: String,
    repo: Option<WireRepo>,
}

#[derive(Debug, Deserialize)]
struct WireRepo {
    name: String,
    owner: WireUser,
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn list_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<ReviewRecord>> {
        debug!("Fetching reviews for {}/{}#{}", owner, repo, pr_number);

        let route = format!("/repos/{}/{}/pulls/{}/reviews", owner, repo, pr_number);
        let mut reviews = Vec::new();
        let mut page_num = 1u32;

        loop {
            let page: Vec<WireReview> = self
                .octocrab
                .get(&route, Some(&PageParams::new(page_num)))
                .await?;
            let is_last = page.len() < PER_PAGE as usize;

            reviews.extend(page.into_iter().map(convert_review));

            if is_last || page_num >= MAX_PAGES {
                break;
            }
            page_num += 1;
        }

        debug!(
            "Fetched {} reviews for {}/{}#{}",
            reviews.len(),
            owner,
            repo,
            pr_number
        );
        Ok(reviews)
    }

    async fn dismiss_review(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        review_id: u64,
        message: &str,
    ) -> anyhow::Result<()> {
        debug!(
            "Dismissing review {} on {}/{}#{}",
            review_id, owner, repo, pr_number
        );

        let route = format!(
            "/repos/{}/{}/pulls/{}/reviews/{}/dismissals",
            owner, repo, pr_number, review_id
        );
        let body = serde_json::json!({ "message": message, "event": "DISMISS" });
        let _: serde_json::Value = self.octocrab.put(route, Some(&body)).await?;
        Ok(())
    }

    async fn request_reviewers(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        reviewers: &[String],
    ) -> anyhow::Result<()> {
        debug!(
            "Requesting reviewers {:?} on {}/{}#{}",
            reviewers, owner, repo, pr_number
        );

        let route = format!(
            "/repos/{}/{}/pulls/{}/requested_reviewers",
            owner, repo, pr_number
        );
        let body = serde_json::json!({ "reviewers": reviewers });
        let _: serde_json::Value = self.octocrab.post(route, Some(&body)).await?;
        Ok(())
    }

    async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Vec<PullRequest>> {
        debug!("Fetching open PRs for {}/{}", owner, repo);

        let route = format!("/repos/{}/{}/pulls", owner, repo);
        let mut prs = Vec::new();
        let mut page_num = 1u32;

        loop {
            let mut params = PageParams::new(page_num);
            params.state = Some("open");

            let page: Vec<WirePull> = self.octocrab.get(&route, Some(&params)).await?;
            let is_last = page.len() < PER_PAGE as usize;

            // Forks whose repository was deleted have no head repo; the base
            // side is always present for an open PR.
            prs.extend(page.into_iter().filter_map(convert_pull_request));

            if is_last || page_num >= MAX_PAGES {
                break;
            }
            page_num += 1;
        }

        // Sort by PR number (descending) for stable ordering
        prs.sort_by(|a, b| b.number.cmp(&a.number));

        debug!("Fetched {} PRs for {}/{}", prs.len(), owner, repo);
        Ok(prs)
    }

    async fn compare_commits(
        &self,
        owner: &str,
        repo: &str,
        base_sha: &str,
        head_sha: &str,
    ) -> anyhow::Result<CommitComparison> {
        debug!(
            "Comparing {}...{} in {}/{}",
            base_sha, head_sha, owner, repo
        );

        let route = format!(
            "/repos/{}/{}/compare/{}...{}",
            owner, repo, base_sha, head_sha
        );
        let comparison: WireComparison = self.octocrab.get(route, None::<&()>).await?;

        Ok(CommitComparison {
            changed_files: comparison.files.into_iter().map(|f| f.filename).collect(),
        })
    }

    async fn fetch_commit_verification(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> anyhow::Result<CommitVerification> {
        debug!("Fetching commit {} in {}/{}", sha, owner, repo);

        let route = format!("/repos/{}/{}/commits/{}", owner, repo, sha);
        let commit: WireCommit = self.octocrab.get(route, None::<&()>).await?;

        Ok(convert_verification(commit.commit.verification))
    }

    async fn list_workflows(&self, owner: &str, repo: &str) -> anyhow::Result<Vec<Workflow>> {
        debug!("Fetching workflows for {}/{}", owner, repo);

        let route = format!("/repos/{}/{}/actions/workflows", owner, repo);
        let mut workflows = Vec::new();
        let mut page_num = 1u32;

        loop {
            let page: WireWorkflows = self
                .octocrab
                .get(&route, Some(&PageParams::new(page_num)))
                .await?;
            let is_last = page.workflows.len() < PER_PAGE as usize;

            workflows.extend(page.workflows);

            if is_last || page_num >= MAX_PAGES {
                break;
            }
            page_num += 1;
        }

        Ok(workflows)
    }

    async fn list_workflow_runs(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: u64,
        branch: &str,
    ) -> anyhow::Result<Vec<WorkflowRun>> {
        debug!(
            "Fetching runs of workflow {} on branch {} in {}/{}",
            workflow_id, branch, owner, repo
        );

        let route = format!(
            "/repos/{}/{}/actions/workflows/{}/runs",
            owner, repo, workflow_id
        );
        let mut runs = Vec::new();
        let mut page_num = 1u32;

        loop {
            let mut params = PageParams::new(page_num);
            params.branch = Some(branch);

            let page: WireWorkflowRuns = self.octocrab.get(&route, Some(&params)).await?;
            let is_last = page.workflow_runs.len() < PER_PAGE as usize;

            runs.extend(page.workflow_runs.into_iter().map(|run| WorkflowRun {
                id: run.id,
                head_branch: run.head_branch,
                created_at: run.created_at,
            }));

            if is_last || page_num >= MAX_PAGES {
                break;
            }
            page_num += 1;
        }

        debug!(
            "Fetched {} runs of workflow {} on branch {}",
            runs.len(),
            workflow_id,
            branch
        );
        Ok(runs)
    }

    async fn delete_workflow_run(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> anyhow::Result<()> {
        debug!("Deleting workflow run {} in {}/{}", run_id, owner, repo);

        // The endpoint answers 204 with an empty body, which the typed
        // helpers would try to deserialize.
        let route = format!("/repos/{}/{}/actions/runs/{}", owner, repo, run_id);
        let response = self.octocrab._delete(route, None::<&()>).await?;
        octocrab::map_github_error(response).await?;
        Ok(())
    }
}

/// Convert a wire review into our record type
fn convert_review(review: WireReview) -> ReviewRecord {
    ReviewRecord {
        id: review.id,
        reviewer: review.user.map(|u| u.login),
        state: review.state,
        commit_id: review.commit_id,
        submitted_at: review.submitted_at,
    }
}

/// Convert a wire pull request, skipping PRs without a base repository
fn convert_pull_request(pr: WirePull) -> Option<PullRequest> {
    let base_repo = pr.base.repo?;
    Some(PullRequest {
        number: pr.number,
        author: pr
            .user
            .map(|u| u.login)
            .unwrap_or_else(|| "unknown".to_string()),
        head_sha: pr.head.sha,
        base_sha: pr.base.sha,
        head_branch: pr.head.ref_field,
        base_owner: base_repo.owner.login,
        base_repo: base_repo.name,
    })
}

/// A commit without a verification object is treated as unsigned
fn convert_verification(verification: Option<WireVerification>) -> CommitVerification {
    match verification {
        Some(v) => CommitVerification {
            verified: v.verified,
            reason: v.reason,
            payload: v.payload,
        },
        None => CommitVerification {
            verified: false,
            reason: Some("unsigned".to_string()),
            payload: None,
        },
    }
}
