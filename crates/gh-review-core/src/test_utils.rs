//! Scripted `GitHubClient` shared by the core tests

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use gh_client::{
    CommitComparison, CommitVerification, GitHubClient, PullRequest, ReviewRecord, Workflow,
    WorkflowRun,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// A remote call seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListReviews(u64),
    DismissReview { review_id: u64, message: String },
    RequestReviewers(Vec<String>),
    ListPullRequests,
    CompareCommits { base: String, head: String },
    GetCommit(String),
    ListWorkflows,
    ListWorkflowRuns { workflow_id: u64, branch: String },
    DeleteWorkflowRun(u64),
}

#[derive(Debug, Default)]
struct MockState {
    reviews: Vec<ReviewRecord>,
    comparison: CommitComparison,
    verification: CommitVerification,
    workflows: Vec<Workflow>,
    runs: HashMap<String, Vec<WorkflowRun>>,
    pulls: Vec<PullRequest>,
    failing_deletes: HashSet<u64>,
    failing_dismissals: HashSet<u64>,
    failing_run_listings: HashSet<String>,
    failing_requests: HashSet<u64>,
    fail_list_reviews: bool,
    fail_compare: bool,
    fail_get_commit: bool,
    hang_compare: bool,
    calls: Vec<Call>,
}

/// Mock client with scripted responses and call recording
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    state: Arc<Mutex<MockState>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reviews(self, reviews: Vec<ReviewRecord>) -> Self {
        self.state.lock().unwrap().reviews = reviews;
        self
    }

    pub fn with_changed_files(self, files: &[&str]) -> Self {
        self.state.lock().unwrap().comparison = CommitComparison {
            changed_files: files.iter().map(|f| f.to_string()).collect(),
        };
        self
    }

    pub fn with_verification(self, verified: bool, payload: &str) -> Self {
        self.state.lock().unwrap().verification = CommitVerification {
            verified,
            reason: Some(if verified { "valid" } else { "unsigned" }.to_string()),
            payload: Some(payload.to_string()),
        };
        self
    }

    pub fn with_workflow(self, id: u64, name: &str) -> Self {
        self.state.lock().unwrap().workflows.push(Workflow {
            id,
            name: name.to_string(),
        });
        self
    }

    pub fn with_runs(self, branch: &str, runs: Vec<WorkflowRun>) -> Self {
        self.state
            .lock()
            .unwrap()
            .runs
            .insert(branch.to_string(), runs);
        self
    }

    pub fn with_pulls(self, pulls: Vec<PullRequest>) -> Self {
        self.state.lock().unwrap().pulls = pulls;
        self
    }

    pub fn failing_delete(self, run_id: u64) -> Self {
        self.state.lock().unwrap().failing_deletes.insert(run_id);
        self
    }

    pub fn failing_dismissal(self, review_id: u64) -> Self {
        self.state.lock().unwrap().failing_dismissals.insert(review_id);
        self
    }

    pub fn failing_run_listing(self, branch: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_run_listings
            .insert(branch.to_string());
        self
    }

    pub fn failing_request(self, pr_number: u64) -> Self {
        self.state.lock().unwrap().failing_requests.insert(pr_number);
        self
    }

    pub fn failing_list_reviews(self) -> Self {
        self.state.lock().unwrap().fail_list_reviews = true;
        self
    }

    pub fn failing_compare(self) -> Self {
        self.state.lock().unwrap().fail_compare = true;
        self
    }

    pub fn failing_get_commit(self) -> Self {
        self.state.lock().unwrap().fail_get_commit = true;
        self
    }

    /// Make `compare_commits` never complete
    pub fn hanging_compare(self) -> Self {
        self.state.lock().unwrap().hang_compare = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn deleted_runs(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::DeleteWorkflowRun(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn dismissed_reviews(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::DismissReview { review_id, .. } => Some(review_id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl GitHubClient for MockClient {
    async fn list_reviews(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<ReviewRecord>> {
        self.record(Call::ListReviews(pr_number));
        let state = self.state.lock().unwrap();
        if state.fail_list_reviews {
            anyhow::bail!("502 Bad Gateway");
        }
        Ok(state.reviews.clone())
    }

    async fn dismiss_review(
        &self,
        _owner: &str,
        _repo: &str,
        _pr_number: u64,
        review_id: u64,
        message: &str,
    ) -> anyhow::Result<()> {
        self.record(Call::DismissReview {
            review_id,
            message: message.to_string(),
        });
        if self.state.lock().unwrap().failing_dismissals.contains(&review_id) {
            anyhow::bail!("403 Forbidden");
        }
        Ok(())
    }

    async fn request_reviewers(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
        reviewers: &[String],
    ) -> anyhow::Result<()> {
        self.record(Call::RequestReviewers(reviewers.to_vec()));
        if self.state.lock().unwrap().failing_requests.contains(&pr_number) {
            anyhow::bail!("422 Unprocessable Entity");
        }
        Ok(())
    }

    async fn list_pull_requests(
        &self,
        _owner: &str,
        _repo: &str,
    ) -> anyhow::Result<Vec<PullRequest>> {
        self.record(Call::ListPullRequests);
        Ok(self.state.lock().unwrap().pulls.clone())
    }

    async fn compare_commits(
        &self,
        _owner: &str,
        _repo: &str,
        base_sha: &str,
        head_sha: &str,
    ) -> anyhow::Result<CommitComparison> {
        self.record(Call::CompareCommits {
            base: base_sha.to_string(),
            head: head_sha.to_string(),
        });
        let hang = self.state.lock().unwrap().hang_compare;
        if hang {
            std::future::pending::<()>().await;
        }
        let state = self.state.lock().unwrap();
        if state.fail_compare {
            anyhow::bail!("500 Internal Server Error");
        }
        Ok(state.comparison.clone())
    }

    async fn fetch_commit_verification(
        &self,
        _owner: &str,
        _repo: &str,
        sha: &str,
    ) -> anyhow::Result<CommitVerification> {
        self.record(Call::GetCommit(sha.to_string()));
        let state = self.state.lock().unwrap();
        if state.fail_get_commit {
            anyhow::bail!("502 Bad Gateway");
        }
        Ok(state.verification.clone())
    }

    async fn list_workflows(&self, _owner: &str, _repo: &str) -> anyhow::Result<Vec<Workflow>> {
        self.record(Call::ListWorkflows);
        Ok(self.state.lock().unwrap().workflows.clone())
    }

    async fn list_workflow_runs(
        &self,
        _owner: &str,
        _repo: &str,
        workflow_id: u64,
        branch: &str,
    ) -> anyhow::Result<Vec<WorkflowRun>> {
        self.record(Call::ListWorkflowRuns {
            workflow_id,
            branch: branch.to_string(),
        });
        let state = self.state.lock().unwrap();
        if state.failing_run_listings.contains(branch) {
            anyhow::bail!("500 Internal Server Error");
        }
        Ok(state.runs.get(branch).cloned().unwrap_or_default())
    }

    async fn delete_workflow_run(
        &self,
        _owner: &str,
        _repo: &str,
        run_id: u64,
    ) -> anyhow::Result<()> {
        self.record(Call::DeleteWorkflowRun(run_id));
        if self.state.lock().unwrap().failing_deletes.contains(&run_id) {
            anyhow::bail!("404 Not Found");
        }
        Ok(())
    }
}

/// `minute` minutes after a fixed base time
pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 10, 12, 10, 0, 0).unwrap() + Duration::minutes(minute as i64)
}

pub fn run(id: u64, branch: &str, minute: u32) -> WorkflowRun {
    WorkflowRun {
        id,
        head_branch: Some(branch.to_string()),
        created_at: at(minute),
    }
}

pub fn review(id: u64, reviewer: &str, state: &str, commit_id: &str, minute: u32) -> ReviewRecord {
    ReviewRecord {
        id,
        reviewer: Some(reviewer.to_string()),
        state: Some(state.to_string()),
        commit_id: Some(commit_id.to_string()),
        submitted_at: Some(at(minute)),
    }
}
