//! Stale workflow run pruning
//!
//! Only the newest run of the check workflow on a branch matters for the
//! pull request's status. Older runs are deleted so a stale failure does not
//! linger next to a newer success.
//!
//! Pruning is best-effort: a failed delete is logged and the remaining runs
//! are still processed. Only cancellation stops it early.

use crate::context::CheckContext;
use crate::error::{Result, ReviewGateError};
use gh_client::{GitHubClient, WorkflowRun};
use gh_review_config::ConfigError;
use log::{debug, info, warn};
use std::sync::Arc;

/// What one pruning pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// The newest run, left in place
    pub kept: Option<u64>,
    /// Runs deleted
    pub deleted: Vec<u64>,
    /// Runs whose deletion failed, with the cause
    pub failed: Vec<(u64, String)>,
}

/// Runs to delete for a branch, oldest first
///
/// Runs reported for another branch are ignored. Runs are ordered by
/// creation time (stable, so equal times keep the listing order) and the
/// last one survives.
pub fn plan_deletions(runs: &[WorkflowRun], branch: &str) -> (Option<u64>, Vec<u64>) {
    let mut candidates: Vec<&WorkflowRun> = runs
        .iter()
        .filter(|run| run.head_branch.as_deref().is_none_or(|b| b == branch))
        .collect();
    candidates.sort_by_key(|run| run.created_at);

    match candidates.split_last() {
        Some((newest, older)) => (Some(newest.id), older.iter().map(|run| run.id).collect()),
        None => (None, Vec::new()),
    }
}

/// Deletes all but the newest run of one workflow on one branch
pub struct StaleRunPruner {
    client: Arc<dyn GitHubClient>,
    workflow_name: String,
}

impl StaleRunPruner {
    pub fn new(client: Arc<dyn GitHubClient>, workflow_name: impl Into<String>) -> Self {
        Self {
            client,
            workflow_name: workflow_name.into(),
        }
    }

    pub fn workflow_name(&self) -> &str {
        &self.workflow_name
    }

    /// Prune stale runs of the workflow on `branch`
    ///
    /// Per-run failures end up in the report, not in the error. An unknown
    /// workflow name is a configuration error.
    pub async fn prune(
        &self,
        ctx: &CheckContext,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<PruneReport> {
        let target = format!("{}/{}", owner, repo);

        let workflows = ctx
            .remote("ListWorkflows", &target, self.client.list_workflows(owner, repo))
            .await?;
        let workflow = workflows
            .iter()
            .find(|w| w.name == self.workflow_name)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "check_workflow",
                reason: format!("workflow '{}' not found in {}", self.workflow_name, target),
            })?;

        let runs = ctx
            .remote(
                "ListWorkflowRuns",
                &target,
                self.client
                    .list_workflow_runs(owner, repo, workflow.id, branch),
            )
            .await?;

        let (kept, stale) = plan_deletions(&runs, branch);
        debug!(
            "{}: {} run(s) of '{}' on {}, {} stale",
            target,
            runs.len(),
            self.workflow_name,
            branch,
            stale.len()
        );

        let mut report = PruneReport {
            kept,
            ..Default::default()
        };

        for run_id in stale {
            let deletion = ctx
                .remote(
                    "DeleteWorkflowRun",
                    &target,
                    self.client.delete_workflow_run(owner, repo, run_id),
                )
                .await;

            match deletion {
                Ok(()) => {
                    debug!("{}: deleted run {}", target, run_id);
                    report.deleted.push(run_id);
                }
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    let cause = e.source_chain();
                    warn!("{}: failed to delete run {}: {}", target, run_id, cause);
                    report.failed.push((run_id, cause));
                }
            }
        }

        if !report.deleted.is_empty() {
            info!(
                "{}: deleted {} stale run(s) on {}",
                target,
                report.deleted.len(),
                branch
            );
        }
        Ok(report)
    }
}

/// Prunes stale runs on the head branch of every open pull request
pub struct RepositoryPruner {
    client: Arc<dyn GitHubClient>,
    pruner: StaleRunPruner,
}

impl RepositoryPruner {
    pub fn new(client: Arc<dyn GitHubClient>, workflow_name: impl Into<String>) -> Self {
        Self {
            pruner: StaleRunPruner::new(Arc::clone(&client), workflow_name),
            client,
        }
    }

    /// Prune every open pull request's branch
    ///
    /// Every branch is attempted. Branch-level errors and failed deletes are
    /// collected into a single `PartialCleanup` error at the end.
    pub async fn prune_all(
        &self,
        ctx: &CheckContext,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<PruneReport>> {
        let target = format!("{}/{}", owner, repo);
        let pulls = ctx
            .remote(
                "ListPullRequests",
                &target,
                self.client.list_pull_requests(owner, repo),
            )
            .await?;

        let mut branches: Vec<&str> = Vec::new();
        for pr in &pulls {
            if !branches.contains(&pr.head_branch.as_str()) {
                branches.push(&pr.head_branch);
            }
        }
        info!(
            "{}: pruning '{}' runs on {} branch(es)",
            target,
            self.pruner.workflow_name(),
            branches.len()
        );

        let mut reports = Vec::new();
        let mut failures = Vec::new();
        for branch in &branches {
            match self.pruner.prune(ctx, owner, repo, branch).await {
                Ok(report) => {
                    failures.extend(
                        report
                            .failed
                            .iter()
                            .map(|(run_id, cause)| format!("{}: run {}: {}", branch, run_id, cause)),
                    );
                    reports.push(report);
                }
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    warn!("{}: pruning {} failed: {}", target, branch, e);
                    failures.push(format!("{}: {}", branch, e.source_chain()));
                }
            }
        }

        if failures.is_empty() {
            Ok(reports)
        } else {
            Err(ReviewGateError::PartialCleanup {
                target,
                action: "branch cleanups",
                attempted: branches.len(),
                failures,
            })
        }
    }
}
