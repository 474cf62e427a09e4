//! GitHub API data transfer objects
//!
//! These types represent the data returned from the GitHub API.
//! They are intentionally separate from the review bot's domain model
//! to keep this crate pure and reusable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A pull request review exactly as reported by the GitHub API
///
/// Reviewer and state are optional because the API omits the user of
/// deleted accounts and may report states this crate does not know. The
/// consumer decides what to do with incomplete records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Review ID, used for dismissal
    pub id: u64,

    /// Reviewer's GitHub username
    pub reviewer: Option<String>,

    /// Raw review state (e.g. "APPROVED")
    pub state: Option<String>,

    /// Head commit the review was submitted against
    pub commit_id: Option<String>,

    /// When the review was submitted (absent for pending reviews)
    pub submitted_at: Option<DateTime<Utc>>,
}

/// State of a pull request review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Reviewer approved the changes
    Approved,
    /// Reviewer requested changes
    ChangesRequested,
    /// Reviewer only commented
    Commented,
    /// Review has been started but not submitted
    Pending,
    /// Review was dismissed
    Dismissed,
}

impl ReviewState {
    /// The API spelling of this state
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewState::Approved => "APPROVED",
            ReviewState::ChangesRequested => "CHANGES_REQUESTED",
            ReviewState::Commented => "COMMENTED",
            ReviewState::Pending => "PENDING",
            ReviewState::Dismissed => "DISMISSED",
        }
    }
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "APPROVED" => Ok(ReviewState::Approved),
            "CHANGES_REQUESTED" => Ok(ReviewState::ChangesRequested),
            "COMMENTED" => Ok(ReviewState::Commented),
            "PENDING" => Ok(ReviewState::Pending),
            "DISMISSED" => Ok(ReviewState::Dismissed),
            other => Err(format!("unknown review state '{}'", other)),
        }
    }
}

/// An open pull request from the GitHub API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 123)
    pub number: u64,

    /// Author's GitHub username
    pub author: String,

    /// HEAD commit SHA
    pub head_sha: String,

    /// Base commit SHA
    pub base_sha: String,

    /// HEAD branch name (e.g., "feature/foo")
    pub head_branch: String,

    /// Owner of the base repository
    pub base_owner: String,

    /// Name of the base repository
    pub base_repo: String,
}

/// Result of comparing two commits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitComparison {
    /// Names of files that differ between base and head
    pub changed_files: Vec<String>,
}

/// Signature verification record attached to a commit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitVerification {
    /// Whether GitHub verified the signature
    pub verified: bool,

    /// Reason reported by GitHub (e.g. "valid", "unsigned")
    pub reason: Option<String>,

    /// The signed commit payload
    pub payload: Option<String>,
}

/// A GitHub Actions workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    /// Workflow ID
    pub id: u64,
    /// Name of the workflow
    pub name: String,
}

/// A GitHub Actions workflow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRun {
    /// Workflow run ID
    pub id: u64,
    /// Branch the run was triggered for
    pub head_branch: Option<String>,
    /// When the run was created
    pub created_at: DateTime<Utc>,
}
