//! GitHub API client for review governance
//!
//! This crate provides a trait-based GitHub API client covering exactly the
//! REST operations the review bot needs: reviews, commit comparison and
//! verification, workflow runs and reviewer requests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  - list_reviews() / dismiss_review()             │
//! │  - compare_commits() / fetch_commit_verification │
//! │  - list_workflows() / list_workflow_runs()       │
//! │  - delete_workflow_run() / request_reviewers()   │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!             ┌─────────────────────┐
//!             │   OctocrabClient    │
//!             │   (direct API)      │
//!             └─────────────────────┘
//! ```
//!
//! Responses are never cached: every invocation of the bot must see the
//! platform's current state.
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{GitHubClient, OctocrabClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let octocrab = octocrab::Octocrab::builder()
//!     .personal_token("token".to_string())
//!     .build()?;
//!
//! let client = OctocrabClient::new(Arc::new(octocrab));
//! let reviews = client.list_reviews("owner", "repo", 42).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod octocrab_client;
pub mod types;

pub use client::GitHubClient;
pub use octocrab_client::OctocrabClient;
pub use types::{
    CommitComparison, CommitVerification, PullRequest, ReviewRecord, ReviewState, Workflow,
    WorkflowRun,
};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;
