//! Pull request metadata
//!
//! Identifies the pull request under evaluation. Built once per invocation
//! from the triggering event and never mutated afterwards, so the head and
//! base SHAs reflect the state at evaluation time.

use crate::error::Result;
use gh_client::PullRequest;
use gh_review_config::{ConfigError, PullRequestEvent};
use std::fmt;

/// A fully populated, validated pull request identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestMetadata {
    author: String,
    number: u64,
    repo_owner: String,
    repo_name: String,
    head_sha: String,
    base_sha: String,
    branch_name: String,
}

impl PullRequestMetadata {
    /// Build metadata, rejecting zero or empty fields
    pub fn new(
        author: impl Into<String>,
        number: u64,
        repo_owner: impl Into<String>,
        repo_name: impl Into<String>,
        head_sha: impl Into<String>,
        base_sha: impl Into<String>,
        branch_name: impl Into<String>,
    ) -> Result<Self> {
        let metadata = Self {
            author: author.into(),
            number,
            repo_owner: repo_owner.into(),
            repo_name: repo_name.into(),
            head_sha: head_sha.into(),
            base_sha: base_sha.into(),
            branch_name: branch_name.into(),
        };
        metadata.validate()?;
        Ok(metadata)
    }

    /// Build metadata from a pull request event payload
    ///
    /// The base repository is used for all API calls, so pull requests from
    /// forks are evaluated against the repository they target.
    pub fn from_event(event: &PullRequestEvent) -> Result<Self> {
        Self::new(
            event.user.login.clone(),
            event.number,
            event.base.repo.owner.login.clone(),
            event.base.repo.name.clone(),
            event.head.sha.clone(),
            event.base.sha.clone(),
            event.head.ref_field.clone(),
        )
    }

    /// Build metadata from an open pull request listed by the platform
    pub fn from_pull(pull: &PullRequest) -> Result<Self> {
        Self::new(
            pull.author.clone(),
            pull.number,
            pull.base_owner.clone(),
            pull.base_repo.clone(),
            pull.head_sha.clone(),
            pull.base_sha.clone(),
            pull.head_branch.clone(),
        )
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        let fields: [(&'static str, &str); 6] = [
            ("pull_request.user.login", &self.author),
            ("pull_request.base.repo.owner.login", &self.repo_owner),
            ("pull_request.base.repo.name", &self.repo_name),
            ("pull_request.head.sha", &self.head_sha),
            ("pull_request.base.sha", &self.base_sha),
            ("pull_request.head.ref", &self.branch_name),
        ];

        if self.number == 0 {
            return Err(missing("pull_request.number"));
        }
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((key, _)) => Err(missing(*key)),
            None => Ok(()),
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn repo_owner(&self) -> &str {
        &self.repo_owner
    }

    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    pub fn head_sha(&self) -> &str {
        &self.head_sha
    }

    pub fn base_sha(&self) -> &str {
        &self.base_sha
    }

    pub fn branch_name(&self) -> &str {
        &self.branch_name
    }

    /// `owner/repo` of the pull request
    pub fn repo_target(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }

    /// `owner/repo#number`, used to tag errors and log lines
    pub fn target(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PullRequestMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.repo_owner, self.repo_name, self.number)
    }
}

fn missing(key: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        reason: "insufficient data obtained: field is missing or empty".to_string(),
    }
}
