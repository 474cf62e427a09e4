//! Reviewer registry
//!
//! Resolves a pull request author to the reviewers that must approve and to
//! an internal/external classification. Pure lookup, no I/O.
//!
//! An author listed in the assignments is internal; anyone else is an
//! external contributor and gets the default reviewers.

use crate::error::Result;
use gh_review_config::{ConfigError, ReviewerAssignments};
use std::fmt;

/// Whether post-approval commits by the author need trust verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contributor {
    /// Trusted author, new commits keep their approvals
    Internal,
    /// Outside contributor, new commits must be verified
    External,
}

impl fmt::Display for Contributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contributor::Internal => f.write_str("internal"),
            Contributor::External => f.write_str("external"),
        }
    }
}

/// Ordered, non-empty, duplicate-free list of required reviewers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredReviewers(Vec<String>);

impl RequiredReviewers {
    /// Build a required set, rejecting an empty one
    pub fn new(reviewers: impl IntoIterator<Item = String>) -> Option<Self> {
        let mut unique: Vec<String> = Vec::new();
        for reviewer in reviewers {
            if !reviewer.is_empty() && !unique.contains(&reviewer) {
                unique.push(reviewer);
            }
        }

        if unique.is_empty() {
            None
        } else {
            Some(Self(unique))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `@alice @bob`
    pub fn mentions(&self) -> String {
        self.iter()
            .map(|r| format!("@{}", r))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Everything the policy needs to know about an author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPolicy {
    pub contributor: Contributor,
    pub required: RequiredReviewers,
}

/// Static author → reviewer mapping
#[derive(Debug, Clone, Default)]
pub struct ReviewerRegistry {
    assignments: ReviewerAssignments,
    default_reviewers: Vec<String>,
}

impl ReviewerRegistry {
    pub fn new(assignments: ReviewerAssignments, default_reviewers: Vec<String>) -> Self {
        Self {
            assignments,
            default_reviewers,
        }
    }

    pub fn classify(&self, author: &str) -> Contributor {
        if self.assignments.contains_key(author) {
            Contributor::Internal
        } else {
            Contributor::External
        }
    }

    /// Resolve the policy for an author
    ///
    /// The author is never required to review their own pull request. An
    /// empty result is a configuration error, never an implicit pass.
    pub fn resolve(&self, author: &str) -> Result<ResolvedPolicy> {
        let contributor = self.classify(author);
        let candidates = match contributor {
            Contributor::Internal => &self.assignments[author],
            Contributor::External => &self.default_reviewers,
        };

        let required = RequiredReviewers::new(
            candidates
                .iter()
                .filter(|reviewer| reviewer.as_str() != author)
                .cloned(),
        )
        .ok_or_else(|| ConfigError::InvalidReviewers {
            reason: format!(
                "no required reviewers resolved for {} author '{}'",
                contributor, author
            ),
        })?;

        log::debug!(
            "Resolved {} author {} to reviewers {:?}",
            contributor,
            author,
            required.as_slice()
        );
        Ok(ResolvedPolicy {
            contributor,
            required,
        })
    }
}
