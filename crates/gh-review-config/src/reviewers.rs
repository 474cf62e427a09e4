//! Reviewer assignment parsing
//!
//! Assignments map an author to the reviewers that must approve their pull
//! requests. They arrive as a JSON object, e.g. `{"alice": ["bob", "carol"]}`.

use crate::error::ConfigError;
use std::collections::HashMap;

/// Author → required reviewers
pub type ReviewerAssignments = HashMap<String, Vec<String>>;

/// Parse a JSON object of author → reviewer list
///
/// An empty string is rejected rather than treated as "no policy", and so is
/// any value that is not an object of string arrays.
pub fn parse_assignments(raw: &str) -> Result<ReviewerAssignments, ConfigError> {
    if raw.trim().is_empty() {
        return Err(ConfigError::InvalidReviewers {
            reason: "reviewer assignments are empty".to_string(),
        });
    }

    serde_json::from_str(raw).map_err(|e| ConfigError::InvalidReviewers {
        reason: e.to_string(),
    })
}

/// Parse a reviewer list given either as a JSON array or comma-separated
pub fn parse_reviewer_list(raw: &str) -> Result<Vec<String>, ConfigError> {
    let trimmed = raw.trim();

    let reviewers: Vec<String> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).map_err(|e| ConfigError::InvalidValue {
            key: "default_reviewers",
            reason: e.to_string(),
        })?
    } else {
        trimmed
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    };

    Ok(reviewers)
}
