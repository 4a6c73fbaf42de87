use serde::Deserialize;

/// One file touched by a pull request, as returned by
/// `GET /repos/{owner}/{repo}/pulls/{number}/files`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestFileChange {
    /// File path (e.g., "src/auth/config.rs")
    pub filename: String,
    /// Unified diff for this file. GitHub omits it for binary files,
    /// renames without content changes, and very large diffs.
    #[serde(default)]
    pub patch: Option<String>,
    /// "added", "modified", "removed", "renamed", ...
    #[serde(default)]
    pub status: Option<String>,
    /// Lines added in this file
    #[serde(default)]
    pub additions: usize,
    /// Lines deleted in this file
    #[serde(default)]
    pub deletions: usize,
}

impl PullRequestFileChange {
    #[cfg(test)]
    pub fn new(filename: impl Into<String>, patch: Option<&str>) -> Self {
        Self {
            filename: filename.into(),
            patch: patch.map(str::to_string),
            status: None,
            additions: 0,
            deletions: 0,
        }
    }
}

/// Identifies a single pull request: `owner/name` plus its number.
/// Built by `parse_pr_ref()` in pr/mod.rs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestReference {
    pub repository: String,
    pub number: u64,
}

/// What a pull-request source produced for one reference.
///
/// A failed fetch is kept distinct from "no files changed" so the caller
/// can decide how to degrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Files(Vec<PullRequestFileChange>),
    Failed { reason: String },
}

impl FetchOutcome {
    /// Files to build a prompt from. A failed fetch yields none.
    pub fn files(&self) -> &[PullRequestFileChange] {
        match self {
            FetchOutcome::Files(files) => files,
            FetchOutcome::Failed { .. } => &[],
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            FetchOutcome::Files(_) => None,
            FetchOutcome::Failed { reason } => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_change_without_patch_deserializes() {
        let json = r#"{"filename": "assets/logo.png", "status": "added"}"#;
        let file: PullRequestFileChange = serde_json::from_str(json).unwrap();
        assert_eq!(file.filename, "assets/logo.png");
        assert!(file.patch.is_none());
        assert_eq!(file.status.as_deref(), Some("added"));
        assert_eq!(file.additions, 0);
    }

    #[test]
    fn test_failed_outcome_has_no_files() {
        let outcome = FetchOutcome::Failed {
            reason: "404 Not Found".to_string(),
        };
        assert!(outcome.files().is_empty());
        assert_eq!(outcome.failure(), Some("404 Not Found"));
    }

    #[test]
    fn test_empty_files_outcome_is_not_a_failure() {
        let outcome = FetchOutcome::Files(vec![]);
        assert!(outcome.files().is_empty());
        assert!(outcome.failure().is_none());
    }
}
