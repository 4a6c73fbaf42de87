use crate::ai::CompletionResult;
use crate::pr::{FetchOutcome, PullRequestFileChange, PullRequestReference};

/// Everything one pipeline run produced, ready to be surfaced.
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// Pull request the suggestion is for
    pub pull_request: PullRequestReference,
    /// Files listed by the source-control host, or why that failed
    pub fetch: FetchOutcome,
    /// Files left out of the prompt by the size cap
    pub omitted_files: usize,
    /// Model output
    pub completion: CompletionResult,
}

impl Suggestion {
    pub fn files(&self) -> &[PullRequestFileChange] {
        self.fetch.files()
    }

    pub fn text(&self) -> &str {
        &self.completion.text
    }

    pub fn is_empty(&self) -> bool {
        self.completion.text.trim().is_empty()
    }
}
