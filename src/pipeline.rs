use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ai::{AiError, CompletionProvider};
use crate::pr::{self, FetchOutcome, PrError, PullRequestReference, PullRequestSource};
use crate::prompt;
use crate::report::{self, Suggestion};

/// The two ways a run can end early. Anything else degrades and carries on.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] PrError),

    #[error(transparent)]
    Completion(#[from] AiError),
}

/// Pull request located and its prompt built, not yet sent.
#[derive(Debug, Clone)]
pub struct PreparedPrompt {
    pub pull_request: PullRequestReference,
    pub fetch: FetchOutcome,
    pub prompt: String,
    pub omitted_files: usize,
}

/// Runs fetch → prompt → completion for one pull request.
pub struct Pipeline<'a> {
    source: &'a dyn PullRequestSource,
    max_prompt_bytes: Option<usize>,
    print_progress: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(source: &'a dyn PullRequestSource) -> Self {
        Self {
            source,
            max_prompt_bytes: None,
            print_progress: false,
        }
    }

    pub fn with_prompt_limit(mut self, max_bytes: Option<usize>) -> Self {
        self.max_prompt_bytes = max_bytes;
        self
    }

    /// Print the file list to stdout as soon as it is known.
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.print_progress = enabled;
        self
    }

    /// Parse the inputs, list the changed files and build the prompt.
    ///
    /// Only a malformed `repository` or `git_ref` fails here; a fetch
    /// failure leaves an empty file list behind.
    pub async fn prepare(
        &self,
        repository: &str,
        git_ref: &str,
    ) -> Result<PreparedPrompt, PipelineError> {
        let pull_request = pr::parse_pr_ref(repository, git_ref)?;
        debug!(repo = %pull_request.repository, pr = pull_request.number, "parsed ref");

        // Sources log their own failures; an empty list is used from here on.
        let fetch = self.source.fetch_files(&pull_request).await;
        info!(files = fetch.files().len(), "files from pull request");
        for file in fetch.files() {
            debug!(file = %file.filename, "changed file");
        }
        if self.print_progress {
            report::print_files(&fetch);
        }

        let (prompt, omitted_files) = match self.max_prompt_bytes {
            None => (prompt::build_prompt(fetch.files()), 0),
            Some(max_bytes) => {
                let built = prompt::build_prompt_capped(fetch.files(), max_bytes);
                if built.omitted_files > 0 {
                    warn!(
                        omitted = built.omitted_files,
                        max_bytes, "prompt size limit reached, files left out"
                    );
                }
                (built.text, built.omitted_files)
            }
        };
        debug!(prompt_bytes = prompt.len(), "built prompt");

        Ok(PreparedPrompt {
            pull_request,
            fetch,
            prompt,
            omitted_files,
        })
    }

    /// Full run. Completion errors end the run; the caller reports them.
    pub async fn run(
        &self,
        completer: &dyn CompletionProvider,
        repository: &str,
        git_ref: &str,
    ) -> Result<Suggestion, PipelineError> {
        let prepared = self.prepare(repository, git_ref).await?;
        let completion = completer.complete(&prepared.prompt).await?;
        info!(response_bytes = completion.text.len(), "completion received");

        Ok(Suggestion {
            pull_request: prepared.pull_request,
            fetch: prepared.fetch,
            omitted_files: prepared.omitted_files,
            completion,
        })
    }
}

/// Process exit status for a finished run: 0 on success (even with an
/// empty response), 1 on any fatal error.
pub fn exit_status<T, E>(result: &Result<T, E>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
