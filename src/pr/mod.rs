pub mod types;

pub use types::{FetchOutcome, PullRequestFileChange, PullRequestReference};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument, warn};

pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum PrError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("Invalid repository (expected owner/name): {0:?}")]
    InvalidRepository(String),

    #[error("Invalid ref (expected <pull-request-number>/<suffix>): {0:?}")]
    InvalidRef(String),
}

/// Parse the `repo` and `ref` inputs into a pull-request reference.
///
/// The number is whatever precedes the first `/` in `git_ref`
/// (GitHub Actions hands out refs like "42/merge"), and must be a
/// positive integer.
pub fn parse_pr_ref(repository: &str, git_ref: &str) -> Result<PullRequestReference, PrError> {
    validate_repository(repository)?;

    let number_part = git_ref.split('/').next().unwrap_or_default().trim();
    let number = number_part
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| PrError::InvalidRef(git_ref.to_string()))?;

    Ok(PullRequestReference {
        repository: repository.to_string(),
        number,
    })
}

fn validate_repository(repository: &str) -> Result<(), PrError> {
    let invalid = || PrError::InvalidRepository(repository.to_string());
    let (owner, name) = repository.split_once('/').ok_or_else(invalid)?;
    // GitHub owner and repository names: ASCII letters, digits, `-`, `_`, `.`.
    let well_formed = |part: &str| {
        !part.is_empty()
            && part != "."
            && part != ".."
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    };
    if well_formed(owner) && well_formed(name) {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Anything that can list the files changed in a pull request.
///
/// Implementations never fail the caller: problems are reported through
/// `FetchOutcome::Failed`.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    async fn fetch_files(&self, pr_ref: &PullRequestReference) -> FetchOutcome;
}

/// GitHub REST client for the pull-request files listing.
pub struct GitHubClient {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(api_base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            token,
        }
    }

    fn files_url(&self, pr_ref: &PullRequestReference) -> String {
        format!(
            "{}/repos/{}/pulls/{}/files",
            self.api_base.trim_end_matches('/'),
            pr_ref.repository,
            pr_ref.number
        )
    }

    /// Single GET, first page only. Transport and decode errors come back
    /// as `Err`; a non-success status or a `null` body as `Failed`.
    async fn request_files(&self, pr_ref: &PullRequestReference) -> Result<FetchOutcome, PrError> {
        let mut request = self
            .client
            .get(self.files_url(pr_ref))
            .header("User-Agent", "pr-suggest")
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Ok(FetchOutcome::Failed {
                reason: status.to_string(),
            });
        }

        let files = response.json::<Option<Vec<PullRequestFileChange>>>().await?;
        Ok(match files {
            Some(files) => FetchOutcome::Files(files),
            None => FetchOutcome::Failed {
                reason: format!("{status} with null body"),
            },
        })
    }
}

#[async_trait]
impl PullRequestSource for GitHubClient {
    #[instrument(skip(self), fields(repo = %pr_ref.repository, pr = pr_ref.number))]
    async fn fetch_files(&self, pr_ref: &PullRequestReference) -> FetchOutcome {
        debug!("fetching pull request files from GitHub API");
        let outcome = match self.request_files(pr_ref).await {
            Ok(outcome) => outcome,
            Err(err) => FetchOutcome::Failed {
                reason: err.to_string(),
            },
        };

        match &outcome {
            FetchOutcome::Files(files) => debug!(files = files.len(), "received pull request files"),
            FetchOutcome::Failed { reason } => {
                warn!(reason = %reason, "Error retrieving pull request")
            }
        }
        outcome
    }
}
