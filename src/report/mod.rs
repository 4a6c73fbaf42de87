pub mod types;

pub use types::Suggestion;

use crate::pr::FetchOutcome;
use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// Print the files a pull request touched. A fetch failure goes to stderr
/// so stdout only carries the file list and the response.
pub fn print_files(fetch: &FetchOutcome) {
    if let Some(reason) = fetch.failure() {
        eprintln!(
            "{} {}",
            "Error retrieving pull request:".yellow().bold(),
            reason
        );
    }
    print!("{}", file_list(fetch));
}

/// One tab-indented `- <filename>` line per file under a count heading.
fn file_list(fetch: &FetchOutcome) -> String {
    let files = fetch.files();
    let mut out = format!("{} {}\n", "Files from pull request:".bold(), files.len());
    for file in files {
        out.push_str(&format!("\t- {}\n", file.filename));
    }
    out
}

/// Print a prompt as it would be sent, for --dry-run.
pub fn print_prompt(prompt: &str) {
    println!("{}", "═══ Prompt ═══".bold());
    println!("{prompt}");
}

/// Output the suggestion to terminal (default) or to a markdown file.
#[instrument(skip(suggestion), fields(repo = %suggestion.pull_request.repository, pr = suggestion.pull_request.number))]
pub fn output(suggestion: &Suggestion, output_path: Option<&Path>) -> Result<(), ReportError> {
    match output_path {
        None => {
            debug!("writing suggestion to terminal");
            print_terminal_report(suggestion);
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing suggestion to file");
            write_markdown_report(suggestion, path)
        }
    }
}

/// Nothing is printed for an empty completion.
fn print_terminal_report(suggestion: &Suggestion) {
    if suggestion.is_empty() {
        return;
    }
    println!();
    println!("{} {}", "Gemini response:".green().bold(), suggestion.text());
    if let Some(usage) = &suggestion.completion.usage {
        println!(
            "{}",
            format!(
                "Tokens: {} prompt + {} response = {}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            )
            .dimmed()
        );
    }
}

fn render_markdown(suggestion: &Suggestion) -> String {
    let pr = &suggestion.pull_request;
    let mut md = String::new();
    md.push_str(&format!("# Suggestions for {} #{}\n\n", pr.repository, pr.number));

    if let Some(reason) = suggestion.fetch.failure() {
        md.push_str(&format!(
            "> **Warning:** pull request files could not be retrieved ({reason})\n\n"
        ));
    }

    md.push_str(&format!("## Files ({})\n\n", suggestion.files().len()));
    if suggestion.files().is_empty() {
        md.push_str("No files.\n\n");
    } else {
        for file in suggestion.files() {
            match &file.status {
                Some(status) => md.push_str(&format!(
                    "- `{}` ({}, +{} -{})\n",
                    file.filename, status, file.additions, file.deletions
                )),
                None => md.push_str(&format!("- `{}`\n", file.filename)),
            }
        }
        md.push('\n');
    }
    if suggestion.omitted_files > 0 {
        md.push_str(&format!(
            "_{} file(s) left out of the prompt by the size limit._\n\n",
            suggestion.omitted_files
        ));
    }

    md.push_str("## Suggested changes\n\n");
    if suggestion.is_empty() {
        md.push_str("No response.\n");
    } else {
        md.push_str(suggestion.text().trim_end());
        md.push('\n');
    }

    if let Some(usage) = &suggestion.completion.usage {
        md.push_str(&format!(
            "\n**Tokens:** {} prompt + {} response = {}\n",
            usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
        ));
    }
    md
}

fn write_markdown_report(suggestion: &Suggestion, path: &Path) -> Result<(), ReportError> {
    std::fs::write(path, render_markdown(suggestion))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{CompletionResult, UsageMetadata};
    use crate::pr::{PullRequestFileChange, PullRequestReference};

    fn sample_suggestion(fetch: FetchOutcome, text: &str) -> Suggestion {
        Suggestion {
            pull_request: PullRequestReference {
                repository: "org/repo".to_string(),
                number: 42,
            },
            fetch,
            omitted_files: 0,
            completion: CompletionResult {
                text: text.to_string(),
                usage: Some(UsageMetadata {
                    prompt_token_count: 10,
                    candidates_token_count: 5,
                    total_token_count: 15,
                }),
            },
        }
    }

    fn two_files() -> FetchOutcome {
        let mut modified = PullRequestFileChange::new("src/auth.rs", Some("+token"));
        modified.status = Some("modified".to_string());
        modified.additions = 1;
        FetchOutcome::Files(vec![modified, PullRequestFileChange::new("logo.png", None)])
    }

    #[test]
    fn test_render_markdown() {
        let md = render_markdown(&sample_suggestion(two_files(), "Add a test for login()"));
        assert!(md.starts_with("# Suggestions for org/repo #42"));
        assert!(md.contains("## Files (2)"));
        assert!(md.contains("- `src/auth.rs` (modified, +1 -0)"));
        assert!(md.contains("- `logo.png`"));
        assert!(md.contains("## Suggested changes\n\nAdd a test for login()"));
        assert!(md.contains("**Tokens:** 10 prompt + 5 response = 15"));
        assert!(!md.contains("Warning"));
    }

    #[test]
    fn test_render_markdown_notes_fetch_failure() {
        let fetch = FetchOutcome::Failed {
            reason: "404 Not Found".to_string(),
        };
        let md = render_markdown(&sample_suggestion(fetch, ""));
        assert!(md.contains("could not be retrieved (404 Not Found)"));
        assert!(md.contains("No files."));
        assert!(md.contains("No response."));
    }

    #[test]
    fn test_render_markdown_notes_omitted_files() {
        let mut suggestion = sample_suggestion(two_files(), "x");
        suggestion.omitted_files = 1;
        assert!(render_markdown(&suggestion).contains("1 file(s) left out"));
    }

    #[test]
    fn test_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suggestion.md");
        output(&sample_suggestion(two_files(), "rename x"), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("rename x"));
    }

    #[test]
    fn test_output_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("suggestion.md");
        let result = output(&sample_suggestion(two_files(), "x"), Some(&path));
        assert!(matches!(result, Err(ReportError::FileWrite(_))));
    }

    #[test]
    fn test_file_list_names_each_file() {
        let list = file_list(&two_files());
        assert!(list.contains("Files from pull request:"));
        assert!(list.ends_with("\t- src/auth.rs\n\t- logo.png\n"));
    }

    #[test]
    fn test_file_list_leaves_fetch_failure_out() {
        let list = file_list(&FetchOutcome::Failed {
            reason: "500 Internal Server Error".to_string(),
        });
        assert!(list.contains("Files from pull request:"));
        assert!(!list.contains("Error retrieving"));
        assert!(!list.contains("500"));
    }

    #[test]
    fn test_output_to_terminal() {
        // Should not panic
        output(&sample_suggestion(two_files(), "x"), None).unwrap();
        output(&sample_suggestion(two_files(), ""), None).unwrap();
        print_files(&two_files());
        print_files(&FetchOutcome::Failed {
            reason: "500 Internal Server Error".to_string(),
        });
    }
}
