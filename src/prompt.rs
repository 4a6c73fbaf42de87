use crate::pr::PullRequestFileChange;

/// Instruction that opens every prompt. File lines follow it directly.
pub const PROMPT_HEADER: &str =
    "Generate suggested code changes and unit tests for the following pull request\n";

/// A prompt together with how many files a size cap left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub text: String,
    pub omitted_files: usize,
}

/// Serialize the changed files into a single instruction prompt, one line
/// per file in the order given. A missing patch is written as empty.
pub fn build_prompt(changes: &[PullRequestFileChange]) -> String {
    let mut prompt = String::from(PROMPT_HEADER);
    for change in changes {
        prompt.push_str(&file_line(change));
    }
    prompt
}

/// Like `build_prompt`, but stops adding file lines once the next one would
/// push the prompt past `max_bytes`. The header is always kept, and later
/// files are not considered after the first one that does not fit.
pub fn build_prompt_capped(changes: &[PullRequestFileChange], max_bytes: usize) -> BuiltPrompt {
    let mut text = String::from(PROMPT_HEADER);
    for (i, change) in changes.iter().enumerate() {
        let line = file_line(change);
        if text.len() + line.len() > max_bytes {
            return BuiltPrompt {
                text,
                omitted_files: changes.len() - i,
            };
        }
        text.push_str(&line);
    }
    BuiltPrompt {
        text,
        omitted_files: 0,
    }
}

fn file_line(change: &PullRequestFileChange) -> String {
    format!(
        "File: {}, file patch: {}\n",
        change.filename,
        change.patch.as_deref().unwrap_or_default()
    )
}
