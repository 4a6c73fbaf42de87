mod ai;
mod config;
mod pipeline;
mod pr;
mod prompt;
mod report;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

use ai::GeminiClient;
use pipeline::Pipeline;
use pr::GitHubClient;

/// PR Suggest: sends the files changed in a GitHub Pull Request to Gemini
/// and prints suggested code changes and unit tests.
#[derive(Parser, Debug)]
#[command(name = "pr-suggest", version, about)]
struct Cli {
    /// Repository in owner/name form (e.g., org/repo)
    #[arg(long)]
    repo: String,

    /// Pull request ref in <number>/<suffix> form (e.g., 42/merge)
    #[arg(long = "ref")]
    git_ref: String,

    /// Gemini API key. Falls back to the GEMINI_KEY env var, then .pr-suggest.toml
    #[arg(long, alias = "gemini_key")]
    gemini_key: Option<String>,

    /// Optional output file path for markdown report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the prompt instead of sending it (no Gemini key needed)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let span = info_span!("pr_suggest", repo = %cli.repo, git_ref = %cli.git_ref);
    let result = run(&cli).instrument(span).await;
    if let Err(err) = &result {
        error!(error = %err, "run failed");
        eprintln!("Error: {err}");
    }
    ExitCode::from(pipeline::exit_status(&result))
}

async fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    info!("loading configuration");
    let config = config::Config::load()?;
    debug!(github_api = config.github_api_base(), model = config.gemini_model(), "configuration loaded");

    let github = GitHubClient::new(config.github_api_base(), config.github_token());
    let pipeline = Pipeline::new(&github)
        .with_prompt_limit(config.prompt.max_bytes)
        .with_progress(true);

    if cli.dry_run {
        info!("dry run, prompt will not be sent");
        let prepared = pipeline.prepare(&cli.repo, &cli.git_ref).await?;
        report::print_prompt(&prepared.prompt);
        return Ok(());
    }

    let gemini = GeminiClient::new(
        &config.gemini_key(cli.gemini_key.as_deref()),
        config.gemini_model(),
        config.gemini_api_base(),
    )?;
    debug!(model = gemini.model(), "Gemini client ready");

    let suggestion = pipeline.run(&gemini, &cli.repo, &cli.git_ref).await?;
    report::output(&suggestion, cli.output.as_deref())?;
    info!(files = suggestion.files().len(), empty = suggestion.is_empty(), "done");

    Ok(())
}
