use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use showcase::{snapshot, Config, CurationPipeline, GitHubClient, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "showcase")]
#[command(version = "0.1.0")]
#[command(about = "Curate GitHub repositories into a featured projects snapshot")]
struct Args {
    /// GitHub account whose repositories are curated (defaults to GITHUB_ACCOUNT)
    #[arg(short, long)]
    account: Option<String>,

    /// Snapshot path (defaults to OPENSOURCE_OUTPUT or src/data/opensource.json)
    #[arg(short, long)]
    output: Option<String>,

    /// Print the snapshot to stdout instead of writing it
    #[arg(long)]
    stdout: bool,

    /// Seconds to wait between repositories
    #[arg(long)]
    repo_delay: Option<u64>,

    /// Seconds to wait between the requests for one repository
    #[arg(long)]
    request_delay: Option<u64>,

    /// Minimum commits by the account owner for a project to be listed
    #[arg(long)]
    min_commits: Option<u32>,

    /// List projects that have no release yet (overrides REQUIRE_RELEASE)
    #[arg(long)]
    allow_unreleased: bool,

    /// Maximum number of featured projects
    #[arg(long)]
    featured_limit: Option<usize>,

    /// Additional repository names to exclude
    #[arg(long = "exclude")]
    exclude: Vec<String>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("showcase=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::from_env()?;

    if let Some(account) = args.account.clone() {
        config.account = Some(account);
    }
    let account = config
        .account
        .clone()
        .context("no account given: pass --account or set GITHUB_ACCOUNT")?;
    if let Some(output) = args.output.clone() {
        config.output_path = output;
    }
    if let Some(min_commits) = args.min_commits {
        config.min_commits = min_commits;
    }
    if args.allow_unreleased {
        config.require_release = false;
    }
    if let Some(limit) = args.featured_limit {
        anyhow::ensure!(limit > 0, "--featured-limit must be at least 1");
        config.featured_limit = limit;
    }
    config.denylist.extend(args.exclude.iter().cloned());

    let mut pipeline_config = PipelineConfig::from(&config);
    if let Some(secs) = args.repo_delay {
        pipeline_config.enrich.pacing.between_repositories = Duration::from_secs(secs);
    }
    if let Some(secs) = args.request_delay {
        pipeline_config.enrich.pacing.between_requests = Duration::from_secs(secs);
    }
    pipeline_config.enrich.show_progress = !args.no_progress;

    let github = GitHubClient::new(config.github_token.as_deref())?;
    let pipeline = CurationPipeline::new(Arc::new(github), pipeline_config);

    tracing::info!("Fetching GitHub repository data for: {}", account);
    tracing::info!(
        "This may take several minutes: requests are paced to stay under the rate limit"
    );
    let report = pipeline
        .run(&account)
        .await
        .with_context(|| format!("failed to fetch GitHub repos for {}", account))?;

    if args.stdout {
        println!("{}", snapshot::to_json(&report.snapshot)?);
    } else {
        snapshot::write(&config.output_path, &report.snapshot)?;
        println!(
            "\n✓ Successfully fetched {} open source projects",
            report.snapshot.projects.len()
        );
        println!("✓ Data written to {}", config.output_path);
    }

    eprintln!("\n{}", report.summary);

    Ok(())
}
