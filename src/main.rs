use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gha_pin_updater::config::{MaxBump, RateLimitBehavior, UpdaterConfig, parse_extensions};
use gha_pin_updater::runner::{RunReport, Runner};
use gha_pin_updater::update::FileOutcome;
use gha_pin_updater::version::registries::GitHubRegistry;

#[derive(Parser)]
#[command(name = "gha-pin-updater")]
#[command(
    version,
    about = "Update commit-pinned GitHub Actions in a folder to their latest release"
)]
struct Cli {
    /// Folder containing GitHub Actions files [default: .]
    #[arg(long)]
    path: Option<PathBuf>,

    /// GitHub personal access token for authenticated requests
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Print changes without modifying files
    #[arg(long)]
    dry_run: bool,

    /// Write <file>.bak before updating a file
    #[arg(long)]
    backup: bool,

    /// Comma-separated list of file extensions to check [default: yml,yaml]
    #[arg(long)]
    extensions: Option<String>,

    /// Recursively search for files in subdirectories
    #[arg(long)]
    recursive: bool,

    /// Print detailed information about the update process
    #[arg(long, short)]
    verbose: bool,

    /// What to do when the GitHub API rate limit is exhausted [default: wait]
    #[arg(long, value_enum)]
    on_rate_limit: Option<RateLimitBehavior>,

    /// Allow updating to pre-release tags
    #[arg(long)]
    include_prereleases: bool,

    /// Largest version jump allowed [default: major]
    #[arg(long, value_enum)]
    max_bump: Option<MaxBump>,

    /// GitHub API base URL (for GitHub Enterprise Server)
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// JSON configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<UpdaterConfig> {
        let mut config = match &self.config {
            Some(path) => UpdaterConfig::from_file(path)?,
            None => UpdaterConfig::default(),
        };

        if let Some(path) = self.path {
            config.path = path;
        }
        if let Some(token) = self.github_token {
            config.github_token = Some(token);
        }
        if let Some(extensions) = self.extensions {
            config.extensions = parse_extensions(&extensions);
        }
        if let Some(on_rate_limit) = self.on_rate_limit {
            config.on_rate_limit = on_rate_limit;
        }
        if let Some(max_bump) = self.max_bump {
            config.max_bump = max_bump;
        }
        if let Some(api_url) = self.api_url {
            config.api_url = api_url;
        }
        config.dry_run |= self.dry_run;
        config.backup |= self.backup;
        config.recursive |= self.recursive;
        config.include_prereleases |= self.include_prereleases;

        if config.extensions.is_empty() {
            bail!("no file extensions to check");
        }

        Ok(config)
    }
}

/// `RUST_LOG` wins when set and valid; otherwise warn, or debug with `--verbose`
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level.as_str()))
}

fn init_tracing(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(config: UpdaterConfig) -> anyhow::Result<RunReport> {
    let registry = GitHubRegistry::new(
        &config.api_url,
        config.github_token.clone(),
        config.on_rate_limit,
    )?;
    let mut runner = Runner::new(registry, config);
    Ok(runner.run().await?)
}

fn print_report(report: &RunReport) {
    for file in &report.files {
        match &file.outcome {
            FileOutcome::Previewed { changes } => {
                println!("[Dry Run] Would update {}", file.path.display());
                for change in changes {
                    println!("  {:>4} - {}", change.line, change.before.trim_start());
                    println!("  {:>4} + {}", change.line, change.after.trim_start());
                }
            }
            FileOutcome::Written { changes, backup } => {
                println!(
                    "Updated {} ({} line(s) changed)",
                    file.path.display(),
                    changes.len()
                );
                if let Some(backup) = backup {
                    println!("  backup: {}", backup.display());
                }
            }
            FileOutcome::Unchanged => {}
        }
    }

    println!("\nSummary Statistics");
    println!("{}", report.summary);
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.into_config()?;

    let report = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(config))?;

    print_report(&report);
    Ok(())
}
