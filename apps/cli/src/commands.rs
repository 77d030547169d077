//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use skillpress_core::pipeline::{self, FetchSummary, ProgressReporter, UrlOutcome};
use skillpress_shared::{AppConfig, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// SkillPress — fetch documentation as markdown and bundle skills.
#[derive(Parser)]
#[command(
    name = "skillpress",
    version,
    about = "Fetch a documentation site as clean markdown and build single-file skill distributions.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch the documentation site and convert articles to markdown.
    Fetch {
        /// Re-download and re-convert all pages (ignore cache).
        #[arg(long)]
        force: bool,
    },

    /// Build single-file skill distributions.
    Bundle,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "skillpress=info",
        1 => "skillpress=debug",
        _ => "skillpress=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Fetch { force } => cmd_fetch(force).await,
        Command::Bundle => cmd_bundle().await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_fetch(force: bool) -> Result<()> {
    let config = load_config()?;

    info!(
        sitemap = %config.fetch.sitemap_url,
        force,
        "starting documentation fetch"
    );

    let reporter = CliProgress::new();
    let summary = pipeline::run_fetch(&config.fetch, force, &reporter).await?;

    println!();
    println!("  Done!");
    println!("  Converted:  {}", summary.ok);
    println!("  Cached:     {}", summary.skipped);
    println!("  No content: {}", summary.no_content);
    println!("  Failed:     {}", summary.failed);

    let output_dir = std::path::Path::new(&config.fetch.output_dir);
    let shown = std::fs::canonicalize(output_dir).unwrap_or_else(|_| output_dir.to_path_buf());
    println!("  Output:     {}", shown.display());
    println!();

    Ok(())
}

async fn cmd_bundle() -> Result<()> {
    let config = load_config()?;

    info!(
        skills_dir = %config.bundle.skills_dir,
        "building skill distributions"
    );

    let report = skillpress_bundle::build_all(&config.bundle)?;

    for skill in &report.skills {
        println!(
            "  {}: {} lines, {:.0} KB -> {}",
            skill.name,
            skill.lines,
            skill.size_bytes as f64 / 1024.0,
            skill.path.display()
        );
    }
    if let Some(combined) = &report.combined {
        println!("  ALL -> {}", combined.display());
    }
    println!("Done. {} skill(s) built.", report.skills.len());

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter: spinner for phases, one printed line per URL.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn url_done(&self, short_url: &str, outcome: UrlOutcome, current: usize, total: usize) {
        let icon = match outcome {
            UrlOutcome::Ok => "[OK]  ",
            UrlOutcome::Skip => "[SKIP]",
            UrlOutcome::Fail => "[FAIL]",
            UrlOutcome::NoContent => "[----]",
        };
        self.spinner.println(format!("  {icon} {short_url}"));
        self.spinner
            .set_message(format!("Processing [{current}/{total}]"));
    }

    fn done(&self, _summary: &FetchSummary) {
        self.spinner.finish_and_clear();
    }
}
