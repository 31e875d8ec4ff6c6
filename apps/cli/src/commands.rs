//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::Section;
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use notionsync_core::{ProgressReporter, SyncReport};
use notionsync_notion::NotionClient;
use notionsync_shared::{
    AppConfig, SyncConfig, init_config, load_config, load_config_from, resolve_credentials,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Export Notion database pages to Markdown files.
#[derive(Parser)]
#[command(
    name = "notion-sync",
    version,
    about = "Export completed Notion database pages to a local Markdown tree.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file to use instead of ~/.notionsync/notionsync.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to `sync` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
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
    /// Export matching pages to Markdown files.
    Sync(SyncArgs),

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Flags for `sync`. Each one overrides the config file.
#[derive(Args, Debug, Default)]
pub(crate) struct SyncArgs {
    /// Root directory for the written Markdown files.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Status value pages must have to be exported.
    #[arg(short, long)]
    pub status: Option<String>,

    /// Notion integration token (falls back to the configured env var).
    #[arg(long)]
    pub api_key: Option<String>,

    /// Database ID (falls back to the configured env var).
    #[arg(long)]
    pub database_id: Option<String>,
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
        0 => "notionsync=info",
        1 => "notionsync=debug",
        _ => "notionsync=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

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
    let config_path = cli.config.as_deref();
    match cli.command {
        None => cmd_sync(config_path, SyncArgs::default()).await,
        Some(Command::Sync(args)) => cmd_sync(config_path, args).await,
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load the config file named on the command line, or the default one.
fn load_app_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Fold `sync` flags into the file config.
fn apply_overrides(config: &mut AppConfig, args: &SyncArgs) {
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.to_string_lossy().into_owned();
    }
    if let Some(status) = &args.status {
        config.notion.status_value = status.clone();
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_sync(config_path: Option<&Path>, args: SyncArgs) -> Result<()> {
    let mut app_config = load_app_config(config_path)?;
    apply_overrides(&mut app_config, &args);
    app_config.output.ensure_dir()?;

    let credentials = resolve_credentials(
        &app_config.notion,
        args.api_key,
        args.database_id,
        |name| std::env::var(name).ok(),
    )
    .suggestion(format!(
        "export {} and {}, or pass --api-key / --database-id",
        app_config.notion.api_key_env, app_config.notion.database_id_env
    ))?;

    let sync_config = SyncConfig::new(&app_config, credentials)?;
    let client = NotionClient::new(&sync_config)?;

    info!(
        database_id = %sync_config.credentials.database_id,
        status = %sync_config.status_value,
        output_dir = %sync_config.output_dir.display(),
        "starting sync"
    );

    let reporter = CliProgress::new();
    let report = notionsync_core::sync(&sync_config, &client, &reporter).await;
    reporter.spinner.finish_and_clear();
    let report = report?;

    print_summary(&report, &sync_config);
    Ok(())
}

fn print_summary(report: &SyncReport, config: &SyncConfig) {
    println!();
    if report.pages_matched == 0 {
        println!(
            "  No pages with {} = '{}' found. Nothing to sync.",
            config.status_property, config.status_value
        );
    } else {
        println!("  Sync completed successfully!");
        println!("  Pages:     {}", report.pages_matched);
        println!("  Written:   {}", report.files_written.len());
        println!("  Fallbacks: {}", report.fallback_paths);
        println!("  Output:    {}", config.output_dir.display());
    }
    println!("  Time:      {:.1}s", report.elapsed.as_secs_f64());
    println!();
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = load_app_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_started(&self, page_id: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Fetching [{current}/{total}] {page_id}"));
    }

    fn page_written(&self, path: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Saved [{current}/{total}] {path}"));
    }

    fn done(&self, _report: &SyncReport) {
        self.spinner.finish_and_clear();
    }
}
