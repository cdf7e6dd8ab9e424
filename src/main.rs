//! Convoscope - saved conversation feedback analyzer
//!
//! A CLI tool that loads a directory of saved feedback conversations,
//! prints summary metrics and recurring feedback themes, and exports one
//! CSV row per conversation.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing directory, empty corpus, malformed file, etc.)
//!   2 - Average score below --min-avg-score

mod analysis;
mod cli;
mod config;
mod corpus;
mod error;
mod mock;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config must load before logging: `[general] verbose` sets the level
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(args.log_level(config.general.verbose));

    info!("Convoscope v{}", env!("CARGO_PKG_VERSION"));
    source.log();
    debug!("Arguments: {:?}", args);

    match run(args, config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            if let Some(file) = e
                .downcast_ref::<error::AnalysisError>()
                .and_then(error::AnalysisError::filename)
            {
                eprintln!("   Fix or remove {} and run again.", file);
            }
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .convoscope.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the corpus directory, theme count, and more.");
    Ok(())
}

/// Initialize logging at the given level.
///
/// `RUST_LOG` takes precedence over the level picked by --verbose/--quiet.
fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete analysis workflow. Returns exit code (0 or 2).
fn run(args: Args, config: Config) -> Result<i32> {
    let corpus_dir = PathBuf::from(&config.corpus.dir);

    if let Some(count) = args.generate_mock {
        return handle_generate_mock(&corpus_dir, count, args.seed, args.balanced);
    }

    // Step 1: Load the corpus
    let loader = corpus::CorpusLoader::new(&corpus_dir, corpus::LoadConfig::from(&config.corpus));
    let records = loader.load()?;

    // Step 2: Aggregate and rank
    let options = analysis::AnalysisOptions {
        top_n: config.report.top_n,
        focus_top_n: config.report.focus_top_n,
        negative_sentiments: config.report.negative_sentiments.clone(),
        window: analysis::DateWindow::new(args.since, args.until),
    };
    let report = analysis::analyze(records, &config.corpus.dir, &options)?;

    // Step 3: Present
    print!(
        "{}",
        report::generate_console_summary(&report.summary, &report.top_feedback)
    );
    if !report.focus_areas.is_empty() {
        println!("\n=== Focus Areas ===");
        for theme in &report.focus_areas {
            println!("- {}: {} mention(s)", theme.text, theme.count);
        }
    }

    // Step 4: Export
    if !args.no_export {
        let output = args.output_path();
        report::export_csv(
            &report.conversations,
            &output,
            &config.report.feedback_delimiter,
        )?;
        println!("\n📄 Exported detailed report to {}", output.display());
    }

    if let Some(ref path) = args.report {
        let content = match args.format {
            OutputFormat::Json => report::generate_json_report(&report)?,
            OutputFormat::Markdown => report::generate_markdown_report(&report),
        };
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("📝 Report saved to {}", path.display());
    }

    // Check --min-avg-score threshold
    if let Some(threshold) = args.min_avg_score {
        match report.summary.avg_score {
            Some(avg) if avg >= threshold => {}
            Some(avg) => {
                eprintln!(
                    "\n⛔ Average score {} is below {}. Failing (exit code 2).",
                    avg, threshold
                );
                return Ok(2);
            }
            None => {
                eprintln!(
                    "\n⛔ No scored conversations to compare against {}. Failing (exit code 2).",
                    threshold
                );
                return Ok(2);
            }
        }
    }

    Ok(0)
}

/// Handle --generate-mock: write mock conversations and exit.
fn handle_generate_mock(
    dir: &Path,
    count: usize,
    seed: Option<u64>,
    balanced: bool,
) -> Result<i32> {
    println!("🧪 Generating {} mock conversations in {}...", count, dir.display());

    let written = mock::generate_corpus(dir, count, seed, balanced)?;
    for path in &written {
        if let Some(name) = path.file_name() {
            println!("   ✓ {}", name.to_string_lossy());
        }
    }

    println!("\n✅ Generated {} mock conversation files.", written.len());
    Ok(0)
}

/// Where the active configuration came from.
#[derive(Debug)]
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    /// The default file exists but could not be loaded.
    Fallback(String),
}

impl ConfigSource {
    /// Report the source once logging is up.
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigSource::Builtin => debug!("No config file found, using defaults"),
            ConfigSource::Fallback(reason) => warn!("Failed to load config: {}", reason),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigSource::Builtin)),
        Err(e) => Ok((Config::default(), ConfigSource::Fallback(format!("{:#}", e)))),
    }
}
