//! Gradewalk - grading-activity statistics for codePost-style platforms
//!
//! A CLI tool that walks a course's assignments, submissions, and
//! comments, feeds every record to a set of counting analyzers, and
//! renders the results as a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, traversal failure, etc.)

use anyhow::{Context, Result};
use chrono::Utc;
use gradewalk::analyzer::standard::builtin_table;
use gradewalk::analyzer::{AnalyzerSource, Registry};
use gradewalk::cli::{Args, OutputFormat};
use gradewalk::client::HttpGradebook;
use gradewalk::config::Config;
use gradewalk::engine::CourseEventLoop;
use gradewalk::report::{self, ReportMetadata, StatsReport};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle the offline modes early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }
    if args.list_analyzers {
        return handle_list_analyzers();
    }

    // Initialize logging
    init_logging(&args);

    info!("Gradewalk v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the statistics collection
    match run_stats(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .gradewalk.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".gradewalk.toml");

    if path.exists() {
        eprintln!("⚠️  .gradewalk.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .gradewalk.toml")?;

    println!("✅ Created .gradewalk.toml with default settings.");
    println!("   Edit it to set the course, period, and analyzer options.");
    Ok(())
}

/// Handle --list-analyzers: print the built-in analyzer names.
fn handle_list_analyzers() -> Result<()> {
    println!("Built-in analyzers:");
    for (name, _) in builtin_table() {
        println!("  {}", name);
    }
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete statistics workflow.
async fn run_stats(args: Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration and let CLI flags win
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let course = config
        .run
        .course
        .clone()
        .context("No course set; pass --course or set it in .gradewalk.toml")?;
    let period = config
        .run
        .period
        .clone()
        .context("No period set; pass --period or set it in .gradewalk.toml")?;
    let api_key = args
        .api_key
        .clone()
        .context("No API key set; pass --api-key or set GRADEWALK_API_KEY")?;

    println!("🔌 Connecting to {}", config.platform.api_url);
    let client = HttpGradebook::new(
        &config.platform.api_url,
        &api_key,
        config.platform.timeout_seconds,
    )?;

    // Build the analyzer registry
    let registry = build_registry(&config)?;
    let analyzer_count = registry.len();
    println!("🧮 Analyzers: {}", registry.names().join(", "));

    let mut event_loop = CourseEventLoop::new(client, registry, &course, &period);
    if let Some(ref assignments) = config.run.assignments {
        info!("Restricting run to assignments: {:?}", assignments);
        event_loop.select_assignments(assignments.clone());
    }

    // Walk the course
    println!("\n🚶 Walking course {} ({})...", course, period);
    let spinner = make_spinner(args.quiet);
    let summary = event_loop.run().await;
    spinner.finish_and_clear();
    let summary = summary?;

    let duration = start_time.elapsed().as_secs_f64();

    // Build the report
    println!("📝 Generating report...");

    let metadata = ReportMetadata {
        course,
        period,
        generated_at: Utc::now(),
        analyzer_count,
        assignments: summary.assignments,
        rooms: summary.rooms,
        submissions: summary.submissions,
        comments: summary.comments,
        duration_seconds: duration,
    };

    let stats_report = StatsReport {
        metadata,
        analyzers: event_loop.all_stats(),
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&stats_report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&stats_report),
    };

    std::fs::write(&args.output, &output)
        .with_context(|| format!("Failed to write report to {}", args.output.display()))?;

    // Print summary
    println!("\n📊 Run Summary:");
    println!("   Assignments: {}", summary.assignments);
    if summary.rooms > 0 {
        println!("   Rooms: {}", summary.rooms);
    }
    println!("   Submissions: {}", summary.submissions);
    println!("   Comments: {}", summary.comments);
    println!("   Duration: {:.1}s", duration);
    println!(
        "\n✅ Done! Report saved to: {}",
        args.output.display()
    );

    Ok(())
}

/// A spinner for the traversal phase; hidden in quiet mode.
fn make_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Fetching records...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Register the requested analyzers and apply their config options.
fn build_registry(config: &Config) -> Result<Registry> {
    let table = builtin_table();

    let sources: Vec<AnalyzerSource> = match config.run.analyzers {
        Some(ref wanted) => {
            for name in wanted {
                if !table.iter().any(|(known, _)| known == name) {
                    anyhow::bail!(
                        "Unknown analyzer `{}`; see --list-analyzers for the available names",
                        name
                    );
                }
            }
            table
                .into_iter()
                .filter(|(name, _)| wanted.iter().any(|w| w == name))
                .map(|(_, factory)| AnalyzerSource::Factory(factory))
                .collect()
        }
        None => table
            .into_iter()
            .map(|(_, factory)| AnalyzerSource::Factory(factory))
            .collect(),
    };

    let mut registry = Registry::from_table(sources)?;

    // Hand each `[analyzers.<name>]` table to its analyzer
    for (name, options) in &config.analyzers {
        match registry.resolve_mut(name) {
            Ok(analyzer) => analyzer
                .configure(options)
                .with_context(|| format!("Invalid options for analyzer `{}`", name))?,
            Err(_) => warn!("Options given for analyzer `{}`, which is not registered", name),
        }
    }

    Ok(registry)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .gradewalk.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
