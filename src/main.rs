//! Resourceset CLI entrypoint.
//!
//! This is the main entrypoint for the resourceset command-line tool.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use temporal_resourceset::cli::{Cli, Commands, OutputFormatter};
use temporal_resourceset::config::{
    find_spec_file, ClusterSpec, ConfigHasher, ConfigParser, ConfigValidator,
};
use temporal_resourceset::error::Result;
use temporal_resourceset::planner::{PlanDiff, Planner};

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Dispatches the selected command.
fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Validate { warnings } => cmd_validate(cli.config.as_ref(), warnings, &formatter),
        Commands::Plan { detailed } => cmd_plan(cli.config.as_ref(), detailed, &formatter),
        Commands::Diff { previous } => cmd_diff(cli.config.as_ref(), &previous, &formatter),
        Commands::Catalog => {
            println!("{}", formatter.format_catalog());
            Ok(())
        }
    }
}

/// Validate the cluster specification.
fn cmd_validate(
    config_path: Option<&PathBuf>,
    show_warnings: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let spec_file = resolve_config_path(config_path)?;
    info!("Validating specification: {}", spec_file.display());

    let parser = parser_for(&spec_file)?;
    let spec = parser.load_with_env(&spec_file)?;

    let result = ConfigValidator::new().validate(&spec)?;
    println!("{}", formatter.format_validation(&spec, &result, show_warnings));

    Ok(())
}

/// Show the resources to create and to prune.
fn cmd_plan(config_path: Option<&PathBuf>, detailed: bool, formatter: &OutputFormatter) -> Result<()> {
    let spec_file = resolve_config_path(config_path)?;
    let spec = load_spec(&spec_file)?;

    let spec_hash = ConfigHasher::new().hash_spec(&spec)?;
    let plan = Planner::new().plan(&spec)?;

    println!("{}", formatter.format_plan(&spec, &plan, &spec_hash, detailed));

    Ok(())
}

/// Compare the plan of a previous specification with the current one.
fn cmd_diff(config_path: Option<&PathBuf>, previous: &Path, formatter: &OutputFormatter) -> Result<()> {
    let spec_file = resolve_config_path(config_path)?;
    let current = load_spec(&spec_file)?;
    let old = load_spec(previous)?;

    let hasher = ConfigHasher::new();
    let current_hash = hasher.hash_spec(&current)?;
    let old_hash = hasher.hash_spec(&old)?;
    if ConfigHasher::hashes_match(&current_hash, &old_hash) {
        debug!("Specifications are identical ({})", hasher.short_hash(&current_hash));
    }

    let planner = Planner::new();
    let diff = PlanDiff::between(&planner.plan(&old)?, &planner.plan(&current)?);

    println!("{}", formatter.format_diff(&diff));

    Ok(())
}

/// Resolves the specification file path.
fn resolve_config_path(config_path: Option<&PathBuf>) -> Result<PathBuf> {
    config_path.map_or_else(|| find_spec_file("."), |path| Ok(path.clone()))
}

/// Creates a parser rooted next to `spec_file` and loads its `.env`.
fn parser_for(spec_file: &Path) -> Result<ConfigParser> {
    let parser = ConfigParser::new().with_base_path(spec_file.parent().unwrap_or_else(|| Path::new(".")));
    parser.load_dotenv()?;
    Ok(parser)
}

/// Loads and validates a specification.
fn load_spec(spec_file: &Path) -> Result<ClusterSpec> {
    debug!("Loading specification from: {}", spec_file.display());

    let spec = parser_for(spec_file)?.load_with_env(spec_file)?;
    ConfigValidator::new().validate(&spec)?;

    Ok(spec)
}
