// fairdeal entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (log to file; mirrored to stderr with --verbose)
// 3. Load config (copying defaults on first run)
// 4. Run the subcommand and print its report to stdout

use fairdeal_app::cli::{self, Cli, Commands, OutputFormat, StructureArgs, ValueArgs};
use fairdeal_app::config::{self, Config};
use fairdeal_app::report::{self, StructureReport, ValuationReport};
use fairdeal_app::selection;
use fairdeal_baseball::contract;
use fairdeal_baseball::player::PlayerType;
use fairdeal_baseball::roster;
use fairdeal_baseball::valuation;

use anyhow::Context;
use clap::Parser;
use std::path::Path;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.config_dir, cli.verbose).context("failed to initialize logging")?;
    info!("fairdeal starting");

    let config = config::load_config(&cli.config_dir).context("failed to load configuration")?;
    info!("configuration loaded from {}", cli.config_dir.display());

    let output = match &cli.command {
        Commands::Value(args) => run_value(&cli.config_dir, &config, args, cli.format)?,
        Commands::Structure(args) => run_structure(args, cli.format)?,
        Commands::Comps {
            player_type,
            position,
        } => {
            let (hitters, pitchers) = config.data_paths.resolve(&cli.config_dir);
            let roster =
                roster::load_roster(&hitters, &pitchers).context("failed to load rosters")?;
            let comps = selection::candidate_comps(
                &roster,
                PlayerType::from(*player_type),
                position.as_deref(),
            );
            match cli.format {
                OutputFormat::Table => report::render_comps(&comps),
                OutputFormat::Json => {
                    report::comps_json(&comps).context("failed to serialize comparables")?
                }
            }
        }
        Commands::Stats {
            player_type,
            position,
        } => {
            let player_type = PlayerType::from(*player_type);
            let weights = selection::build_weights(
                player_type,
                position.as_deref().unwrap_or_default(),
                config.weights.for_type(player_type),
                &[],
            )
            .context("failed to build stat weights")?;
            match cli.format {
                OutputFormat::Table => report::render_stats(player_type, &weights),
                OutputFormat::Json => report::stats_json(player_type, &weights)
                    .context("failed to serialize stat listing")?,
            }
        }
    };

    println!("{output}");
    Ok(())
}

fn run_value(
    base_dir: &Path,
    config: &Config,
    args: &ValueArgs,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let engine = args.engine(&config.engine);
    config::validate_engine(&engine).context("invalid valuation settings")?;

    let (config_hitters, config_pitchers) = config.data_paths.resolve(base_dir);
    let hitters = args.hitters.clone().unwrap_or(config_hitters);
    let pitchers = args.pitchers.clone().unwrap_or(config_pitchers);
    let roster = roster::load_roster(&hitters, &pitchers).context("failed to load rosters")?;

    // Config weight overrides are keyed by the subject's player type.
    let request = args.request(&engine);
    let subject_type = request
        .subject_id
        .as_deref()
        .and_then(|id| roster.get(id))
        .map_or(PlayerType::Hitter, |p| p.player_type());
    let sel = selection::select(&roster, &request, config.weights.for_type(subject_type))
        .context("invalid selection")?;

    let settings = cli::valuation_settings(&engine);
    let result = valuation::value_player(sel.subject, &sel.cohort, &sel.weights, &settings);
    info!(
        "valued {} against {} comps: {:.2}M x {:.1} yrs",
        result.subject_name,
        sel.cohort.comps.len(),
        result.fair_aav,
        result.fair_years
    );

    let report = ValuationReport::new(
        &result,
        &settings,
        &sel.cohort.position,
        engine.inflation_pct,
    );
    Ok(match format {
        OutputFormat::Table => report::render_valuation(&report),
        OutputFormat::Json => report::to_json(&report).context("failed to serialize valuation")?,
    })
}

fn run_structure(args: &StructureArgs, format: OutputFormat) -> anyhow::Result<String> {
    let terms = args.terms().context("failed to read contract terms")?;
    config::validate_terms(&terms).context("invalid contract terms")?;
    let structure = contract::simulate(&terms);
    let report = StructureReport::new(&terms, &structure);
    Ok(match format {
        OutputFormat::Table => report::render_structure(&report),
        OutputFormat::Json => report::to_json(&report).context("failed to serialize structure")?,
    })
}

/// Initialize tracing to write to `logs/fairdeal.log` under `base_dir`.
fn init_tracing(base_dir: &Path, verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
    use tracing_subscriber::EnvFilter;

    let log_dir = base_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("fairdeal.log"))?;
    let writer = if verbose {
        BoxMakeWriter::new(log_file.and(std::io::stderr))
    } else {
        BoxMakeWriter::new(log_file)
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fairdeal=info,warn")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
