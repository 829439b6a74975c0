use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::ConfigArgs;
use engine::{snap_stress_band, ControlsUpdate, NormalizedViewModel, ViewModelEngine, ViewModelSession};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod file_source;

use file_source::FilePayloadSource;

/// The main entry point for the DealShield decision engine.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file, if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_dir.as_deref())?;

    match cli.command {
        Commands::Normalize(args) => handle_normalize(args, &cli.config).await,
        Commands::SnapBand(args) => handle_snap_band(args, &cli.config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Resolves investment decisions and formats underwriting metrics from analysis payloads.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Also write daily-rotated logs into this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize an analysis payload file into a view model.
    Normalize(NormalizeArgs),
    /// Show which stress band a requested value snaps to.
    SnapBand(SnapBandArgs),
}

#[derive(Parser)]
struct NormalizeArgs {
    /// Path to the JSON analysis payload.
    #[arg(long)]
    payload: PathBuf,

    /// Project the payload belongs to.
    #[arg(long, default_value = "local")]
    project: String,

    /// Requested stress band in percent; snapped to the configured set.
    #[arg(long)]
    stress_band: Option<Decimal>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Parser)]
struct SnapBandArgs {
    /// The requested band, e.g. `7` or `6.5`.
    value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

// ==============================================================================
// Tracing
// ==============================================================================

/// Installs the global subscriber. `RUST_LOG` wins; the default level is `info`.
///
/// The returned guard must stay alive for file logs to be flushed.
fn init_tracing(log_dir: Option<&std::path::Path>) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "dealshield.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(Some(guard))
        }
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(None)
        }
    }
}

// ==============================================================================
// Command Handlers
// ==============================================================================

async fn handle_normalize(args: NormalizeArgs, config: &ConfigArgs) -> Result<()> {
    let config = config.load().context("Failed to load engine configuration")?;
    let engine = Arc::new(ViewModelEngine::new(config).context("Invalid engine configuration")?);
    let source = Arc::new(FilePayloadSource::new(args.payload.clone()));
    let session = ViewModelSession::new(source, engine);

    let view_model = match args.stress_band {
        Some(band) => {
            let update = ControlsUpdate { stress_band_pct: Some(band), ..ControlsUpdate::default() };
            session.update_controls(&args.project, update).await
        }
        None => session.load(&args.project).await,
    }
    .with_context(|| format!("Failed to normalize {}", args.payload.display()))?;

    match args.output {
        OutputFormat::Json => println!("{}", view_model.to_json()?),
        OutputFormat::Table => print_view_model(&view_model),
    }
    Ok(())
}

fn handle_snap_band(args: SnapBandArgs, config: &ConfigArgs) -> Result<()> {
    let config = config.load().context("Failed to load engine configuration")?;
    let band = snap_stress_band(Some(args.value), &config.controls);
    println!("{}", band);
    Ok(())
}

// ==============================================================================
// Table Output
// ==============================================================================

fn print_view_model(vm: &NormalizedViewModel) {
    println!(
        "Decision: {} ({:?}) - {}",
        vm.decision_status.label(),
        vm.status_source,
        vm.decision_reason.text
    );
    if let Some(profile_id) = vm.profile_id.as_deref() {
        println!("Profile: {} [{}]", profile_id, vm.profile_family);
    }

    let mut scenarios = Table::new();
    scenarios.load_preset(UTF8_FULL);
    let mut header = vec!["Scenario".to_string()];
    header.extend(vm.columns.iter().map(|column| column.label.clone()));
    scenarios.set_header(header);
    for row in &vm.rows {
        let mut line = vec![row.label.clone()];
        line.extend(vm.columns.iter().map(|column| {
            row.cells
                .iter()
                .find(|cell| cell.col_id == column.id)
                .map(|cell| cell.formatted.clone())
                .unwrap_or_else(|| core_types::MISSING_PLACEHOLDER.to_string())
        }));
        scenarios.add_row(line);
    }
    println!("{scenarios}");

    let s = &vm.summary;
    let di = &vm.decision_insurance;
    let mut summary = Table::new();
    summary.load_preset(UTF8_FULL);
    summary.set_header(vec!["Metric", "Value"]);
    for (label, value) in [
        ("Stabilized value", &s.stabilized_value),
        ("Total cost", &s.total_cost),
        ("Value gap", &s.value_gap),
        ("Value gap %", &s.value_gap_pct),
        ("Yield on cost", &s.yield_on_cost),
        ("Market cap rate", &s.market_cap_rate),
        ("Yield/cap spread", &s.yield_cap_spread),
        ("DSCR", &s.dscr),
        ("NOI shortfall", &s.noi_shortfall),
        ("Primary control variable", &di.primary_control_variable),
        ("First break", &di.first_break_condition),
        ("Flex before break", &di.flex_before_break),
        ("Exposure concentration", &di.exposure_concentration),
    ] {
        summary.add_row(vec![label, value.as_str()]);
    }
    println!("{summary}");

    for item in &di.ranked_likely_wrong {
        println!("  {}", item);
    }
    for reason in &vm.unavailable_reasons {
        println!("Unavailable: {}", reason);
    }
    println!("Stress band: {}%", vm.controls.stress_band_pct);
}
