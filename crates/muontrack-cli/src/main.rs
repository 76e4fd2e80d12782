//! muontrack CLI — event replay and track reconstruction.

mod source;
mod stats;

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use muontrack::{geometry, ReconstructConfig, Reconstructor};
use source::{EventSource, JsonLinesSource};
use stats::RunStatistics;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "muontrack")]
#[command(about = "Reconstruct muon tracks from two-chamber drift-tube events")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct every event of a JSON-lines file.
    Reconstruct {
        /// Input events, one JSON object per line ("-" for stdin).
        #[arg(long)]
        events: PathBuf,

        /// Output events with reconstructions attached (JSON lines).
        #[arg(long)]
        out: PathBuf,

        /// Reconstruction config (JSON). Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the geometry of one tube.
    TubeInfo {
        #[arg(long)]
        tube: u32,
    },

    /// Print the calibrated drift radius for hit timing.
    Radius {
        /// Time of flight (ns).
        #[arg(long, allow_negative_numbers = true)]
        tof: f64,

        /// Time over threshold (ns).
        #[arg(long, allow_negative_numbers = true)]
        tot: f64,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the default configuration as JSON.
    PrintConfig,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Reconstruct {
            events,
            out,
            config,
        } => run_reconstruct(&events, &out, config.as_deref()),
        Commands::TubeInfo { tube } => run_tube_info(tube),
        Commands::Radius { tof, tot, config } => run_radius(tof, tot, config.as_deref()),
        Commands::PrintConfig => run_print_config(),
    }
}

fn load_config(path: Option<&Path>) -> CliResult<ReconstructConfig> {
    match path {
        Some(p) => {
            tracing::info!("Loading config: {}", p.display());
            ReconstructConfig::from_json_file(p).map_err(|e| -> CliError {
                format!("Failed to load config {}: {}", p.display(), e).into()
            })
        }
        None => Ok(ReconstructConfig::default()),
    }
}

// ── reconstruct ────────────────────────────────────────────────────────

fn run_reconstruct(events: &Path, out: &Path, config: Option<&Path>) -> CliResult<()> {
    let reco = Reconstructor::try_new(load_config(config)?)?;

    let mut source: Box<dyn EventSource> = if events == Path::new("-") {
        tracing::info!("Reading events from stdin");
        Box::new(JsonLinesSource::new(std::io::stdin().lock()))
    } else {
        tracing::info!("Reading events from {}", events.display());
        let file = File::open(events).map_err(|e| -> CliError {
            format!("Failed to open events {}: {}", events.display(), e).into()
        })?;
        Box::new(JsonLinesSource::new(BufReader::new(file)))
    };
    let mut writer = BufWriter::new(File::create(out)?);

    let start = Instant::now();
    let mut stats = RunStatistics::default();
    while let Some(next) = source.next_event() {
        let mut event = next?;
        event.reconstruction = reco.reconstruct_event(&event);
        match &event.reconstruction {
            Some(r) => tracing::debug!(
                "{} → theta={:.2}°, phi={:.2}°",
                event.summary(),
                r.theta_deg,
                r.phi_deg
            ),
            None => tracing::debug!("{} → not reconstructed", event.summary()),
        }
        serde_json::to_writer(&mut writer, &event)?;
        writer.write_all(b"\n")?;
        stats.record(&event);
    }
    writer.flush()?;
    stats.finish_since(start);

    tracing::info!(
        "Processed {} events ({} hits), reconstructed {} ({:.1}%)",
        stats.events,
        stats.total_hits,
        stats.reconstructed_events,
        100.0 * stats.reconstruction_efficiency,
    );
    tracing::info!(
        "Runtime {:.2}s, {:.1} events/s, {:.1} hits/s",
        stats.runtime_seconds,
        stats.event_rate,
        stats.hit_rate,
    );
    tracing::info!("Results written to {}", out.display());
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}

// ── tube-info ──────────────────────────────────────────────────────────

fn run_tube_info(tube: u32) -> CliResult<()> {
    let loc = geometry::tube_location(tube)?;
    let [x, y] = loc.position();

    println!("tube {}", loc.tube);
    println!("  chamber:        {}", loc.chamber);
    println!("  layer:          {}", loc.layer);
    println!("  tube in layer:  {}", loc.tube_in_layer);
    println!("  row:            {}", loc.row);
    println!("  position:       ({:.1}, {:.1})", x, y);

    Ok(())
}

// ── radius ─────────────────────────────────────────────────────────────

fn run_radius(tof: f64, tot: f64, config: Option<&Path>) -> CliResult<()> {
    let config = load_config(config)?;
    let r = config.calibration.radius(tof, tot);
    println!("tof={} ns, tot={} ns → r={:.6}", tof, tot, r);
    Ok(())
}

// ── print-config ───────────────────────────────────────────────────────

fn run_print_config() -> CliResult<()> {
    let json = serde_json::to_string_pretty(&ReconstructConfig::default())?;
    println!("{}", json);
    Ok(())
}
