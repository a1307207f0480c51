use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use locator::{
    FixValidator, HeadingTracker, HttpTransport, LocationReporter, LocationUpdate, PayloadAssembler,
    PhoneStore, ReportOutcome, ReporterConfig, SensorCache, TermuxLocationSource,
};
use locator::algorithms::Compass;
use locator::processing::parse_track_line;
use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Movement-derived heading and location reporting", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default configuration file
    InitConfig { path: PathBuf },
    /// Periodically send this device's location to the map server
    Report {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Run a single cycle and print its outcome
        #[arg(long)]
        once: bool,
        /// Stop after this many cycles
        #[arg(long)]
        cycles: Option<u64>,
    },
    /// Estimate headings for fixes read from a JSON-lines file
    Replay { path: PathBuf },
    /// Inspect or update the stored device positions
    Phones {
        data_dir: PathBuf,
        #[command(subcommand)]
        action: Option<PhonesAction>,
    },
}

#[derive(Subcommand, Debug)]
enum PhonesAction {
    /// Store a position for one device
    Update {
        id: String,
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.command {
        Command::InitConfig { path } => init_config(path),
        Command::Report { config, once, cycles } => report(config, once, cycles),
        Command::Replay { path } => replay(path),
        Command::Phones { data_dir, action } => phones(data_dir, action),
    }
}

fn init_config(path: PathBuf) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    ReporterConfig::default().save_to_file(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn report(config_path: Option<PathBuf>, once: bool, cycles: Option<u64>) -> Result<()> {
    let config = match &config_path {
        Some(path) => ReporterConfig::load_from_file(path)?,
        None => ReporterConfig::default(),
    };
    for warning in config.validate().warnings {
        warn!("Configuration: {}", warning);
    }

    let source = TermuxLocationSource::new(config.location_command.clone(), config.location_timeout())
        .with_args(config.location_args.clone());
    let transport = HttpTransport::new(&config.server_url, config.http_timeout())?
        .with_retries(config.retry_count, config.retry_delay());
    let cache = SensorCache::new(config.estimator, Compass::new(config.declination_deg));

    let mut reporter = LocationReporter::new(
        source,
        transport,
        PayloadAssembler::new(config.device_id.clone()),
        config.interval(),
    )
    .with_cache(cache)
    .with_validator(FixValidator::with_config(config.validation));

    info!(
        "Starting GPS location sender for {} to {}",
        config.device_id,
        reporter.transport().endpoint()
    );

    if once {
        match reporter.report_once()? {
            ReportOutcome::Skipped => println!("No location available"),
            ReportOutcome::Rejected { error } => println!("Fix rejected: {}", error),
            ReportOutcome::Sent { update, ack } => {
                println!("{}", serde_json::to_string(&update)?);
                if let Some(status) = ack.status {
                    println!("Server: {}", status);
                }
            }
        }
        return Ok(());
    }

    reporter.run(cycles)?;
    let stats = reporter.stats();
    info!(
        "Finished {} cycles: {} sent, {} skipped, {} rejected, {} failed",
        stats.cycles, stats.sent, stats.skipped, stats.rejected, stats.errors
    );
    Ok(())
}

fn replay(path: PathBuf) -> Result<()> {
    let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut tracker = HeadingTracker::new();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record = match parse_track_line(&line) {
            Ok(record) => record,
            Err(e) => {
                warn!("Line {}: {}", index + 1, e);
                continue;
            }
        };
        let fix = record.to_fix();
        if let Err(e) = FixValidator::check_coordinates(&fix) {
            warn!("Line {}: {}", index + 1, e);
            continue;
        }

        let id = record.id.as_deref().unwrap_or("track");
        match tracker.record_and_estimate(id, fix).filter(|h| h.is_valid()) {
            Some(heading) => println!(
                "{} {:.6},{:.6} heading {:.1}° {} over {:.1} m",
                id, fix.lat, fix.lon, heading.bearing_deg, heading.cardinal, heading.distance_m
            ),
            None => println!("{} {:.6},{:.6} no heading", id, fix.lat, fix.lon),
        }
    }
    Ok(())
}

fn phones(data_dir: PathBuf, action: Option<PhonesAction>) -> Result<()> {
    let store = PhoneStore::new(&data_dir);

    if let Some(PhonesAction::Update { id, lat, lng }) = action {
        store.update_location(&LocationUpdate {
            id,
            lat,
            lng,
            heading: None,
            accuracy: None,
        })?;
    }

    for (id, phone) in store.load_all()? {
        match phone.heading {
            Some(heading) => println!("{}: {:.6},{:.6} heading {:.1}°", id, phone.lat, phone.lng, heading),
            None => println!("{}: {:.6},{:.6}", id, phone.lat, phone.lng),
        }
    }
    Ok(())
}
