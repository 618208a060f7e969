mod antenna;
mod clock;
mod config;
mod predict;
mod tracker;

use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::sync::{mpsc, oneshot};

use crate::antenna::Antenna;
use crate::clock::Clock;
use crate::config::{Config, ConfigError};
use crate::predict::PositionOracle;
use crate::tracker::{TrackerSettings, TrackingController, Visibility};

const STALE_ELEMENTS: Duration = Duration::days(14);

#[derive(Parser)]
#[command(name = "satowl")]
#[command(about = "Point an az/el antenna rotor at a satellite and keep it there")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track the configured satellite until interrupted
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Print one JSON report per cycle on stdout
        #[arg(long)]
        json: bool,
    },
    /// Validate a configuration file and its element set
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the look angle for a single instant
    Look {
        #[arg(short, long)]
        config: PathBuf,
        /// RFC 3339 timestamp, defaults to the configured clock
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
}

struct Setup {
    config: Config,
    oracle: PositionOracle,
    settings: TrackerSettings,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, json } => run(&config, json).await,
        Commands::Validate { config } => validate(&config),
        Commands::Look { config, at } => look(&config, at),
    }
}

fn load(path: &Path) -> Result<Setup, ConfigError> {
    let config = Config::from_file(path)?;
    let station = config.ground_station()?;
    let tle = config.load_tle()?;
    let oracle = PositionOracle::new(station, &tle)?;
    let settings = config.tracker_settings()?;
    Ok(Setup {
        config,
        oracle,
        settings,
    })
}

fn load_or_report(path: &Path) -> Option<Setup> {
    match load(path) {
        Ok(setup) => Some(setup),
        Err(e) => {
            eprintln!("Configuration error in {}: {}", path.display(), e);
            None
        }
    }
}

async fn run(path: &Path, json: bool) -> ExitCode {
    let Some(setup) = load_or_report(path) else {
        return ExitCode::FAILURE;
    };
    let antenna = match setup.config.antenna.open() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Configuration error in {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let clock = setup.config.clock.build();

    if let Some(name) = &setup.config.station.name {
        log::info!("Station {}", name);
    }
    log::info!(
        "Tracking {} (NORAD {})",
        setup.oracle.elements().object_name.as_deref().unwrap_or("unnamed"),
        setup.oracle.elements().norad_id
    );
    warn_if_stale(&setup.oracle, clock.now());

    track(setup, antenna, clock, json).await;
    ExitCode::SUCCESS
}

async fn track(setup: Setup, antenna: Box<dyn Antenna>, clock: Box<dyn Clock>, json: bool) {
    let (stop_tx, stop_rx) = oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("Interrupted, stopping");
                let _ = stop_tx.send(());
            }
            Err(e) => {
                log::error!("Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await
            }
        }
    });

    let mut controller = TrackingController::new(setup.oracle, antenna, clock, setup.settings);

    let printer = if json {
        let (tx, mut rx) = mpsc::unbounded_channel();
        controller = controller.with_reports(tx);
        Some(tokio::spawn(async move {
            while let Some(report) = rx.recv().await {
                match serde_json::to_string(&report) {
                    Ok(line) => println!("{}", line),
                    Err(e) => log::warn!("Cannot encode report: {}", e),
                }
            }
        }))
    } else {
        None
    };

    controller.run(stop_rx).await;
    drop(controller);

    if let Some(printer) = printer {
        let _ = printer.await;
    }
}

fn validate(path: &Path) -> ExitCode {
    let Some(setup) = load_or_report(path) else {
        return ExitCode::FAILURE;
    };
    let Setup {
        config,
        oracle,
        settings,
    } = setup;
    let station = oracle.station();
    let elements = oracle.elements();
    let now = config.clock.build().now();

    println!("Configuration is valid");
    println!(
        "  station: {} at {:.6}, {:.6}, {} m (declination {:+.2}°)",
        config.station.name.as_deref().unwrap_or("unnamed"),
        station.latitude_deg,
        station.longitude_deg,
        station.altitude_m,
        settings.magnetic_declination_deg
    );
    println!(
        "  satellite: {} (NORAD {})",
        elements.object_name.as_deref().unwrap_or("unnamed"),
        elements.norad_id
    );
    println!(
        "  epoch: {} ({:.1} days old)",
        oracle.epoch(),
        oracle.epoch_age(now).num_minutes() as f64 / 1440.0
    );
    println!(
        "  inclination {:.4}°, eccentricity {:.7}, mean motion {:.8} rev/day",
        elements.inclination, elements.eccentricity, elements.mean_motion
    );
    println!(
        "  tracker: {} steps every {:?}, idle {:?}, precision {}°",
        settings.correction_steps,
        settings.step_interval,
        settings.cycle_period,
        settings.precision_deg
    );
    println!("  antenna: {:?}", config.antenna);

    warn_if_stale(&oracle, now);
    ExitCode::SUCCESS
}

fn look(path: &Path, at: Option<DateTime<Utc>>) -> ExitCode {
    let Some(setup) = load_or_report(path) else {
        return ExitCode::FAILURE;
    };
    let at = at.unwrap_or_else(|| setup.config.clock.build().now());

    match setup.oracle.compute_look_angle(at) {
        Ok(obs) => {
            println!("{}", at);
            println!(
                "  azimuth {:.2}°, elevation {:.2}°, range {:.1} km ({:?})",
                obs.look.azimuth_deg,
                obs.look.elevation_deg,
                obs.range_km,
                Visibility::classify(obs.look.elevation_deg)
            );
            println!(
                "  sub-satellite point {:.4}°, {:.4}° at {:.1} km",
                obs.ground.latitude_deg, obs.ground.longitude_deg, obs.ground.altitude_km
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("No position for {}: {}", at, e);
            ExitCode::FAILURE
        }
    }
}

fn warn_if_stale(oracle: &PositionOracle, now: DateTime<Utc>) {
    let age = oracle.epoch_age(now);
    if age > STALE_ELEMENTS {
        log::warn!(
            "Element set epoch {} is {} days old, predictions will drift",
            oracle.epoch(),
            age.num_days()
        );
    }
}
