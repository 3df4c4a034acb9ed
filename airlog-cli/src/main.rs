//! airlog - environmental sensor logger
//!
//! Samples every configured sensor once per cycle, in parallel, and posts
//! whatever arrived to the telemetry endpoint.
//!
//! ## Environment Variables
//! - `AIRLOG_CONFIG`: deployment file (default: built-in reference deployment)
//! - `AIRLOG_DEVICE` / `XM2XDEVICE`: device id on the telemetry service
//! - `AIRLOG_API_KEY` / `XM2XKEY`: API key sent as `X-M2X-KEY`
//! - `RUST_LOG`: log filter (default: `airlog=info`)

mod config;
mod publish;
mod sources;

use std::path::PathBuf;
use std::time::Duration;

use airlog_orchestration::{OrchestrationError, SamplingCoordinator, Scheduler};
use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::*;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::DeploymentConfig;
use publish::{Payload, TelemetryPublisher};

#[derive(Parser)]
#[command(name = "airlog")]
#[command(author = "airlog contributors")]
#[command(version)]
#[command(about = "Environmental sensor logger", long_about = None)]
struct Args {
    /// Deployment file (airlog.toml)
    #[arg(short, long, value_name = "FILE", env = "AIRLOG_CONFIG")]
    config: Option<PathBuf>,

    /// Device id on the telemetry service
    #[arg(long, env = "AIRLOG_DEVICE")]
    device: Option<String>,

    /// Telemetry API key
    #[arg(long, env = "AIRLOG_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Telemetry endpoint base URL
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Print the payload instead of posting it
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Seconds between cycles; without it a single cycle runs
    #[arg(short, long, value_name = "SECS")]
    interval: Option<u64>,

    /// Stop after this many cycles (with --interval)
    #[arg(long, requires = "interval")]
    cycles: Option<u64>,

    /// Print the effective deployment file and exit
    #[arg(long, default_value_t = false)]
    print_config: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airlog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => DeploymentConfig::from_file(path)?,
        None => DeploymentConfig::default(),
    };

    if args.print_config {
        print!("{}", config.to_string()?);
        return Ok(());
    }

    let publisher = if args.dry_run {
        None
    } else {
        let publisher = build_publisher(&args, &config)?;
        info!(url = publisher.url(), "Telemetry target");
        Some(publisher)
    };

    let drivers = sources::build_drivers(&config)?;
    let mut coordinator = SamplingCoordinator::new(drivers).context("Invalid sensor set")?;
    info!(drivers = ?coordinator.driver_names(), "Sensors ready");

    let Some(interval) = args.interval else {
        // Single cycle, like a cron-driven run
        return cycle(&mut coordinator, publisher.as_ref());
    };

    let mut scheduler = Scheduler::with_interval(Duration::from_secs(interval))
        .context("Invalid --interval")?;
    if let Some(cycles) = args.cycles {
        scheduler = scheduler.with_max_cycles(cycles);
    }

    while !scheduler.is_finished() {
        let tick = scheduler.wait_for_next_tick()?;
        let started = std::time::Instant::now();

        if let Err(e) = cycle(&mut coordinator, publisher.as_ref()) {
            error!(cycle = tick.tick_number, "{:#}", e);
        }

        scheduler.record_execution_time(started.elapsed());
    }

    let stats = scheduler.stats();
    info!(
        cycles = stats.tick_count,
        avg_ms = stats.avg_execution_time.as_millis() as u64,
        max_ms = stats.max_execution_time.as_millis() as u64,
        "Done"
    );

    Ok(())
}

fn build_publisher(args: &Args, config: &DeploymentConfig) -> Result<TelemetryPublisher> {
    let telemetry = &config.telemetry;

    let device = args
        .device
        .clone()
        .or_else(|| std::env::var("XM2XDEVICE").ok())
        .or_else(|| telemetry.device.clone());
    let api_key = args
        .api_key
        .clone()
        .or_else(|| std::env::var("XM2XKEY").ok())
        .or_else(|| telemetry.api_key.clone());

    let (Some(device), Some(api_key)) = (device, api_key) else {
        bail!("Telemetry device and API key are required (set AIRLOG_DEVICE and AIRLOG_API_KEY, or use --dry-run)");
    };

    let endpoint = args.endpoint.as_deref().unwrap_or(&telemetry.endpoint);

    Ok(TelemetryPublisher::new(
        endpoint,
        &device,
        api_key,
        Duration::from_secs(telemetry.timeout_secs),
    ))
}

/// Sample once, then print or post
fn cycle(coordinator: &mut SamplingCoordinator, publisher: Option<&TelemetryPublisher>) -> Result<()> {
    let report = match coordinator.run_cycle() {
        Ok(report) => report,
        Err(OrchestrationError::NoDataAcquired { failures }) => {
            for failure in &failures {
                warn!("{}", failure);
            }
            bail!("Failed to read any data");
        }
        Err(e) => return Err(e.into()),
    };

    for failure in report.failures() {
        warn!("{}", failure);
    }

    let payload = Payload::from_readings(report.readings());

    match publisher {
        Some(publisher) => {
            publisher.publish(&payload)?;
        }
        None => println!("{}", payload.to_json()?),
    }

    Ok(())
}
