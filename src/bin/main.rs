//! radmon: Geiger counter dose-rate monitor
//!
//! Startup validates everything that can be fatal (config files, unit name,
//! log file name, command line) before any log file is touched. After that
//! the monitor runs until killed; only a fatal error ends it, with exit code 1.

use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use env_logger::Env;
use log::{error, info, warn};

use radmon::AppError;
use radmon::cli::Cli;
use radmon::clock::LocalClock;
use radmon::config::load_unit_name;
use radmon::daemon;
use radmon::fs_store::FsLogStore;
use radmon::simulated_tube::SimulatedTube;
use radmon::upload::{ServerConfig, Uploader, load_server_config};
use radmon_core::{
    EventChannel, LogFileName, LogWriter, Monitor, MonitorConfig, PulseCounter, PulseInput,
    SamplingScheduler, UnitName, WallClock, YearMonth,
};

use clap::Parser;

/// Pulses recorded by the input task and taken by the sampling loop
static PULSES: PulseCounter = PulseCounter::new();

/// Monitor events for the status reporter
static EVENTS: EventChannel = EventChannel::new();

struct Setup {
    unit: UnitName,
    config: MonitorConfig,
    store: FsLogStore,
    tube: SimulatedTube,
    server: Option<ServerConfig>,
}

fn setup(cli: &Cli) -> Result<Setup, AppError> {
    info!("Measurement program starting...");
    cli.validate()?;
    let config = cli.monitor_config()?;
    let unit = load_unit_name(&cli.config)?;

    // Fail on an oversized name now rather than at the first file-check
    let file = LogFileName::new(&unit, YearMonth::of(&LocalClock.now()))
        .map_err(AppError::LogFileName)?;
    info!("Current log file: {}", file);

    let server = if cli.upload {
        Some(load_server_config(&cli.server_config)?)
    } else {
        info!("Uploads disabled");
        None
    };

    let tube = match cli.seed {
        Some(seed) => SimulatedTube::seeded(cli.simulated_cpm, seed),
        None => SimulatedTube::new(cli.simulated_cpm),
    };

    Ok(Setup {
        unit,
        config,
        store: FsLogStore::new(&cli.log_dir),
        tube,
        server,
    })
}

fn spawn_uploader(uploader: Uploader<LocalClock>, period: Duration) {
    let spawned: std::io::Result<thread::JoinHandle<()>> = thread::Builder::new()
        .name("uploader".to_string())
        .spawn(move || {
            uploader.run(period);
        });
    if let Err(e) = spawned {
        warn!("Uploader could not be started: {}", e);
    }
}

async fn run(setup: Setup) -> AppError {
    info!(
        "Sampling every {} s into {}",
        setup.config.period.as_secs(),
        setup.store.dir().display()
    );

    let mut scheduler = SamplingScheduler::new(
        &PULSES,
        LogWriter::new(setup.store),
        LocalClock,
        embassy_time::Delay,
        setup.config,
    );
    match EVENTS.publisher() {
        Ok(publisher) => scheduler = scheduler.with_events(publisher),
        Err(e) => warn!("Monitor events disabled: {:?}", e),
    }
    let monitor = Monitor::new(setup.unit, scheduler);

    info!("Measurement program started.");
    daemon::run(monitor, PulseInput::new(setup.tube), &PULSES, &EVENTS).await
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = setup(&cli).map(|setup| {
        if let Some(server) = setup.server.clone() {
            let uploader = Uploader::new(
                server,
                setup.unit.clone(),
                setup.store.clone(),
                LocalClock,
            );
            spawn_uploader(uploader, Duration::from_secs(cli.upload_interval_secs));
        }
        futures::executor::block_on(run(setup))
    });
    let e = match result {
        Ok(e) | Err(e) => e,
    };

    error!("{}. The program will now stop.", e);
    ExitCode::from(e.exit_code())
}
