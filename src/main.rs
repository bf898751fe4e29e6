//! Command-line entry point: parse flags, set up logging, run the dashboard.

use clap::Parser;
use sensordash::actor::ReaderActor;
use sensordash::app::{App, ShutdownReport};
use sensordash::config::{DashboardConfig, Overrides};
use sensordash::terminal::CrosstermBackend;
use sensordash::{Error, Result};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

/// sensordash - live terminal dashboard for JSON sensor readings on stdin
#[derive(Parser, Debug)]
#[command(name = "sensordash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Freshness window in seconds (overrides SB_STALE_SECS)
    #[arg(long = "stale-secs", value_name = "SECS")]
    stale_secs: Option<i64>,

    /// Frame interval in milliseconds
    #[arg(long = "frame-ms", value_name = "MS")]
    frame_ms: Option<u64>,

    /// Lines buffered between the reader and the screen
    #[arg(long = "queue-capacity", value_name = "LINES")]
    queue_capacity: Option<usize>,

    /// Most devices tracked; new devices beyond this are ignored
    #[arg(long = "max-devices", value_name = "COUNT")]
    max_devices: Option<usize>,

    /// Location whose devices are never shown
    #[arg(long = "exclude", value_name = "LOCATION")]
    exclude: Option<String>,

    /// Write logs to this file (the screen belongs to the dashboard)
    #[arg(long = "log-file", value_name = "PATH", env = "SENSORDASH_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Debug verbosity level (0=warn, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            stale_secs: self.stale_secs,
            frame_ms: self.frame_ms,
            queue_capacity: self.queue_capacity,
            max_devices: self.max_devices,
            exclude: self.exclude.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("sensordash: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            // The terminal has been restored by now
            eprintln!("sensordash: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to `--log-file` if given; otherwise logging stays off.
fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path).map_err(|e| Error::Config(format!("cannot open log file {}: {e}", path.display())))?;

    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override the CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    log::info!("starting sensordash v{}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn run(cli: &Cli) -> Result<ShutdownReport> {
    let config = DashboardConfig::from_env().apply(&cli.overrides())?;
    log::info!(
        "freshness window {}s, frame interval {:?}, excluding '{}'",
        config.freshness_window,
        config.frame_interval,
        config.excluded_location
    );
    let backoff = config.reader_backoff;

    let backend = CrosstermBackend::new()?;
    let mut app = App::new(config, backend);
    let reader = ReaderActor::spawn(BufReader::new(io::stdin()), app.queue(), backoff)?;
    let outcome = app.run(reader);

    let render = app.backend().stats();
    log::info!(
        "rendered {} frames ({} full redraws), {} cells changed, {} bytes written",
        render.frames,
        render.full_redraws,
        render.cells_changed,
        render.bytes_written
    );
    outcome
}
