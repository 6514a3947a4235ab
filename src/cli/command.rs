use std::path::PathBuf;

use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};

use eegstream::utils::sink::DEFAULT_CAPACITY;

#[derive(Debug, ClapParser)]
#[command(
    name       = env!("CARGO_PKG_NAME"),
    version    = env!("CARGO_PKG_VERSION"),
    author     = env!("CARGO_PKG_AUTHORS"),
    about      = "Tools for capturing, inspecting and decoding 8-channel EEG frame streams",
    long_about = None,
)]
pub struct Cli {
    /// Set the log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Treat warnings as fatal errors (fail on first checksum mismatch).
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Show progress bars during operations.
    #[arg(long, global = true)]
    pub progress: bool,

    /// Choose an operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode a raw capture into microvolt samples.
    Stream(StreamArgs),

    /// Print capture information
    Info(InfoArgs),

    /// Generate a raw capture byte stream like the device firmware does.
    Simulate(SimulateArgs),
}

#[derive(Debug, Args)]
pub struct StreamArgs {
    /// Input raw capture (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Write decoded samples as CSV rows (one timestep per line).
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Capacity of the sample handoff buffer.
    #[arg(long, value_name = "VECTORS", default_value_t = DEFAULT_CAPACITY)]
    pub sink_capacity: usize,
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Input raw capture.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Emit the report as YAML instead of a table.
    #[arg(long)]
    pub yaml: bool,
}

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Output path for the generated capture (use "-" for stdout).
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Number of frames to generate.
    #[arg(long, value_name = "COUNT", default_value_t = 2000)]
    pub frames: u64,

    /// Drop every Nth frame from the output while still advancing the
    /// sequence counter, so the receiver observes loss.
    #[arg(long, value_name = "N")]
    pub drop_every: Option<u64>,

    /// Prepend this many garbage bytes to exercise resynchronization.
    #[arg(long, value_name = "BYTES", default_value_t = 0)]
    pub garbage: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Disable logging output.
    Off,
    /// No output except errors.
    Error,
    /// Show warnings and errors.
    Warn,
    /// Show info, warnings and errors (default).
    Info,
    /// Show debug, info, warnings and errors.
    Debug,
    /// Show all log messages including trace.
    Trace,
}

impl LogLevel {
    /// Convert LogLevel to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Colorized human-readable text.
    Plain,
    /// Structured JSON per log record.
    Json,
}
