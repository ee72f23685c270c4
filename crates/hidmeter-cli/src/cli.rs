use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

const EXAMPLES: &str = "Examples:\n  hidmeter capture analyse meter.pcapng -o report.json\n  hidmeter capture analyze dump.bin --stdout --pretty\n  hidmeter capture decode meter.pcapng --device 7";

#[derive(Parser, Debug)]
#[command(name = "hidmeter")]
#[command(version, long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("HIDMETER_BUILD_COMMIT"),
    " ",
    env!("HIDMETER_BUILD_DATE"),
    ")"
))]
#[command(
    about = "Offline decoder for power-meter HID report captures (usbmon / raw dumps).",
    long_about = None,
    after_help = EXAMPLES
)]
pub struct Cli {
    /// Minimum log level to print to stderr
    #[arg(long, value_enum, global = true, default_value = "warn")]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Operations on recorded report captures (.pcap, .pcapng, .bin, .raw).
    Capture {
        #[command(subcommand)]
        command: CaptureCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CaptureCommands {
    /// Analyse a capture and generate a versioned JSON session report.
    #[command(alias = "analyze")]
    #[command(after_help = EXAMPLES)]
    Analyse(AnalyseArgs),

    /// Decode every report and print one reading per line.
    Decode(DecodeArgs),
}

#[derive(Args, Debug)]
pub struct AnalyseArgs {
    /// Path to a .pcap, .pcapng, .bin or .raw capture
    pub input: PathBuf,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    pub report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    pub stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pub pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    pub compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    pub quiet: bool,

    /// Exit with a non-zero code if any report failed to decode
    #[arg(long)]
    pub strict: bool,

    /// List decode errors after analysis
    #[arg(long)]
    pub list_errors: bool,

    #[command(flatten)]
    pub filter: DeviceArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Path to a .pcap, .pcapng, .bin or .raw capture
    pub input: PathBuf,

    /// Print one JSON object per reading instead of text lines
    #[arg(long)]
    pub json: bool,

    /// Stop after this many decoded readings
    #[arg(long)]
    pub limit: Option<u64>,

    #[command(flatten)]
    pub filter: DeviceArgs,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct DeviceArgs {
    /// Only keep usbmon reports from this USB bus number
    #[arg(long)]
    pub bus: Option<u16>,

    /// Only keep usbmon reports from this USB device address
    #[arg(long)]
    pub device: Option<u8>,
}

impl From<DeviceArgs> for hidmeter_core::UsbmonFilter {
    fn from(args: DeviceArgs) -> Self {
        Self {
            bus: args.bus,
            device: args.device,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum LevelFilter {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LevelFilter> for log::LevelFilter {
    fn from(level: LevelFilter) -> Self {
        match level {
            LevelFilter::Off => log::LevelFilter::Off,
            LevelFilter::Error => log::LevelFilter::Error,
            LevelFilter::Warn => log::LevelFilter::Warn,
            LevelFilter::Info => log::LevelFilter::Info,
            LevelFilter::Debug => log::LevelFilter::Debug,
            LevelFilter::Trace => log::LevelFilter::Trace,
        }
    }
}
