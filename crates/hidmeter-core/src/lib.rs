//! hidmeter core library: power-meter HID report decoding.
//!
//! The meter streams fixed 64-byte HID input reports. Each report nests a
//! 55-byte sub-packet, which nests a 52-byte little-endian measurement
//! payload. `protocols::meter` decodes and encodes all three layers; it is
//! byte-oriented, stateless and side-effect free.
//!
//! Around the codecs sit the offline layers used by the CLI: `source`
//! replays recorded reports (raw dumps or usbmon captures) and `analysis`
//! drives the codecs over a source and aggregates a deterministic report.
//! All I/O is isolated in `source`.
//!
//! Invariants:
//! - Field offsets are defined once in `protocols::meter::layout`.
//! - Encoded sizes are exactly 52 / 55 / 64 bytes.
//! - Verify bytes are carried, never checked.
//! - Report outputs are deterministic and stable across runs.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use hidmeter_core::{UsbmonFilter, analyze_capture_file};
//!
//! let report = analyze_capture_file(Path::new("meter.pcapng"), UsbmonFilter::default())?;
//! println!("decoded reports: {:?}", report.capture_summary);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
pub mod protocols;
mod source;

pub use analysis::{AnalysisError, analyze_capture_file, analyze_source};
pub use protocols::meter::{
    FramingError, FreeBytes, Layer, MeterData, Reserved, UsbFrame, UsbSubPacket, decode_frame,
    decode_payload, decode_subframe, encode_frame, encode_payload, encode_subframe,
};
pub use source::{
    CaptureFormat, RawReportFileSource, RawReportSource, ReportEvent, ReportSource, SourceError,
    UsbmonFilter, UsbmonPcapSource, open_capture,
};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Aggregated session report with deterministic ordering.
///
/// # Examples
/// ```
/// use hidmeter_core::make_stub_report;
///
/// let report = make_stub_report("meter.bin", 640);
/// assert_eq!(report.report_version, hidmeter_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,

    /// Input capture metadata.
    pub input: InputInfo,

    /// Optional capture summary (may be empty when unavailable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Per recording-group summaries, sorted by group id.
    pub groups: Vec<GroupSummary>,
    /// Framing failures, sorted by id.
    pub decode_errors: Vec<DecodeIssue>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "hidmeter").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input capture metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Basic capture summary (timestamps may be absent).
///
/// Raw report dumps carry no timestamps, so `time_start`/`time_end` are only
/// filled for usbmon captures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummary {
    /// Reports handed out by the source.
    pub reports_total: u64,
    /// Reports that decoded into a measurement.
    pub reports_decoded: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Metrics for one recording group (`rec_grp`).
///
/// # Examples
/// ```
/// use hidmeter_core::{GroupSummary, RangeSummary};
///
/// let summary = GroupSummary {
///     rec_grp: 0,
///     samples: 2,
///     run_time_start: 10,
///     run_time_end: 11,
///     voltage: Some(RangeSummary { min: 4.9, max: 5.1, mean: 5.0 }),
///     current: None,
///     power: None,
///     temp_in: None,
///     temp_out: None,
///     ah_last: None,
///     wh_last: None,
/// };
/// assert_eq!(summary.samples, 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub rec_grp: u8,
    pub samples: u64,
    /// Smallest run time (s) seen in the group.
    pub run_time_start: u32,
    /// Largest run time (s) seen in the group.
    pub run_time_end: u32,
    /// Voltage (V) over finite samples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<RangeSummary>,
    /// Signed current (A) over finite samples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<RangeSummary>,
    /// Absolute power (W) over finite samples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<RangeSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_in: Option<RangeSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_out: Option<RangeSummary>,
    /// Last finite accumulated amp-hours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ah_last: Option<f64>,
    /// Last finite accumulated watt-hours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wh_last: Option<f64>,
}

/// Min/max/mean of one reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Aggregated framing failure.
///
/// # Examples
/// ```
/// use hidmeter_core::DecodeIssue;
///
/// let issue = DecodeIssue {
///     id: "HM-FRAME-TOO-SHORT".to_string(),
///     message: "frame size mismatch: need 64 bytes, got 10".to_string(),
///     count: 1,
///     examples: vec!["report #3".to_string()],
/// };
/// assert_eq!(issue.count, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeIssue {
    /// Stable identifier (e.g., `HM-FRAME-TOO-SHORT`).
    pub id: String,
    /// Message of the first occurrence.
    pub message: String,
    /// Number of occurrences aggregated into this issue.
    pub count: u64,
    /// At most three example contexts, formatted as `report #n @ ts`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use hidmeter_core::make_stub_report;
///
/// let report = make_stub_report("meter.bin", 640);
/// assert!(report.groups.is_empty());
/// assert!(report.decode_errors.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "hidmeter".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        capture_summary: None,
        groups: vec![],
        decode_errors: vec![],
    }
}
