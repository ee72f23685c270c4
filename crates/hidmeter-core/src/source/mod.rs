//! Report sources for recorded HID traffic.
//!
//! A source hands out one raw HID input report per call. Sources do not
//! interpret the report; a report shorter than a frame is passed through
//! and rejected by the codec.

mod pcap;
mod raw;

use std::path::Path;

pub use pcap::{UsbmonFilter, UsbmonPcapSource};
pub use raw::{RawReportFileSource, RawReportSource};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportEvent {
    /// Capture timestamp in seconds since the epoch, when the format has one.
    pub ts: Option<f64>,
    pub data: Vec<u8>,
}

pub trait ReportSource {
    fn next_report(&mut self) -> Result<Option<ReportEvent>, SourceError>;
}

impl<S: ReportSource + ?Sized> ReportSource for Box<S> {
    fn next_report(&mut self) -> Result<Option<ReportEvent>, SourceError> {
        (**self).next_report()
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture parse error: {0}")]
    Pcap(String),
}

impl From<pcap::error::PcapSourceError> for SourceError {
    fn from(value: pcap::error::PcapSourceError) -> Self {
        match value {
            pcap::error::PcapSourceError::Io(err) => SourceError::Io(err),
            pcap::error::PcapSourceError::Pcap { context, message } => {
                SourceError::Pcap(format!("{context}: {message}"))
            }
        }
    }
}

/// Capture container, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    /// `.pcap` / `.pcapng` taken on a usbmon interface.
    Usbmon,
    /// `.bin` / `.raw`: back-to-back 64-byte reports.
    Raw,
}

impl CaptureFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pcap" | "pcapng" => Some(Self::Usbmon),
            "bin" | "raw" => Some(Self::Raw),
            _ => None,
        }
    }
}

/// Open `path` with the source matching its extension.
///
/// The filter only applies to usbmon captures; raw files hold a single
/// device's reports.
pub fn open_capture(
    path: &Path,
    filter: UsbmonFilter,
) -> Result<Box<dyn ReportSource>, SourceError> {
    match CaptureFormat::from_path(path) {
        Some(CaptureFormat::Usbmon) => Ok(Box::new(UsbmonPcapSource::open(path, filter)?)),
        Some(CaptureFormat::Raw) => Ok(Box::new(RawReportFileSource::open(path)?)),
        None => Err(SourceError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("unsupported capture format: {}", path.display()),
        ))),
    }
}
