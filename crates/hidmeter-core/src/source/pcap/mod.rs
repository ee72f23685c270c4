//! usbmon PCAP/PCAPNG source implementation.
//!
//! This module provides a `ReportSource` backed by captures taken on a Linux
//! `usbmonN` interface. It handles file I/O and the capture container, then
//! strips the usbmon header and keeps only completed interrupt-IN transfers,
//! which is where the meter's HID input reports travel.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod usbmon;

pub use parser::UsbmonPcapSource;
pub use usbmon::UsbmonFilter;
