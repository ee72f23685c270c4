use std::io::{Read, Seek, SeekFrom};

use super::error::PcapSourceError;
use super::layout;
use pcap_parser::Linktype;

/// Read the 4-byte container magic, leaving the reader at offset 0.
///
/// # Errors
/// Returns `PcapSourceError::Io` when fewer than 4 bytes are available or
/// the reader cannot seek back.
pub fn read_magic_and_rewind<R: Read + Seek>(reader: &mut R) -> Result<[u8; 4], PcapSourceError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(magic)
}

pub fn is_pcapng_magic(magic: &[u8; 4]) -> bool {
    magic == &layout::PCAPNG_MAGIC
}

/// Link type and clock of one capture interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceClock {
    pub linktype: Linktype,
    /// Timestamp ticks per second.
    pub ticks_per_second: u64,
    /// Seconds added to every timestamp (`if_tsoffset`).
    pub offset_seconds: i64,
}

impl InterfaceClock {
    pub fn new(linktype: Linktype, ticks_per_second: u64) -> Self {
        Self {
            linktype,
            ticks_per_second,
            offset_seconds: 0,
        }
    }

    pub fn seconds(&self, ticks: u64) -> f64 {
        ticks_to_seconds(ticks, self.ticks_per_second) + self.offset_seconds as f64
    }
}

/// Clock of a PCAPNG interface; unknown interfaces fall back to Ethernet
/// so their records are skipped as non-usbmon.
pub fn interface_clock(interfaces: &[InterfaceClock], if_id: u32) -> InterfaceClock {
    interfaces
        .get(if_id as usize)
        .copied()
        .unwrap_or_else(|| InterfaceClock::new(Linktype::ETHERNET, layout::MICROS_PER_SECOND))
}

/// Ticks per second for a PCAPNG `if_tsresol` value, or `None` when it
/// does not fit in 64 bits.
pub fn ticks_per_second(if_tsresol: u8) -> Option<u64> {
    let exponent = u32::from(if_tsresol & !layout::TSRESOL_BINARY_FLAG);
    if if_tsresol & layout::TSRESOL_BINARY_FLAG != 0 {
        1u64.checked_shl(exponent)
    } else {
        10u64.checked_pow(exponent)
    }
}

/// Whole seconds are split off first so they convert exactly.
pub fn ticks_to_seconds(ticks: u64, ticks_per_second: u64) -> f64 {
    (ticks / ticks_per_second) as f64
        + (ticks % ticks_per_second) as f64 / ticks_per_second as f64
}
