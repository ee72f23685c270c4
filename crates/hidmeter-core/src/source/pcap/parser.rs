use std::fs::File;
use std::path::Path;

use pcap_parser::{
    Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError, PcapNGReader,
    traits::PcapReaderIterator,
};

use crate::source::{ReportEvent, ReportSource, SourceError};

use super::error::PcapSourceError;
use super::layout;
use super::reader::{
    InterfaceClock, interface_clock, is_pcapng_magic, read_magic_and_rewind, ticks_per_second,
};
use super::usbmon::{UsbmonFilter, parse_usbmon};

/// Replays HID input reports from a Linux usbmon PCAP/PCAPNG capture.
pub struct UsbmonPcapSource {
    inner: PcapReader,
    filter: UsbmonFilter,
}

enum PcapReader {
    Legacy {
        reader: LegacyPcapReader<File>,
        /// Set once the file header has been read.
        clock: Option<InterfaceClock>,
    },
    Ng {
        reader: PcapNGReader<File>,
        interfaces: Vec<InterfaceClock>,
    },
}

impl UsbmonPcapSource {
    pub fn open(path: &Path, filter: UsbmonFilter) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(SourceError::from)?;
        let inner = create_reader(file).map_err(SourceError::from)?;
        Ok(Self { inner, filter })
    }
}

impl ReportSource for UsbmonPcapSource {
    fn next_report(&mut self) -> Result<Option<ReportEvent>, SourceError> {
        loop {
            let Some(record) = next_record(&mut self.inner).map_err(SourceError::from)? else {
                return Ok(None);
            };
            let Some(packet) = parse_usbmon(record.linktype, &record.data) else {
                log::debug!("skipping non-usbmon record ({} bytes)", record.data.len());
                continue;
            };
            if packet.is_input_report() && self.filter.matches(&packet) {
                return Ok(Some(ReportEvent {
                    ts: record.ts,
                    data: packet.data.to_vec(),
                }));
            }
        }
    }
}

struct Record {
    ts: Option<f64>,
    linktype: Linktype,
    data: Vec<u8>,
}

fn create_reader(file: File) -> Result<PcapReader, PcapSourceError> {
    let mut file = file;
    let magic = read_magic_and_rewind(&mut file)?;

    if is_pcapng_magic(&magic) {
        let reader = PcapNGReader::new(layout::PCAP_READER_BUFFER_SIZE, file)
            .map_err(|e| pcap_error("pcapng reader init", e))?;
        Ok(PcapReader::Ng {
            reader,
            interfaces: Vec::new(),
        })
    } else {
        let reader = LegacyPcapReader::new(layout::PCAP_READER_BUFFER_SIZE, file)
            .map_err(|e| pcap_error("pcap reader init", e))?;
        Ok(PcapReader::Legacy {
            reader,
            clock: None,
        })
    }
}

fn pcap_error(context: &'static str, err: PcapError<&[u8]>) -> PcapSourceError {
    PcapSourceError::Pcap {
        context,
        message: err.to_string(),
    }
}

fn next_record(reader: &mut PcapReader) -> Result<Option<Record>, PcapSourceError> {
    match reader {
        PcapReader::Legacy { reader, clock } => {
            next_block_record(reader, &LEGACY_CONTEXTS, |block| match block {
                PcapBlockOwned::LegacyHeader(header) => {
                    let ticks = if header.is_nanosecond_precision() {
                        layout::NANOS_PER_SECOND
                    } else {
                        layout::MICROS_PER_SECOND
                    };
                    *clock = Some(InterfaceClock::new(header.network, ticks));
                    None
                }
                PcapBlockOwned::Legacy(packet) => {
                    let clock = clock.unwrap_or_else(|| {
                        InterfaceClock::new(Linktype::ETHERNET, layout::MICROS_PER_SECOND)
                    });
                    let fraction = clock.seconds(u64::from(packet.ts_usec));
                    Some(Record {
                        ts: Some(f64::from(packet.ts_sec) + fraction),
                        linktype: clock.linktype,
                        data: packet.data.to_vec(),
                    })
                }
                _ => None,
            })
        }
        PcapReader::Ng { reader, interfaces } => {
            next_block_record(reader, &NG_CONTEXTS, |block| match block {
                PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
                    let ticks = ticks_per_second(intf.if_tsresol).unwrap_or_else(|| {
                        log::warn!(
                            "interface {}: unsupported if_tsresol {:#04x}, assuming microseconds",
                            interfaces.len(),
                            intf.if_tsresol
                        );
                        layout::MICROS_PER_SECOND
                    });
                    interfaces.push(InterfaceClock {
                        linktype: intf.linktype,
                        ticks_per_second: ticks,
                        offset_seconds: intf.if_tsoffset,
                    });
                    None
                }
                PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => {
                    let clock = interface_clock(interfaces, packet.if_id);
                    let ticks = (u64::from(packet.ts_high) << 32) | u64::from(packet.ts_low);
                    Some(Record {
                        ts: Some(clock.seconds(ticks)),
                        linktype: clock.linktype,
                        data: packet.data.to_vec(),
                    })
                }
                _ => None,
            })
        }
    }
}

struct ErrorContexts {
    refill: &'static str,
    next: &'static str,
}

const LEGACY_CONTEXTS: ErrorContexts = ErrorContexts {
    refill: "pcap reader refill",
    next: "pcap reader next",
};

const NG_CONTEXTS: ErrorContexts = ErrorContexts {
    refill: "pcapng reader refill",
    next: "pcapng reader next",
};

/// Pull blocks from `reader` until `on_block` turns one into a record.
fn next_block_record<R, F>(
    reader: &mut R,
    contexts: &ErrorContexts,
    mut on_block: F,
) -> Result<Option<Record>, PcapSourceError>
where
    R: PcapReaderIterator,
    F: FnMut(PcapBlockOwned<'_>) -> Option<Record>,
{
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let record = on_block(block);
                reader.consume(offset);
                if record.is_some() {
                    return Ok(record);
                }
            }
            Err(PcapError::Eof) => return Ok(None),
            Err(PcapError::Incomplete(_)) => {
                reader.refill().map_err(|e| pcap_error(contexts.refill, e))?;
            }
            Err(e) => return Err(pcap_error(contexts.next, e)),
        }
    }
}
