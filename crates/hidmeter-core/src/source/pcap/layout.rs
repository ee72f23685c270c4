use pcap_parser::Linktype;

pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];
pub const PCAP_READER_BUFFER_SIZE: usize = 65536;

pub const LINKTYPE_USB_LINUX: Linktype = Linktype(189);
pub const LINKTYPE_USB_LINUX_MMAPPED: Linktype = Linktype(220);

// usbmon packet header, host byte order (little-endian captures only).
pub const USBMON_HEADER_LEN: usize = 48;
pub const USBMON_MMAPPED_HEADER_LEN: usize = 64;
pub const EVENT_TYPE_OFFSET: usize = 8;
pub const TRANSFER_TYPE_OFFSET: usize = 9;
pub const ENDPOINT_OFFSET: usize = 10;
pub const DEVICE_OFFSET: usize = 11;
pub const BUS_RANGE: std::ops::Range<usize> = 12..14;
pub const CAPTURED_LEN_RANGE: std::ops::Range<usize> = 36..40;

pub const EVENT_COMPLETE: u8 = b'C';
pub const TRANSFER_INTERRUPT: u8 = 0x01;
pub const ENDPOINT_DIR_IN: u8 = 0x80;

pub const MICROS_PER_SECOND: u64 = 1_000_000;
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;
/// PCAPNG `if_tsresol` high bit: the exponent is a power of two.
pub const TSRESOL_BINARY_FLAG: u8 = 0x80;
