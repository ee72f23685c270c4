//! Power-meter HID report decoding.
//!
//! A report is three nested fixed-size layers: a 64-byte frame (USBPac)
//! holding a 55-byte sub-packet (USBSPac) at offset 8, which holds the
//! 52-byte little-endian measurement payload (MeterData) at offset 2.
//!
//! Offsets live in `layout` and are the only place widths are spelled out;
//! `reader` and `writer` do the bounds-checked byte access for both
//! directions. Each layer has a `decode_*`/`encode_*` pair. Decoding checks
//! sizes only. Encoding is infallible because the record types cannot hold
//! a field of the wrong width.
//!
//! The verify bytes of the frame and sub-packet are carried opaquely. No
//! checksum is computed or checked here.

pub mod error;
pub mod layout;
pub mod reader;
pub mod writer;

mod frame;
mod payload;
mod subframe;

pub use error::{FramingError, Layer};
pub use frame::{FreeBytes, UsbFrame, decode_frame, encode_frame};
pub use payload::{MeterData, Reserved, decode_payload, encode_payload};
pub use subframe::{UsbSubPacket, decode_subframe, encode_subframe};
