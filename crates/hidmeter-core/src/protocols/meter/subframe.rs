use serde::Serialize;

use super::error::{FramingError, Layer};
use super::layout;
use super::payload::{MeterData, decode_payload};
use super::reader::MeterReader;
use super::writer::MeterWriter;

/// The 55-byte sub-packet nested in every frame.
///
/// `buf` holds the raw payload; it is decoded only on request through
/// [`UsbSubPacket::payload`]. `verify` is carried as-is and never checked.
#[doc(alias = "USBSPac")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsbSubPacket {
    pub command: u8,
    pub length: u8,
    #[serde(with = "payload_bytes")]
    buf: [u8; layout::PAYLOAD_LEN],
    pub verify: u8,
}

impl UsbSubPacket {
    /// Build a sub-packet around a raw payload.
    ///
    /// # Errors
    /// Returns `FramingError::SizeMismatch` unless `buf` is exactly 52 bytes.
    pub fn new(command: u8, length: u8, buf: &[u8], verify: u8) -> Result<Self, FramingError> {
        let buf = buf.try_into().map_err(|_| FramingError::SizeMismatch {
            layer: Layer::Payload,
            needed: layout::PAYLOAD_LEN,
            actual: buf.len(),
        })?;
        Ok(Self {
            command,
            length,
            buf,
            verify,
        })
    }

    /// Wrap an already-built reading.
    pub fn with_payload(command: u8, length: u8, data: &MeterData, verify: u8) -> Self {
        Self {
            command,
            length,
            buf: super::payload::encode_payload(data),
            verify,
        }
    }

    pub fn buf(&self) -> &[u8; layout::PAYLOAD_LEN] {
        &self.buf
    }

    pub fn payload(&self) -> Result<MeterData, FramingError> {
        decode_payload(&self.buf)
    }
}

/// Decode a sub-packet from the first 55 bytes of `bytes`.
///
/// Trailing bytes are ignored.
pub fn decode_subframe(bytes: &[u8]) -> Result<UsbSubPacket, FramingError> {
    let reader = MeterReader::new(bytes, Layer::SubPacket);
    reader.require_len(layout::SUBPACKET_LEN)?;

    Ok(UsbSubPacket {
        command: reader.read_u8(layout::COMMAND_OFFSET)?,
        length: reader.read_u8(layout::LENGTH_OFFSET)?,
        buf: reader.read_array(layout::PAYLOAD_RANGE)?,
        verify: reader.read_u8(layout::SUBPACKET_VERIFY_OFFSET)?,
    })
}

pub fn encode_subframe(pac: &UsbSubPacket) -> [u8; layout::SUBPACKET_LEN] {
    let mut writer = MeterWriter::<{ layout::SUBPACKET_LEN }>::new();
    writer.put_u8(layout::COMMAND_OFFSET, pac.command);
    writer.put_u8(layout::LENGTH_OFFSET, pac.length);
    writer.put_slice(layout::PAYLOAD_RANGE, &pac.buf);
    writer.put_u8(layout::SUBPACKET_VERIFY_OFFSET, pac.verify);
    writer.finish()
}

mod payload_bytes {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &[u8; 52], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(bytes.iter())
    }
}
