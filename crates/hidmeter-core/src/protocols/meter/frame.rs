use serde::Serialize;

use super::error::{FramingError, Layer};
use super::layout;
use super::payload::MeterData;
use super::reader::MeterReader;
use super::subframe::{UsbSubPacket, decode_subframe, encode_subframe};
use super::writer::MeterWriter;

/// The 3 spare transport bytes at frame offset 5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FreeBytes([u8; layout::FREE_LEN]);

impl FreeBytes {
    pub const fn new(bytes: [u8; layout::FREE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; layout::FREE_LEN] {
        &self.0
    }
}

impl TryFrom<&[u8]> for FreeBytes {
    type Error = FramingError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        value
            .try_into()
            .map(Self)
            .map_err(|_| FramingError::InvalidFree {
                actual: value.len(),
            })
    }
}

/// The 64-byte HID report frame.
#[doc(alias = "USBPac")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsbFrame {
    pub start: u8,
    pub head: u8,
    pub idx1: u8,
    pub idx2: u8,
    pub need_ack: u8,
    pub free: FreeBytes,
    pub pac: UsbSubPacket,
    pub verify: u8,
}

impl UsbFrame {
    pub fn measurement(&self) -> Result<MeterData, FramingError> {
        self.pac.payload()
    }
}

/// Decode a frame from the first 64 bytes of `bytes`.
///
/// Trailing bytes are ignored. No verify byte is checked at either layer.
///
/// # Examples
/// ```
/// use hidmeter_core::protocols::meter::decode_frame;
///
/// let mut report = [0u8; 64];
/// report[0] = 0xaa;
/// let frame = decode_frame(&report)?;
/// assert_eq!(frame.start, 0xaa);
/// assert_eq!(frame.measurement()?.run_time, 0);
/// # Ok::<(), hidmeter_core::protocols::meter::FramingError>(())
/// ```
pub fn decode_frame(bytes: &[u8]) -> Result<UsbFrame, FramingError> {
    let reader = MeterReader::new(bytes, Layer::Frame);
    reader.require_len(layout::FRAME_LEN)?;

    Ok(UsbFrame {
        start: reader.read_u8(layout::START_OFFSET)?,
        head: reader.read_u8(layout::HEAD_OFFSET)?,
        idx1: reader.read_u8(layout::IDX1_OFFSET)?,
        idx2: reader.read_u8(layout::IDX2_OFFSET)?,
        need_ack: reader.read_u8(layout::NEED_ACK_OFFSET)?,
        free: FreeBytes::new(reader.read_array(layout::FREE_RANGE)?),
        pac: decode_subframe(reader.read_slice(layout::SUBPACKET_RANGE)?)?,
        verify: reader.read_u8(layout::FRAME_VERIFY_OFFSET)?,
    })
}

pub fn encode_frame(frame: &UsbFrame) -> [u8; layout::FRAME_LEN] {
    let mut writer = MeterWriter::<{ layout::FRAME_LEN }>::new();
    writer.put_u8(layout::START_OFFSET, frame.start);
    writer.put_u8(layout::HEAD_OFFSET, frame.head);
    writer.put_u8(layout::IDX1_OFFSET, frame.idx1);
    writer.put_u8(layout::IDX2_OFFSET, frame.idx2);
    writer.put_u8(layout::NEED_ACK_OFFSET, frame.need_ack);
    writer.put_slice(layout::FREE_RANGE, frame.free.as_bytes());
    writer.put_slice(layout::SUBPACKET_RANGE, &encode_subframe(&frame.pac));
    writer.put_u8(layout::FRAME_VERIFY_OFFSET, frame.verify);
    writer.finish()
}
