use serde::{Deserialize, Serialize};

use super::error::{FramingError, Layer};
use super::layout;
use super::reader::MeterReader;
use super::writer::MeterWriter;

/// The 7 trailing payload bytes, carried verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reserved([u8; layout::RESERVED_LEN]);

impl Reserved {
    pub const fn new(bytes: [u8; layout::RESERVED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; layout::RESERVED_LEN] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Reserved {
    type Error = FramingError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        value
            .try_into()
            .map(Self)
            .map_err(|_| FramingError::InvalidReserved {
                actual: value.len(),
            })
    }
}

/// One instantaneous meter reading (52-byte payload).
///
/// Field order matches the wire order. Numeric fields accept any value the
/// wire can carry, NaN included. Equality compares floats bit for bit, so a
/// NaN reading equals its own decoded copy and `0.0 != -0.0`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MeterData {
    pub off_per: u8,
    pub off_hour: u8,
    /// Recorded current in mA.
    pub rec_ma: u16,
    pub ah: f32,
    pub wh: f32,
    pub rec_time: u32,
    /// Elapsed run time in seconds.
    pub run_time: u32,
    pub dp: f32,
    pub dm: f32,
    pub temp_in: f32,
    pub temp_out: f32,
    /// Instantaneous voltage (V).
    pub vol: f32,
    /// Instantaneous current (A); the sign gives the direction.
    pub cur: f32,
    pub rec_grp: u8,
    pub reserved: Reserved,
}

impl PartialEq for MeterData {
    fn eq(&self, other: &Self) -> bool {
        self.off_per == other.off_per
            && self.off_hour == other.off_hour
            && self.rec_ma == other.rec_ma
            && self.rec_time == other.rec_time
            && self.run_time == other.run_time
            && self.rec_grp == other.rec_grp
            && self.reserved == other.reserved
            && self.float_bits() == other.float_bits()
    }
}

impl Eq for MeterData {}

impl MeterData {
    fn float_bits(&self) -> [u32; 8] {
        [
            self.ah,
            self.wh,
            self.dp,
            self.dm,
            self.temp_in,
            self.temp_out,
            self.vol,
            self.cur,
        ]
        .map(f32::to_bits)
    }

    pub fn current_magnitude(&self) -> f32 {
        self.cur.abs()
    }

    /// Absolute power in watts.
    pub fn power(&self) -> f32 {
        (self.vol * self.cur).abs()
    }

    pub fn is_discharging(&self) -> bool {
        self.cur < 0.0
    }
}

/// Decode a 52-byte measurement payload.
///
/// # Errors
/// Returns `FramingError::SizeMismatch` unless `bytes` is exactly 52 bytes.
///
/// # Examples
/// ```
/// use hidmeter_core::protocols::meter::{decode_payload, encode_payload};
///
/// let bytes = [0u8; 52];
/// let data = decode_payload(&bytes)?;
/// assert_eq!(data.vol, 0.0);
/// assert_eq!(encode_payload(&data), bytes);
/// # Ok::<(), hidmeter_core::protocols::meter::FramingError>(())
/// ```
pub fn decode_payload(bytes: &[u8]) -> Result<MeterData, FramingError> {
    let reader = MeterReader::new(bytes, Layer::Payload);
    reader.require_exact_len(layout::PAYLOAD_LEN)?;

    Ok(MeterData {
        off_per: reader.read_u8(layout::OFF_PER_OFFSET)?,
        off_hour: reader.read_u8(layout::OFF_HOUR_OFFSET)?,
        rec_ma: reader.read_u16_le(layout::REC_MA_RANGE)?,
        ah: reader.read_f32_le(layout::AH_RANGE)?,
        wh: reader.read_f32_le(layout::WH_RANGE)?,
        rec_time: reader.read_u32_le(layout::REC_TIME_RANGE)?,
        run_time: reader.read_u32_le(layout::RUN_TIME_RANGE)?,
        dp: reader.read_f32_le(layout::DP_RANGE)?,
        dm: reader.read_f32_le(layout::DM_RANGE)?,
        temp_in: reader.read_f32_le(layout::TEMP_IN_RANGE)?,
        temp_out: reader.read_f32_le(layout::TEMP_OUT_RANGE)?,
        vol: reader.read_f32_le(layout::VOL_RANGE)?,
        cur: reader.read_f32_le(layout::CUR_RANGE)?,
        rec_grp: reader.read_u8(layout::REC_GRP_OFFSET)?,
        reserved: Reserved::new(reader.read_array(layout::RESERVED_RANGE)?),
    })
}

/// Encode a measurement payload into its 52-byte wire form.
pub fn encode_payload(data: &MeterData) -> [u8; layout::PAYLOAD_LEN] {
    let mut writer = MeterWriter::<{ layout::PAYLOAD_LEN }>::new();
    writer.put_u8(layout::OFF_PER_OFFSET, data.off_per);
    writer.put_u8(layout::OFF_HOUR_OFFSET, data.off_hour);
    writer.put_u16_le(layout::REC_MA_RANGE, data.rec_ma);
    writer.put_f32_le(layout::AH_RANGE, data.ah);
    writer.put_f32_le(layout::WH_RANGE, data.wh);
    writer.put_u32_le(layout::REC_TIME_RANGE, data.rec_time);
    writer.put_u32_le(layout::RUN_TIME_RANGE, data.run_time);
    writer.put_f32_le(layout::DP_RANGE, data.dp);
    writer.put_f32_le(layout::DM_RANGE, data.dm);
    writer.put_f32_le(layout::TEMP_IN_RANGE, data.temp_in);
    writer.put_f32_le(layout::TEMP_OUT_RANGE, data.temp_out);
    writer.put_f32_le(layout::VOL_RANGE, data.vol);
    writer.put_f32_le(layout::CUR_RANGE, data.cur);
    writer.put_u8(layout::REC_GRP_OFFSET, data.rec_grp);
    writer.put_slice(layout::RESERVED_RANGE, data.reserved.as_bytes());
    writer.finish()
}
