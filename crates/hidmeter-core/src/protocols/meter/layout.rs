use std::ops::Range;

// Outer frame (USBPac).
pub const FRAME_LEN: usize = 64;
pub const START_OFFSET: usize = 0;
pub const HEAD_OFFSET: usize = 1;
pub const IDX1_OFFSET: usize = 2;
pub const IDX2_OFFSET: usize = 3;
pub const NEED_ACK_OFFSET: usize = 4;
pub const FREE_RANGE: Range<usize> = 5..8;
pub const FREE_LEN: usize = FREE_RANGE.end - FREE_RANGE.start;
pub const SUBPACKET_RANGE: Range<usize> = 8..8 + SUBPACKET_LEN;
pub const FRAME_VERIFY_OFFSET: usize = SUBPACKET_RANGE.end;

// Sub-packet (USBSPac), offsets relative to the sub-packet start.
pub const SUBPACKET_LEN: usize = 55;
pub const COMMAND_OFFSET: usize = 0;
pub const LENGTH_OFFSET: usize = 1;
pub const PAYLOAD_RANGE: Range<usize> = 2..2 + PAYLOAD_LEN;
pub const SUBPACKET_VERIFY_OFFSET: usize = PAYLOAD_RANGE.end;

// Measurement payload (MeterData), little-endian, no padding.
pub const PAYLOAD_LEN: usize = 52;
pub const OFF_PER_OFFSET: usize = 0;
pub const OFF_HOUR_OFFSET: usize = 1;
pub const REC_MA_RANGE: Range<usize> = 2..4;
pub const AH_RANGE: Range<usize> = 4..8;
pub const WH_RANGE: Range<usize> = 8..12;
pub const REC_TIME_RANGE: Range<usize> = 12..16;
pub const RUN_TIME_RANGE: Range<usize> = 16..20;
pub const DP_RANGE: Range<usize> = 20..24;
pub const DM_RANGE: Range<usize> = 24..28;
pub const TEMP_IN_RANGE: Range<usize> = 28..32;
pub const TEMP_OUT_RANGE: Range<usize> = 32..36;
pub const VOL_RANGE: Range<usize> = 36..40;
pub const CUR_RANGE: Range<usize> = 40..44;
pub const REC_GRP_OFFSET: usize = 44;
pub const RESERVED_RANGE: Range<usize> = 45..52;
pub const RESERVED_LEN: usize = RESERVED_RANGE.end - RESERVED_RANGE.start;

const _: () = {
    assert!(FRAME_VERIFY_OFFSET == FRAME_LEN - 1);
    assert!(FREE_RANGE.end == SUBPACKET_RANGE.start);
    assert!(SUBPACKET_VERIFY_OFFSET == SUBPACKET_LEN - 1);
    assert!(RESERVED_RANGE.end == PAYLOAD_LEN);
    assert!(RESERVED_LEN == 7);
    assert!(FREE_LEN == 3);
};
