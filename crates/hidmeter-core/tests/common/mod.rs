#![allow(dead_code)]

use std::fs;
use std::path::Path;

use hidmeter_core::{FreeBytes, MeterData, UsbFrame, UsbSubPacket, encode_frame};

pub const LINKTYPE_USB_LINUX: u16 = 189;
pub const LINKTYPE_USB_LINUX_MMAPPED: u16 = 220;

pub fn reading(rec_grp: u8, run_time: u32, vol: f32, cur: f32) -> MeterData {
    MeterData {
        rec_grp,
        run_time,
        vol,
        cur,
        ah: run_time as f32 * 0.001,
        wh: run_time as f32 * 0.005,
        temp_in: 30.0,
        temp_out: 25.0,
        ..MeterData::default()
    }
}

pub fn report_bytes(idx: u8, data: &MeterData) -> [u8; 64] {
    let frame = UsbFrame {
        start: 0x5a,
        head: 0xa5,
        idx1: idx,
        idx2: 0,
        need_ack: 0,
        free: FreeBytes::default(),
        pac: UsbSubPacket::with_payload(0x01, 52, data, 0),
        verify: 0,
    };
    encode_frame(&frame)
}

pub fn usbmon_record(
    mmapped: bool,
    event_type: u8,
    endpoint: u8,
    bus: u16,
    device: u8,
    data: &[u8],
) -> Vec<u8> {
    let header_len = if mmapped { 64 } else { 48 };
    let mut record = vec![0u8; header_len];
    record[8] = event_type;
    record[9] = 0x01;
    record[10] = endpoint;
    record[11] = device;
    record[12..14].copy_from_slice(&bus.to_le_bytes());
    record[32..36].copy_from_slice(&(data.len() as u32).to_le_bytes());
    record[36..40].copy_from_slice(&(data.len() as u32).to_le_bytes());
    record.extend_from_slice(data);
    record
}

pub fn write_raw(path: &Path, reports: &[Vec<u8>]) {
    let bytes: Vec<u8> = reports.iter().flatten().copied().collect();
    fs::write(path, bytes).expect("write raw capture");
}

pub fn write_pcapng(path: &Path, linktype: u16, packets: &[(u64, Vec<u8>)]) {
    write_pcapng_with_tsresol(path, linktype, None, packets);
}

/// Timestamps in `packets` are in the interface's `if_tsresol` ticks.
pub fn write_pcapng_with_tsresol(
    path: &Path,
    linktype: u16,
    tsresol: Option<u8>,
    packets: &[(u64, Vec<u8>)],
) {
    let mut output = Vec::new();
    output.extend_from_slice(&pcapng_block(0x0A0D0D0A, &section_header_body()));
    output.extend_from_slice(&pcapng_block(1, &interface_desc_body(linktype, tsresol)));
    for (ts, data) in packets {
        output.extend_from_slice(&pcapng_block(6, &enhanced_packet_body(*ts, data)));
    }
    fs::write(path, output).expect("write pcapng capture");
}

pub fn write_legacy_pcap(path: &Path, linktype: u16, packets: &[(u64, Vec<u8>)]) {
    write_legacy(path, linktype, 0xa1b2_c3d4, 1_000_000, packets);
}

/// Nanosecond-resolution legacy pcap; timestamps in `packets` are ns.
pub fn write_legacy_pcap_nanos(path: &Path, linktype: u16, packets: &[(u64, Vec<u8>)]) {
    write_legacy(path, linktype, 0xa1b2_3c4d, 1_000_000_000, packets);
}

fn write_legacy(path: &Path, linktype: u16, magic: u32, ticks: u64, packets: &[(u64, Vec<u8>)]) {
    let mut output = Vec::new();
    output.extend_from_slice(&magic.to_le_bytes());
    output.extend_from_slice(&2u16.to_le_bytes());
    output.extend_from_slice(&4u16.to_le_bytes());
    output.extend_from_slice(&0i32.to_le_bytes());
    output.extend_from_slice(&0u32.to_le_bytes());
    output.extend_from_slice(&65535u32.to_le_bytes());
    output.extend_from_slice(&(linktype as u32).to_le_bytes());
    for (ts, data) in packets {
        output.extend_from_slice(&((ts / ticks) as u32).to_le_bytes());
        output.extend_from_slice(&((ts % ticks) as u32).to_le_bytes());
        output.extend_from_slice(&(data.len() as u32).to_le_bytes());
        output.extend_from_slice(&(data.len() as u32).to_le_bytes());
        output.extend_from_slice(data);
    }
    fs::write(path, output).expect("write pcap capture");
}

fn pcapng_block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let total_len = (8 + body.len() + 4) as u32;
    let mut block = Vec::with_capacity(total_len as usize);
    block.extend_from_slice(&block_type.to_be_bytes());
    block.extend_from_slice(&total_len.to_be_bytes());
    block.extend_from_slice(body);
    block.extend_from_slice(&total_len.to_be_bytes());
    block
}

fn section_header_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0x1A2B3C4Du32.to_be_bytes());
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&(-1i64).to_be_bytes());
    body
}

fn interface_desc_body(linktype: u16, tsresol: Option<u8>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&linktype.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&65535u32.to_be_bytes());
    if let Some(tsresol) = tsresol {
        // if_tsresol (code 9), one byte padded to four, then opt_endofopt.
        body.extend_from_slice(&9u16.to_be_bytes());
        body.extend_from_slice(&1u16.to_be_bytes());
        body.extend_from_slice(&[tsresol, 0, 0, 0]);
        body.extend_from_slice(&0u32.to_be_bytes());
    }
    body
}

fn enhanced_packet_body(ts: u64, data: &[u8]) -> Vec<u8> {
    let ts_high = ((ts >> 32) & 0xFFFF_FFFF) as u32;
    let ts_low = (ts & 0xFFFF_FFFF) as u32;
    let cap_len = data.len() as u32;
    let mut body = Vec::new();
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&ts_high.to_be_bytes());
    body.extend_from_slice(&ts_low.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(data);
    let pad_len = (4 - (data.len() % 4)) % 4;
    body.extend(std::iter::repeat_n(0u8, pad_len));
    body
}

pub fn temp_path(name: &str) -> std::path::PathBuf {
    let unique = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("hidmeter_{unique}_{name}"))
}
