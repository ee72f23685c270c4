use pcap_parser::Linktype;

use super::layout;

/// One usbmon event with its captured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsbmonPacket<'a> {
    pub event_type: u8,
    pub transfer_type: u8,
    pub endpoint: u8,
    pub device: u8,
    pub bus: u16,
    pub data: &'a [u8],
}

impl UsbmonPacket<'_> {
    /// Completed interrupt IN transfer carrying data, i.e. a HID input report.
    pub fn is_input_report(&self) -> bool {
        self.event_type == layout::EVENT_COMPLETE
            && self.transfer_type == layout::TRANSFER_INTERRUPT
            && self.endpoint & layout::ENDPOINT_DIR_IN != 0
            && !self.data.is_empty()
    }
}

/// Restricts usbmon reports to one bus and/or device address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsbmonFilter {
    pub bus: Option<u16>,
    pub device: Option<u8>,
}

impl UsbmonFilter {
    pub fn matches(&self, packet: &UsbmonPacket<'_>) -> bool {
        self.bus.is_none_or(|bus| bus == packet.bus)
            && self.device.is_none_or(|device| device == packet.device)
    }
}

pub fn header_len(linktype: Linktype) -> Option<usize> {
    if linktype == layout::LINKTYPE_USB_LINUX {
        Some(layout::USBMON_HEADER_LEN)
    } else if linktype == layout::LINKTYPE_USB_LINUX_MMAPPED {
        Some(layout::USBMON_MMAPPED_HEADER_LEN)
    } else {
        None
    }
}

/// Split a usbmon record into header fields and captured data.
///
/// Returns `None` for non-usbmon link types and for records shorter than
/// their header. The data is clipped to the header's captured length.
pub fn parse_usbmon(linktype: Linktype, record: &[u8]) -> Option<UsbmonPacket<'_>> {
    let header_len = header_len(linktype)?;
    let header = record.get(..header_len)?;
    let captured = header.get(layout::CAPTURED_LEN_RANGE)?;
    let captured = u32::from_le_bytes([captured[0], captured[1], captured[2], captured[3]]) as usize;
    let body = &record[header_len..];
    let data = &body[..captured.min(body.len())];

    Some(UsbmonPacket {
        event_type: header[layout::EVENT_TYPE_OFFSET],
        transfer_type: header[layout::TRANSFER_TYPE_OFFSET],
        endpoint: header[layout::ENDPOINT_OFFSET],
        device: header[layout::DEVICE_OFFSET],
        bus: u16::from_le_bytes([header[layout::BUS_RANGE.start], header[layout::BUS_RANGE.start + 1]]),
        data,
    })
}

#[cfg(test)]
pub(crate) fn build_usbmon_record(
    mmapped: bool,
    event_type: u8,
    endpoint: u8,
    bus: u16,
    device: u8,
    data: &[u8],
) -> Vec<u8> {
    let header_len = if mmapped {
        layout::USBMON_MMAPPED_HEADER_LEN
    } else {
        layout::USBMON_HEADER_LEN
    };
    let mut record = vec![0u8; header_len];
    record[layout::EVENT_TYPE_OFFSET] = event_type;
    record[layout::TRANSFER_TYPE_OFFSET] = layout::TRANSFER_INTERRUPT;
    record[layout::ENDPOINT_OFFSET] = endpoint;
    record[layout::DEVICE_OFFSET] = device;
    record[layout::BUS_RANGE].copy_from_slice(&bus.to_le_bytes());
    record[layout::CAPTURED_LEN_RANGE].copy_from_slice(&(data.len() as u32).to_le_bytes());
    record.extend_from_slice(data);
    record
}
