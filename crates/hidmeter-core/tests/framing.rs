use hidmeter_core::{
    FramingError, FreeBytes, Layer, MeterData, Reserved, UsbFrame, UsbSubPacket, decode_frame,
    decode_payload, decode_subframe, encode_frame, encode_payload, encode_subframe,
};

fn charging_reading() -> MeterData {
    MeterData {
        off_per: 1,
        off_hour: 2,
        rec_ma: 2500,
        ah: 0.75,
        wh: 3.8,
        rec_time: 1_712_345_678,
        run_time: 5400,
        dp: 0.6,
        dm: 0.0,
        temp_in: 36.5,
        temp_out: 27.25,
        vol: 5.08,
        cur: 2.1,
        rec_grp: 4,
        reserved: Reserved::new([0, 0, 0, 0, 0xde, 0xad, 0x01]),
    }
}

fn frame_around(data: &MeterData) -> UsbFrame {
    UsbFrame {
        start: 0x5a,
        head: 0xa5,
        idx1: 7,
        idx2: 1,
        need_ack: 0,
        free: FreeBytes::try_from(&[0x10u8, 0x20, 0x30][..]).unwrap(),
        pac: UsbSubPacket::with_payload(0x02, 52, data, 0x99),
        verify: 0x42,
    }
}

#[test]
fn report_decodes_through_all_layers() {
    let data = charging_reading();
    let bytes = encode_frame(&frame_around(&data));
    assert_eq!(bytes.len(), 64);

    let frame = decode_frame(&bytes).unwrap();
    assert_eq!(frame.idx1, 7);
    assert_eq!(frame.free.as_bytes(), &[0x10, 0x20, 0x30]);
    assert_eq!(frame.pac.verify, 0x99);
    assert_eq!(frame.verify, 0x42);

    let payload = decode_payload(frame.pac.buf()).unwrap();
    assert_eq!(payload, data);
    assert_eq!(payload.reserved, data.reserved);
}

#[test]
fn layers_nest_at_fixed_offsets() {
    let data = charging_reading();
    let bytes = encode_frame(&frame_around(&data));
    let subframe = encode_subframe(&decode_subframe(&bytes[8..63]).unwrap());
    assert_eq!(&bytes[8..63], subframe.as_slice());
    assert_eq!(&subframe[2..54], encode_payload(&data).as_slice());
    assert_eq!(&bytes[46..50], &5.08f32.to_le_bytes());
}

#[test]
fn encode_sizes_are_fixed() {
    let data = MeterData::default();
    assert_eq!(encode_payload(&data).len(), 52);
    assert_eq!(encode_subframe(&UsbSubPacket::with_payload(0, 0, &data, 0)).len(), 55);
    assert_eq!(encode_frame(&frame_around(&data)).len(), 64);
}

#[test]
fn short_inputs_fail_with_layer() {
    assert!(matches!(
        decode_frame(&[0u8; 63]),
        Err(FramingError::SizeMismatch {
            layer: Layer::Frame,
            ..
        })
    ));
    assert!(matches!(
        decode_subframe(&[0u8; 54]),
        Err(FramingError::SizeMismatch {
            layer: Layer::SubPacket,
            ..
        })
    ));
    assert!(matches!(
        decode_payload(&[0u8; 53]),
        Err(FramingError::SizeMismatch {
            layer: Layer::Payload,
            ..
        })
    ));
}

#[test]
fn codecs_are_usable_across_threads() {
    let bytes = encode_frame(&frame_around(&charging_reading()));
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(move || decode_frame(&bytes).unwrap().measurement().unwrap()))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), charging_reading());
    }
}

#[test]
fn nan_reading_survives_frame_round_trip() {
    let data = MeterData {
        vol: f32::NAN,
        cur: -0.0,
        ..charging_reading()
    };
    let frame = frame_around(&data);
    let back = decode_frame(&encode_frame(&frame)).unwrap();
    assert_eq!(back, frame);
    assert_eq!(back.measurement().unwrap(), data);
}
