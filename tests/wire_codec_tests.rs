// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Integration tests for the TCPROS wire codec.

mod common;

use proptest::prelude::*;

use robomsg::encoding::wire::WireDecoder;
use robomsg::{CodecErrorKind, Duration, Message, MessageCodec, Time, Value};

use common::{hex, resolve};

fn point(ty: &robomsg::MessageType, x: f64, y: f64, z: f64) -> Message {
    let point_ty = ty.nested("geometry_msgs/Point").unwrap();
    let mut p = point_ty.new_message();
    p.set("x", x).unwrap();
    p.set("y", y).unwrap();
    p.set("z", z).unwrap();
    p
}

#[test]
fn test_scenario_bytes() {
    let ty = resolve("test_msgs/Scenario");
    let mut msg = ty.new_message();
    msg.set("u8", 0x12u8).unwrap();
    msg.set("s", "Go").unwrap();
    msg.set("arr", vec![1i16, -1]).unwrap();

    let bytes = msg.to_bytes().unwrap();
    assert_eq!(hex(&bytes), "12 02 00 00 00 47 6F 01 00 FF FF");
    assert_eq!(msg.wire_size(), bytes.len());

    let decoded = Message::from_bytes(&ty, &bytes).unwrap();
    assert_eq!(decoded, msg);
}

#[test]
fn test_all_types_roundtrip() {
    let ty = resolve("test_msgs/AllTypes");
    let mut msg = ty.new_message();
    msg.set("b", true).unwrap();
    msg.set("i8", -8i8).unwrap();
    msg.set("i16", -1600i16).unwrap();
    msg.set("i32", -320_000i32).unwrap();
    msg.set("i64", i64::MIN).unwrap();
    msg.set("u8", 200u8).unwrap();
    msg.set("u16", 65_000u16).unwrap();
    msg.set("u32", u32::MAX).unwrap();
    msg.set("u64", u64::MAX).unwrap();
    msg.set("f32", 0.25f32).unwrap();
    msg.set("f64", -1.0e-300f64).unwrap();
    msg.set("s", "héllo").unwrap();
    msg.set("t", Time::new(1_700_000_000, 999_999_999)).unwrap();
    msg.set("d", Duration::new(5, 1)).unwrap();
    msg.set("bytes", vec![0u8, 1, 2, 255]).unwrap();
    msg.set("fixed_bytes", vec![9u8, 8, 7]).unwrap();
    msg.set("floats", vec![1.5f32, -0.0, f32::MAX]).unwrap();
    msg.set("names", vec!["a".to_string(), "bc".to_string()]).unwrap();
    msg.set("stamps", vec![Time::new(1, 2), Time::new(3, 4)]).unwrap();
    msg.set("points", vec![point(&ty, 1.0, 2.0, 3.0), point(&ty, -1.0, 0.5, 0.0)])
        .unwrap();

    let mut frame = Vec::new();
    msg.serialize(&mut frame).unwrap();
    assert_eq!(frame.len(), msg.wire_size());

    let mut decoded = ty.new_message();
    let consumed = decoded.deserialize(&frame).unwrap();
    assert_eq!(consumed, frame.len());
    assert_eq!(decoded, msg);
}

#[test]
fn test_zero_message_encodes_to_min_size() {
    for name in ["test_msgs/AllTypes", "nav_msgs/Path", "geometry_msgs/PoseStamped"] {
        let ty = resolve(name);
        let bytes = ty.new_message().to_bytes().unwrap();
        assert_eq!(bytes.len(), ty.min_wire_size(), "{name}");
    }
}

#[test]
fn test_nested_message_array_roundtrip() {
    let ty = resolve("nav_msgs/Path");
    let stamped_ty = ty.nested("geometry_msgs/PoseStamped").unwrap();

    let mut poses = Vec::new();
    for seq in 0..3u32 {
        let mut stamped = stamped_ty.new_message();
        let header = stamped.get_mut("header").and_then(Value::as_message_mut).unwrap();
        header.set("seq", seq).unwrap();
        header.set("frame_id", "map").unwrap();
        poses.push(stamped);
    }
    let mut msg = ty.new_message();
    msg.set("poses", poses).unwrap();

    let frame = msg.to_bytes().unwrap();
    let decoded = Message::from_bytes(&ty, &frame).unwrap();
    let decoded_poses = decoded.get("poses").and_then(Value::as_messages).unwrap();
    assert_eq!(decoded_poses.len(), 3);
    let last_header = decoded_poses[2].get("header").and_then(Value::as_message).unwrap();
    assert_eq!(last_header.get("seq"), Some(&Value::UInt32(2)));
    assert_eq!(
        last_header.get("frame_id").and_then(Value::as_str),
        Some("map")
    );
}

#[test]
fn test_failed_deserialize_leaves_instance_untouched() {
    let ty = resolve("test_msgs/Scenario");
    let mut msg = ty.new_message();
    msg.set("s", "keep").unwrap();
    let before = msg.clone();

    // Declares a 100-byte string but carries two bytes.
    let frame = [0x01, 100, 0, 0, 0, b'h', b'i'];
    let err = msg.deserialize(&frame).unwrap_err();
    assert_eq!(err.path().to_string(), "s");
    assert!(matches!(err.kind(), CodecErrorKind::UnexpectedEof { .. }));
    assert_eq!(msg, before);
}

#[test]
fn test_nested_error_path() {
    let ty = resolve("nav_msgs/Path");

    // Outer header with empty frame_id, then a count of one pose.
    let mut frame = vec![0u8; 12];
    frame.extend_from_slice(&[0, 0, 0, 0]);
    frame.extend_from_slice(&[1, 0, 0, 0]);
    // The pose's own frame_id eats four bytes, leaving the orientation short.
    frame.extend_from_slice(&[0u8; 12]);
    frame.extend_from_slice(&[4, 0, 0, 0]);
    frame.extend_from_slice(b"base");
    frame.extend_from_slice(&[0u8; 52]);

    let err = Message::from_bytes(&ty, &frame).unwrap_err();
    assert_eq!(err.path().to_string(), "poses[0].pose.orientation.w");
    assert!(matches!(
        err.kind(),
        CodecErrorKind::UnexpectedEof {
            requested: 8,
            available: 4
        }
    ));
}

#[test]
fn test_decode_stops_at_message_end() {
    let ty = resolve("test_msgs/Scenario");
    let mut frame = vec![0x12, 0, 0, 0, 0, 1, 0, 2, 0];
    frame.extend_from_slice(b"trailing");

    let mut decoder = WireDecoder::new(&frame);
    let msg = decoder.decode(&ty).unwrap();
    assert_eq!(decoder.position(), 9);
    assert_eq!(decoder.remaining(), 8);
    assert_eq!(msg.get("arr"), Some(&Value::Int16Array(vec![1, 2])));
}

#[test]
fn test_codec_trait_identity() {
    let ty = resolve("geometry_msgs/Point");
    let msg = ty.new_message();
    assert_eq!(MessageCodec::type_name(&msg), "geometry_msgs/Point");
    assert_eq!(
        MessageCodec::md5sum(&msg),
        "4a842b65f413084dc2b10fb484ea7f17"
    );
    assert_eq!(msg.definition(), "float64 x\nfloat64 y\nfloat64 z\n");
    assert_eq!(msg.encoded_len(), 24);
}

proptest! {
    #[test]
    fn prop_dynamic_array_count_prefix(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let ty = resolve("sensor_msgs/CompressedImage");
        let mut msg = ty.new_message();
        msg.set("data", data.clone()).unwrap();
        let bytes = msg.to_bytes().unwrap();

        // header (4 + 8 + 4) + empty format (4), then the count prefix.
        let count = u32::from_le_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
        prop_assert_eq!(count as usize, data.len());
        prop_assert_eq!(&bytes[24..], &data[..]);

        let decoded = Message::from_bytes(&ty, &bytes).unwrap();
        prop_assert_eq!(decoded.get("data").and_then(Value::as_bytes), Some(&data[..]));
    }

    #[test]
    fn prop_element_array_counts(
        ints in proptest::collection::vec(any::<i32>(), 0..32),
        names in proptest::collection::vec("[a-z]{0,6}", 0..8),
        coords in proptest::collection::vec((-1000i32..1000, -1000i32..1000), 0..8),
    ) {
        let ty = resolve("test_msgs/Lists");
        let points: Vec<Message> = coords
            .iter()
            .map(|&(x, y)| point(&ty, f64::from(x), f64::from(y), 0.5))
            .collect();

        let mut msg = ty.new_message();
        msg.set("ints", ints.clone()).unwrap();
        msg.set("names", names.clone()).unwrap();
        msg.set("points", points.clone()).unwrap();
        let bytes = msg.to_bytes().unwrap();
        prop_assert_eq!(bytes.len(), msg.wire_size());

        let mut offset = 0;
        let count_at = |offset: usize| {
            u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
        };
        prop_assert_eq!(count_at(offset) as usize, ints.len());
        offset += 4 + 4 * ints.len();
        prop_assert_eq!(count_at(offset) as usize, names.len());
        offset += 4 + names.iter().map(|n| 4 + n.len()).sum::<usize>();
        prop_assert_eq!(count_at(offset) as usize, points.len());
        prop_assert_eq!(bytes.len(), offset + 4 + 24 * points.len());

        let decoded = Message::from_bytes(&ty, &bytes).unwrap();
        prop_assert_eq!(decoded, msg);
    }

    #[test]
    fn prop_fixed_array_padding(values in proptest::collection::vec(any::<i16>(), 0..=2)) {
        let ty = resolve("test_msgs/Scenario");
        let mut msg = ty.new_message();
        msg.set("arr", values.clone()).unwrap();
        let bytes = msg.to_bytes().unwrap();
        prop_assert_eq!(bytes.len(), ty.min_wire_size());

        let decoded = Message::from_bytes(&ty, &bytes).unwrap();
        let mut expected = values.clone();
        expected.resize(2, 0);
        prop_assert_eq!(decoded.get("arr"), Some(&Value::Int16Array(expected)));
    }

    #[test]
    fn prop_fixed_array_truncation(values in proptest::collection::vec(any::<i16>(), 3..16)) {
        let ty = resolve("test_msgs/Scenario");
        let mut msg = ty.new_message();
        msg.set("arr", values.clone()).unwrap();
        let bytes = msg.to_bytes().unwrap();
        prop_assert_eq!(bytes.len(), 1 + 4 + 4);
        prop_assert_eq!(msg.wire_size(), bytes.len());

        let decoded = Message::from_bytes(&ty, &bytes).unwrap();
        prop_assert_eq!(
            decoded.get("arr"),
            Some(&Value::Int16Array(values[..2].to_vec()))
        );
    }

    #[test]
    fn prop_scalar_roundtrip(
        i in any::<i64>(),
        u in any::<u32>(),
        f in any::<f64>().prop_filter("finite", |f| f.is_finite()),
        s in "\\PC{0,32}",
    ) {
        let ty = resolve("test_msgs/AllTypes");
        let mut msg = ty.new_message();
        msg.set("i64", i).unwrap();
        msg.set("u32", u).unwrap();
        msg.set("f64", f).unwrap();
        msg.set("s", s.clone()).unwrap();

        let decoded = Message::from_bytes(&ty, &msg.to_bytes().unwrap()).unwrap();
        prop_assert_eq!(decoded, msg);
    }
}
