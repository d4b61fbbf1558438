//! PDU 编解码测试

use smpp_protocol::*;

#[test]
fn test_encode_enquire_link_header_only() {
    let msg = Message::new(MessageType::EnquireLink).with_sequence(7);
    let bytes = encode(&msg).unwrap();

    assert_eq!(
        &bytes[..],
        &[0, 0, 0, 16, 0, 0, 0, 0x15, 0, 0, 0, 0, 0, 0, 0, 7]
    );
}

#[test]
fn test_encode_bind_transmitter_layout() {
    let mut msg = Message::new(MessageType::BindTransmitter).with_sequence(1);
    msg.set_mandatory(FieldId::SystemId, FieldValue::text("esme"))
        .unwrap();
    msg.set_mandatory(FieldId::Password, FieldValue::text("pw"))
        .unwrap();

    let bytes = encode(&msg).unwrap();
    let body = &bytes[16..];

    let mut expected = Vec::new();
    expected.extend_from_slice(b"esme\0");
    expected.extend_from_slice(b"pw\0");
    expected.push(0); // system_type
    expected.push(0x34); // interface_version
    expected.push(0); // addr_ton
    expected.push(0); // addr_npi
    expected.push(0); // address_range
    assert_eq!(body, &expected[..]);

    let header = PduHeader::parse(&bytes).unwrap();
    assert_eq!(header.command_length as usize, bytes.len());
    assert_eq!(header.command_id, 0x0000_0002);
}

#[test]
fn test_submit_sm_with_tlvs_decodes_back() {
    let mut msg = Message::new(MessageType::SubmitSm).with_sequence(12);
    msg.set_mandatory(FieldId::SourceAddr, FieldValue::text("1234"))
        .unwrap();
    msg.set_mandatory(FieldId::DestinationAddr, FieldValue::text("5678"))
        .unwrap();
    msg.set_mandatory(FieldId::ShortMessage, FieldValue::Octets(b"hello".to_vec()))
        .unwrap();
    msg.set_optional(FieldId::SourcePort, FieldValue::U16(0))
        .unwrap();
    msg.set_optional(FieldId::AlertOnMsgDelivery, FieldValue::Flag)
        .unwrap();

    let decoded = decode(&encode(&msg).unwrap()).unwrap();

    assert_eq!(decoded, msg);
    // 值为 0 的可选字段仍然存在
    assert_eq!(decoded.optional(FieldId::SourcePort), Some(&FieldValue::U16(0)));
    assert!(!decoded.has_optional(FieldId::DestinationPort));
}

#[test]
fn test_decode_deliver_sm_receipt() {
    let mut frame = vec![0, 0, 0, 0, 0, 0, 0, 5, 0, 0, 0, 0, 0, 0, 0, 9];
    frame.extend_from_slice(b"\0"); // service_type
    frame.extend_from_slice(&[1, 1]);
    frame.extend_from_slice(b"447700\0");
    frame.extend_from_slice(&[0, 0]);
    frame.extend_from_slice(b"100\0");
    frame.extend_from_slice(&[0x04, 0, 0]); // esm_class, protocol_id, priority
    frame.extend_from_slice(b"\0\0"); // schedule, validity
    frame.extend_from_slice(&[0, 0, 0, 0]); // registered, replace, coding, default id
    frame.push(3);
    frame.extend_from_slice(b"id:");
    // receipted_message_id
    frame.extend_from_slice(&[0x00, 0x1E, 0x00, 0x04]);
    frame.extend_from_slice(b"abc\0");
    // network_error_code
    frame.extend_from_slice(&[0x04, 0x23, 0x00, 0x03, 0x03, 0x00, 0x2A]);
    // 未知 TLV
    frame.extend_from_slice(&[0x14, 0x00, 0x00, 0x01, 0xFF]);
    let len = frame.len() as u32;
    frame[..4].copy_from_slice(&len.to_be_bytes());

    let msg = decode(&frame).unwrap();

    assert_eq!(msg.message_type(), MessageType::DeliverSm);
    assert_eq!(msg.sequence_number, 9);
    assert_eq!(msg.mandatory(FieldId::SourceAddr), Some(&FieldValue::text("447700")));
    assert_eq!(msg.mandatory(FieldId::EsmClass), Some(&FieldValue::U8(4)));
    assert_eq!(
        msg.mandatory(FieldId::ShortMessage),
        Some(&FieldValue::Octets(b"id:".to_vec()))
    );
    assert_eq!(
        msg.optional(FieldId::ReceiptedMessageId),
        Some(&FieldValue::text("abc"))
    );
    assert_eq!(
        msg.optional(FieldId::NetworkErrorCode),
        Some(&FieldValue::NetworkError {
            network_type: 3,
            error_code: 42
        })
    );
    assert_eq!(msg.unknown_tlvs(), &[RawTlv { tag: 0x1400, value: vec![0xFF] }]);

    let lines = msg.field_lines();
    assert!(lines.contains(&("ReceiptedMessageID".to_string(), "abc".to_string())));
    assert!(lines.contains(&("Tlv0x1400".to_string(), "0xFF".to_string())));
}

#[test]
fn test_decode_unknown_command_id() {
    let frame = [0, 0, 0, 16, 0, 0, 0, 0x99, 0, 0, 0, 0, 0, 0, 0, 1];
    assert!(matches!(
        decode(&frame),
        Err(ProtocolError::UnknownCommandId(0x99))
    ));

    let header = PduHeader::parse(&frame).unwrap();
    assert_eq!(header.sequence_number, 1);
    assert_eq!(type_label(header.command_id), "0x00000099");
}

#[test]
fn test_decode_error_response_without_body() {
    let frame = [0, 0, 0, 16, 0x80, 0, 0, 0x04, 0, 0, 0, 0x45, 0, 0, 0, 3];
    let msg = decode(&frame).unwrap();
    assert_eq!(msg.message_type(), MessageType::SubmitSmResp);
    assert_eq!(msg.status_code(), Some(StatusCode::SubmitFailed));
}

#[test]
fn test_decode_truncated_body_fails() {
    let mut frame = vec![0, 0, 0, 0, 0, 0, 0, 0x03, 0, 0, 0, 0, 0, 0, 0, 1];
    frame.extend_from_slice(b"no-terminator");
    let len = frame.len() as u32;
    frame[..4].copy_from_slice(&len.to_be_bytes());

    assert!(matches!(decode(&frame), Err(ProtocolError::ParseError(_))));
}

#[test]
fn test_unsupported_types_refuse_to_encode() {
    let alert = Message::new(MessageType::AlertNotification);
    assert!(matches!(encode(&alert), Err(ProtocolError::Unsupported(_))));

    let resp = Message::new(MessageType::SubmitMultiResp);
    assert!(matches!(encode(&resp), Err(ProtocolError::Unsupported(_))));
}

#[test]
fn test_field_too_long() {
    let mut msg = Message::new(MessageType::SubmitSm);
    msg.set_mandatory(FieldId::ServiceType, FieldValue::text("TOOLONG"))
        .unwrap();
    assert!(matches!(
        encode(&msg),
        Err(ProtocolError::FieldTooLong("ServiceType", 7, 5))
    ));
}

#[test]
fn test_submit_multi_destinations() {
    let mut msg = Message::new(MessageType::SubmitMulti).with_sequence(4);
    msg.set_mandatory(
        FieldId::DestAddresses,
        FieldValue::Destinations(vec![
            DestAddress::sme(1, 1, "111"),
            DestAddress::DistributionList("friends".to_string()),
        ]),
    )
    .unwrap();

    let decoded = decode(&encode(&msg).unwrap()).unwrap();
    assert_eq!(decoded.mandatory(FieldId::DestAddresses), msg.mandatory(FieldId::DestAddresses));

    let lines = decoded.field_lines();
    assert!(lines.contains(&("DestAddresses".to_string(), "111".to_string())));
    assert!(lines.contains(&("DistributionList".to_string(), "friends".to_string())));
}
