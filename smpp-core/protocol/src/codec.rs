//! PDU 编解码
//!
//! 头部四个 32 位大端整数，随后是按布局顺序的必选字段和 TLV。

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::fields::{layout, FieldKind, FieldSpec, TlvKind, TlvSpec};
use crate::message::{DestAddress, FieldValue, Message, UnsuccessSme};
use crate::{MessageType, ProtocolError, Result};

/// 头部长度
pub const HEADER_LEN: usize = 16;

/// short_message 最大长度
pub const MAX_SHORT_MESSAGE_LEN: usize = 254;

/// PDU 头部
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PduHeader {
    pub command_length: u32,
    pub command_id: u32,
    pub command_status: u32,
    pub sequence_number: u32,
}

impl PduHeader {
    /// 只解析头部，不要求命令 id 已知
    pub fn parse(frame: &[u8]) -> Result<Self> {
        if frame.len() < HEADER_LEN {
            return Err(ProtocolError::ParseError(format!(
                "帧长度 {} 小于头部长度",
                frame.len()
            )));
        }
        let mut buf = &frame[..HEADER_LEN];
        Ok(Self {
            command_length: buf.get_u32(),
            command_id: buf.get_u32(),
            command_status: buf.get_u32(),
            sequence_number: buf.get_u32(),
        })
    }
}

/// 编码一个完整 PDU
pub fn encode(message: &Message) -> Result<Bytes> {
    let layout = message.layout();
    if let Some(reason) = layout.unsupported {
        return Err(ProtocolError::Unsupported(reason.to_string()));
    }

    let mut buf = BytesMut::with_capacity(64);
    buf.put_u32(0);
    buf.put_u32(message.message_type().id());
    buf.put_u32(message.status);
    buf.put_u32(message.sequence_number);

    for spec in layout.mandatory {
        let value = message
            .mandatory(spec.id)
            .ok_or(ProtocolError::ValueMismatch(spec.label))?;
        encode_mandatory(&mut buf, spec, value)?;
    }

    for spec in layout.optional {
        if let Some(value) = message.optional(spec.id) {
            if !spec.implemented {
                return Err(ProtocolError::Unsupported(format!("{} 尚未实现", spec.label)));
            }
            encode_tlv(&mut buf, spec, value)?;
        }
    }

    for tlv in message.unknown_tlvs() {
        buf.put_u16(tlv.tag);
        buf.put_u16(tlv_len(tlv.value.len(), "Tlv")?);
        buf.put_slice(&tlv.value);
    }

    let len = buf.len() as u32;
    buf[..4].copy_from_slice(&len.to_be_bytes());
    Ok(buf.freeze())
}

fn put_cstring(buf: &mut BytesMut, label: &'static str, value: &str, max: usize) -> Result<()> {
    if value.len() + 1 > max {
        return Err(ProtocolError::FieldTooLong(label, value.len(), max - 1));
    }
    if value.as_bytes().contains(&0) {
        return Err(ProtocolError::ParseError(format!("字段 {} 含有 NUL", label)));
    }
    buf.put_slice(value.as_bytes());
    buf.put_u8(0);
    Ok(())
}

fn tlv_len(len: usize, label: &'static str) -> Result<u16> {
    u16::try_from(len).map_err(|_| ProtocolError::FieldTooLong(label, len, u16::MAX as usize))
}

fn encode_mandatory(buf: &mut BytesMut, spec: &FieldSpec, value: &FieldValue) -> Result<()> {
    match (spec.kind, value) {
        (FieldKind::CString { max }, FieldValue::Text(s)) => put_cstring(buf, spec.label, s, max),
        (FieldKind::Integer { .. }, FieldValue::U8(v)) => {
            buf.put_u8(*v);
            Ok(())
        }
        (FieldKind::ShortMessage, FieldValue::Octets(bytes)) => {
            if bytes.len() > MAX_SHORT_MESSAGE_LEN {
                return Err(ProtocolError::FieldTooLong(
                    spec.label,
                    bytes.len(),
                    MAX_SHORT_MESSAGE_LEN,
                ));
            }
            buf.put_u8(bytes.len() as u8);
            buf.put_slice(bytes);
            Ok(())
        }
        (FieldKind::DestinationList, FieldValue::Destinations(dests)) => {
            if dests.len() > 254 {
                return Err(ProtocolError::FieldTooLong(spec.label, dests.len(), 254));
            }
            buf.put_u8(dests.len() as u8);
            for dest in dests {
                match dest {
                    DestAddress::Sme { ton, npi, address } => {
                        buf.put_u8(1);
                        buf.put_u8(*ton);
                        buf.put_u8(*npi);
                        put_cstring(buf, spec.label, address, 21)?;
                    }
                    DestAddress::DistributionList(name) => {
                        buf.put_u8(2);
                        put_cstring(buf, "DistributionList", name, 21)?;
                    }
                }
            }
            Ok(())
        }
        (FieldKind::UnsuccessList, FieldValue::Unsuccess(_)) => Err(ProtocolError::Unsupported(
            "unsuccess_sme 列表编码尚未实现".to_string(),
        )),
        _ => Err(ProtocolError::ValueMismatch(spec.label)),
    }
}

fn encode_tlv(buf: &mut BytesMut, spec: &TlvSpec, value: &FieldValue) -> Result<()> {
    buf.put_u16(spec.tag);
    match (spec.kind, value) {
        (TlvKind::U8, FieldValue::U8(v)) => {
            buf.put_u16(1);
            buf.put_u8(*v);
        }
        (TlvKind::U16, FieldValue::U16(v)) => {
            buf.put_u16(2);
            buf.put_u16(*v);
        }
        (TlvKind::U32, FieldValue::U32(v)) => {
            buf.put_u16(4);
            buf.put_u32(*v);
        }
        (TlvKind::CString, FieldValue::Text(s)) => {
            buf.put_u16(tlv_len(s.len() + 1, spec.label)?);
            buf.put_slice(s.as_bytes());
            buf.put_u8(0);
        }
        (TlvKind::Octets, FieldValue::Octets(bytes)) => {
            buf.put_u16(tlv_len(bytes.len(), spec.label)?);
            buf.put_slice(bytes);
        }
        (TlvKind::Flag, FieldValue::Flag) => {
            buf.put_u16(0);
        }
        (
            TlvKind::NetworkError,
            FieldValue::NetworkError {
                network_type,
                error_code,
            },
        ) => {
            buf.put_u16(3);
            buf.put_u8(*network_type);
            buf.put_u16(*error_code);
        }
        _ => return Err(ProtocolError::ValueMismatch(spec.label)),
    }
    Ok(())
}

/// 解码一个完整 PDU
pub fn decode(frame: &[u8]) -> Result<Message> {
    let header = PduHeader::parse(frame)?;
    if header.command_length as usize != frame.len() {
        return Err(ProtocolError::ParseError(format!(
            "command_length {} 与帧长度 {} 不一致",
            header.command_length,
            frame.len()
        )));
    }

    let message_type = MessageType::from_id(header.command_id)
        .ok_or(ProtocolError::UnknownCommandId(header.command_id))?;
    let layout = layout(message_type);

    let mut message = Message::new(message_type)
        .with_sequence(header.sequence_number)
        .with_status(header.command_status);

    let mut body = &frame[HEADER_LEN..];

    // 错误响应可能不带消息体
    if body.is_empty() && message_type.is_response() {
        return Ok(message);
    }

    for spec in layout.mandatory {
        let value = decode_mandatory(&mut body, spec)?;
        message.set_mandatory(spec.id, value)?;
    }

    while body.has_remaining() {
        if body.remaining() < 4 {
            return Err(ProtocolError::ParseError("TLV 头部不完整".to_string()));
        }
        let tag = body.get_u16();
        let len = body.get_u16() as usize;
        if body.remaining() < len {
            return Err(ProtocolError::ParseError(format!(
                "TLV 0x{:04X} 长度 {} 超出剩余 {}",
                tag,
                len,
                body.remaining()
            )));
        }
        let value = body[..len].to_vec();
        body.advance(len);

        match layout.tlv_by_tag(tag).and_then(|spec| decode_tlv(spec, &value).map(|v| (spec, v))) {
            Some((spec, v)) => message.set_optional(spec.id, v)?,
            None => message.push_unknown_tlv(tag, value),
        }
    }

    Ok(message)
}

fn get_u8(body: &mut &[u8], label: &str) -> Result<u8> {
    if !body.has_remaining() {
        return Err(ProtocolError::ParseError(format!("字段 {} 缺失", label)));
    }
    Ok(body.get_u8())
}

fn get_cstring(body: &mut &[u8], label: &str) -> Result<String> {
    let end = body
        .iter()
        .position(|b| *b == 0)
        .ok_or_else(|| ProtocolError::ParseError(format!("字段 {} 缺少 NUL 结尾", label)))?;
    let value = String::from_utf8_lossy(&body[..end]).into_owned();
    body.advance(end + 1);
    Ok(value)
}

fn decode_mandatory(body: &mut &[u8], spec: &FieldSpec) -> Result<FieldValue> {
    match spec.kind {
        FieldKind::CString { .. } => Ok(FieldValue::Text(get_cstring(body, spec.label)?)),
        FieldKind::Integer { .. } => Ok(FieldValue::U8(get_u8(body, spec.label)?)),
        FieldKind::ShortMessage => {
            let len = get_u8(body, spec.label)? as usize;
            if body.remaining() < len {
                return Err(ProtocolError::ParseError(format!(
                    "short_message 长度 {} 超出剩余 {}",
                    len,
                    body.remaining()
                )));
            }
            let bytes = body[..len].to_vec();
            body.advance(len);
            Ok(FieldValue::Octets(bytes))
        }
        FieldKind::DestinationList => {
            let count = get_u8(body, spec.label)?;
            let mut dests = Vec::with_capacity(count as usize);
            for _ in 0..count {
                match get_u8(body, "dest_flag")? {
                    1 => {
                        let ton = get_u8(body, "dest_addr_ton")?;
                        let npi = get_u8(body, "dest_addr_npi")?;
                        let address = get_cstring(body, spec.label)?;
                        dests.push(DestAddress::Sme { ton, npi, address });
                    }
                    2 => dests.push(DestAddress::DistributionList(get_cstring(body, "dl_name")?)),
                    flag => {
                        return Err(ProtocolError::ParseError(format!("未知 dest_flag: {}", flag)))
                    }
                }
            }
            Ok(FieldValue::Destinations(dests))
        }
        FieldKind::UnsuccessList => {
            let count = get_u8(body, spec.label)?;
            let mut smes = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let ton = get_u8(body, "dest_addr_ton")?;
                let npi = get_u8(body, "dest_addr_npi")?;
                let address = get_cstring(body, spec.label)?;
                if body.remaining() < 4 {
                    return Err(ProtocolError::ParseError("error_status_code 不完整".to_string()));
                }
                let error_status = body.get_u32();
                smes.push(UnsuccessSme {
                    ton,
                    npi,
                    address,
                    error_status,
                });
            }
            Ok(FieldValue::Unsuccess(smes))
        }
    }
}

/// 长度不符合类型的 TLV 返回 `None`，由调用方按原始字节保留
fn decode_tlv(spec: &TlvSpec, mut value: &[u8]) -> Option<FieldValue> {
    if !spec.implemented {
        return None;
    }
    match (spec.kind, value.len()) {
        (TlvKind::U8, 1) => Some(FieldValue::U8(value.get_u8())),
        (TlvKind::U16, 2) => Some(FieldValue::U16(value.get_u16())),
        (TlvKind::U32, 4) => Some(FieldValue::U32(value.get_u32())),
        (TlvKind::CString, n) if n > 0 => {
            let end = value.iter().position(|b| *b == 0).unwrap_or(n);
            Some(FieldValue::Text(String::from_utf8_lossy(&value[..end]).into_owned()))
        }
        (TlvKind::Octets, _) => Some(FieldValue::Octets(value.to_vec())),
        (TlvKind::Flag, 0) => Some(FieldValue::Flag),
        (TlvKind::NetworkError, 3) => Some(FieldValue::NetworkError {
            network_type: value.get_u8(),
            error_code: value.get_u16(),
        }),
        _ => None,
    }
}
