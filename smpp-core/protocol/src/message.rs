//! 消息模型
//!
//! 必选字段在构造时即按布局填入默认值；可选字段只有"存在"或"不存在"两种状态，
//! 不存在不等于零值。

use std::collections::BTreeMap;
use std::fmt;

use crate::catalog::status_label;
use crate::fields::{layout, FieldId, FieldKind, FieldSpec, MessageLayout, TlvKind, TlvSpec};
use crate::{MessageType, ProtocolError, Result, StatusCode};

/// submit_multi 的目的地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestAddress {
    /// dest_flag = 1
    Sme { ton: u8, npi: u8, address: String },
    /// dest_flag = 2
    DistributionList(String),
}

impl DestAddress {
    pub fn sme(ton: u8, npi: u8, address: &str) -> Self {
        DestAddress::Sme {
            ton,
            npi,
            address: address.to_string(),
        }
    }
}

/// submit_multi_resp 中投递失败的地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsuccessSme {
    pub ton: u8,
    pub npi: u8,
    pub address: String,
    pub error_status: u32,
}

/// 字段值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    U8(u8),
    U16(u16),
    U32(u32),
    Text(String),
    Octets(Vec<u8>),
    Flag,
    NetworkError { network_type: u8, error_code: u16 },
    Destinations(Vec<DestAddress>),
    Unsuccess(Vec<UnsuccessSme>),
}

impl FieldValue {
    pub fn text(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }

    pub fn as_u8(&self) -> Option<u8> {
        match self {
            FieldValue::U8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Octets(b) => Some(b),
            _ => None,
        }
    }

    fn fits_mandatory(&self, kind: FieldKind) -> bool {
        matches!(
            (kind, self),
            (FieldKind::CString { .. }, FieldValue::Text(_))
                | (FieldKind::Integer { .. }, FieldValue::U8(_))
                | (FieldKind::ShortMessage, FieldValue::Octets(_))
                | (FieldKind::DestinationList, FieldValue::Destinations(_))
                | (FieldKind::UnsuccessList, FieldValue::Unsuccess(_))
        )
    }

    fn fits_optional(&self, kind: TlvKind) -> bool {
        matches!(
            (kind, self),
            (TlvKind::U8, FieldValue::U8(_))
                | (TlvKind::U16, FieldValue::U16(_))
                | (TlvKind::U32, FieldValue::U32(_))
                | (TlvKind::CString, FieldValue::Text(_))
                | (TlvKind::Octets, FieldValue::Octets(_))
                | (TlvKind::Flag, FieldValue::Flag)
                | (TlvKind::NetworkError, FieldValue::NetworkError { .. })
        )
    }
}

/// 可打印则按单行文本显示（换行转义），否则按十六进制
fn render_octets(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) if !text.chars().any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t') => {
            text.replace('\n', "\\n")
                .replace('\r', "\\r")
                .replace('\t', "\\t")
        }
        _ => hex(bytes),
    }
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for b in bytes {
        out.push_str(&format!("{:02X}", b));
    }
    out
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::U8(v) => write!(f, "{}", v),
            FieldValue::U16(v) => write!(f, "{}", v),
            FieldValue::U32(v) => write!(f, "{}", v),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Octets(b) => f.write_str(&render_octets(b)),
            FieldValue::Flag => f.write_str("set"),
            FieldValue::NetworkError {
                network_type,
                error_code,
            } => write!(f, "type={}, code={}", network_type, error_code),
            FieldValue::Destinations(d) => write!(f, "{} destination(s)", d.len()),
            FieldValue::Unsuccess(u) => write!(f, "{} unsuccessful", u.len()),
        }
    }
}

/// 无法识别的 TLV，按原样保留
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTlv {
    pub tag: u16,
    pub value: Vec<u8>,
}

/// 一个 PDU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    message_type: MessageType,
    /// sequence_number
    pub sequence_number: u32,
    /// command_status 原始值
    pub status: u32,
    mandatory: BTreeMap<FieldId, FieldValue>,
    optional: BTreeMap<FieldId, FieldValue>,
    unknown_tlvs: Vec<RawTlv>,
}

impl Message {
    /// 创建消息，必选字段填入默认值
    pub fn new(message_type: MessageType) -> Self {
        let mandatory = layout(message_type)
            .mandatory
            .iter()
            .map(|spec| (spec.id, default_value(spec)))
            .collect();

        Self {
            message_type,
            sequence_number: 0,
            status: StatusCode::Ok.code(),
            mandatory,
            optional: BTreeMap::new(),
            unknown_tlvs: Vec::new(),
        }
    }

    pub fn with_sequence(mut self, sequence_number: u32) -> Self {
        self.sequence_number = sequence_number;
        self
    }

    pub fn with_status(mut self, status: u32) -> Self {
        self.status = status;
        self
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    pub fn layout(&self) -> &'static MessageLayout {
        layout(self.message_type)
    }

    /// 已定义的状态码；未知数值返回 `None`
    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_code(self.status)
    }

    /// 设置必选字段
    pub fn set_mandatory(&mut self, id: FieldId, value: FieldValue) -> Result<()> {
        let spec = self
            .layout()
            .mandatory_field(id)
            .ok_or(ProtocolError::FieldNotInLayout(self.message_type, id))?;
        if !value.fits_mandatory(spec.kind) {
            return Err(ProtocolError::ValueMismatch(spec.label));
        }
        self.mandatory.insert(id, value);
        Ok(())
    }

    /// 设置可选字段（使其存在）
    pub fn set_optional(&mut self, id: FieldId, value: FieldValue) -> Result<()> {
        let spec = self
            .layout()
            .optional_field(id)
            .ok_or(ProtocolError::FieldNotInLayout(self.message_type, id))?;
        if !value.fits_optional(spec.kind) {
            return Err(ProtocolError::ValueMismatch(spec.label));
        }
        self.optional.insert(id, value);
        Ok(())
    }

    /// 移除可选字段，返回原值
    pub fn clear_optional(&mut self, id: FieldId) -> Option<FieldValue> {
        self.optional.remove(&id)
    }

    pub fn mandatory(&self, id: FieldId) -> Option<&FieldValue> {
        self.mandatory.get(&id)
    }

    pub fn optional(&self, id: FieldId) -> Option<&FieldValue> {
        self.optional.get(&id)
    }

    pub fn has_optional(&self, id: FieldId) -> bool {
        self.optional.contains_key(&id)
    }

    /// 先查必选字段，再查可选字段
    pub fn get(&self, id: FieldId) -> Option<&FieldValue> {
        self.mandatory(id).or_else(|| self.optional(id))
    }

    pub fn unknown_tlvs(&self) -> &[RawTlv] {
        &self.unknown_tlvs
    }

    pub fn push_unknown_tlv(&mut self, tag: u16, value: Vec<u8>) {
        self.unknown_tlvs.push(RawTlv { tag, value });
    }

    /// 对请求生成同序号、ESME_ROK 的响应
    pub fn response_to(&self) -> Option<Message> {
        self.message_type.response_type().map(|resp| {
            Message::new(resp)
                .with_sequence(self.sequence_number)
                .with_status(StatusCode::Ok.code())
        })
    }

    /// `seq=N, type=T, status=S`
    pub fn summary(&self) -> String {
        format!(
            "seq={}, type={}, status={}",
            self.sequence_number,
            self.message_type,
            status_label(self.status)
        )
    }

    /// 按布局顺序列出所有已填充字段（键, 值）
    pub fn field_lines(&self) -> Vec<(String, String)> {
        let mut lines = vec![
            ("Sequence".to_string(), self.sequence_number.to_string()),
            ("CommandStatus".to_string(), status_label(self.status)),
        ];

        let layout = self.layout();
        for spec in layout.mandatory {
            if let Some(value) = self.mandatory.get(&spec.id) {
                push_mandatory_lines(&mut lines, spec, value);
            }
        }
        for spec in layout.optional {
            if let Some(value) = self.optional.get(&spec.id) {
                push_optional_line(&mut lines, spec, value);
            }
        }
        for tlv in &self.unknown_tlvs {
            lines.push((format!("Tlv0x{:04X}", tlv.tag), hex(&tlv.value)));
        }
        lines
    }
}

fn default_value(spec: &FieldSpec) -> FieldValue {
    match spec.kind {
        FieldKind::CString { .. } => FieldValue::Text(String::new()),
        FieldKind::Integer { default } => FieldValue::U8(default),
        FieldKind::ShortMessage => FieldValue::Octets(Vec::new()),
        FieldKind::DestinationList => FieldValue::Destinations(Vec::new()),
        FieldKind::UnsuccessList => FieldValue::Unsuccess(Vec::new()),
    }
}

fn push_mandatory_lines(lines: &mut Vec<(String, String)>, spec: &FieldSpec, value: &FieldValue) {
    match value {
        FieldValue::Destinations(dests) => {
            for dest in dests {
                match dest {
                    DestAddress::Sme { ton, npi, address } => {
                        lines.push(("DestAddrTON".to_string(), ton.to_string()));
                        lines.push(("DestAddrNPI".to_string(), npi.to_string()));
                        lines.push((spec.label.to_string(), address.clone()));
                    }
                    DestAddress::DistributionList(name) => {
                        lines.push(("DistributionList".to_string(), name.clone()));
                    }
                }
            }
        }
        FieldValue::Unsuccess(smes) => {
            for sme in smes {
                lines.push(("UnsuccessAddrTON".to_string(), sme.ton.to_string()));
                lines.push(("UnsuccessAddrNPI".to_string(), sme.npi.to_string()));
                lines.push((spec.label.to_string(), sme.address.clone()));
                lines.push(("ErrorStatusCode".to_string(), status_label(sme.error_status)));
            }
        }
        other => lines.push((spec.label.to_string(), other.to_string())),
    }
}

fn push_optional_line(lines: &mut Vec<(String, String)>, spec: &TlvSpec, value: &FieldValue) {
    lines.push((spec.label.to_string(), value.to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_mandatory_defaults() {
        let bind = Message::new(MessageType::BindTransmitter);
        assert_eq!(bind.mandatory(FieldId::InterfaceVersion), Some(&FieldValue::U8(0x34)));
        assert_eq!(bind.mandatory(FieldId::SystemId), Some(&FieldValue::text("")));
        assert_eq!(bind.status_code(), Some(StatusCode::Ok));
    }

    #[test]
    fn test_optional_absent_is_not_zero() {
        let mut msg = Message::new(MessageType::SubmitSm);
        assert!(!msg.has_optional(FieldId::SourcePort));

        msg.set_optional(FieldId::SourcePort, FieldValue::U16(0)).unwrap();
        assert_eq!(msg.optional(FieldId::SourcePort), Some(&FieldValue::U16(0)));

        assert_eq!(msg.clear_optional(FieldId::SourcePort), Some(FieldValue::U16(0)));
        assert!(msg.optional(FieldId::SourcePort).is_none());
    }

    #[test]
    fn test_set_rejects_foreign_field_and_wrong_kind() {
        let mut msg = Message::new(MessageType::EnquireLink);
        assert!(matches!(
            msg.set_mandatory(FieldId::SystemId, FieldValue::text("x")),
            Err(ProtocolError::FieldNotInLayout(MessageType::EnquireLink, FieldId::SystemId))
        ));

        let mut submit = Message::new(MessageType::SubmitSm);
        assert!(matches!(
            submit.set_optional(FieldId::SourcePort, FieldValue::U8(1)),
            Err(ProtocolError::ValueMismatch("SourcePort"))
        ));
    }

    #[test]
    fn test_response_keeps_sequence() {
        let req = Message::new(MessageType::DeliverSm)
            .with_sequence(99)
            .with_status(StatusCode::SystemError.code());
        let resp = req.response_to().unwrap();
        assert_eq!(resp.message_type(), MessageType::DeliverSmResp);
        assert_eq!(resp.sequence_number, 99);
        assert_eq!(resp.status, 0);

        assert!(Message::new(MessageType::EnquireLinkResp).response_to().is_none());
    }

    #[test]
    fn test_field_lines_order() {
        let mut msg = Message::new(MessageType::QuerySm).with_sequence(3);
        msg.set_mandatory(FieldId::MessageId, FieldValue::text("abc")).unwrap();

        let keys: Vec<String> = msg.field_lines().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "Sequence",
                "CommandStatus",
                "MessageID",
                "SourceAddrTON",
                "SourceAddrNPI",
                "SourceAddr"
            ]
        );
    }

    #[test]
    fn test_octets_render_as_hex_when_binary() {
        assert_eq!(FieldValue::Octets(b"hi\n".to_vec()).to_string(), "hi\\n");
        assert_eq!(FieldValue::Octets(vec![5, 0, 3]).to_string(), "0x050003");
    }
}
