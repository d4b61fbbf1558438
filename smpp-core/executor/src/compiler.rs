//! 脚本编译器
//!
//! 把脚本文档树编译为 [`Batch`]。编译是全有或全无的：任何一个元素出错，
//! 整个脚本都不产生 Batch。

use std::path::Path;

use smpp_protocol::{
    encode, DestAddress, FieldId, FieldKind, FieldSpec, FieldValue, Message, MessageLayout,
    MessageType, ProtocolError, StatusCode, TlvKind, TlvSpec,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::batch::Batch;
use crate::script::{ScriptElement, ScriptError};

/// 编译错误
#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error("未知的消息类型: {0}")]
    UnknownMessageType(String),

    #[error("{message_type} 不支持字段 <{element}>")]
    UnknownField {
        message_type: MessageType,
        element: String,
    },

    #[error("<{element}> 缺少必填元素 <{field}>")]
    MissingField { element: String, field: String },

    #[error("<{element}> 缺少属性 {attribute}")]
    MissingAttribute { element: String, attribute: String },

    #[error("{field} 的值无效: {value:?}")]
    InvalidValue { field: String, value: String },

    #[error("暂停时长必须为正整数: {0:?}")]
    InvalidPause(String),

    #[error("尚未实现: {0}")]
    Unsupported(String),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

pub type Result<T> = std::result::Result<T, CompileError>;

/// 脚本未给出时使用的缺省值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileDefaults {
    pub host: String,
    pub port: u16,
    pub system_id: String,
    pub password: String,
    pub system_type: String,
}

impl Default for CompileDefaults {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 2775,
            system_id: String::new(),
            password: String::new(),
            system_type: String::new(),
        }
    }
}

const SEQUENCE_NUMBER: &str = "SequenceNumber";
const COMMAND_STATUS: &str = "CommandStatus";
const USER_DATA_HEADER: &str = "UserDataHeader";
const LINE: &str = "line";

/// 脚本编译器
#[derive(Debug, Clone, Default)]
pub struct ScriptCompiler {
    defaults: CompileDefaults,
}

impl ScriptCompiler {
    pub fn new(defaults: CompileDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &CompileDefaults {
        &self.defaults
    }

    /// 从文件读取并编译
    pub fn compile_file(&self, path: &Path) -> Result<Batch> {
        let root = ScriptElement::parse_file(path)?;
        self.compile(&root)
    }

    /// 从 XML 文本编译
    pub fn compile_str(&self, xml: &str) -> Result<Batch> {
        let root = ScriptElement::parse_str(xml)?;
        self.compile(&root)
    }

    /// 编译根元素的全部子元素
    pub fn compile(&self, root: &ScriptElement) -> Result<Batch> {
        let mut batch = Batch::new();
        // 自动分配的序号从 1 开始，全脚本共享
        let mut next_sequence: u32 = 1;

        for element in &root.children {
            if element.is("PDU") {
                let message = self.compile_message(element, &mut next_sequence)?;
                batch.add_message(message);
            } else if element.is("Connect") {
                let (host, port) = self.compile_connect(element)?;
                batch.add_connect(&host, port);
            } else if element.is("Disconnect") {
                batch.add_disconnect();
            } else if element.is("Pause") {
                let raw = element
                    .attr("millis")
                    .ok_or_else(|| CompileError::InvalidPause(String::new()))?;
                let millis =
                    parse_int(raw).ok_or_else(|| CompileError::InvalidPause(raw.to_string()))?;
                batch
                    .add_pause(millis)
                    .ok_or_else(|| CompileError::InvalidPause(raw.to_string()))?;
            } else if element.is("Settings") {
                compile_settings(element, &mut batch)?;
            } else {
                warn!("忽略无法识别的脚本元素: <{}>", element.name);
            }
        }

        debug!("脚本编译完成: {} 个事件", batch.len());
        Ok(batch)
    }

    fn compile_connect(&self, element: &ScriptElement) -> Result<(String, u16)> {
        let server = element
            .child("Server")
            .ok_or_else(|| CompileError::MissingField {
                element: element.name.clone(),
                field: "Server".to_string(),
            })?;

        let host = match server.text_trim() {
            "" => self.defaults.host.clone(),
            host => host.to_string(),
        };
        let port = match server.attr("port") {
            Some(raw) => parse_int(raw)
                .and_then(|p| u16::try_from(p).ok())
                .ok_or_else(|| invalid("port", raw))?,
            None => self.defaults.port,
        };
        Ok((host, port))
    }

    fn compile_message(&self, element: &ScriptElement, next_sequence: &mut u32) -> Result<Message> {
        let type_name = element
            .attr("type")
            .ok_or_else(|| CompileError::MissingAttribute {
                element: element.name.clone(),
                attribute: "type".to_string(),
            })?;
        let message_type = MessageType::from_name(type_name)
            .ok_or_else(|| CompileError::UnknownMessageType(type_name.to_string()))?;

        let mut message = Message::new(message_type);
        let layout = message.layout();
        if let Some(reason) = layout.unsupported {
            return Err(CompileError::Unsupported(reason.to_string()));
        }

        match element.child(SEQUENCE_NUMBER) {
            Some(seq) => {
                let raw = seq.text_trim();
                message.sequence_number = parse_int(raw)
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| invalid(SEQUENCE_NUMBER, raw))?;
            }
            None => {
                message.sequence_number = *next_sequence;
                *next_sequence = next_sequence.wrapping_add(1);
            }
        }

        if let Some(status) = element.child(COMMAND_STATUS) {
            message.status = parse_status(status.text_trim())?;
        }

        if is_bind_request(message_type) {
            self.apply_account_defaults(&mut message)?;
        }

        for child in &element.children {
            if child.name == SEQUENCE_NUMBER || child.name == COMMAND_STATUS {
                continue;
            }
            // submit_multi 的 DestAddrTON/NPI 只作为目的地址的缺省值
            if message_type == MessageType::SubmitMulti
                && (child.name == "DestAddrTON" || child.name == "DestAddrNPI")
            {
                continue;
            }

            if let Some(spec) = layout.mandatory.iter().find(|f| f.accepts(&child.name)) {
                let value = mandatory_value(spec, child, element)?;
                message.set_mandatory(spec.id, value)?;
            } else if let Some(spec) = layout.optional.iter().find(|t| t.element == child.name) {
                if !spec.implemented {
                    return Err(CompileError::Unsupported(format!(
                        "{} 的可选字段 {}",
                        message_type, spec.element
                    )));
                }
                if let Some(value) = optional_value(spec, child)? {
                    message.set_optional(spec.id, value)?;
                }
            } else {
                return Err(CompileError::UnknownField {
                    message_type,
                    element: child.name.clone(),
                });
            }
        }

        check_required(layout, element)?;

        // 长度上限等线上约束在编译期就要暴露
        encode(&message)?;
        Ok(message)
    }

    fn apply_account_defaults(&self, message: &mut Message) -> Result<()> {
        let defaults = [
            (FieldId::SystemId, &self.defaults.system_id),
            (FieldId::Password, &self.defaults.password),
            (FieldId::SystemType, &self.defaults.system_type),
        ];
        for (id, value) in defaults {
            if message.layout().mandatory_field(id).is_some() {
                message.set_mandatory(id, FieldValue::text(value))?;
            }
        }
        Ok(())
    }
}

fn is_bind_request(message_type: MessageType) -> bool {
    matches!(
        message_type,
        MessageType::BindReceiver
            | MessageType::BindTransmitter
            | MessageType::BindTransceiver
            | MessageType::Outbind
    )
}

fn compile_settings(element: &ScriptElement, batch: &mut Batch) -> Result<()> {
    // 先开启，再关闭
    for (attribute, enabled) in [("autoResponse", true), ("noAutoResponse", false)] {
        let Some(list) = element.attr(attribute) else {
            continue;
        };
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let message_type = MessageType::from_name(name)
                .ok_or_else(|| CompileError::UnknownMessageType(name.to_string()))?;
            batch.add_auto_response(message_type, enabled);
        }
    }
    Ok(())
}

fn check_required(layout: &MessageLayout, element: &ScriptElement) -> Result<()> {
    for spec in layout.mandatory.iter().filter(|f| f.required) {
        if !element.children.iter().any(|c| spec.accepts(&c.name)) {
            return Err(CompileError::MissingField {
                element: layout.message_type.to_string(),
                field: spec.element().to_string(),
            });
        }
    }
    Ok(())
}

fn mandatory_value(
    spec: &FieldSpec,
    child: &ScriptElement,
    pdu: &ScriptElement,
) -> Result<FieldValue> {
    match spec.kind {
        FieldKind::CString { .. } => Ok(FieldValue::text(child.text_trim())),
        FieldKind::Integer { .. } => parse_u8(&child.name, child.text_trim()).map(FieldValue::U8),
        FieldKind::ShortMessage => short_message(child).map(FieldValue::Octets),
        FieldKind::DestinationList => destinations(child, pdu).map(FieldValue::Destinations),
        FieldKind::UnsuccessList => Err(CompileError::Unsupported(format!(
            "脚本中的 <{}>",
            child.name
        ))),
    }
}

/// 返回 `None` 表示该可选字段不出现
fn optional_value(spec: &TlvSpec, child: &ScriptElement) -> Result<Option<FieldValue>> {
    let raw = child.text_trim();
    let value = match spec.kind {
        TlvKind::U8 => FieldValue::U8(parse_u8(spec.element, raw)?),
        TlvKind::U16 => FieldValue::U16(
            parse_int(raw)
                .and_then(|v| u16::try_from(v).ok())
                .ok_or_else(|| invalid(spec.element, raw))?,
        ),
        TlvKind::U32 => FieldValue::U32(
            parse_int(raw)
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| invalid(spec.element, raw))?,
        ),
        TlvKind::CString => FieldValue::text(raw),
        TlvKind::Octets => FieldValue::Octets(lines_or_text(child).into_bytes()),
        TlvKind::Flag => {
            if !raw.starts_with(['Y', 'y']) {
                return Ok(None);
            }
            FieldValue::Flag
        }
        TlvKind::NetworkError => {
            let network_type = match child.attr("NetworkType") {
                Some(t) => parse_u8("NetworkType", t)?,
                None => 0,
            };
            let error_code = parse_int(raw)
                .and_then(|v| u16::try_from(v).ok())
                .ok_or_else(|| invalid(spec.element, raw))?;
            FieldValue::NetworkError {
                network_type,
                error_code,
            }
        }
    };
    Ok(Some(value))
}

/// `<line>` 子元素逐行拼接（每行补 `\n`），否则取去除首尾空白的文本
fn lines_or_text(element: &ScriptElement) -> String {
    let mut lines = element.children_named(LINE).peekable();
    if lines.peek().is_none() {
        return element.text_trim().to_string();
    }
    lines.fold(String::new(), |mut text, line| {
        text.push_str(&line.text);
        text.push('\n');
        text
    })
}

fn short_message(element: &ScriptElement) -> Result<Vec<u8>> {
    let text = lines_or_text(element);
    let mut bytes = Vec::with_capacity(text.len() + 6);

    if let Some(udh) = element.child(USER_DATA_HEADER) {
        let attr = |name: &str| -> Result<Option<u8>> {
            udh.attr(name)
                .map(|raw| parse_u8(&format!("{}@{}", USER_DATA_HEADER, name), raw))
                .transpose()
        };
        if let (Some(reference), Some(index), Some(total)) =
            (attr("ref")?, attr("index")?, attr("total")?)
        {
            if index >= 1 && total >= 1 && index <= total {
                // IEI 0x00: 8 位参考号的级联短信
                bytes.extend_from_slice(&[5, 0x00, 0x03, reference, total, index]);
            }
        }
    }

    bytes.extend_from_slice(text.as_bytes());
    Ok(bytes)
}

fn destinations(list: &ScriptElement, pdu: &ScriptElement) -> Result<Vec<DestAddress>> {
    let default_of = |names: &[&str]| -> Result<u8> {
        for name in names {
            if let Some(child) = pdu.child(name) {
                return parse_u8(name, child.text_trim());
            }
        }
        Ok(0)
    };
    let default_ton = default_of(&["DestAddrTON", "SourceAddrTON", "AddrTON"])?;
    let default_npi = default_of(&["DestAddrNPI", "SourceAddrNPI", "AddrNPI"])?;

    let mut dests = Vec::new();
    for dest in list.children_named("Destination") {
        let address = dest
            .child("DestAddr")
            .ok_or_else(|| CompileError::MissingField {
                element: dest.name.clone(),
                field: "DestAddr".to_string(),
            })?;
        let ton = match dest.child("DestAddrTON") {
            Some(t) => parse_u8("DestAddrTON", t.text_trim())?,
            None => default_ton,
        };
        let npi = match dest.child("DestAddrNPI") {
            Some(n) => parse_u8("DestAddrNPI", n.text_trim())?,
            None => default_npi,
        };
        dests.push(DestAddress::sme(ton, npi, address.text_trim()));
    }

    if dests.is_empty() {
        return Err(CompileError::MissingField {
            element: list.name.clone(),
            field: "Destination".to_string(),
        });
    }
    Ok(dests)
}

fn parse_status(raw: &str) -> Result<u32> {
    if let Some(code) = parse_int(raw).and_then(|v| u32::try_from(v).ok()) {
        return Ok(code);
    }
    StatusCode::from_name(raw)
        .map(StatusCode::code)
        .ok_or_else(|| invalid(COMMAND_STATUS, raw))
}

fn parse_u8(field: &str, raw: &str) -> Result<u8> {
    parse_int(raw)
        .and_then(|v| u8::try_from(v).ok())
        .ok_or_else(|| invalid(field, raw))
}

/// 十进制或 `0x` 十六进制的非负整数
pub fn parse_int(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

fn invalid(field: &str, value: &str) -> CompileError {
    CompileError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}
