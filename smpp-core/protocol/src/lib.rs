//! SMPP 协议层
//!
//! 提供消息目录（类型/状态码双向查找）、每种 PDU 的字段描述表、
//! 消息模型以及 PDU 的字节编解码。

pub mod catalog;
pub mod codec;
pub mod fields;
pub mod message;

pub use catalog::{status_label, type_label, MessageType, StatusCode};
pub use codec::{decode, encode, PduHeader};
pub use fields::{layout, FieldId, FieldKind, FieldSpec, MessageLayout, TlvKind, TlvSpec};
pub use message::{DestAddress, FieldValue, Message, RawTlv, UnsuccessSme};

use thiserror::Error;

/// 协议错误
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("未知的命令 ID: 0x{0:08X}")]
    UnknownCommandId(u32),

    #[error("{0} 不包含字段 {1:?}")]
    FieldNotInLayout(MessageType, FieldId),

    #[error("字段 {0} 的值类型不匹配")]
    ValueMismatch(&'static str),

    #[error("字段 {0} 长度 {1} 超过上限 {2}")]
    FieldTooLong(&'static str, usize, usize),

    #[error("尚未实现: {0}")]
    Unsupported(String),

    #[error("解析错误: {0}")]
    ParseError(String),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
