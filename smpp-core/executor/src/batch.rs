//! 批处理事件模型
//!
//! 一个 [`Batch`] 是编译后的有序事件序列，插入顺序即执行顺序。

use std::num::NonZeroU64;

use serde::Serialize;
use smpp_protocol::{Message, MessageType};

/// 批处理事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// 发送一个 PDU
    SendMessage(Message),

    /// 建立连接
    Connect { host: String, port: u16 },

    /// 断开连接
    Disconnect,

    /// 暂停脚本线程
    Pause { millis: NonZeroU64 },

    /// 开启/关闭某类 PDU 的自动应答
    SetAutoResponse {
        message_type: MessageType,
        enabled: bool,
    },
}

impl Event {
    /// 事件种类名，用于诊断日志
    pub fn kind(&self) -> EventKind {
        match self {
            Event::SendMessage(_) => EventKind::SendMessage,
            Event::Connect { .. } => EventKind::Connect,
            Event::Disconnect => EventKind::Disconnect,
            Event::Pause { .. } => EventKind::Pause,
            Event::SetAutoResponse { .. } => EventKind::SetAutoResponse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SendMessage,
    Connect,
    Disconnect,
    Pause,
    SetAutoResponse,
}

/// 编译后的批处理脚本
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    events: Vec<Event>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message(&mut self, message: Message) {
        self.events.push(Event::SendMessage(message));
    }

    pub fn add_connect(&mut self, host: &str, port: u16) {
        self.events.push(Event::Connect {
            host: host.to_string(),
            port,
        });
    }

    pub fn add_disconnect(&mut self) {
        self.events.push(Event::Disconnect);
    }

    /// 时长为 0 时返回 `None` 且不追加
    pub fn add_pause(&mut self, millis: u64) -> Option<()> {
        let millis = NonZeroU64::new(millis)?;
        self.events.push(Event::Pause { millis });
        Some(())
    }

    pub fn add_auto_response(&mut self, message_type: MessageType, enabled: bool) {
        self.events.push(Event::SetAutoResponse {
            message_type,
            enabled,
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
