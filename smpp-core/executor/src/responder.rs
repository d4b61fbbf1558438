//! 自动应答
//!
//! 运行在连接的入站任务上。每个入站 PDU 都记一条 "received"；若其类型已开启
//! 自动应答，且是 ENQUIRE_LINK 或 DELIVER_SM，则回一个同序号、ESME_ROK 的响应。

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;
use smpp_protocol::{decode, encode, status_label, type_label, MessageType, PduHeader};
use smpp_transport::{FrameSink, InboundHandler, PeerInfo};
use tracing::{debug, warn};

use crate::event_log::{EventLog, LogEventType};

/// 批处理运行时每次连接的缺省应答集合
pub const BATCH_DEFAULTS: &[MessageType] = &[MessageType::EnquireLink, MessageType::DeliverSm];

/// 交互式客户端的缺省应答集合
pub const INTERACTIVE_DEFAULTS: &[MessageType] =
    &[MessageType::EnquireLink, MessageType::DeliverSm];

/// 只有这些请求类型会被自动应答
const ANSWERABLE: &[MessageType] = &[MessageType::EnquireLink, MessageType::DeliverSm];

/// 已开启自动应答的类型集合
///
/// 脚本线程写、入站任务读；克隆共享同一份集合。
#[derive(Debug, Clone, Default)]
pub struct AutoResponseSettings {
    enabled: Arc<Mutex<HashSet<MessageType>>>,
}

impl AutoResponseSettings {
    pub fn new(defaults: &[MessageType]) -> Self {
        Self {
            enabled: Arc::new(Mutex::new(defaults.iter().copied().collect())),
        }
    }

    /// 开启或关闭；返回集合是否发生变化
    pub fn set(&self, message_type: MessageType, enabled: bool) -> bool {
        let mut set = self.lock();
        if enabled {
            set.insert(message_type)
        } else {
            set.remove(&message_type)
        }
    }

    pub fn is_enabled(&self, message_type: MessageType) -> bool {
        self.lock().contains(&message_type)
    }

    /// 当前集合，按 command_id 排序
    pub fn snapshot(&self) -> Vec<MessageType> {
        let mut types: Vec<MessageType> = self.lock().iter().copied().collect();
        types.sort_by_key(|t| t.id());
        types
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<MessageType>> {
        self.enabled.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// 入站处理器
pub struct AutoResponder {
    settings: AutoResponseSettings,
    log: Arc<EventLog>,
}

impl AutoResponder {
    pub fn new(settings: AutoResponseSettings, log: Arc<EventLog>) -> Self {
        Self { settings, log }
    }

    pub fn settings(&self) -> &AutoResponseSettings {
        &self.settings
    }

    /// 无法解码的帧只按头部记录
    fn log_undecodable(&self, frame: &[u8], cause: &dyn std::fmt::Display) {
        match PduHeader::parse(frame) {
            Ok(header) => {
                warn!(
                    "无法解码的 PDU (command_id={}): {}",
                    type_label(header.command_id),
                    cause
                );
                self.log.record(
                    LogEventType::Received,
                    format!(
                        "Received PDU, seq={}, type={}, status={}",
                        header.sequence_number,
                        type_label(header.command_id),
                        status_label(header.command_status)
                    ),
                );
            }
            Err(e) => warn!("丢弃无法识别的帧 ({} 字节): {}", frame.len(), e),
        }
    }
}

#[async_trait]
impl InboundHandler for AutoResponder {
    async fn on_frame(&self, frame: Bytes, reply: Arc<dyn FrameSink>) {
        let message = match decode(&frame) {
            Ok(message) => message,
            Err(e) => {
                self.log_undecodable(&frame, &e);
                return;
            }
        };

        self.log.received(&message);

        let message_type = message.message_type();
        if !ANSWERABLE.contains(&message_type) || !self.settings.is_enabled(message_type) {
            return;
        }
        let Some(response) = message.response_to() else {
            return;
        };

        debug!("自动应答 {}", message.summary());
        let sent = match encode(&response) {
            Ok(bytes) => reply.send_frame(bytes).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match sent {
            Ok(()) => self.log.sent(&response),
            Err(cause) => {
                warn!("自动应答发送失败: {}", cause);
                self.log.send_failed(&response, &cause);
            }
        }
    }

    async fn on_closed(&self, peer: &PeerInfo, reason: Option<String>) {
        match reason {
            Some(reason) => warn!("与 {} 的连接中断: {}", peer, reason),
            None => warn!("{} 关闭了连接", peer),
        }
        self.log.record(LogEventType::ConnectionLost, "Connection lost");
    }
}
