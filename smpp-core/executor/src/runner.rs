//! 批处理执行引擎
//!
//! 在脚本线程上顺序回放 [`Batch`]：Idle ⇄ Connected，最后 Done。
//! 连接类错误只记日志、继续执行；发送失败终止整个运行。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use smpp_protocol::{encode, Message, MessageType};
use smpp_transport::{
    ConnectionState, Connector, InboundHandler, PeerConnection, PeerInfo, TcpConnector,
};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::batch::{Batch, Event};
use crate::config::HarnessConfig;
use crate::event_log::{EventLog, LogEventType};
use crate::responder::{AutoResponder, AutoResponseSettings, BATCH_DEFAULTS};
use crate::Result;

/// 打断当前暂停的句柄
///
/// 只影响正在进行的暂停；没有暂停时调用不会留下任何效果。
#[derive(Debug, Clone, Default)]
pub struct PauseInterrupt {
    notify: Arc<Notify>,
    pausing: Arc<AtomicUsize>,
}

impl PauseInterrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// 打断当前暂停；返回调用时是否有暂停正在进行
    pub fn interrupt(&self) -> bool {
        let pausing = self.is_pausing();
        self.notify.notify_waiters();
        pausing
    }

    pub fn is_pausing(&self) -> bool {
        self.pausing.load(Ordering::SeqCst) > 0
    }

    fn enter(&self) -> PauseGuard<'_> {
        self.pausing.fetch_add(1, Ordering::SeqCst);
        PauseGuard(self)
    }
}

/// 暂停结束（含被取消）时复位计数
struct PauseGuard<'a>(&'a PauseInterrupt);

impl Drop for PauseGuard<'_> {
    fn drop(&mut self) {
        self.0.pausing.fetch_sub(1, Ordering::SeqCst);
    }
}

/// 运行结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    Aborted { reason: String },
}

/// 运行报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// 已处理的事件数（含导致终止的那一个）
    pub events_processed: usize,

    /// 结束时的自动序号计数器
    pub final_sequence: u32,

    /// 总耗时（毫秒）
    pub duration_ms: u64,

    pub outcome: RunOutcome,
}

impl RunReport {
    pub fn is_completed(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }

    /// 导出为 JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// 一个打开的连接及其自动应答集合
struct Session {
    peer: PeerInfo,
    connection: Box<dyn PeerConnection>,
    settings: AutoResponseSettings,
}

/// 批处理执行器
pub struct BatchRunner {
    connector: Arc<dyn Connector>,
    log: Arc<EventLog>,
    auto_response_defaults: Vec<MessageType>,
    interrupt: PauseInterrupt,
}

impl BatchRunner {
    pub fn new(connector: Arc<dyn Connector>, log: Arc<EventLog>) -> Self {
        Self {
            connector,
            log,
            auto_response_defaults: BATCH_DEFAULTS.to_vec(),
            interrupt: PauseInterrupt::new(),
        }
    }

    /// 按配置创建使用 TCP 传输的执行器
    pub fn tcp(config: &HarnessConfig, log: Arc<EventLog>) -> Result<Self> {
        config.transport.validate()?;
        let defaults = config.auto_response.message_types()?;
        let connector = Arc::new(TcpConnector::new(config.transport.clone()));
        Ok(Self::new(connector, log).with_auto_response_defaults(defaults))
    }

    /// 每次连接时的缺省应答集合
    pub fn with_auto_response_defaults(mut self, defaults: Vec<MessageType>) -> Self {
        self.auto_response_defaults = defaults;
        self
    }

    pub fn with_pause_interrupt(mut self, interrupt: PauseInterrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn pause_interrupt(&self) -> PauseInterrupt {
        self.interrupt.clone()
    }

    pub fn log(&self) -> &Arc<EventLog> {
        &self.log
    }

    /// 执行一个 Batch
    pub async fn run(&self, batch: &Batch) -> RunReport {
        info!("开始执行批处理: {} 个事件", batch.len());
        let start = Instant::now();

        let mut session: Option<Session> = None;
        let mut next_sequence: u32 = 1;
        let mut events_processed = 0;
        let mut outcome = RunOutcome::Completed;

        for event in batch {
            events_processed += 1;
            debug!("事件 {}/{}: {:?}", events_processed, batch.len(), event.kind());

            match event {
                Event::Connect { host, port } => {
                    self.connect(&mut session, PeerInfo::new(host, *port)).await;
                }
                Event::Disconnect => self.disconnect(&mut session).await,
                Event::SendMessage(message) => {
                    if let Err(reason) = self.send(&session, message, &mut next_sequence).await {
                        warn!("发送失败，终止批处理: {}", reason);
                        outcome = RunOutcome::Aborted { reason };
                        break;
                    }
                }
                Event::Pause { millis } => self.pause(Duration::from_millis(millis.get())).await,
                Event::SetAutoResponse {
                    message_type,
                    enabled,
                } => match &session {
                    Some(s) => {
                        s.settings.set(*message_type, *enabled);
                        debug!("自动应答 {} -> {}", message_type, enabled);
                    }
                    None => {
                        warn!(
                            "未连接，忽略自动应答设置 {} -> {}（下次连接会恢复缺省值）",
                            message_type, enabled
                        );
                        self.log.record(
                            LogEventType::SettingIgnored,
                            format!(
                                "Auto-response setting ignored (not connected), type={}, enabled={}",
                                message_type, enabled
                            ),
                        );
                    }
                },
            }
        }

        // 结束时关闭仍然打开的连接，失败不影响结果
        if let Some(mut open) = session.take() {
            match open.connection.close().await {
                Ok(()) => self.log.record(LogEventType::Disconnect, "Disconnected"),
                Err(e) => {
                    warn!("关闭连接 {} 失败: {}", open.peer, e);
                    self.log
                        .record(LogEventType::Disconnect, format!("Disconnect failed: {}", e));
                }
            }
        }

        let report = RunReport {
            events_processed,
            final_sequence: next_sequence,
            duration_ms: start.elapsed().as_millis() as u64,
            outcome,
        };
        info!(
            "批处理结束: 处理 {} 个事件, 结果 {:?}",
            report.events_processed, report.outcome
        );
        report
    }

    async fn connect(&self, session: &mut Option<Session>, peer: PeerInfo) {
        if session.is_some() {
            self.log.record(
                LogEventType::ConnectAttempt,
                format!("Connect failed (already connected) to {}", peer),
            );
            return;
        }

        // 每个连接都有一份新的缺省应答集合
        let settings = AutoResponseSettings::new(&self.auto_response_defaults);
        let handler: Arc<dyn InboundHandler> =
            Arc::new(AutoResponder::new(settings.clone(), Arc::clone(&self.log)));

        match self.connector.open(&peer, handler).await {
            Ok(connection) => {
                self.log
                    .record(LogEventType::ConnectOk, format!("Connected to {}", peer));
                *session = Some(Session {
                    peer,
                    connection,
                    settings,
                });
            }
            Err(e) => {
                warn!("连接 {} 失败: {}", peer, e);
                self.log.record(
                    LogEventType::ConnectAttempt,
                    format!("Connect failed to {}: {}", peer, e),
                );
            }
        }
    }

    async fn disconnect(&self, session: &mut Option<Session>) {
        let Some(mut open) = session.take() else {
            self.log
                .record(LogEventType::Disconnect, "Disconnect failed (not connected)");
            return;
        };

        if let Err(e) = open.connection.close().await {
            warn!("关闭连接 {} 出错: {}", open.peer, e);
        }
        self.log.record(LogEventType::Disconnect, "Disconnected");
    }

    /// 返回 `Err(reason)` 表示运行必须终止
    async fn send(
        &self,
        session: &Option<Session>,
        scripted: &Message,
        next_sequence: &mut u32,
    ) -> std::result::Result<(), String> {
        let Some(open) = session else {
            self.log.record(
                LogEventType::SendFailed,
                format!("PDU not sent (not connected), {}", scripted.summary()),
            );
            return Ok(());
        };

        let mut message = scripted.clone();
        if message.sequence_number < *next_sequence {
            message.sequence_number = *next_sequence;
        }
        *next_sequence = message.sequence_number.wrapping_add(1);

        let result = match open.connection.state().await {
            ConnectionState::Connected => match encode(&message) {
                Ok(bytes) => open
                    .connection
                    .sink()
                    .send_frame(bytes)
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            },
            state => Err(format!("connection {:?}", state).to_lowercase()),
        };

        match result {
            Ok(()) => {
                self.log.sent(&message);
                Ok(())
            }
            Err(cause) => {
                self.log.send_failed(&message, &cause);
                Err(format!(
                    "Send failed, seq={}, type={}: {}",
                    message.sequence_number,
                    message.message_type(),
                    cause
                ))
            }
        }
    }

    async fn pause(&self, duration: Duration) {
        let interrupted = self.interrupt.notify.notified();
        let _guard = self.interrupt.enter();
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = interrupted => {
                info!("暂停被打断");
                self.log.record(LogEventType::PauseInterrupted, "Pause interrupted");
            }
        }
    }
}
