//! 事件日志（运行记录）
//!
//! 只追加。每条 [`LogEntry`] 在一次加锁内完整写出，脚本线程和入站任务可以并发追加。
//! 写文件失败时退化为标准错误输出，不会中断调用方。
//! 内存中的历史只在 [`EventLog::memory`] 或显式 [`EventLog::with_history`] 时保留。

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local};
use serde::Serialize;
use smpp_protocol::Message;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

/// 时间戳格式 `HH:MM:SS.mmm`
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";

/// 字段转储行的缩进
const FIELD_INDENT: &str = "    ";

/// 日志事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogEventType {
    ConnectAttempt,
    ConnectOk,
    Disconnect,
    Sent,
    Received,
    SendFailed,
    ConnectionLost,
    PauseInterrupted,
    SettingIgnored,
}

/// 一条日志
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub event_type: LogEventType,
    pub message: Option<Message>,
    pub text: String,
}

impl LogEntry {
    pub fn new(event_type: LogEventType, text: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            event_type,
            message: None,
            text: text.into(),
        }
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.message = Some(message);
        self
    }

    /// 渲染为运行记录中的文本（不含末尾换行）
    pub fn render(&self) -> String {
        let mut out = format!("{} {}", self.timestamp.format(TIMESTAMP_FORMAT), self.text);
        if let Some(message) = &self.message {
            for (key, value) in message.field_lines() {
                out.push('\n');
                out.push_str(FIELD_INDENT);
                out.push_str(&key);
                out.push('=');
                out.push_str(&value);
            }
        }
        out
    }
}

struct Sinks {
    file: Option<(PathBuf, File)>,
    echo_console: bool,
    view: Option<UnboundedSender<LogEntry>>,
    history: Option<Vec<LogEntry>>,
    appended: usize,
}

/// 事件日志
pub struct EventLog {
    sinks: Mutex<Sinks>,
}

impl EventLog {
    fn with_sinks(file: Option<(PathBuf, File)>, history: Option<Vec<LogEntry>>) -> Self {
        Self {
            sinks: Mutex::new(Sinks {
                file,
                echo_console: false,
                view: None,
                history,
                appended: 0,
            }),
        }
    }

    /// 只保存在内存中
    pub fn memory() -> Self {
        Self::with_sinks(None, Some(Vec::new()))
    }

    /// 创建（覆盖）运行记录文件；默认不在内存中保留历史
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::with_sinks(Some((path.to_path_buf(), file)), None))
    }

    /// 是否在内存中保留全部日志，供 [`EventLog::entries`] 读取
    pub fn with_history(self, keep: bool) -> Self {
        {
            let mut sinks = self.lock();
            match (keep, sinks.history.is_some()) {
                (true, false) => sinks.history = Some(Vec::new()),
                (false, true) => sinks.history = None,
                _ => {}
            }
        }
        self
    }

    /// 同时回显到控制台
    pub fn with_console_echo(self, echo: bool) -> Self {
        self.lock().echo_console = echo;
        self
    }

    /// 挂接实时视图；之后的每条日志都会镜像过去
    pub fn attach_view(&self, view: UnboundedSender<LogEntry>) {
        self.lock().view = Some(view);
    }

    pub fn append(&self, entry: LogEntry) {
        let rendered = entry.render();
        let mut sinks = self.lock();

        let failed = sinks.file.as_mut().and_then(|(path, file)| {
            writeln!(file, "{}", rendered)
                .and_then(|_| file.flush())
                .err()
                .map(|e| (path.clone(), e))
        });
        if let Some((path, e)) = failed {
            warn!("写入运行记录 {:?} 失败，改为输出到标准错误: {}", path, e);
            sinks.file = None;
            eprintln!("{}", rendered);
        }

        if sinks.echo_console {
            println!("{}", rendered);
        }

        let view_closed = sinks
            .view
            .as_ref()
            .map_or(false, |view| view.send(entry.clone()).is_err());
        if view_closed {
            sinks.view = None;
        }

        sinks.appended += 1;
        if let Some(history) = sinks.history.as_mut() {
            history.push(entry);
        }
    }

    pub fn record(&self, event_type: LogEventType, text: impl Into<String>) {
        self.append(LogEntry::new(event_type, text));
    }

    pub fn record_message(
        &self,
        event_type: LogEventType,
        text: impl Into<String>,
        message: &Message,
    ) {
        self.append(LogEntry::new(event_type, text).with_message(message.clone()));
    }

    /// `Sent PDU, ...` 并附字段转储
    pub fn sent(&self, message: &Message) {
        let text = format!("Sent PDU, {}", message.summary());
        self.record_message(LogEventType::Sent, text, message);
    }

    /// `Received PDU, ...` 并附字段转储
    pub fn received(&self, message: &Message) {
        let text = format!("Received PDU, {}", message.summary());
        self.record_message(LogEventType::Received, text, message);
    }

    pub fn send_failed(&self, message: &Message, cause: &dyn std::fmt::Display) {
        let text = format!(
            "Send failed, seq={}, type={}: {}",
            message.sequence_number,
            message.message_type(),
            cause
        );
        self.record(LogEventType::SendFailed, text);
    }

    /// 刷新并关闭运行记录文件；之后的日志只走其他输出
    pub fn close(&self) {
        let mut sinks = self.lock();
        if let Some((path, mut file)) = sinks.file.take() {
            if let Err(e) = file.flush() {
                warn!("关闭运行记录 {:?} 时刷新失败: {}", path, e);
            }
        }
    }

    /// 迄今为止的全部日志；未保留历史时为空
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().history.clone().unwrap_or_default()
    }

    /// 已追加的日志条数（不论是否保留历史）
    pub fn len(&self) -> usize {
        self.lock().appended
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Sinks> {
        // 写日志的线程 panic 后仍然继续记录
        self.sinks.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::memory()
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sinks = self.lock();
        f.debug_struct("EventLog")
            .field("file", &sinks.file.as_ref().map(|(p, _)| p))
            .field("echo_console", &sinks.echo_console)
            .field("appended", &sinks.appended)
            .field("history", &sinks.history.as_ref().map(Vec::len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smpp_protocol::MessageType;

    #[test]
    fn test_render_with_field_dump() {
        let message = Message::new(MessageType::EnquireLink).with_sequence(3);
        let text = format!("Sent PDU, {}", message.summary());
        let entry = LogEntry::new(LogEventType::Sent, text).with_message(message);

        let rendered = entry.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" Sent PDU, seq=3, type=ENQUIRE_LINK, status=ESME_ROK"));
        assert_eq!(lines[1], "    Sequence=3");
        assert_eq!(lines[2], "    CommandStatus=ESME_ROK");

        // HH:MM:SS.mmm
        let stamp = lines[0].split(' ').next().unwrap();
        assert_eq!(stamp.len(), 12);
        assert_eq!(&stamp[2..3], ":");
        assert_eq!(&stamp[8..9], ".");
    }

    #[test]
    fn test_memory_log_keeps_order() {
        let log = EventLog::memory();
        log.record(LogEventType::ConnectOk, "Connected to localhost:2775");
        log.record(LogEventType::Disconnect, "Disconnected");

        let texts: Vec<String> = log.entries().into_iter().map(|e| e.text).collect();
        assert_eq!(texts, vec!["Connected to localhost:2775", "Disconnected"]);
    }

    #[test]
    fn test_view_receives_entries() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let log = EventLog::memory();
        log.attach_view(tx);
        log.record(LogEventType::PauseInterrupted, "Pause interrupted");

        let entry = rx.try_recv().unwrap();
        assert_eq!(entry.event_type, LogEventType::PauseInterrupted);

        drop(rx);
        // 视图关闭后继续记录
        log.record(LogEventType::Disconnect, "Disconnected");
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_file_log_keeps_no_history_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.log");
        let log = EventLog::create(&path).unwrap();

        let message = Message::new(MessageType::EnquireLink).with_sequence(1);
        for _ in 0..1000 {
            log.received(&message);
        }

        assert_eq!(log.len(), 1000);
        assert!(log.entries().is_empty());
        assert_eq!(log.lock().history.as_ref().map(Vec::len), None);

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written.lines().filter(|l| l.contains("Received PDU")).count(),
            1000
        );
    }

    #[test]
    fn test_close_stops_file_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.log");
        let log = EventLog::create(&path).unwrap();

        log.record(LogEventType::ConnectOk, "Connected to localhost:2775");
        log.close();
        log.record(LogEventType::Disconnect, "Disconnected");

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with(" Connected to localhost:2775\n"));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_file_log_with_history() {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::create(&dir.path().join("transcript.log"))
            .unwrap()
            .with_history(true);
        log.record(LogEventType::Disconnect, "Disconnected");

        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.entries()[0].text, "Disconnected");
    }
}
