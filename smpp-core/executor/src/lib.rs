//! SMPP 执行器
//!
//! 批处理脚本的编译与执行引擎

pub mod batch;
pub mod compiler;
pub mod config;
pub mod event_log;
pub mod responder;
pub mod runner;
pub mod script;

pub use batch::{Batch, Event, EventKind};
pub use compiler::{CompileDefaults, CompileError, ScriptCompiler};
pub use config::{
    AccountConfig, AutoResponseConfig, HarnessConfig, ServerConfig, TranscriptConfig,
};
pub use event_log::{EventLog, LogEntry, LogEventType};
pub use responder::{AutoResponder, AutoResponseSettings, BATCH_DEFAULTS, INTERACTIVE_DEFAULTS};
pub use runner::{BatchRunner, PauseInterrupt, RunOutcome, RunReport};
pub use script::{ScriptElement, ScriptError};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("脚本编译失败: {0}")]
    CompileFailed(#[from] CompileError),

    #[error("传输错误: {0}")]
    TransportError(#[from] smpp_transport::TransportError),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExecutorError>;
