//! SMPP 传输层
//!
//! 负责与对端 (SMSC/ESME) 的 TCP 长连接管理。每个打开的连接拥有一个入站分发任务，
//! 按顺序把收到的完整帧交给 [`InboundHandler`]，脚本线程则通过 [`FrameSink`] 发送。

pub mod codec;
pub mod config;
pub mod connection;

pub use codec::{FrameCodec, HEADER_LEN};
pub use config::TransportConfig;
pub use connection::{
    ConnectionState, Connector, FrameSink, InboundHandler, PeerConnection, TcpConnection,
    TcpConnector,
};

use thiserror::Error;

/// 传输层错误
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("连接失败: {0}")]
    ConnectionFailed(String),

    #[error("连接已断开")]
    Disconnected,

    #[error("帧长度 {0} 超过上限 {1}")]
    FrameTooLarge(usize, usize),

    #[error("无效帧: {0}")]
    InvalidFrame(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// 对端信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerInfo {
    /// 主机名或 IP
    pub host: String,

    /// 端口
    pub port: u16,
}

impl PeerInfo {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
        }
    }
}

impl std::fmt::Display for PeerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
