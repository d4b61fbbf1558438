//! 传输层配置

use serde::{Deserialize, Serialize};

use crate::{Result, TransportError};

/// 传输层配置
///
/// 连接、发送均不设超时：挂起的对端会一直阻塞脚本线程。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// 单帧最大长度（字节，含 16 字节头部）
    #[serde(default = "default_max_frame_len")]
    pub max_frame_len: usize,

    /// 是否禁用 Nagle 算法
    #[serde(default = "default_tcp_nodelay")]
    pub tcp_nodelay: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_frame_len: default_max_frame_len(),
            tcp_nodelay: default_tcp_nodelay(),
        }
    }
}

impl TransportConfig {
    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.max_frame_len < crate::HEADER_LEN {
            return Err(TransportError::ConfigError(format!(
                "max_frame_len 不能小于头部长度 {}",
                crate::HEADER_LEN
            )));
        }
        Ok(())
    }
}

// 默认值函数
fn default_max_frame_len() -> usize {
    64 * 1024
}

fn default_tcp_nodelay() -> bool {
    true
}
