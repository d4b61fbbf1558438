//! 测试工具配置管理
//!
//! 支持从多个源加载配置:
//! - 环境变量 (优先级最高)
//! - 配置文件 (TOML/YAML/JSON)
//! - 默认值 (优先级最低)
//!
//! 配置文件搜索路径 (按优先级):
//! 1. 命令行 `--config` 指定的路径
//! 2. `SMPP_HARNESS_CONFIG` 环境变量指定的路径
//! 3. `./harness.toml` (当前目录)
//! 4. `~/.config/smpp-harness/config.toml` (用户配置目录)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use smpp_protocol::MessageType;
use smpp_transport::TransportConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compiler::CompileDefaults;
use crate::responder::BATCH_DEFAULTS;
use crate::ExecutorError;

// ============================================
// 核心配置结构
// ============================================

/// 测试工具配置 (顶层)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// 缺省对端
    #[serde(default)]
    pub server: ServerConfig,

    /// 缺省绑定账号
    #[serde(default)]
    pub account: AccountConfig,

    /// 运行记录输出
    #[serde(default)]
    pub transcript: TranscriptConfig,

    /// 自动应答
    #[serde(default)]
    pub auto_response: AutoResponseConfig,

    /// 传输层
    #[serde(default)]
    pub transport: TransportConfig,
}

/// 对端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// 绑定账号配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    #[serde(default)]
    pub system_id: String,

    #[serde(default)]
    pub system_type: String,

    #[serde(default)]
    pub password: String,
}

/// 运行记录配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// 同时回显到控制台
    #[serde(default = "default_echo_console")]
    pub echo_console: bool,
}

/// 自动应答配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoResponseConfig {
    /// 每次连接时开启自动应答的消息类型名
    #[serde(default = "default_auto_response")]
    pub defaults: Vec<String>,
}

impl AutoResponseConfig {
    /// 解析为消息类型
    pub fn message_types(&self) -> crate::Result<Vec<MessageType>> {
        self.defaults
            .iter()
            .map(|name| {
                MessageType::from_name(name).ok_or_else(|| {
                    ExecutorError::ConfigError(format!("auto_response 中未知的消息类型: {}", name))
                })
            })
            .collect()
    }
}

// ============================================
// 默认值函数
// ============================================

fn default_host() -> String {
    "localhost".to_string()
}
fn default_port() -> u16 {
    2775
}
fn default_echo_console() -> bool {
    true
}
fn default_auto_response() -> Vec<String> {
    BATCH_DEFAULTS.iter().map(|t| t.name().to_string()).collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            echo_console: default_echo_console(),
        }
    }
}

impl Default for AutoResponseConfig {
    fn default() -> Self {
        Self {
            defaults: default_auto_response(),
        }
    }
}

// ============================================
// 加载与校验
// ============================================

impl HarnessConfig {
    /// 从多个源加载配置 (优先级: 环境变量 > 配置文件 > 默认值)
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        // 1. 从默认值开始
        let mut config = Self::default();

        // 2. 尝试加载配置文件
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_config_file(),
        };
        if let Some(path) = path {
            tracing::debug!("Loading config from: {:?}", path);
            config = Self::load_from_file(&path)?;
        } else {
            tracing::debug!("No config file found, using defaults");
        }

        // 3. 从环境变量覆盖
        config.apply_env_vars()?;

        Ok(config)
    }

    /// 从指定文件加载配置
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        // 根据文件扩展名选择解析器
        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {:?}", path))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {:?}", path))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {:?}", path))?,
            _ => anyhow::bail!("Unsupported config file format: {:?}", path),
        };

        Ok(config)
    }

    /// 查找配置文件 (按优先级搜索)
    fn find_config_file() -> Option<PathBuf> {
        // 1. 环境变量指定的路径
        if let Ok(path) = env::var("SMPP_HARNESS_CONFIG") {
            let p = PathBuf::from(path);
            if p.exists() {
                return Some(p);
            }
        }

        // 2. 当前目录
        let local = PathBuf::from("./harness.toml");
        if local.exists() {
            return Some(local);
        }

        // 3. 用户配置目录
        dirs::home_dir()
            .map(|home| home.join(".config/smpp-harness/config.toml"))
            .filter(|p| p.exists())
    }

    /// 从环境变量覆盖配置
    fn apply_env_vars(&mut self) -> Result<()> {
        if let Ok(host) = env::var("SMPP_SERVER") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("SMPP_PORT") {
            self.server.port = port.parse().context("Invalid SMPP_PORT value")?;
        }
        if let Ok(system_id) = env::var("SMPP_SYSTEM_ID") {
            self.account.system_id = system_id;
        }
        if let Ok(system_type) = env::var("SMPP_SYSTEM_TYPE") {
            self.account.system_type = system_type;
        }
        if let Ok(password) = env::var("SMPP_PASSWORD") {
            self.account.password = password;
        }

        Ok(())
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Server host cannot be empty");
        }
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }
        self.auto_response.message_types()?;
        self.transport.validate()?;

        Ok(())
    }

    /// 编译脚本时使用的缺省值
    pub fn compile_defaults(&self) -> CompileDefaults {
        CompileDefaults {
            host: self.server.host.clone(),
            port: self.server.port,
            system_id: self.account.system_id.clone(),
            password: self.account.password.clone(),
            system_type: self.account.system_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HarnessConfig::default();
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 2775);
        assert!(config.transcript.echo_console);
        assert_eq!(config.auto_response.defaults, vec!["ENQUIRE_LINK", "DELIVER_SM"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: HarnessConfig = toml::from_str(
            r#"
[server]
port = 2776

[account]
system_id = "esme01"
"#,
        )
        .unwrap();

        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 2776);
        assert_eq!(config.account.system_id, "esme01");
        assert_eq!(config.account.password, "");
        assert_eq!(config.transport.max_frame_len, 65536);
    }

    #[test]
    fn test_unknown_auto_response_rejected() {
        let mut config = HarnessConfig::default();
        config.auto_response.defaults = vec!["NOT_A_PDU".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_compile_defaults() {
        let mut config = HarnessConfig::default();
        config.account.system_id = "esme".to_string();
        config.account.password = "secret".to_string();

        let defaults = config.compile_defaults();
        assert_eq!(defaults.host, "localhost");
        assert_eq!(defaults.system_id, "esme");
        assert_eq!(defaults.password, "secret");
    }

    #[test]
    fn test_config_yaml_roundtrip() {
        let config = HarnessConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: HarnessConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.auto_response.defaults, config.auto_response.defaults);
    }

    #[test]
    fn test_load_from_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("harness.toml");
        fs::write(&toml_path, "[server]\nhost = \"smsc.test\"\n").unwrap();
        let loaded = HarnessConfig::load_from_file(&toml_path).unwrap();
        assert_eq!(loaded.server.host, "smsc.test");
        assert_eq!(loaded.server.port, 2775);

        let json_path = dir.path().join("harness.json");
        fs::write(&json_path, r#"{"account": {"system_id": "esme02"}}"#).unwrap();
        let loaded = HarnessConfig::load_from_file(&json_path).unwrap();
        assert_eq!(loaded.account.system_id, "esme02");

        let ini_path = dir.path().join("harness.ini");
        fs::write(&ini_path, "host=smsc").unwrap();
        assert!(HarnessConfig::load_from_file(&ini_path).is_err());
    }
}
