//! CLI 配置
//!
//! 优先级（从低到高）：内置默认值 → TOML 配置文件 → 命令行参数。
//!
//! 配置文件示例（`~/.config/robstride/config.toml`）：
//!
//! ```toml
//! interface = "can0"
//! host_id = 0xAA
//! retry_count = 2
//! timeout_ms = 2000
//! ```

use anyhow::{Context, Result};
use robstride_client::ClientConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 默认 CAN 接口
pub const DEFAULT_INTERFACE: &str = "can0";

/// 默认配置文件路径
pub fn default_config_file() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("robstride");
    path.push("config.toml");
    Some(path)
}

/// 配置文件内容（所有字段可选）
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// SocketCAN 接口
    pub interface: Option<String>,

    /// 主机 CAN ID
    pub host_id: Option<u8>,

    /// 错误帧重试次数
    pub retry_count: Option<u32>,

    /// 接收超时（毫秒）
    pub timeout_ms: Option<u64>,
}

impl CliConfig {
    /// 加载配置
    ///
    /// 显式指定的文件必须存在；默认位置的文件不存在时使用空配置。
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => match default_config_file() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {}", path.display()))
    }
}

/// 命令行中的连接参数（均可覆盖配置文件）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub interface: Option<String>,
    pub host_id: Option<u8>,
    pub retry_count: Option<u32>,
    pub timeout_ms: Option<u64>,
}

/// 合并后的最终设置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub interface: String,
    pub client: ClientConfig,
}

impl Settings {
    pub fn resolve(file: CliConfig, overrides: Overrides) -> Self {
        let defaults = ClientConfig::default();

        let client = ClientConfig::default()
            .with_host_can_id(
                overrides.host_id.or(file.host_id).unwrap_or(defaults.host_can_id),
            )
            .with_retry_count(
                overrides.retry_count.or(file.retry_count).unwrap_or(defaults.retry_count),
            )
            .with_recv_timeout(
                overrides
                    .timeout_ms
                    .or(file.timeout_ms)
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.recv_timeout),
            );

        Self {
            interface: overrides
                .interface
                .or(file.interface)
                .unwrap_or_else(|| DEFAULT_INTERFACE.to_string()),
            client,
        }
    }
}
