//! 命令定义和实现

pub mod motor;
pub mod param;

pub use motor::{MotorArgs, UpdateIdArgs};
pub use param::{ReadArgs, WriteArgs};

use crate::config::Settings;
use anyhow::Result;
use robstride_can::CanAdapter;
use robstride_client::Client;
use tracing::{debug, info};

/// 解析 u8（支持十进制和 `0x` 前缀的十六进制）
pub fn parse_u8(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid id '{}': {} (expected 0-255 or 0x00-0xFF)", s, e))
}

/// 打开 CAN 接口并创建客户端
pub fn connect(settings: &Settings) -> Result<Client<Box<dyn CanAdapter>>> {
    info!("Connecting to {}", settings.interface);
    let adapter = open_adapter(&settings.interface)?;
    Ok(Client::with_config(adapter, settings.client))
}

#[cfg(target_os = "linux")]
fn open_adapter(interface: &str) -> Result<Box<dyn CanAdapter>> {
    use anyhow::Context;

    let adapter = robstride_can::SocketCanAdapter::new(interface)
        .with_context(|| format!("打开 CAN 接口 {} 失败", interface))?;
    Ok(Box::new(adapter))
}

#[cfg(not(target_os = "linux"))]
fn open_adapter(interface: &str) -> Result<Box<dyn CanAdapter>> {
    anyhow::bail!(
        "SocketCAN is only available on Linux, cannot open '{}'",
        interface
    )
}

/// 输出接收统计
pub fn log_stats<A: CanAdapter>(client: &Client<A>) {
    let stats = client.stats();
    debug!(
        "recv_count={} recv_error_count={} error_rate={:?}",
        stats.recv_count,
        stats.recv_error_count,
        client.error_rate()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u8() {
        assert_eq!(parse_u8("127"), Ok(127));
        assert_eq!(parse_u8("0x7F"), Ok(0x7F));
        assert_eq!(parse_u8("0XAA"), Ok(0xAA));
        assert!(parse_u8("256").is_err());
        assert!(parse_u8("0x1FF").is_err());
        assert!(parse_u8("motor").is_err());
    }
}
