//! 客户端配置

use robstride_protocol::DEFAULT_HOST_CAN_ID;
use std::time::Duration;

/// 客户端配置
///
/// # Example
///
/// ```
/// use robstride_client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_retry_count(5)
///     .with_recv_timeout(Duration::from_millis(500));
/// assert_eq!(config.host_can_id, 0xAA);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// 收到错误帧后的最大重试次数（总尝试次数 = retry_count + 1）
    pub retry_count: u32,
    /// 单次接收超时
    pub recv_timeout: Duration,
    /// 主机 CAN ID
    pub host_can_id: u8,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            retry_count: 2,
            recv_timeout: Duration::from_secs(2),
            host_can_id: DEFAULT_HOST_CAN_ID,
        }
    }
}

impl ClientConfig {
    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn with_recv_timeout(mut self, recv_timeout: Duration) -> Self {
        self.recv_timeout = recv_timeout;
        self
    }

    pub fn with_host_can_id(mut self, host_can_id: u8) -> Self {
        self.host_can_id = host_can_id;
        self
    }
}
