//! 接收统计

/// 接收计数器
///
/// 两个计数器只增不减，由接收重试逻辑更新。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStats {
    /// 接收尝试次数（包括收到错误帧和超时的尝试）
    pub recv_count: u64,
    /// 收到错误帧的次数
    pub recv_error_count: u64,
}

impl ClientStats {
    /// 错误帧比例
    ///
    /// 尚未进行任何接收时返回 `None`。
    pub fn error_rate(&self) -> Option<f64> {
        if self.recv_count == 0 {
            None
        } else {
            Some(self.recv_error_count as f64 / self.recv_count as f64)
        }
    }
}
