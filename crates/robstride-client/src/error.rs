//! 客户端错误类型定义

use robstride_can::{CanError, RobstrideFrame};
use robstride_protocol::ProtocolError;
use thiserror::Error;

/// 客户端错误类型
#[derive(Error, Debug)]
pub enum ClientError {
    /// CAN 适配层错误（超时除外，超时映射为 `NoResponse`）
    #[error("CAN driver error: {0}")]
    Can(#[from] CanError),

    /// 应答校验 / 解析错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 接收超时，电机未应答
    #[error("No response from motor")]
    NoResponse,

    /// 连续收到错误帧，重试次数已用尽
    #[error("Receive failed after {attempts} attempts, last error frame: {last_frame}")]
    ReceiveExhausted {
        attempts: u32,
        last_frame: RobstrideFrame,
    },
}

impl ClientError {
    /// 是否为应答 ID 不匹配
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            ClientError::Protocol(ProtocolError::Mismatch { .. } | ProtocolError::ParamMismatch { .. })
        )
    }
}
