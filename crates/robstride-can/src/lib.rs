//! # RobStride CAN Adapter Layer
//!
//! CAN 硬件抽象层，提供统一的收发接口。
//!
//! 协议层（`robstride-protocol`）只面向 [`CanAdapter`]，不关心底层是 SocketCAN 还是 Mock。
//!
//! ## 约定
//!
//! - 接收超时以 `CanError::Timeout` 返回
//! - 总线错误帧**不过滤**，以 `RobstrideFrame::is_error_frame == true` 返回，
//!   由上层的接收重试逻辑计数并决定是否重试

use std::time::Duration;
use thiserror::Error;

// 重新导出 robstride-protocol 中的 RobstrideFrame
pub use robstride_protocol::RobstrideFrame;

#[cfg(target_os = "linux")]
pub mod socketcan;

#[cfg(target_os = "linux")]
pub use self::socketcan::SocketCanAdapter;

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "mock")]
pub use self::mock::{MockCanAdapter, MockReply};

/// CAN 适配层统一错误类型
#[derive(Error, Debug)]
pub enum CanError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Device Error: {0}")]
    Device(#[from] CanDeviceError),
    #[error("Read timeout")]
    Timeout,
    #[error("Device not started")]
    NotStarted,
}

/// 设备/后端错误的结构化分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanDeviceErrorKind {
    NotFound,
    NotUp,
    InvalidName,
    InvalidFrame,
    Backend,
}

/// 结构化设备错误
#[derive(Error, Debug, Clone)]
#[error("{kind:?}: {message}")]
pub struct CanDeviceError {
    pub kind: CanDeviceErrorKind,
    pub message: String,
}

impl CanDeviceError {
    pub fn new(kind: CanDeviceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// CAN 收发接口
///
/// 适配器由调用方完整构建后注入客户端，客户端不负责打开/关闭总线。
pub trait CanAdapter {
    fn send(&mut self, frame: RobstrideFrame) -> Result<(), CanError>;
    fn receive(&mut self) -> Result<RobstrideFrame, CanError>;
    fn set_receive_timeout(&mut self, _timeout: Duration) {}
    fn receive_timeout(&mut self, timeout: Duration) -> Result<RobstrideFrame, CanError> {
        self.set_receive_timeout(timeout);
        self.receive()
    }
}

impl<A: CanAdapter + ?Sized> CanAdapter for &mut A {
    fn send(&mut self, frame: RobstrideFrame) -> Result<(), CanError> {
        (**self).send(frame)
    }
    fn receive(&mut self) -> Result<RobstrideFrame, CanError> {
        (**self).receive()
    }
    fn set_receive_timeout(&mut self, timeout: Duration) {
        (**self).set_receive_timeout(timeout)
    }
    fn receive_timeout(&mut self, timeout: Duration) -> Result<RobstrideFrame, CanError> {
        (**self).receive_timeout(timeout)
    }
}

impl<A: CanAdapter + ?Sized> CanAdapter for Box<A> {
    fn send(&mut self, frame: RobstrideFrame) -> Result<(), CanError> {
        (**self).send(frame)
    }
    fn receive(&mut self) -> Result<RobstrideFrame, CanError> {
        (**self).receive()
    }
    fn set_receive_timeout(&mut self, timeout: Duration) {
        (**self).set_receive_timeout(timeout)
    }
    fn receive_timeout(&mut self, timeout: Duration) -> Result<RobstrideFrame, CanError> {
        (**self).receive_timeout(timeout)
    }
}
