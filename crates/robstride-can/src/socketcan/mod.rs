//! SocketCAN CAN 适配器实现
//!
//! Linux 平台下基于内核 SocketCAN 的适配器。
//!
//! ## 特性
//!
//! - 支持标准帧和扩展帧（RobStride 协议只使用扩展帧）
//! - 接收所有错误帧，并以 `is_error_frame == true` 上报，不在本层过滤
//! - 读超时通过 `poll` 实现（`read_frame_timeout`），超时返回 `CanError::Timeout`；
//!   零超时立即返回，不会无限阻塞
//!
//! ## 限制
//!
//! - **仅限 Linux 平台**
//! - **接口配置**：波特率等由系统工具（`ip link`）完成，不在应用层设置

use crate::{CanAdapter, CanDeviceError, CanDeviceErrorKind, CanError, RobstrideFrame};
use ::socketcan::{
    BlockingCan, CanFrame, CanSocket, EmbeddedFrame, ExtendedId, Frame, Socket, SocketOptions,
    StandardId,
};
use std::io;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{trace, warn};

mod interface_check;

pub use interface_check::check_interface_status;

/// SocketCAN 适配器
///
/// # 示例
///
/// ```no_run
/// use robstride_can::{CanAdapter, RobstrideFrame, SocketCanAdapter};
/// use std::time::Duration;
///
/// let mut adapter = SocketCanAdapter::new("can0").unwrap();
/// adapter.send(RobstrideFrame::new_extended(0x0300_AA01, &[0; 8])).unwrap();
/// let reply = adapter.receive_timeout(Duration::from_secs(2)).unwrap();
/// ```
#[derive(Debug)]
pub struct SocketCanAdapter {
    socket: CanSocket,
    /// 接口名称（如 "can0"）
    interface: String,
    /// 当前读超时
    read_timeout: Duration,
}

impl SocketCanAdapter {
    /// 默认读超时
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);

    /// 打开 SocketCAN 接口
    ///
    /// 打开前检查接口存在且为 UP，失败时错误信息中包含修复命令。
    ///
    /// # 错误
    /// - `CanError::Device`: 接口不存在 / 未启动 / 无法打开
    /// - `CanError::Io`: 系统调用失败
    pub fn new(interface: impl Into<String>) -> Result<Self, CanError> {
        let interface = interface.into();

        if !check_interface_status(&interface)? {
            return Err(CanDeviceError::new(
                CanDeviceErrorKind::NotUp,
                format!(
                    "CAN interface '{}' exists but is not UP. Please start it first:\n  sudo ip link set up {}",
                    interface, interface
                ),
            )
            .into());
        }

        let socket = CanSocket::open(&interface).map_err(|e| {
            CanDeviceError::new(
                CanDeviceErrorKind::Backend,
                format!("Failed to open CAN interface '{}': {}", interface, e),
            )
        })?;

        // 错误帧需要显式订阅，重试逻辑依赖它们
        if let Err(e) = socket.set_error_filter_accept_all() {
            warn!(
                "Failed to enable error frames on '{}': {}, bus errors will surface as timeouts",
                interface, e
            );
        }

        let read_timeout = Self::DEFAULT_READ_TIMEOUT;

        trace!("SocketCAN interface '{}' opened", interface);

        Ok(Self {
            socket,
            interface,
            read_timeout,
        })
    }

    /// 获取接口名称
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// 获取读超时时间
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// 设置读超时（`Duration::ZERO` 表示只检查已到达的帧，不等待）
    pub fn set_read_timeout(&mut self, timeout: Duration) {
        self.read_timeout = timeout;
    }
}

/// 读错误映射：`WouldBlock` / `TimedOut` 视为超时
fn map_read_error(e: io::Error) -> CanError {
    match e.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => CanError::Timeout,
        _ => CanError::Io(e),
    }
}

/// RobstrideFrame -> CanFrame
fn to_can_frame(frame: &RobstrideFrame) -> Result<CanFrame, CanError> {
    let can_frame = if frame.is_extended {
        ExtendedId::new(frame.id).and_then(|id| CanFrame::new(id, frame.data_slice()))
    } else {
        StandardId::new(frame.id as u16).and_then(|id| CanFrame::new(id, frame.data_slice()))
    };

    can_frame.ok_or_else(|| {
        CanDeviceError::new(
            CanDeviceErrorKind::InvalidFrame,
            format!("Failed to create CAN frame with ID 0x{:X}", frame.id),
        )
        .into()
    })
}

/// CanFrame -> RobstrideFrame（错误帧保留 `is_error_frame` 标记）
///
/// `raw_id()` 可能带有标志位，按帧类型截取有效位。
fn from_can_frame(can_frame: &CanFrame) -> RobstrideFrame {
    let mut frame = if can_frame.is_error_frame() {
        RobstrideFrame::new_error(can_frame.raw_id(), can_frame.data())
    } else if can_frame.is_extended() {
        RobstrideFrame::new_extended(can_frame.raw_id(), can_frame.data())
    } else {
        RobstrideFrame::new_standard((can_frame.raw_id() & 0x7FF) as u16, can_frame.data())
    };
    frame.timestamp_us = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0);
    frame
}

impl CanAdapter for SocketCanAdapter {
    /// 发送帧
    ///
    /// # 错误
    /// - `CanError::Device`: 帧 ID 无效
    /// - `CanError::Io`: 发送失败（如总线关闭）
    fn send(&mut self, frame: RobstrideFrame) -> Result<(), CanError> {
        let can_frame = to_can_frame(&frame)?;

        self.socket.transmit(&can_frame).map_err(|e| {
            CanError::Io(io::Error::other(format!("SocketCAN transmit error: {}", e)))
        })?;

        trace!("Sent CAN frame: {}", frame);
        Ok(())
    }

    /// 接收一帧（阻塞直到收到帧或超过 `read_timeout`）
    ///
    /// 错误帧原样返回，不重试。
    fn receive(&mut self) -> Result<RobstrideFrame, CanError> {
        let can_frame = self
            .socket
            .read_frame_timeout(self.read_timeout)
            .map_err(map_read_error)?;

        let frame = from_can_frame(&can_frame);
        trace!("Received CAN frame on '{}': {}", self.interface, frame);
        Ok(frame)
    }

    fn set_receive_timeout(&mut self, timeout: Duration) {
        self.set_read_timeout(timeout);
    }
}

impl Drop for SocketCanAdapter {
    fn drop(&mut self) {
        trace!("SocketCAN interface '{}' closed", self.interface);
    }
}
