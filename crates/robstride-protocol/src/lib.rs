//! # RobStride Protocol
//!
//! RobStride 关节电机 CAN 总线协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `ids`: 29 位扩展仲裁 ID 的打包/解包，消息类型
//! - `params`: 参数表（名称 ↔ 16 位参数 ID）与参数值编码
//! - `control`: 指令帧构建（使能、失能、修改 ID、读写参数）
//! - `feedback`: 反馈帧解析（角度、速度、力矩、温度、故障、模式）
//! - `response`: 应答帧校验
//! - `constants`: 协议常量
//!
//! ## 字节序
//!
//! 反馈帧的遥测字段为大端（Motorola）无符号 16 位定点数；
//! 参数 ID 与参数值（f32）为小端字节序。

pub mod constants;
pub mod control;
pub mod feedback;
pub mod ids;
pub mod params;
pub mod response;

// 重新导出常用类型
pub use constants::*;
pub use control::*;
pub use feedback::*;
pub use ids::*;
pub use params::*;
pub use response::*;

use std::fmt;
use thiserror::Error;

/// CAN 2.0 帧的统一抽象
///
/// 协议层和硬件层之间的中间类型：协议层只构建/解析 `RobstrideFrame`，
/// 由 CAN 层（`robstride-can`）负责与 SocketCAN 等具体实现互转。
///
/// - **Copy**：固定 8 字节数据，无堆分配
/// - **错误帧**：总线错误帧也以此类型上报（`is_error_frame == true`），
///   由接收重试逻辑决定如何处理
///
/// ```rust
/// use robstride_protocol::RobstrideFrame;
///
/// let frame = RobstrideFrame::new_extended(0x0300_AA7F, &[0; 8]);
/// assert!(frame.is_extended);
/// assert_eq!(frame.data_slice().len(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobstrideFrame {
    /// CAN ID（标准帧或扩展帧）
    pub id: u32,

    /// 帧数据（固定 8 字节，未使用部分为 0）
    pub data: [u8; 8],

    /// 有效数据长度 (0-8)
    pub len: u8,

    /// 是否为扩展帧（29-bit ID）
    pub is_extended: bool,

    /// 是否为总线错误帧
    pub is_error_frame: bool,

    /// 时间戳（微秒），0 表示不可用
    pub timestamp_us: u64,
}

impl RobstrideFrame {
    /// 创建标准帧
    pub fn new_standard(id: u16, data: &[u8]) -> Self {
        Self::new(id as u32, data, false)
    }

    /// 创建扩展帧
    pub fn new_extended(id: u32, data: &[u8]) -> Self {
        Self::new(id & EXTENDED_ID_MASK, data, true)
    }

    /// 创建错误帧（由 CAN 层在收到总线错误时构建）
    pub fn new_error(id: u32, data: &[u8]) -> Self {
        Self {
            is_error_frame: true,
            ..Self::new(id, data, true)
        }
    }

    fn new(id: u32, data: &[u8], is_extended: bool) -> Self {
        let mut fixed_data = [0u8; 8];
        let len = data.len().min(8);
        fixed_data[..len].copy_from_slice(&data[..len]);

        Self {
            id,
            data: fixed_data,
            len: len as u8,
            is_extended,
            is_error_frame: false,
            timestamp_us: 0,
        }
    }

    /// 获取数据切片（只包含有效数据）
    pub fn data_slice(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// 获取 CAN ID
    pub fn id(&self) -> u32 {
        self.id
    }

    /// 获取完整数据（8 字节固定数组）
    pub fn data(&self) -> &[u8; 8] {
        &self.data
    }

    /// 解包仲裁 ID
    pub fn arbitration_id(&self) -> ArbitrationId {
        ArbitrationId::decode(self.id)
    }

    /// 校验数据长度为 8 字节
    pub fn ensure_full_payload(&self) -> Result<(), ProtocolError> {
        if self.len < 8 {
            return Err(ProtocolError::InvalidLength {
                expected: 8,
                actual: self.len as usize,
            });
        }
        Ok(())
    }
}

impl fmt::Display for RobstrideFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_error_frame {
            write!(f, "ERR ")?;
        }
        write!(f, "0x{:08X} [{}]", self.id, self.len)?;
        for byte in self.data_slice() {
            write!(f, " {:02X}", byte)?;
        }
        Ok(())
    }
}

pub mod can {
    pub use super::RobstrideFrame;
}

/// 应答仲裁 ID 中参与校验的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdField {
    MessageType,
    HostId,
    MotorId,
}

impl fmt::Display for IdField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdField::MessageType => "message type",
            IdField::HostId => "host CAN id",
            IdField::MotorId => "motor id",
        };
        f.write_str(name)
    }
}

/// 协议层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Invalid frame length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: String, value: u8 },

    /// 参数名不在参数表中
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// 应答的消息类型 / 主机 ID / 电机 ID 与当前事务不符
    #[error("Protocol mismatch: invalid {field} (expected {expected}, got {actual})")]
    Mismatch {
        field: IdField,
        expected: u8,
        actual: u8,
    },

    /// 读参数应答回显的参数 ID 与请求不符
    #[error("Param id mismatch: expected 0x{expected:04X}, got 0x{actual:04X}")]
    ParamMismatch { expected: u16, actual: u16 },

    /// 参数值类型与参数不匹配（run_mode 需要 RunMode，其他参数需要 f32）
    #[error("Invalid value for param 0x{param_id:04X}: {reason}")]
    InvalidParamValue { param_id: u16, reason: &'static str },
}

impl ProtocolError {
    pub(crate) fn invalid_message_type(value: u8) -> Self {
        Self::InvalidValue {
            field: "MessageType".to_string(),
            value,
        }
    }

    pub(crate) fn invalid_run_mode(value: u8) -> Self {
        Self::InvalidValue {
            field: "RunMode".to_string(),
            value,
        }
    }

    pub(crate) fn invalid_motor_mode(value: u8) -> Self {
        Self::InvalidValue {
            field: "MotorMode".to_string(),
            value,
        }
    }
}

/// 大端字节序转 u16（反馈帧遥测字段）
pub fn bytes_to_u16_be(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

/// 小端字节序转 u16（参数 ID）
pub fn bytes_to_u16_le(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

/// u16 转小端字节序
pub fn u16_to_bytes_le(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

/// 小端字节序转 f32（参数值）
pub fn bytes_to_f32_le(bytes: [u8; 4]) -> f32 {
    f32::from_le_bytes(bytes)
}

/// f32 转小端字节序
pub fn f32_to_bytes_le(value: f32) -> [u8; 4] {
    value.to_le_bytes()
}
