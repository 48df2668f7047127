//! 29 位扩展仲裁 ID 定义
//!
//! RobStride 协议把 CAN 扩展帧的仲裁 ID 当作报头使用：
//!
//! ```text
//!  28      24 23  22  21 20     16 15           8 7            0
//! +----------+---+---+---+---------+--------------+--------------+
//! | msg type | - |mode| - | errors  |   byte 1     |   byte 0     |
//! +----------+---+---+---+---------+--------------+--------------+
//! ```
//!
//! - 发送方向：byte 0 = `id_data_2`，byte 1 起 = `id_data_1`（含义随消息类型变化）
//! - 接收方向：byte 0 = 主机 CAN ID，byte 1 = 电机 ID，bit 16-20 = 故障位，bit 22 = 模式位

use crate::ProtocolError;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// 扩展帧 ID 宽度掩码（29 位）
pub const EXTENDED_ID_MASK: u32 = 0x1FFF_FFFF;

pub const MESSAGE_TYPE_SHIFT: u32 = 24;
pub const MESSAGE_TYPE_MASK: u32 = 0x1F;

pub const ERROR_BITS_SHIFT: u32 = 16;
pub const ERROR_BITS_MASK: u32 = 0x1F;

pub const MODE_BIT_SHIFT: u32 = 22;
pub const MODE_BIT_MASK: u32 = 0x1;

/// 消息类型（仲裁 ID bit 24-28）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[num_enum(error_type(name = ProtocolError, constructor = ProtocolError::invalid_message_type))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MessageType {
    /// 获取设备 ID
    Info = 0,
    /// 运控模式控制指令
    Control = 1,
    /// 电机反馈数据
    Feedback = 2,
    /// 电机使能运行
    Enable = 3,
    /// 电机停止运行
    Disable = 4,
    /// 设置机械零位
    ZeroPos = 6,
    /// 设置电机 CAN ID
    SetID = 7,
    /// 单个参数读取
    ReadParam = 17,
    /// 单个参数写入
    WriteParam = 18,
}

/// 打包仲裁 ID
///
/// `id_data_2 | (id_data_1 << 8) | (message_type << 24)`，结果截断为 29 位。
/// `id_data_1` 取 16 位，以容纳修改 ID 指令的 `host | (new_id << 8)`。
pub fn encode_id(message_type: u8, id_data_1: u16, id_data_2: u8) -> u32 {
    let id = (id_data_2 as u32)
        | ((id_data_1 as u32) << 8)
        | (((message_type as u32) & MESSAGE_TYPE_MASK) << MESSAGE_TYPE_SHIFT);
    id & EXTENDED_ID_MASK
}

/// 按消息类型打包仲裁 ID
pub fn encode_message_id(message_type: MessageType, id_data_1: u16, id_data_2: u8) -> u32 {
    encode_id(message_type.into(), id_data_1, id_data_2)
}

/// 解包后的仲裁 ID
///
/// 字段按接收方向命名：byte 0 为主机 CAN ID，byte 1 为电机 ID。
/// `message_type` 保留原始 5 位值，未知类型由 [`ArbitrationId::kind`] 显式报错。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArbitrationId {
    pub message_type: u8,
    pub motor_id: u8,
    pub host_id: u8,
    pub error_bits: u8,
    pub mode_bit: u8,
}

impl ArbitrationId {
    pub fn decode(id: u32) -> Self {
        Self {
            message_type: ((id >> MESSAGE_TYPE_SHIFT) & MESSAGE_TYPE_MASK) as u8,
            motor_id: ((id >> 8) & 0xFF) as u8,
            host_id: (id & 0xFF) as u8,
            error_bits: ((id >> ERROR_BITS_SHIFT) & ERROR_BITS_MASK) as u8,
            mode_bit: ((id >> MODE_BIT_SHIFT) & MODE_BIT_MASK) as u8,
        }
    }

    /// 消息类型（未知值返回 `ProtocolError::InvalidValue`）
    pub fn kind(&self) -> Result<MessageType, ProtocolError> {
        MessageType::try_from(self.message_type)
    }
}

impl From<u32> for ArbitrationId {
    fn from(id: u32) -> Self {
        Self::decode(id)
    }
}
