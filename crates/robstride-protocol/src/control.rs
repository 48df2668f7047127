//! 指令帧结构体定义
//!
//! 每种指令提供 `to_frame()` 构建 8 字节扩展帧。
//! 除修改 ID 指令外，仲裁 ID 均为 `id_data_1 = 主机 CAN ID`、`id_data_2 = 电机 ID`。

use crate::can::RobstrideFrame;
use crate::{MessageType, ParamValue, ProtocolError, encode_message_id, u16_to_bytes_le};

/// 使能指令（MessageType::Enable）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnableCommand {
    pub host_id: u8,
    pub motor_id: u8,
}

impl EnableCommand {
    pub fn new(host_id: u8, motor_id: u8) -> Self {
        Self { host_id, motor_id }
    }

    /// 转换为 CAN 帧（数据全 0）
    pub fn to_frame(self) -> RobstrideFrame {
        let id = encode_message_id(MessageType::Enable, self.host_id as u16, self.motor_id);
        RobstrideFrame::new_extended(id, &[0u8; 8])
    }
}

/// 失能指令（MessageType::Disable）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisableCommand {
    pub host_id: u8,
    pub motor_id: u8,
}

impl DisableCommand {
    pub fn new(host_id: u8, motor_id: u8) -> Self {
        Self { host_id, motor_id }
    }

    /// 转换为 CAN 帧（数据全 0）
    pub fn to_frame(self) -> RobstrideFrame {
        let id = encode_message_id(MessageType::Disable, self.host_id as u16, self.motor_id);
        RobstrideFrame::new_extended(id, &[0u8; 8])
    }
}

/// 修改电机 CAN ID 指令（MessageType::SetID）
///
/// 新 ID 放在仲裁 ID 的 bit 16-23：`id_data_1 = host | (new_motor_id << 8)`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetIdCommand {
    pub host_id: u8,
    pub motor_id: u8,
    pub new_motor_id: u8,
}

impl SetIdCommand {
    pub fn new(host_id: u8, motor_id: u8, new_motor_id: u8) -> Self {
        Self {
            host_id,
            motor_id,
            new_motor_id,
        }
    }

    /// 转换为 CAN 帧（数据全 0）
    pub fn to_frame(self) -> RobstrideFrame {
        let id_data_1 = (self.host_id as u16) | ((self.new_motor_id as u16) << 8);
        let id = encode_message_id(MessageType::SetID, id_data_1, self.motor_id);
        RobstrideFrame::new_extended(id, &[0u8; 8])
    }
}

/// 单个参数读取指令（MessageType::ReadParam）
///
/// - Byte 0-1: 参数 ID（小端）
/// - Byte 2-7: 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadParamCommand {
    pub host_id: u8,
    pub motor_id: u8,
    pub param_id: u16,
}

impl ReadParamCommand {
    pub fn new(host_id: u8, motor_id: u8, param_id: u16) -> Self {
        Self {
            host_id,
            motor_id,
            param_id,
        }
    }

    /// 转换为 CAN 帧
    pub fn to_frame(self) -> RobstrideFrame {
        let mut data = [0u8; 8];
        data[0..2].copy_from_slice(&u16_to_bytes_le(self.param_id));
        // Byte 2-7: 已初始化为 0

        let id = encode_message_id(MessageType::ReadParam, self.host_id as u16, self.motor_id);
        RobstrideFrame::new_extended(id, &data)
    }
}

/// 单个参数写入指令（MessageType::WriteParam）
///
/// - Byte 0-1: 参数 ID（小端）
/// - Byte 2-3: 0
/// - Byte 4-7: 参数值（`run_mode` 为单字节 + 3 字节 0，其余为小端 f32）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriteParamCommand {
    pub host_id: u8,
    pub motor_id: u8,
    pub param_id: u16,
    value_bytes: [u8; 4],
}

impl WriteParamCommand {
    /// 创建写参数指令
    ///
    /// # 错误
    /// - `ProtocolError::InvalidParamValue`: 值类型与参数不匹配
    pub fn new(
        host_id: u8,
        motor_id: u8,
        param_id: u16,
        value: impl Into<ParamValue>,
    ) -> Result<Self, ProtocolError> {
        let value_bytes = value.into().encode(param_id)?;
        Ok(Self {
            host_id,
            motor_id,
            param_id,
            value_bytes,
        })
    }

    /// 编码后的参数值（Byte 4-7）
    pub fn value_bytes(&self) -> [u8; 4] {
        self.value_bytes
    }

    /// 转换为 CAN 帧
    pub fn to_frame(self) -> RobstrideFrame {
        let mut data = [0u8; 8];
        data[0..2].copy_from_slice(&u16_to_bytes_le(self.param_id));
        // Byte 2-3: 保留，已初始化为 0
        data[4..8].copy_from_slice(&self.value_bytes);

        let id = encode_message_id(MessageType::WriteParam, self.host_id as u16, self.motor_id);
        RobstrideFrame::new_extended(id, &data)
    }
}
