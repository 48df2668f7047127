//! 反馈帧结构体定义
//!
//! 电机在使能、失能、写参数后回复反馈帧（MessageType::Feedback）：
//!
//! - 仲裁 ID：byte 0 = 主机 CAN ID，byte 1 = 电机 ID，bit 16-20 = 故障位，bit 22 = 模式位
//! - Byte 0-1: 角度，大端 u16，映射到 [-4π, 4π] rad
//! - Byte 2-3: 角速度，大端 u16，量程随电机型号变化
//! - Byte 4-5: 力矩，大端 u16，量程随电机型号变化
//! - Byte 6-7: 温度，大端 u16，单位 0.1 °C

use crate::can::RobstrideFrame;
use crate::constants::*;
use crate::{ProtocolError, bytes_to_u16_be};
use bilge::prelude::*;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// 电机模式（仲裁 ID bit 22）
///
/// 协议只提取 1 位模式位，因此 `Run` 无法从反馈帧中得到。
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[num_enum(error_type(name = ProtocolError, constructor = ProtocolError::invalid_motor_mode))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MotorMode {
    /// 复位模式
    Reset = 0,
    /// 标定模式
    Calibration = 1,
    /// 运行模式
    Run = 2,
}

/// 单个电机故障（取值为故障位掩码）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MotorError {
    /// 欠压
    Undervoltage = 1,
    /// 过流
    Overcurrent = 2,
    /// 过温
    Overtemp = 4,
    /// 磁编码故障
    MagneticEncodingFault = 8,
    /// HALL 编码故障
    HallEncodingFault = 16,
    /// 未标定
    Uncalibrated = 32,
}

impl MotorError {
    pub const ALL: [MotorError; 6] = [
        MotorError::Undervoltage,
        MotorError::Overcurrent,
        MotorError::Overtemp,
        MotorError::MagneticEncodingFault,
        MotorError::HallEncodingFault,
        MotorError::Uncalibrated,
    ];
}

/// 故障位集合
///
/// Bit 0-5 依次对应 [`MotorError`] 的 1、2、4、8、16、32。
/// 仲裁 ID 中的故障位只有 5 位（bit 16-20），`uncalibrated` 在反馈帧中恒为 0。
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotorErrors {
    pub undervoltage: bool,            // Bit 0
    pub overcurrent: bool,             // Bit 1
    pub overtemp: bool,                // Bit 2
    pub magnetic_encoding_fault: bool, // Bit 3
    pub hall_encoding_fault: bool,     // Bit 4
    pub uncalibrated: bool,            // Bit 5
    pub reserved: u2,                  // Bit 6-7: 保留
}

impl MotorErrors {
    /// 从故障位掩码构建（只保留低 6 位）
    pub fn from_error_bits(bits: u8) -> Self {
        MotorErrors::from(u8::new(bits & 0x3F))
    }

    /// 故障位掩码
    pub fn bits(&self) -> u8 {
        u8::from(*self).value()
    }

    pub fn contains(&self, error: MotorError) -> bool {
        self.bits() & u8::from(error) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits() == 0
    }

    /// 按位序遍历当前置位的故障
    pub fn iter(&self) -> impl Iterator<Item = MotorError> + '_ {
        MotorError::ALL.into_iter().filter(|e| self.contains(*e))
    }
}

impl FromIterator<MotorError> for MotorErrors {
    fn from_iter<I: IntoIterator<Item = MotorError>>(iter: I) -> Self {
        let bits = iter.into_iter().fold(0u8, |acc, e| acc | u8::from(e));
        MotorErrors::from_error_bits(bits)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for MotorErrors {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// 电机型号选择
///
/// 型号 1 的速度/力矩量程为 88 / 34，其他型号为 30 / 240。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorModel(pub u8);

impl Default for MotorModel {
    fn default() -> Self {
        MotorModel(1)
    }
}

impl MotorModel {
    pub fn velocity_range(self) -> f64 {
        if self.0 == 1 {
            VELOCITY_RANGE_MODEL_1
        } else {
            VELOCITY_RANGE_OTHER
        }
    }

    pub fn torque_range(self) -> f64 {
        if self.0 == 1 {
            TORQUE_RANGE_MODEL_1
        } else {
            TORQUE_RANGE_OTHER
        }
    }
}

/// 将 u16 定点数映射到以 0 为中心、宽度为 `range` 的区间
fn scale_symmetric(raw: u16, range: f64) -> f64 {
    raw as f64 / RAW_U16_FULL_SCALE * range - range / 2.0
}

/// 角度（rad）
pub fn angle_from_raw(raw: u16) -> f64 {
    scale_symmetric(raw, ANGLE_RANGE_RAD)
}

/// 角速度
pub fn velocity_from_raw(raw: u16, model: MotorModel) -> f64 {
    scale_symmetric(raw, model.velocity_range())
}

/// 力矩
pub fn torque_from_raw(raw: u16, model: MotorModel) -> f64 {
    scale_symmetric(raw, model.torque_range())
}

/// 温度（°C）
pub fn temperature_from_raw(raw: u16) -> f64 {
    raw as f64 / TEMPERATURE_SCALE
}

/// 电机反馈
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FeedbackResp {
    pub motor_id: u8,
    pub errors: MotorErrors,
    pub mode: MotorMode,
    /// 角度（rad）
    pub angle: f64,
    pub velocity: f64,
    pub torque: f64,
    /// 温度（°C）
    pub temperature: f64,
}

impl FeedbackResp {
    /// 解析反馈帧
    ///
    /// 不校验消息类型和 ID，调用方应先通过 [`validate_response`](crate::validate_response)。
    ///
    /// # 错误
    /// - `ProtocolError::InvalidLength`: 数据不足 8 字节
    pub fn decode(frame: &RobstrideFrame, model: MotorModel) -> Result<Self, ProtocolError> {
        frame.ensure_full_payload()?;

        let id = frame.arbitration_id();
        let d = &frame.data;

        Ok(Self {
            motor_id: id.motor_id,
            errors: MotorErrors::from_error_bits(id.error_bits),
            mode: MotorMode::try_from(id.mode_bit)?,
            angle: angle_from_raw(bytes_to_u16_be([d[0], d[1]])),
            velocity: velocity_from_raw(bytes_to_u16_be([d[2], d[3]]), model),
            torque: torque_from_raw(bytes_to_u16_be([d[4], d[5]]), model),
            temperature: temperature_from_raw(bytes_to_u16_be([d[6], d[7]])),
        })
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
