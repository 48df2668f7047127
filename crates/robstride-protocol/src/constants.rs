//! 协议常量定义
//!
//! 集中定义反馈帧定点数缩放相关的常量，避免在代码中散落"魔法数"。

use std::f64::consts::PI;

/// 16 位无符号定点数满量程
pub const RAW_U16_FULL_SCALE: f64 = 65535.0;

/// 角度量程（弧度）：原始值 0..=65535 映射到 [-4π, 4π]
pub const ANGLE_RANGE_RAD: f64 = 8.0 * PI;

/// 速度量程，电机型号 1
pub const VELOCITY_RANGE_MODEL_1: f64 = 88.0;

/// 速度量程，其他型号
pub const VELOCITY_RANGE_OTHER: f64 = 30.0;

/// 力矩量程，电机型号 1
pub const TORQUE_RANGE_MODEL_1: f64 = 34.0;

/// 力矩量程，其他型号
pub const TORQUE_RANGE_OTHER: f64 = 240.0;

/// 温度缩放：原始值单位 0.1 °C
pub const TEMPERATURE_SCALE: f64 = 10.0;

/// 默认主机 CAN ID
pub const DEFAULT_HOST_CAN_ID: u8 = 0xAA;
