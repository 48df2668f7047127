//! 应答帧校验
//!
//! 每个事务在解释数据字节之前，都先校验应答的消息类型、主机 CAN ID 和电机 ID。

use crate::can::RobstrideFrame;
use crate::{
    ArbitrationId, IdField, MessageType, ParamValue, ProtocolError, bytes_to_u16_le,
};

/// 校验应答仲裁 ID
///
/// 依次比较消息类型、主机 CAN ID（byte 0）、电机 ID（byte 1），
/// 第一个不一致的字段以 `ProtocolError::Mismatch` 返回。
pub fn validate_response(
    frame: &RobstrideFrame,
    expected_type: MessageType,
    expected_motor_id: u8,
    host_can_id: u8,
) -> Result<ArbitrationId, ProtocolError> {
    let id = frame.arbitration_id();

    let checks = [
        (IdField::MessageType, u8::from(expected_type), id.message_type),
        (IdField::HostId, host_can_id, id.host_id),
        (IdField::MotorId, expected_motor_id, id.motor_id),
    ];
    for (field, expected, actual) in checks {
        if expected != actual {
            return Err(ProtocolError::Mismatch {
                field,
                expected,
                actual,
            });
        }
    }

    Ok(id)
}

/// 单个参数读取应答
///
/// - Byte 0-1: 回显的参数 ID（小端）
/// - Byte 2-3: 保留
/// - Byte 4-7: 参数值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadParamResponse {
    pub param_id: u16,
    pub value: ParamValue,
}

impl ReadParamResponse {
    /// 解析读参数应答，并校验回显的参数 ID
    ///
    /// # 错误
    /// - `ProtocolError::InvalidLength`: 数据不足 8 字节
    /// - `ProtocolError::ParamMismatch`: 回显 ID 与请求不符
    /// - `ProtocolError::InvalidValue`: `run_mode` 取值未知
    pub fn parse(frame: &RobstrideFrame, expected_param_id: u16) -> Result<Self, ProtocolError> {
        frame.ensure_full_payload()?;

        let d = &frame.data;
        let param_id = bytes_to_u16_le([d[0], d[1]]);
        if param_id != expected_param_id {
            return Err(ProtocolError::ParamMismatch {
                expected: expected_param_id,
                actual: param_id,
            });
        }

        let value = ParamValue::decode(param_id, [d[4], d[5], d[6], d[7]])?;
        Ok(Self { param_id, value })
    }
}
