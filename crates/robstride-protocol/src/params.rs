//! 参数表与参数值编码
//!
//! 参数表是编译期常量，名称与 16 位参数 ID 一一对应。
//! `run_mode`（0x7005）的值以单字节传输，其余参数均为小端 f32。

use crate::{ProtocolError, bytes_to_f32_le, f32_to_bytes_le};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// 运行模式参数 ID
pub const PARAM_RUN_MODE: u16 = 0x7005;

/// 参数描述（名称 ↔ ID）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub name: &'static str,
    pub id: u16,
}

const fn param(name: &'static str, id: u16) -> ParamDescriptor {
    ParamDescriptor { name, id }
}

/// 参数表
pub static PARAMS: [ParamDescriptor; 18] = [
    param("run_mode", PARAM_RUN_MODE),
    param("iq_ref", 0x7006),
    param("spd_ref", 0x700A),
    param("limit_torque", 0x700B),
    param("cur_kp", 0x7010),
    param("cur_ki", 0x7011),
    param("cur_fit_gain", 0x7014),
    param("loc_ref", 0x7016),
    param("limit_spd", 0x7017),
    param("limit_cur", 0x7018),
    param("mechpos", 0x7019),
    param("iqf", 0x701A),
    param("mechvel", 0x701B),
    param("vbus", 0x701C),
    param("loc_kp", 0x701E),
    param("spd_kp", 0x701F),
    param("spd_ki", 0x7020),
    param("spd_filt_gain", 0x7021),
];

/// 按名称查找参数 ID
pub fn lookup_by_name(name: &str) -> Result<u16, ProtocolError> {
    PARAMS
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.id)
        .ok_or_else(|| ProtocolError::UnknownParameter(name.to_string()))
}

/// 按 ID 反查参数名
pub fn name_of(id: u16) -> Option<&'static str> {
    PARAMS.iter().find(|p| p.id == id).map(|p| p.name)
}

/// 参数引用：直接给出 ID，或给出参数名
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamRef<'a> {
    Id(u16),
    Name(&'a str),
}

impl From<u16> for ParamRef<'_> {
    fn from(id: u16) -> Self {
        ParamRef::Id(id)
    }
}

impl<'a> From<&'a str> for ParamRef<'a> {
    fn from(name: &'a str) -> Self {
        ParamRef::Name(name)
    }
}

impl<'a> From<&'a String> for ParamRef<'a> {
    fn from(name: &'a String) -> Self {
        ParamRef::Name(name.as_str())
    }
}

/// 归一化参数引用为参数 ID
///
/// ID 原样返回（不要求在参数表中），名称通过参数表解析。
pub fn normalize<'a>(param: impl Into<ParamRef<'a>>) -> Result<u16, ProtocolError> {
    match param.into() {
        ParamRef::Id(id) => Ok(id),
        ParamRef::Name(name) => lookup_by_name(name),
    }
}

/// 运行模式（参数 `run_mode` 的取值）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[num_enum(error_type(name = ProtocolError, constructor = ProtocolError::invalid_run_mode))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum RunMode {
    /// 运控模式
    Operation = 0,
    /// 位置模式
    Position = 1,
    /// 速度模式
    Speed = 2,
    /// 电流模式
    Current = 3,
}

/// 参数值
///
/// JSON 中不带标签：浮点参数为数字，`run_mode` 为模式名（`Raw` 为整数）。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamValue {
    Float(f32),
    Mode(RunMode),
    /// `run_mode` 的原始字节，不校验取值
    Raw(u8),
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Float(value)
    }
}

impl From<RunMode> for ParamValue {
    fn from(mode: RunMode) -> Self {
        ParamValue::Mode(mode)
    }
}

impl From<u8> for ParamValue {
    fn from(raw: u8) -> Self {
        ParamValue::Raw(raw)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Mode(m) => write!(f, "{:?}", m),
            ParamValue::Raw(raw) => write!(f, "{}", raw),
        }
    }
}

impl ParamValue {
    /// 编码为参数帧 Byte 4-7
    pub fn encode(self, param_id: u16) -> Result<[u8; 4], ProtocolError> {
        match (param_id == PARAM_RUN_MODE, self) {
            (true, ParamValue::Mode(mode)) => Ok([mode.into(), 0, 0, 0]),
            (true, ParamValue::Raw(raw)) => Ok([raw, 0, 0, 0]),
            (false, ParamValue::Float(value)) => Ok(f32_to_bytes_le(value)),
            (true, ParamValue::Float(_)) => Err(ProtocolError::InvalidParamValue {
                param_id,
                reason: "run_mode expects a RunMode value",
            }),
            (false, ParamValue::Mode(_) | ParamValue::Raw(_)) => Err(ProtocolError::InvalidParamValue {
                param_id,
                reason: "expected a float value",
            }),
        }
    }

    /// 从参数帧 Byte 4-7 解码
    pub fn decode(param_id: u16, bytes: [u8; 4]) -> Result<Self, ProtocolError> {
        if param_id == PARAM_RUN_MODE {
            Ok(ParamValue::Mode(RunMode::try_from(bytes[0])?))
        } else {
            Ok(ParamValue::Float(bytes_to_f32_le(bytes)))
        }
    }

    pub fn as_mode(&self) -> Option<RunMode> {
        match self {
            ParamValue::Mode(m) => Some(*m),
            ParamValue::Raw(raw) => RunMode::try_from(*raw).ok(),
            ParamValue::Float(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_table() {
        assert_eq!(PARAMS.len(), 18);
        assert_eq!(lookup_by_name("run_mode").unwrap(), 0x7005);
        assert_eq!(lookup_by_name("loc_ref").unwrap(), 0x7016);
        assert_eq!(lookup_by_name("mechvel").unwrap(), 0x701B);
        assert_eq!(lookup_by_name("spd_filt_gain").unwrap(), 0x7021);
    }

    #[test]
    fn test_param_table_unique() {
        for (i, a) in PARAMS.iter().enumerate() {
            for b in &PARAMS[i + 1..] {
                assert_ne!(a.name, b.name);
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_lookup_unknown() {
        assert_eq!(
            lookup_by_name("nonexistent"),
            Err(ProtocolError::UnknownParameter("nonexistent".to_string()))
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("run_mode").unwrap(), 0x7005);
        assert_eq!(normalize("mechvel").unwrap(), 0x701B);
        assert_eq!(normalize(0x7019u16).unwrap(), 0x7019);
        // ID 不做表内校验
        assert_eq!(normalize(0x1234u16).unwrap(), 0x1234);
        assert!(matches!(
            normalize("nonexistent"),
            Err(ProtocolError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_name_of() {
        assert_eq!(name_of(0x701C), Some("vbus"));
        assert_eq!(name_of(0x0000), None);
    }

    #[test]
    fn test_run_mode_values() {
        assert_eq!(RunMode::try_from(0).unwrap(), RunMode::Operation);
        assert_eq!(RunMode::try_from(3).unwrap(), RunMode::Current);
        assert_eq!(
            RunMode::try_from(4),
            Err(ProtocolError::InvalidValue {
                field: "RunMode".to_string(),
                value: 4
            })
        );
    }

    #[test]
    fn test_encode_run_mode_is_raw_byte() {
        let bytes = ParamValue::Mode(RunMode::Speed).encode(PARAM_RUN_MODE).unwrap();
        assert_eq!(bytes, [2, 0, 0, 0]);
        assert_ne!(bytes, 2.0f32.to_le_bytes());
    }

    #[test]
    fn test_encode_float() {
        let bytes = ParamValue::Float(1.5).encode(0x7016).unwrap();
        assert_eq!(bytes, 1.5f32.to_le_bytes());
    }

    #[test]
    fn test_encode_kind_mismatch() {
        assert!(matches!(
            ParamValue::Float(2.0).encode(PARAM_RUN_MODE),
            Err(ProtocolError::InvalidParamValue { param_id: 0x7005, .. })
        ));
        assert!(matches!(
            ParamValue::Mode(RunMode::Position).encode(0x7016),
            Err(ProtocolError::InvalidParamValue { param_id: 0x7016, .. })
        ));
    }

    #[test]
    fn test_decode() {
        assert_eq!(
            ParamValue::decode(PARAM_RUN_MODE, [1, 0xFF, 0xFF, 0xFF]).unwrap(),
            ParamValue::Mode(RunMode::Position)
        );
        assert_eq!(
            ParamValue::decode(0x701C, 24.0f32.to_le_bytes()).unwrap(),
            ParamValue::Float(24.0)
        );
        assert!(ParamValue::decode(PARAM_RUN_MODE, [9, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ParamValue::Float(0.5).to_string(), "0.5");
        assert_eq!(ParamValue::Mode(RunMode::Speed).to_string(), "Speed");
    }

    #[test]
    fn test_encode_raw_run_mode() {
        assert_eq!(ParamValue::from(2u8).encode(PARAM_RUN_MODE).unwrap(), [2, 0, 0, 0]);
        assert_eq!(ParamValue::Raw(7).encode(PARAM_RUN_MODE).unwrap(), [7, 0, 0, 0]);
        assert!(matches!(
            ParamValue::Raw(2).encode(0x7016),
            Err(ProtocolError::InvalidParamValue { param_id: 0x7016, .. })
        ));
        assert_eq!(ParamValue::Raw(2).as_mode(), Some(RunMode::Speed));
        assert_eq!(ParamValue::Raw(7).as_mode(), None);
        assert_eq!(ParamValue::Raw(3).to_string(), "3");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_param_value_json_untagged() {
        assert_eq!(
            serde_json::to_value(ParamValue::Float(1.5)).unwrap(),
            serde_json::json!(1.5)
        );
        assert_eq!(
            serde_json::to_value(ParamValue::Mode(RunMode::Speed)).unwrap(),
            serde_json::json!("Speed")
        );
        assert_eq!(
            serde_json::to_value(ParamValue::Raw(2)).unwrap(),
            serde_json::json!(2)
        );
    }
}
