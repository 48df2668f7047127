//! 参数读写命令

use super::{connect, log_stats, parse_u8};
use crate::config::Settings;
use crate::output::{print_feedback, print_json};
use anyhow::{Context, Result};
use clap::Args;
use robstride_client::{MotorModel, ParamValue, RunMode};
use robstride_protocol::{PARAM_RUN_MODE, PARAMS, lookup_by_name, name_of};

/// 解析参数：参数名，或 `0x` 开头的参数 ID
pub fn resolve_param(param: &str) -> Result<u16> {
    if let Some(hex) = param.strip_prefix("0x").or_else(|| param.strip_prefix("0X")) {
        return u16::from_str_radix(hex, 16)
            .with_context(|| format!("无效的参数 ID: {}", param));
    }
    Ok(lookup_by_name(param)?)
}

/// 命令行中的浮点值转换为参数值
///
/// `run_mode` 需要 0-3 的整数，其余参数直接作为 f32。
pub fn param_value(param_id: u16, raw: f32) -> Result<ParamValue> {
    if param_id != PARAM_RUN_MODE {
        return Ok(ParamValue::Float(raw));
    }

    if raw.fract() != 0.0 || !(0.0..=3.0).contains(&raw) {
        anyhow::bail!(
            "run_mode expects an integer 0-3 (0=operation, 1=position, 2=speed, 3=current), got {}",
            raw
        );
    }
    Ok(ParamValue::Mode(RunMode::try_from(raw as u8)?))
}

fn display_name(param_id: u16) -> String {
    name_of(param_id)
        .map(str::to_string)
        .unwrap_or_else(|| format!("0x{:04X}", param_id))
}

/// `read --json` 的输出：浮点值为数字，运行模式为名称
fn read_json(motor_id: u8, param_id: u16, value: ParamValue) -> serde_json::Value {
    serde_json::json!({
        "motor_id": motor_id,
        "param": display_name(param_id),
        "param_id": param_id,
        "value": value,
    })
}

/// 读参数命令参数
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ReadArgs {
    /// 电机 CAN ID
    #[arg(value_parser = parse_u8)]
    pub motor_id: u8,

    /// 参数名（如 mechvel）或参数 ID（如 0x701B）
    pub param_name: String,
}

impl ReadArgs {
    pub fn execute(&self, settings: &Settings, json: bool) -> Result<()> {
        let param_id = resolve_param(&self.param_name)?;

        let mut client = connect(settings)?;
        let value = client
            .read_param(self.motor_id, param_id)
            .with_context(|| format!("读取参数 {} 失败", self.param_name))?;
        log_stats(&client);

        if json {
            print_json(&read_json(self.motor_id, param_id, value))
        } else {
            println!("{} = {}", display_name(param_id), value);
            Ok(())
        }
    }
}

/// 写参数命令参数
#[derive(Args, Debug, Clone, PartialEq)]
pub struct WriteArgs {
    /// 电机 CAN ID
    #[arg(value_parser = parse_u8)]
    pub motor_id: u8,

    /// 参数名（如 run_mode）或参数 ID
    pub param_name: String,

    /// 参数值（run_mode 为 0-3 的整数）
    #[arg(allow_negative_numbers = true)]
    pub param_value: f32,

    /// 电机型号（用于换算应答中的反馈）
    #[arg(long, default_value_t = 1)]
    pub model: u8,
}

impl WriteArgs {
    pub fn execute(&self, settings: &Settings, json: bool) -> Result<()> {
        let param_id = resolve_param(&self.param_name)?;
        let value = param_value(param_id, self.param_value)?;

        let mut client = connect(settings)?;
        let feedback = client
            .write_param_with_model(self.motor_id, param_id, value, MotorModel(self.model))
            .with_context(|| format!("写入参数 {} 失败", self.param_name))?;
        log_stats(&client);
        print_feedback(&feedback, json)
    }
}

/// 列出参数表
pub fn list_params(json: bool) -> Result<()> {
    if json {
        let table: Vec<_> = PARAMS
            .iter()
            .map(|p| serde_json::json!({ "name": p.name, "id": p.id }))
            .collect();
        return print_json(&table);
    }

    for p in PARAMS.iter() {
        println!("{:<16} 0x{:04X}", p.name, p.id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_param() {
        assert_eq!(resolve_param("run_mode").unwrap(), 0x7005);
        assert_eq!(resolve_param("mechvel").unwrap(), 0x701B);
        assert_eq!(resolve_param("0x7016").unwrap(), 0x7016);
        assert!(resolve_param("nonexistent").is_err());
        assert!(resolve_param("0xZZ").is_err());
    }

    #[test]
    fn test_param_value_float() {
        assert_eq!(param_value(0x7016, -1.5).unwrap(), ParamValue::Float(-1.5));
    }

    #[test]
    fn test_param_value_run_mode() {
        assert_eq!(
            param_value(PARAM_RUN_MODE, 2.0).unwrap(),
            ParamValue::Mode(RunMode::Speed)
        );
        assert!(param_value(PARAM_RUN_MODE, 2.5).is_err());
        assert!(param_value(PARAM_RUN_MODE, 4.0).is_err());
        assert!(param_value(PARAM_RUN_MODE, -1.0).is_err());
    }

    #[test]
    fn test_read_json_value_shape() {
        let json = read_json(0x7F, 0x701B, ParamValue::Float(1.5));
        assert_eq!(json["param"], "mechvel");
        assert_eq!(json["param_id"], 0x701B);
        assert_eq!(json["value"], 1.5);

        let json = read_json(0x7F, PARAM_RUN_MODE, ParamValue::Mode(RunMode::Speed));
        assert_eq!(json["value"], "Speed");

        let json = read_json(0x7F, PARAM_RUN_MODE, ParamValue::Raw(9));
        assert_eq!(json["value"], 9);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(0x701B), "mechvel");
        assert_eq!(display_name(0x7FFF), "0x7FFF");
    }
}
