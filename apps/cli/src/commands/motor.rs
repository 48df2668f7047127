//! 使能 / 失能 / 修改 ID 命令

use super::{connect, log_stats, parse_u8};
use crate::config::Settings;
use crate::output::{print_feedback, print_json};
use anyhow::{Context, Result};
use clap::Args;
use robstride_client::MotorModel;

/// 单电机命令参数
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct MotorArgs {
    /// 电机 CAN ID（如 127 或 0x7F）
    #[arg(value_parser = parse_u8)]
    pub motor_id: u8,

    /// 电机型号（1 与其他型号的速度/力矩量程不同）
    #[arg(long, default_value_t = 1)]
    pub model: u8,
}

impl MotorArgs {
    pub fn enable(&self, settings: &Settings, json: bool) -> Result<()> {
        let mut client = connect(settings)?;
        let feedback = client
            .enable_with_model(self.motor_id, MotorModel(self.model))
            .with_context(|| format!("使能电机 {} 失败", self.motor_id))?;
        log_stats(&client);
        print_feedback(&feedback, json)
    }

    pub fn disable(&self, settings: &Settings, json: bool) -> Result<()> {
        let mut client = connect(settings)?;
        let feedback = client
            .disable_with_model(self.motor_id, MotorModel(self.model))
            .with_context(|| format!("失能电机 {} 失败", self.motor_id))?;
        log_stats(&client);
        print_feedback(&feedback, json)
    }
}

/// 修改电机 ID 命令参数
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct UpdateIdArgs {
    /// 当前电机 CAN ID
    #[arg(value_parser = parse_u8)]
    pub motor_id: u8,

    /// 新的电机 CAN ID
    #[arg(value_parser = parse_u8)]
    pub new_motor_id: u8,
}

impl UpdateIdArgs {
    pub fn execute(&self, settings: &Settings, json: bool) -> Result<()> {
        let mut client = connect(settings)?;
        client
            .update_id(self.motor_id, self.new_motor_id)
            .with_context(|| format!("修改电机 {} 的 ID 失败", self.motor_id))?;
        log_stats(&client);

        if json {
            print_json(&serde_json::json!({
                "motor_id": self.motor_id,
                "new_motor_id": self.new_motor_id,
            }))
        } else {
            println!("✅ 电机 ID 已修改: {} -> {}", self.motor_id, self.new_motor_id);
            Ok(())
        }
    }
}
