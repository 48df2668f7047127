//! 结果输出（文本或 JSON）

use anyhow::Result;
use robstride_client::FeedbackResp;
use serde::Serialize;

/// 以 JSON 输出到 stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 文本格式的反馈
pub fn format_feedback(feedback: &FeedbackResp) -> String {
    let faults = if feedback.has_errors() {
        feedback
            .errors
            .iter()
            .map(|e| format!("{:?}", e))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        "none".to_string()
    };

    format!(
        "motor {}: mode={:?} angle={:.4} rad velocity={:.4} rad/s torque={:.4} Nm temperature={:.1} °C faults={}",
        feedback.motor_id,
        feedback.mode,
        feedback.angle,
        feedback.velocity,
        feedback.torque,
        feedback.temperature,
        faults
    )
}

pub fn print_feedback(feedback: &FeedbackResp, json: bool) -> Result<()> {
    if json {
        print_json(feedback)
    } else {
        println!("{}", format_feedback(feedback));
        Ok(())
    }
}
