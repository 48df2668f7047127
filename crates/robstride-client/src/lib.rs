//! # RobStride Client
//!
//! RobStride 关节电机的同步事务客户端。
//!
//! 每个操作发送一帧指令并阻塞等待一帧应答：
//!
//! - 收到总线错误帧时按 [`ClientConfig::retry_count`] 重试
//! - 接收超时不重试，直接返回 [`ClientError::NoResponse`]
//! - 应答的消息类型、主机 ID、电机 ID 必须与请求一致
//!
//! 协议编解码见 `robstride-protocol`，CAN 收发见 `robstride-can`。

mod client;
mod config;
mod error;
mod recv;
mod stats;

pub use client::Client;
pub use config::ClientConfig;
pub use error::ClientError;
pub use stats::ClientStats;

// 重新导出常用的协议类型
pub use robstride_protocol::{FeedbackResp, MotorError, MotorMode, MotorModel, ParamValue, RunMode};
