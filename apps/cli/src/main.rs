//! # RobStride CLI
//!
//! RobStride 关节电机命令行工具（SocketCAN）。
//!
//! ```bash
//! # 使能 / 失能
//! robstride --interface can0 enable 127
//! robstride disable 0x7F
//!
//! # 参数读写
//! robstride read 127 mechvel
//! robstride write 127 run_mode 2
//! robstride write 127 spd_ref -1.5
//!
//! # 修改电机 ID
//! robstride update_id 1 5
//!
//! # 参数表（不需要连接总线）
//! robstride params
//! ```
//!
//! 日志级别通过 `RUST_LOG` 控制，如 `RUST_LOG=robstride=debug`。

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod output;

use commands::{MotorArgs, ReadArgs, UpdateIdArgs, WriteArgs, parse_u8};
use config::{CliConfig, Overrides, Settings};

/// RobStride CLI - 关节电机命令行工具
#[derive(Parser, Debug)]
#[command(name = "robstride")]
#[command(about = "Command-line interface for RobStride joint motors", long_about = None)]
#[command(version)]
struct Cli {
    /// SocketCAN 接口（默认 can0）
    #[arg(short, long, global = true)]
    interface: Option<String>,

    /// 主机 CAN ID（默认 0xAA）
    #[arg(long, global = true, value_parser = parse_u8)]
    host_id: Option<u8>,

    /// 收到错误帧后的重试次数（默认 2）
    #[arg(long, global = true)]
    retry_count: Option<u32>,

    /// 接收超时，毫秒（默认 2000）
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// 配置文件路径（默认 <config_dir>/robstride/config.toml）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 以 JSON 输出结果
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            interface: self.interface.clone(),
            host_id: self.host_id,
            retry_count: self.retry_count,
            timeout_ms: self.timeout_ms,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 使能电机
    Enable(MotorArgs),

    /// 失能电机
    Disable(MotorArgs),

    /// 修改电机 CAN ID
    #[command(name = "update_id", alias = "update-id")]
    UpdateId(UpdateIdArgs),

    /// 读取参数
    Read(ReadArgs),

    /// 写入参数
    Write(WriteArgs),

    /// 列出参数表
    Params,
}

/// 未设置 `RUST_LOG` 时的日志过滤
const DEFAULT_LOG_FILTER: &str = "robstride=info";

/// 构造日志过滤器：`RUST_LOG` 非空且合法时完全采用，否则退回默认值
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn main() -> Result<()> {
    // 日志输出到 stderr，stdout 只输出结果
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(rust_log.as_deref()))
        .init();

    let cli = Cli::parse();

    if let Commands::Params = cli.command {
        return commands::param::list_params(cli.json);
    }

    let file = CliConfig::load(cli.config.as_deref())?;
    let settings = Settings::resolve(file, cli.overrides());

    match &cli.command {
        Commands::Enable(args) => args.enable(&settings, cli.json),
        Commands::Disable(args) => args.disable(&settings, cli.json),
        Commands::UpdateId(args) => args.execute(&settings, cli.json),
        Commands::Read(args) => args.execute(&settings, cli.json),
        Commands::Write(args) => args.execute(&settings, cli.json),
        Commands::Params => commands::param::list_params(cli.json),
    }
}
