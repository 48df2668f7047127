//! 接收重试
//!
//! 每次尝试都计入 `recv_count`：
//! - 超时：立即返回 `ClientError::NoResponse`，不重试
//! - 错误帧：计入 `recv_error_count`，在 `attempt <= retry_count` 时重试
//! - 数据帧：返回
//!
//! 总尝试次数不超过 `retry_count + 1`。

use crate::{ClientConfig, ClientError, ClientStats};
use robstride_can::{CanAdapter, CanError, RobstrideFrame};
use tracing::{trace, warn};

/// 接收一帧有效应答
pub(crate) fn receive_with_retry<A: CanAdapter + ?Sized>(
    adapter: &mut A,
    config: &ClientConfig,
    stats: &mut ClientStats,
) -> Result<RobstrideFrame, ClientError> {
    let mut attempt: u32 = 1;
    loop {
        stats.recv_count += 1;

        let frame = match adapter.receive_timeout(config.recv_timeout) {
            Ok(frame) => frame,
            Err(CanError::Timeout) => {
                trace!("No reply within {:?}", config.recv_timeout);
                return Err(ClientError::NoResponse);
            },
            Err(e) => return Err(e.into()),
        };

        if !frame.is_error_frame {
            return Ok(frame);
        }

        stats.recv_error_count += 1;
        warn!(
            "Received error frame (attempt {}/{}): {}",
            attempt,
            config.retry_count.saturating_add(1),
            frame
        );

        if attempt > config.retry_count {
            return Err(ClientError::ReceiveExhausted {
                attempts: attempt,
                last_frame: frame,
            });
        }
        attempt += 1;
    }
}
