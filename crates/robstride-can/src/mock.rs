//! Mock CAN 适配器
//!
//! 按脚本依次返回应答（数据帧、错误帧、超时），并记录所有已发送的帧。
//! 用于在没有硬件的情况下测试事务逻辑。

use crate::{CanAdapter, CanError, RobstrideFrame};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::trace;

/// 一次 `receive` 调用的脚本结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockReply {
    /// 返回一帧（数据帧或错误帧）
    Frame(RobstrideFrame),
    /// 模拟接收超时
    Timeout,
}

/// Mock CAN 适配器
///
/// 脚本耗尽后的 `receive` 一律按超时处理。
#[derive(Debug, Default)]
pub struct MockCanAdapter {
    replies: VecDeque<MockReply>,
    sent: Vec<RobstrideFrame>,
    receive_calls: usize,
    last_timeout: Option<Duration>,
    closed: bool,
}

impl MockCanAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一帧应答
    pub fn push_frame(&mut self, frame: RobstrideFrame) -> &mut Self {
        self.replies.push_back(MockReply::Frame(frame));
        self
    }

    /// 追加 `count` 个总线错误帧
    pub fn push_error_frames(&mut self, count: usize) -> &mut Self {
        for _ in 0..count {
            self.replies
                .push_back(MockReply::Frame(RobstrideFrame::new_error(0x2000_0004, &[0; 8])));
        }
        self
    }

    /// 追加一次超时
    pub fn push_timeout(&mut self) -> &mut Self {
        self.replies.push_back(MockReply::Timeout);
        self
    }

    /// 已发送的帧（按发送顺序）
    pub fn sent(&self) -> &[RobstrideFrame] {
        &self.sent
    }

    /// `receive` 被调用的次数
    pub fn receive_calls(&self) -> usize {
        self.receive_calls
    }

    /// 最近一次设置的接收超时
    pub fn last_timeout(&self) -> Option<Duration> {
        self.last_timeout
    }

    /// 尚未消费的脚本条目数
    pub fn pending_replies(&self) -> usize {
        self.replies.len()
    }

    /// 模拟总线关闭，之后的 `send` 返回 `CanError::NotStarted`
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl CanAdapter for MockCanAdapter {
    fn send(&mut self, frame: RobstrideFrame) -> Result<(), CanError> {
        if self.closed {
            return Err(CanError::NotStarted);
        }
        trace!("[mock] sent {}", frame);
        self.sent.push(frame);
        Ok(())
    }

    fn receive(&mut self) -> Result<RobstrideFrame, CanError> {
        self.receive_calls += 1;
        match self.replies.pop_front() {
            Some(MockReply::Frame(frame)) => {
                trace!("[mock] received {}", frame);
                Ok(frame)
            },
            Some(MockReply::Timeout) | None => Err(CanError::Timeout),
        }
    }

    fn set_receive_timeout(&mut self, timeout: Duration) {
        self.last_timeout = Some(timeout);
    }
}
