//! 延迟重置调度器
//!
//! 唤起钱包 App 后，QR 弹窗在短暂延迟后自动关闭。
//! 这只是 UI 行为：支付记录在调度之前就已提交，取消或触发都不会影响它。

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// 默认延迟 (毫秒)
pub const DEFAULT_RESET_DELAY_MS: u64 = 1000;

/// 已调度回调的句柄
///
/// Drop 不会取消回调；需要取消时显式调用 [`HandoffTicket::cancel`]。
#[derive(Debug)]
pub struct HandoffTicket {
    token: CancellationToken,
    handle: JoinHandle<bool>,
}

impl HandoffTicket {
    /// 取消尚未触发的回调 (已触发则无效果)
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// 等待结束，返回回调是否真正执行
    pub async fn wait(self) -> bool {
        match self.handle.await {
            Ok(fired) => fired,
            Err(e) => {
                tracing::warn!(error = %e, "Handoff reset task failed");
                false
            }
        }
    }
}

/// 在 tokio runtime 上调度延迟回调
#[derive(Debug, Clone)]
pub struct HandoffScheduler {
    delay: Duration,
}

impl Default for HandoffScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_RESET_DELAY_MS))
    }
}

impl HandoffScheduler {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 延迟后执行 `callback`，除非先被取消
    ///
    /// 必须在 tokio runtime 内调用。
    pub fn schedule<F>(&self, callback: F) -> HandoffTicket
    where
        F: FnOnce() + Send + 'static,
    {
        let token = CancellationToken::new();
        let child = token.clone();
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    callback();
                    true
                }
                _ = child.cancelled() => {
                    tracing::debug!("Handoff reset cancelled");
                    false
                }
            }
        });

        HandoffTicket { token, handle }
    }
}
