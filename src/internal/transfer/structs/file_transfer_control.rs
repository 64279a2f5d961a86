//! 传输控制（消费者端）
//!
//! 一次进行中的传输对外暴露三路事件与一个取消信号：
//!
//! - **update**：每观察到一次进度变化调用一次回调；允许合并中间值，但值单调不减；
//! - **finish**：传输成功时恰好触发一次；
//! - **error**：传输失败（包括用户取消）时恰好触发一次；
//! - **cancel**：幂等，通知生产者在下一个自然让出点停止。
//!
//! ## 交付顺序
//!
//! finish / error 等待者在交付前会等待所有仍在运行的 update 等待者排空，
//! 因此同一步产生的「最后一次进度」一定先于终态交付，终态之后不会再有 update。
//!
//! ## 使用示例
//! ```rust,no_run
//! use transfer_notify::transfer::FileTransferControl;
//!
//! # async fn example() {
//! let (control, reporter) = FileTransferControl::new();
//!
//! let c = control.clone();
//! tokio::spawn(async move {
//!     c.wait_for_update(|p| println!("{}/{}", p.done, p.total)).await;
//! });
//! let c = control.clone();
//! tokio::spawn(async move {
//!     c.wait_for_finish(|| println!("完成")).await;
//! });
//!
//! reporter.update(500, 1000);
//! reporter.update(1000, 1000);
//! reporter.finish();
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::internal::states::reactive_core::ReactiveProperty;

use super::transfer_error::TransferError;
use super::transfer_progress::TransferProgress;
use super::transfer_reporter::TransferReporter;
use super::transfer_state::{TransferOutcome, TransferShared, TransferState};

/// 传输控制句柄，生产者与展示层共同持有；Clone 只复制引用。
#[derive(Debug, Clone)]
pub struct FileTransferControl {
    pub(crate) shared: Arc<TransferShared>,
}

/// update 等待者的登记凭证：无论正常返回、被丢弃还是回调 panic，都会把计数减回去。
struct UpdateWaiterGuard {
    state: ReactiveProperty<TransferState>,
}

impl Drop for UpdateWaiterGuard {
    fn drop(&mut self) {
        self.state.modify_if(|s| {
            s.update_waiters = s.update_waiters.saturating_sub(1);
            true
        });
    }
}

/// 构造
impl FileTransferControl {
    /// 创建一次传输的控制句柄与生产者端。
    pub fn new() -> (Self, TransferReporter) {
        let shared = TransferShared::new();
        let control = Self {
            shared: Arc::clone(&shared),
        };
        (control, TransferReporter { shared })
    }
}

/// 外部接口：查询与取消
impl FileTransferControl {
    /// 请求取消传输。
    ///
    /// 幂等；传输已结束时是无害的空操作。生产者在下一个让出点（通常是下一块数据之后）才会停止。
    pub fn cancel(&self) {
        if self.shared.cancel.is_cancelled() {
            return;
        }
        if self.is_terminal() {
            tracing::debug!("传输已结束，忽略取消请求");
        }
        self.shared.cancel.cancel();
    }

    /// 是否已经请求过取消。
    pub fn is_cancel_requested(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// 当前进度快照。
    pub fn progress(&self) -> TransferProgress {
        self.shared.snapshot().progress
    }

    /// 当前终态（尚未结束时为 `None`）。
    pub fn outcome(&self) -> Option<TransferOutcome> {
        self.shared.snapshot().outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.shared.state.map(|s| s.outcome.is_some()).unwrap_or(true)
    }
}

/// 事件等待：每个等待方法都应运行在各自独立的任务中
impl FileTransferControl {
    /// 等待进度事件，每观察到新的进度调用一次 `on_update`，传输结束后返回。
    ///
    /// 传输已经结束时直接返回，不会调用回调。
    pub async fn wait_for_update<F>(&self, mut on_update: F)
    where
        F: FnMut(TransferProgress),
    {
        // 登记与「是否已结束」的判断在同一次写操作中完成
        let registered = self.shared.state.modify_if(|s| {
            if s.outcome.is_some() {
                return false;
            }
            s.update_waiters += 1;
            true
        });
        if !registered {
            return;
        }
        let _guard = UpdateWaiterGuard {
            state: self.shared.state.clone(),
        };

        let mut watcher = self.shared.state.watch();
        let mut seen_updates = 0u64;
        let mut current = watcher.borrow();

        while let Some(state) = current {
            if state.updates != seen_updates {
                seen_updates = state.updates;
                on_update(state.progress);
            }
            if state.outcome.is_some() {
                return;
            }
            current = watcher.changed().await.ok();
        }
    }

    /// 等待成功事件：传输成功时调用一次 `on_finish` 并返回 `true`；失败时不调用，返回 `false`。
    pub async fn wait_for_finish<F>(&self, on_finish: F) -> bool
    where
        F: FnOnce(),
    {
        match self.wait_terminal().await {
            TransferOutcome::Finished => {
                on_finish();
                true
            }
            TransferOutcome::Failed(_) => false,
        }
    }

    /// 等待失败事件：传输失败时调用一次 `on_error` 并返回 `true`；成功时不调用，返回 `false`。
    pub async fn wait_for_error<F>(&self, on_error: F) -> bool
    where
        F: FnOnce(TransferError),
    {
        match self.wait_terminal().await {
            TransferOutcome::Finished => false,
            TransferOutcome::Failed(err) => {
                on_error(err);
                true
            }
        }
    }

    /// 等待终态，且保证此时所有 update 等待者都已交付完毕。
    pub async fn wait_terminal(&self) -> TransferOutcome {
        let mut watcher = self.shared.state.watch();
        match watcher
            .wait_until(|s| s.outcome.is_some() && s.update_waiters == 0)
            .await
        {
            Ok(TransferState {
                outcome: Some(outcome),
                ..
            }) => outcome,
            _ => TransferOutcome::Failed(TransferError::ProducerGone),
        }
    }

    /// 带超时地等待终态；超时只影响本次等待，不会改变传输本身。
    pub async fn wait_terminal_timeout(
        &self,
        timeout: Duration,
    ) -> Result<TransferOutcome, TransferError> {
        tokio::time::timeout(timeout, self.wait_terminal())
            .await
            .map_err(|_| TransferError::TimedOut)
    }
}
