use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::file_transfer_control::FileTransferControl;
use super::transfer_error::TransferError;
use super::transfer_progress::TransferProgress;
use super::transfer_state::{TransferOutcome, TransferShared};

/// 传输的生产者端：由执行传输的后台任务独占持有，不实现 Clone。
///
/// - `update` 汇报进度，`done` 回退时按上一次的值处理，结束后的汇报被忽略；
/// - `finish` / `fail` 只有第一次生效；
/// - 在每个自然让出点（例如写完一块数据）检查 `is_canceled` 或调用 `fail_if_canceled`；
/// - 未汇报结果就被丢弃时，自动以 [`TransferError::ProducerGone`] 结束。
#[derive(Debug)]
pub struct TransferReporter {
    pub(crate) shared: Arc<TransferShared>,
}

impl TransferReporter {
    /// 汇报进度，返回是否被接受。
    pub fn update(&self, done: u64, total: u64) -> bool {
        self.shared.state.modify_if(|s| {
            if s.outcome.is_some() {
                return false;
            }
            let next = TransferProgress {
                done: done.max(s.progress.done),
                total,
            };
            if s.updates > 0 && next == s.progress {
                return false;
            }
            s.progress = next;
            s.updates += 1;
            true
        })
    }

    /// 以成功结束传输；已经结束时返回 `false`。
    pub fn finish(&self) -> bool {
        self.settle(TransferOutcome::Finished)
    }

    /// 以失败结束传输；已经结束时返回 `false`。
    pub fn fail(&self, err: TransferError) -> bool {
        self.settle(TransferOutcome::Failed(err))
    }

    /// 若消费者已请求取消，则以 [`TransferError::Canceled`] 结束并返回 `true`。
    pub fn fail_if_canceled(&self) -> bool {
        if !self.is_canceled() {
            return false;
        }
        self.fail(TransferError::Canceled);
        true
    }

    pub fn is_canceled(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// 挂起直到消费者请求取消。
    pub async fn cancelled(&self) {
        self.shared.cancel.cancelled().await
    }

    /// 取消令牌的子令牌，供生产者派生的子任务使用。
    pub fn cancel_token(&self) -> CancellationToken {
        self.shared.cancel.child_token()
    }

    /// 与本生产者对应的控制句柄。
    pub fn control(&self) -> FileTransferControl {
        FileTransferControl {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn progress(&self) -> TransferProgress {
        self.shared.snapshot().progress
    }

    fn settle(&self, outcome: TransferOutcome) -> bool {
        self.shared.state.modify_if(move |s| {
            if s.outcome.is_some() {
                return false;
            }
            s.outcome = Some(outcome);
            true
        })
    }
}

impl Drop for TransferReporter {
    fn drop(&mut self) {
        if self.fail(TransferError::ProducerGone) {
            tracing::warn!("传输生产者未汇报结果即退出");
        }
    }
}
