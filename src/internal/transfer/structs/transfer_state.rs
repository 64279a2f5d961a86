use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::internal::states::reactive_core::ReactiveProperty;

use super::transfer_error::TransferError;
use super::transfer_progress::TransferProgress;

/// 传输的终态。每次传输最多出现一次。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Finished,
    Failed(TransferError),
}

impl TransferOutcome {
    pub fn is_finished(&self) -> bool {
        matches!(self, TransferOutcome::Finished)
    }

    pub fn error(&self) -> Option<&TransferError> {
        match self {
            TransferOutcome::Finished => None,
            TransferOutcome::Failed(err) => Some(err),
        }
    }
}

/// 一次传输的完整快照：进度与终态放在同一个值里，同一步写入的「最后进度 + 终态」会被一起观察到。
#[derive(Debug, Clone, Default)]
pub(crate) struct TransferState {
    pub(crate) progress: TransferProgress,
    /// 已接受的进度汇报次数，update 等待者据此判断是否有新进度
    pub(crate) updates: u64,
    pub(crate) outcome: Option<TransferOutcome>,
    /// 尚未排空的 update 等待者数量；终态事件要等它归零才交付
    pub(crate) update_waiters: usize,
}

/// 生产者与消费者共享的传输内部状态。
#[derive(Debug)]
pub(crate) struct TransferShared {
    pub(crate) state: ReactiveProperty<TransferState>,
    pub(crate) cancel: CancellationToken,
}

impl TransferShared {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            state: ReactiveProperty::new(TransferState::default()),
            cancel: CancellationToken::new(),
        })
    }

    pub(crate) fn snapshot(&self) -> TransferState {
        self.state.get_current().unwrap_or_default()
    }
}
