use serde::{Deserialize, Serialize};

/// 传输进度：已传输字节数与总字节数。
///
/// 同一次传输内 `done` 单调不减（由 [`TransferReporter`](super::TransferReporter) 保证）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferProgress {
    /// 已传输的字节数
    pub done: u64,
    /// 总字节数，未知时为 0
    pub total: u64,
}

impl TransferProgress {
    pub fn new(done: u64, total: u64) -> Self {
        Self { done, total }
    }

    /// 进度比例（0～1），见 [`progress_ratio`]。
    pub fn ratio(&self) -> f64 {
        progress_ratio(self.done, self.total)
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.done >= self.total
    }
}

/// 计算进度比例：按整百分比截断，结果在 `[0, 1]` 内。
///
/// 总大小为 0（未知或空文件）时返回 `0.0`，不做除法。
pub fn progress_ratio(done: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let done = done.min(total);
    let percent = (done as u128 * 100) / total as u128;
    percent as f64 / 100.0
}
