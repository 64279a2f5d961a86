use std::time::Duration;

use futures_util::future::join_all;
use tokio::task::JoinHandle;

use crate::internal::presentation::structs::NotificationId;
use crate::internal::transfer::structs::{FileTransferControl, TransferError, TransferOutcome};

/// 一次传输的三个监听任务。
///
/// 丢弃本结构不会停止监听任务，它们在传输结束后自然退出。
#[derive(Debug)]
pub struct TransferListeners {
    pub id: NotificationId,
    pub control: FileTransferControl,
    pub(crate) update: JoinHandle<()>,
    pub(crate) finish: JoinHandle<()>,
    pub(crate) error: JoinHandle<()>,
}

impl TransferListeners {
    /// 等待三个监听任务全部退出。
    pub async fn join(self) {
        for result in join_all([self.update, self.finish, self.error]).await {
            if let Err(e) = result {
                tracing::error!("传输监听任务异常退出: {}", e);
            }
        }
    }

    /// 等待传输的终态，再等三个监听任务把它交付完毕。
    ///
    /// `timeout` 只限制等待终态的时间（通常取自
    /// [`TransferConfig::terminal_timeout`](crate::config::TransferConfig::terminal_timeout)）。
    /// 超时返回 [`TransferError::TimedOut`]，传输与监听任务都照常继续。
    pub async fn wait_outcome(
        self,
        timeout: Option<Duration>,
    ) -> Result<TransferOutcome, TransferError> {
        let outcome = match timeout {
            Some(timeout) => self.control.wait_terminal_timeout(timeout).await?,
            None => self.control.wait_terminal().await,
        };
        self.join().await;
        Ok(outcome)
    }

    /// 三个任务是否都已退出。
    pub fn is_finished(&self) -> bool {
        self.update.is_finished() && self.finish.is_finished() && self.error.is_finished()
    }
}
