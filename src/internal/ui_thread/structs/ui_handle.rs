use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::internal::states::reactive_core::PropertyWatcher;
use crate::internal::states::task_queue::TaskQueue;

use super::UiTask;
use super::ui_error::UiError;

/// UI 执行器的投递端：后台任务只能通过它修改展示状态。
///
/// 可以自由 Clone 并跨线程传递；所有句柄都释放后执行器的 `run` 会自然结束。
pub struct UiHandle<S: 'static> {
    pub(crate) queue: TaskQueue<UiTask<S>>,
    pub(crate) shutdown: CancellationToken,
}

impl<S: 'static> Clone for UiHandle<S> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<S: 'static> std::fmt::Debug for UiHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiHandle")
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl<S: 'static> UiHandle<S> {
    /// 投递一个任务到 UI 线程，立即返回，不等待执行。
    ///
    /// 同一个句柄（及其克隆）投递的任务按 FIFO 顺序执行。
    pub fn post<F>(&self, task: F) -> Result<(), UiError>
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        if self.shutdown.is_cancelled() {
            return Err(UiError::Closed);
        }
        self.queue
            .send(Box::new(task))
            .map_err(|_| UiError::Closed)
    }

    /// 投递任务并等待其在 UI 线程上的返回值。
    ///
    /// 只能在后台任务中调用；在 UI 任务内部 await 会让执行器等待自己。
    pub async fn call<F, R>(&self, task: F) -> Result<R, UiError>
    where
        F: FnOnce(&mut S) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.post(move |state| {
            let _ = tx.send(task(state));
        })?;
        rx.await.map_err(|_| UiError::TaskDropped)
    }

    /// 请求执行器停止；之后的投递全部失败，排队中的任务不再执行。
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// 执行器是否已停止接收任务。
    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled() || self.queue.is_closed()
    }

    /// 监听排队中的任务数量。
    pub fn watch_pending(&self) -> PropertyWatcher<usize> {
        self.queue.watch_pending()
    }
}
