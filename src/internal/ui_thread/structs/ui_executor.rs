use std::panic::{AssertUnwindSafe, catch_unwind};

use tokio_util::sync::CancellationToken;

use crate::internal::states::task_queue::{TaskQueue, TaskQueueConsumer};

use super::UiTask;
use super::ui_handle::UiHandle;

/// UI 线程执行器：独占展示状态 `S`，逐个执行投递来的任务。
///
/// 展示状态只能在这里被修改，后台任务拿到的只有 [`UiHandle`]。
/// 执行器本身从不等待后台任务。
pub struct UiExecutor<S: 'static> {
    state: S,
    consumer: TaskQueueConsumer<UiTask<S>>,
    shutdown: CancellationToken,
}

impl<S: 'static> UiExecutor<S> {
    /// 创建执行器及其第一个投递句柄。
    pub fn new(state: S) -> (Self, UiHandle<S>) {
        let (queue, consumer) = TaskQueue::new();
        let shutdown = CancellationToken::new();

        let executor = Self {
            state,
            consumer,
            shutdown: shutdown.clone(),
        };
        let handle = UiHandle { queue, shutdown };

        (executor, handle)
    }

    /// 运行执行器，直到所有句柄释放或收到停止请求，返回展示状态。
    pub async fn run(mut self) -> S {
        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    tracing::debug!("UI 执行器收到停止请求");
                    break;
                }

                task = self.consumer.recv() => {
                    match task {
                        Some(task) => self.execute(task),
                        None => break, // 所有句柄已释放
                    }
                }
            }
        }

        self.consumer.close();
        let dropped = self.drop_pending();
        if dropped > 0 {
            tracing::debug!("UI 执行器停止，丢弃 {} 个未执行任务", dropped);
        }
        self.state
    }

    /// 同步执行当前已排队的全部任务（包括执行过程中新投递的），返回执行数量。
    ///
    /// 用于嵌入外部事件循环的空闲回调。
    pub fn run_pending(&mut self) -> usize {
        let mut executed = 0;
        while !self.shutdown.is_cancelled() {
            match self.consumer.try_recv() {
                Some(task) => {
                    self.execute(task);
                    executed += 1;
                }
                None => break,
            }
        }
        executed
    }

    /// 排队中的任务数量。
    pub fn pending(&self) -> usize {
        self.consumer.pending()
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    fn execute(&mut self, task: UiTask<S>) {
        let state = &mut self.state;
        if catch_unwind(AssertUnwindSafe(|| task(state))).is_err() {
            tracing::error!("UI 任务执行时 panic，已忽略并继续运行");
        }
    }

    fn drop_pending(&mut self) -> usize {
        let mut dropped = 0;
        while self.consumer.try_recv().is_some() {
            dropped += 1;
        }
        dropped
    }
}
