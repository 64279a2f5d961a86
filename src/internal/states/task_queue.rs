//! # TaskQueue — 单消费者任务队列
//!
//! 基于 tokio::sync::mpsc 实现的单向消息队列，UI 线程执行器用它接收待执行的任务。
//!
//! ## 特性
//! - 无锁设计（基于 mpsc::unbounded_channel）
//! - 严格 FIFO 顺序
//! - 生产者可以有多个（Clone），消费者只有一个
//! - 维护一个响应式的「待处理数量」，外部可 watch
//! - 仅库内部使用（`pub(crate)`）

use tokio::sync::mpsc;

use super::reactive_core::{PropertyWatcher, ReactiveProperty};

/// 任务队列（生产者端）
///
/// 可以 Clone，多个生产者可以同时往队列推送消息。
#[derive(Debug)]
pub(crate) struct TaskQueue<T: Send + 'static> {
    sender: mpsc::UnboundedSender<T>,
    pending: ReactiveProperty<usize>,
}

impl<T: Send + 'static> Clone for TaskQueue<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            pending: self.pending.clone(),
        }
    }
}

/// 任务队列消费者
///
/// 不可 Clone，只能有一个消费者。
#[derive(Debug)]
pub(crate) struct TaskQueueConsumer<T: Send + 'static> {
    receiver: mpsc::UnboundedReceiver<T>,
    pending: ReactiveProperty<usize>,
}

impl<T> TaskQueue<T>
where
    T: Send + 'static,
{
    /// 创建一个新的任务队列
    ///
    /// 返回 (生产者, 消费者) 元组。
    pub(crate) fn new() -> (Self, TaskQueueConsumer<T>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending = ReactiveProperty::new(0usize);

        let producer = Self {
            sender,
            pending: pending.clone(),
        };

        let consumer = TaskQueueConsumer { receiver, pending };

        (producer, consumer)
    }

    /// 发送消息到队列
    ///
    /// 无锁操作，立即返回。
    /// 如果消费端已关闭，返回 `Err(T)`。
    pub(crate) fn send(&self, value: T) -> Result<(), T> {
        // 先计数再入队，避免消费者先取走导致计数短暂为负
        self.pending.modify_if(|n| {
            *n += 1;
            true
        });
        self.sender.send(value).map_err(|e| {
            self.pending.modify_if(|n| {
                *n = n.saturating_sub(1);
                true
            });
            e.0
        })
    }

    /// 消费端是否已关闭。
    pub(crate) fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// 监听待处理数量。
    pub(crate) fn watch_pending(&self) -> PropertyWatcher<usize> {
        self.pending.watch()
    }
}

impl<T> TaskQueueConsumer<T>
where
    T: Send + 'static,
{
    /// 异步接收下一条消息
    ///
    /// 如果队列为空，会挂起等待。
    /// 如果发送端全部关闭（或已 close 且排空），返回 `None`。
    pub(crate) async fn recv(&mut self) -> Option<T> {
        let value = self.receiver.recv().await;
        if value.is_some() {
            self.mark_taken();
        }
        value
    }

    /// 尝试非阻塞接收消息
    ///
    /// 如果队列为空，立即返回 `None`。
    pub(crate) fn try_recv(&mut self) -> Option<T> {
        match self.receiver.try_recv() {
            Ok(value) => {
                self.mark_taken();
                Some(value)
            }
            Err(_) => None,
        }
    }

    /// 关闭队列：之后的 send 全部失败，已入队的消息仍可被取出。
    pub(crate) fn close(&mut self) {
        self.receiver.close();
    }

    /// 当前待处理数量。
    pub(crate) fn pending(&self) -> usize {
        self.pending.get_current().unwrap_or(0)
    }

    fn mark_taken(&self) {
        self.pending.modify_if(|n| {
            *n = n.saturating_sub(1);
            true
        });
    }
}
