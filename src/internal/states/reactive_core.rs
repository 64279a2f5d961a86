//! # ReactiveProperty — 响应式属性内核
//!
//! 基于 `tokio::sync::watch` 的共享状态容器，传输控制的进度/结果快照即建立在本模块之上。
//!
//! - `update` / `modify_if`：写入新值并通知所有监听者；
//! - `watch`：得到 [`PropertyWatcher`]，可 `changed()` 监听或 `wait_until()` 条件等待；
//! - 所有持有者都释放后，监听者收到 [`ReactivePropertyError::Destroyed`]。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::watch;
use tokio::sync::watch::error::RecvError;

// ──────────────────────────── Error ────────────────────────────

/// 响应式属性统一错误类型
#[derive(Debug, Error)]
pub enum ReactivePropertyError {
    /// 监听器已被销毁
    #[error("监听器已被销毁")]
    WatcherClosed,

    /// 属性已被销毁
    #[error("属性已被销毁")]
    Destroyed,

    /// watch 通道接收失败
    #[error("接收失败: {0}")]
    RecvError(#[from] RecvError),
}

// ──────────────────────────── Inner ────────────────────────────

/// 内部共享状态，包含值发送器和销毁标志。
#[derive(Debug)]
pub(crate) struct Inner<T> {
    pub(crate) sender: watch::Sender<Option<T>>,
    pub(crate) is_dropped: AtomicBool,
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        self.is_dropped.store(true, Ordering::Relaxed);
        let _ = self.sender.send(None);
    }
}

// ──────────────────────────── ReactiveProperty ────────────────────────────

/// 响应式属性内核：提供 new / update / modify_if / get_current / watch 等基础能力。
#[derive(Clone, Debug)]
pub struct ReactiveProperty<T: Clone + Send + Sync> {
    pub(crate) inner: Arc<Inner<T>>,
}

impl<T> ReactiveProperty<T>
where
    T: Clone + Send + Sync,
{
    /// 创建一个新的响应式属性。
    pub fn new(value: T) -> Self {
        let (sender, _) = watch::channel(Some(value));
        Self {
            inner: Arc::new(Inner {
                sender,
                is_dropped: AtomicBool::new(false),
            }),
        }
    }

    /// 更新属性的值，所有监听者都会收到通知。
    pub fn update(&self, new_value: T) -> Result<&Self, ReactivePropertyError> {
        if self.inner.is_dropped.load(Ordering::Relaxed) {
            return Err(ReactivePropertyError::Destroyed);
        }
        // send_replace 在没有接收端时也会写入
        self.inner.sender.send_replace(Some(new_value));
        Ok(self)
    }

    /// 在持有写锁的情况下检查并修改当前值。
    ///
    /// 闭包返回 `true` 表示确实发生了修改，此时才会通知监听者；
    /// 整个「读-判断-写」过程对其他写者是原子的。
    ///
    /// # 返回值
    /// - `true`: 值被修改并已通知。
    /// - `false`: 闭包未修改，或属性已销毁。
    pub fn modify_if<F>(&self, modify: F) -> bool
    where
        F: FnOnce(&mut T) -> bool,
    {
        self.inner.sender.send_if_modified(|slot| match slot.as_mut() {
            Some(value) => modify(value),
            None => false,
        })
    }

    /// 获取当前属性值的快照（会 clone）。
    pub fn get_current(&self) -> Option<T> {
        self.inner.sender.borrow().as_ref().cloned()
    }

    /// 对当前值应用转换函数。
    ///
    /// 如果属性已销毁，返回 `None` 而不调用转换函数。
    pub fn map<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.sender.borrow().as_ref().map(f)
    }

    /// 创建一个监听器，用于异步监听属性值的变化。
    ///
    /// 新监听器把当前值视为「已读」，只有之后的修改才会唤醒 `changed()`。
    pub fn watch(&self) -> PropertyWatcher<T> {
        PropertyWatcher {
            receiver: self.inner.sender.subscribe(),
        }
    }
}

// ──────────────────────────── PropertyWatcher ────────────────────────────

/// 属性监听器，用于异步接收属性值的变化。
#[derive(Debug)]
pub struct PropertyWatcher<T> {
    receiver: watch::Receiver<Option<T>>,
}

impl<T> PropertyWatcher<T>
where
    T: Clone + Send + Sync,
{
    /// 异步等待属性值的变化，返回新值。
    pub async fn changed(&mut self) -> Result<T, ReactivePropertyError> {
        self.receiver.changed().await?;
        match self.receiver.borrow_and_update().as_ref() {
            None => Err(ReactivePropertyError::WatcherClosed),
            Some(value) => Ok(value.clone()),
        }
    }

    /// 异步等待直到值满足指定条件，返回满足条件时的值。
    ///
    /// 当前值已满足时立即返回；属性销毁时返回 `Destroyed`。
    pub async fn wait_until<F>(&mut self, mut predicate: F) -> Result<T, ReactivePropertyError>
    where
        F: FnMut(&T) -> bool,
    {
        let guard = self
            .receiver
            .wait_for(|slot| match slot {
                None => true,
                Some(value) => predicate(value),
            })
            .await?;
        guard.as_ref().cloned().ok_or(ReactivePropertyError::Destroyed)
    }

    /// 同步获取当前值的克隆，并标记为已读。
    pub fn borrow(&mut self) -> Option<T> {
        self.receiver.borrow_and_update().clone()
    }
}
