//! # ConnectionEventObserver
//!
//! 每个账号一个的连接事件广播器，状态机：
//!
//! ```text
//! Uninitialized ──observe──▶ Active ──destroy──▶ Closed
//! ```
//!
//! - 第一次 `observe_connection_events` 时创建订阅通道、交给会话并启动广播任务；
//! - 广播任务收到 Connecting / Connected / Disconnected 后，在读锁下取回调快照，
//!   投递一个 UI 任务按登记顺序依次调用；
//! - `destroy` 在写锁下退订、停止广播任务、清空回调并进入 Closed，之后不可复用；
//! - 只有 `destroy` 会关闭订阅，广播任务从不关闭它。
//!
//! 每个回调只会收到登记之后才由会话发出的事件。

use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::internal::session::structs::{Subscription, SubscriptionHandle, subscription_channel};
use crate::internal::session::traits::Session;
use crate::internal::ui_thread::structs::{UiError, UiHandle};

use super::observer_error::ObserverError;

type Handler<S> = Arc<dyn Fn(&mut S) + Send + Sync + 'static>;

struct HandlerEntry<S> {
    /// 登记时订阅通道已送出的事件序号，只有更晚的事件会调用本回调
    since: u64,
    handler: Handler<S>,
}

enum ObserverPhase {
    Uninitialized,
    Active {
        subscription: SubscriptionHandle,
        stop: CancellationToken,
    },
    Closed,
}

struct ObserverInner<S> {
    phase: ObserverPhase,
    handlers: Vec<HandlerEntry<S>>,
}

impl<S> ObserverInner<S> {
    fn is_closed(&self) -> bool {
        matches!(self.phase, ObserverPhase::Closed)
    }
}

type SharedInner<S> = Arc<RwLock<ObserverInner<S>>>;

/// 账号级的连接事件观察者。
pub struct ConnectionEventObserver<S: 'static> {
    session: Arc<dyn Session>,
    ui: UiHandle<S>,
    inner: SharedInner<S>,
    routine: Mutex<Option<JoinHandle<()>>>,
    runtime: Option<Handle>,
}

impl<S: 'static> std::fmt::Debug for ConnectionEventObserver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionEventObserver")
            .field("account", &self.session.account_id())
            .field("active", &self.is_active())
            .field("closed", &self.is_closed())
            .field("handlers", &self.handler_count())
            .finish()
    }
}

impl<S: 'static> ConnectionEventObserver<S> {
    /// 创建观察者；此时不会订阅会话。
    ///
    /// 在 tokio 运行时内创建时记住该运行时，之后即使从运行时之外
    /// （例如 [`UiExecutor::run_pending`](crate::ui_thread::UiExecutor::run_pending)）
    /// 登记回调，广播任务也会在这里启动。
    pub fn new(session: Arc<dyn Session>, ui: UiHandle<S>) -> Self {
        Self::build(session, ui, Handle::try_current().ok())
    }

    /// 创建观察者，广播任务固定在 `runtime` 上运行。
    pub fn with_runtime(session: Arc<dyn Session>, ui: UiHandle<S>, runtime: Handle) -> Self {
        Self::build(session, ui, Some(runtime))
    }

    fn build(session: Arc<dyn Session>, ui: UiHandle<S>, runtime: Option<Handle>) -> Self {
        Self {
            session,
            ui,
            inner: Arc::new(RwLock::new(ObserverInner {
                phase: ObserverPhase::Uninitialized,
                handlers: Vec::new(),
            })),
            routine: Mutex::new(None),
            runtime,
        }
    }

    /// 登记一个连接状态变化回调，回调在 UI 线程上执行。
    ///
    /// 第一次登记时启动广播任务。
    /// 观察者已销毁时返回 [`ObserverError::Destroyed`]；找不到运行时返回
    /// [`ObserverError::NoRuntime`]。出错时观察者状态与回调列表都保持不变。
    pub fn observe_connection_events<F>(&self, handler: F) -> Result<(), ObserverError>
    where
        F: Fn(&mut S) + Send + Sync + 'static,
    {
        let mut inner = write_inner(&self.inner);

        let current = match &inner.phase {
            ObserverPhase::Closed => return Err(ObserverError::Destroyed),
            ObserverPhase::Active { subscription, .. } => Some(subscription.sequence()),
            ObserverPhase::Uninitialized => None,
        };
        let since = match current {
            Some(since) => since,
            None => self.activate(&mut inner)?,
        };

        inner.handlers.push(HandlerEntry {
            since,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    /// 订阅会话并启动广播任务，返回此刻的事件序号。
    fn activate(&self, inner: &mut ObserverInner<S>) -> Result<u64, ObserverError> {
        if self.ui.is_closed() {
            return Err(ObserverError::Ui(UiError::Closed));
        }
        let runtime = match self.runtime.clone().or_else(|| Handle::try_current().ok()) {
            Some(runtime) => runtime,
            None => return Err(ObserverError::NoRuntime),
        };
        let (subscriber, subscription) = subscription_channel();
        let handle = subscription.handle();
        let stop = CancellationToken::new();

        self.session.subscribe(subscriber);
        let routine = runtime.spawn(broadcast_routine(
            subscription,
            stop.clone(),
            Arc::clone(&self.inner),
            self.ui.clone(),
        ));
        *lock_routine(&self.routine) = Some(routine);

        tracing::debug!("账号 {} 开始观察连接事件", self.session.account_id());
        let since = handle.sequence();
        inner.phase = ObserverPhase::Active {
            subscription: handle,
            stop,
        };
        Ok(since)
    }

    /// 销毁观察者：退订、停止广播任务、清空回调。
    ///
    /// 第一次调用返回 `true`；重复调用是空操作，返回 `false`。
    pub fn destroy(&self) -> bool {
        let mut inner = write_inner(&self.inner);
        let previous = std::mem::replace(&mut inner.phase, ObserverPhase::Closed);
        inner.handlers.clear();

        match previous {
            ObserverPhase::Closed => false,
            ObserverPhase::Uninitialized => true,
            ObserverPhase::Active { subscription, stop } => {
                subscription.unsubscribe();
                stop.cancel();
                tracing::debug!("账号 {} 停止观察连接事件", self.session.account_id());
                true
            }
        }
    }

    /// 等待广播任务退出；从未启动过时立即返回。
    pub async fn join(&self) {
        let routine = lock_routine(&self.routine).take();
        if let Some(routine) = routine {
            if let Err(e) = routine.await {
                tracing::error!("连接事件广播任务异常退出: {}", e);
            }
        }
    }

    pub fn handler_count(&self) -> usize {
        read_inner(&self.inner).handlers.len()
    }

    /// 是否已订阅会话且尚未销毁。
    pub fn is_active(&self) -> bool {
        matches!(read_inner(&self.inner).phase, ObserverPhase::Active { .. })
    }

    pub fn is_closed(&self) -> bool {
        read_inner(&self.inner).is_closed()
    }
}

impl<S: 'static> Drop for ConnectionEventObserver<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// 广播任务：直到收到停止信号、订阅结束或 UI 执行器关闭。
async fn broadcast_routine<S: 'static>(
    mut subscription: Subscription,
    stop: CancellationToken,
    inner: SharedInner<S>,
    ui: UiHandle<S>,
) {
    loop {
        let (seq, event) = tokio::select! {
            biased;

            _ = stop.cancelled() => break,
            next = subscription.next_with_sequence() => match next {
                Some(next) => next,
                None => break,
            },
        };

        if !event.is_connection_change() {
            continue;
        }

        let snapshot: Vec<Handler<S>> = {
            let guard = read_inner(&inner);
            if guard.is_closed() {
                break;
            }
            guard
                .handlers
                .iter()
                .filter(|entry| entry.since < seq)
                .map(|entry| Arc::clone(&entry.handler))
                .collect()
        };
        if snapshot.is_empty() {
            continue;
        }

        let inner = Arc::clone(&inner);
        let posted = ui.post(move |state: &mut S| {
            for handler in &snapshot {
                // 回调本身可能销毁观察者
                if read_inner(&inner).is_closed() {
                    return;
                }
                handler(&mut *state);
            }
        });
        if posted.is_err() {
            tracing::debug!("UI 执行器已关闭，连接事件广播退出");
            break;
        }
    }

    tracing::debug!("连接事件广播任务结束");
}

fn read_inner<S>(inner: &RwLock<ObserverInner<S>>) -> RwLockReadGuard<'_, ObserverInner<S>> {
    inner.read().unwrap_or_else(|poisoned| {
        tracing::error!("连接事件观察者锁已中毒，继续使用其中的数据");
        poisoned.into_inner()
    })
}

fn write_inner<S>(inner: &RwLock<ObserverInner<S>>) -> RwLockWriteGuard<'_, ObserverInner<S>> {
    inner.write().unwrap_or_else(|poisoned| {
        tracing::error!("连接事件观察者锁已中毒，继续使用其中的数据");
        poisoned.into_inner()
    })
}

fn lock_routine(
    routine: &Mutex<Option<JoinHandle<()>>>,
) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
    routine.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
