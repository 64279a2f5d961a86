//! 会话事件订阅通道
//!
//! - [`Subscriber`]：交给会话的发送端，可 Clone；
//! - [`Subscription`]：观察者持有的接收端，逐个取出事件；
//! - [`SubscriptionHandle`]：退订句柄，退订是幂等的。
//!
//! 退订后 `Subscription::next` 立即返回 `None`，即使通道中还有未取出的事件。
//!
//! 每个送入通道的事件都带有一个从 1 开始递增的序号，`SubscriptionHandle::sequence`
//! 返回最近一个已送出事件的序号，可据此判断某个事件是否发生在某一时刻之后。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::session_event::SessionEvent;

/// 创建一对订阅通道。
pub fn subscription_channel() -> (Subscriber, Subscription) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let closed = CancellationToken::new();
    let sequence = Arc::new(AtomicU64::new(0));
    (
        Subscriber {
            sender,
            closed: closed.clone(),
            sequence: Arc::clone(&sequence),
        },
        Subscription {
            receiver,
            closed,
            sequence,
        },
    )
}

/// 订阅的发送端，由会话持有。
#[derive(Debug, Clone)]
pub struct Subscriber {
    sender: mpsc::UnboundedSender<(u64, SessionEvent)>,
    closed: CancellationToken,
    sequence: Arc<AtomicU64>,
}

impl Subscriber {
    /// 发送事件，返回是否送达；订阅已关闭时返回 `false`。
    pub fn send(&self, event: SessionEvent) -> bool {
        if self.closed.is_cancelled() {
            return false;
        }
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.sender.send((seq, event)).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled() || self.sender.is_closed()
    }
}

/// 订阅的接收端。
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<(u64, SessionEvent)>,
    closed: CancellationToken,
    sequence: Arc<AtomicU64>,
}

impl Subscription {
    pub fn handle(&self) -> SubscriptionHandle {
        SubscriptionHandle {
            closed: self.closed.clone(),
            sequence: Arc::clone(&self.sequence),
        }
    }

    /// 取出下一个事件；退订后或所有发送端释放后返回 `None`。
    pub async fn next(&mut self) -> Option<SessionEvent> {
        self.next_with_sequence().await.map(|(_, event)| event)
    }

    /// 取出下一个事件及其序号。
    pub async fn next_with_sequence(&mut self) -> Option<(u64, SessionEvent)> {
        tokio::select! {
            biased;

            _ = self.closed.cancelled() => None,
            event = self.receiver.recv() => event,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }
}

/// 退订句柄。
#[derive(Debug, Clone)]
pub struct SubscriptionHandle {
    closed: CancellationToken,
    sequence: Arc<AtomicU64>,
}

impl SubscriptionHandle {
    /// 退订；第一次调用返回 `true`，之后都是空操作。
    pub fn unsubscribe(&self) -> bool {
        if self.closed.is_cancelled() {
            return false;
        }
        self.closed.cancel();
        true
    }

    pub fn is_unsubscribed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// 最近一个送入通道的事件序号；尚未发送过事件时为 0。
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}
