use std::sync::{Mutex, MutexGuard};

use super::session_event::SessionEvent;
use super::subscription::Subscriber;

/// 会话内嵌的订阅者登记表。
///
/// 按订阅顺序发布事件，发布时顺带移除已经关闭的订阅者。
#[derive(Debug, Default)]
pub struct SessionEventHub {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl SessionEventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, subscriber: Subscriber) {
        if subscriber.is_closed() {
            return;
        }
        self.lock().push(subscriber);
    }

    /// 发布事件，返回送达的订阅者数量。
    pub fn publish(&self, event: SessionEvent) -> usize {
        let mut subscribers = self.lock();
        subscribers.retain(|s| s.send(event.clone()));
        tracing::debug!("发布会话事件 {:?}，送达 {} 个订阅者", event, subscribers.len());
        subscribers.len()
    }

    /// 仍然打开的订阅者数量。
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.lock();
        subscribers.retain(|s| !s.is_closed());
        subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Subscriber>> {
        self.subscribers.lock().unwrap_or_else(|poisoned| {
            tracing::error!("会话订阅表锁已中毒，继续使用其中的数据");
            poisoned.into_inner()
        })
    }
}
