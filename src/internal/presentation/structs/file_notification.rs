use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::internal::transfer::structs::TransferDirection;

/// 展示层中一条传输通知的编号。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NotificationId(pub u64);

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 渲染用的传输状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransferStatus {
    Pending,
    InProgress,
    Canceled,
    Succeeded,
    Failed(String),
}

/// 跨线程可见的取消信号：
/// - `user`：用户在这条通知上点了取消；
/// - `slot`：所在会话的通知位被关闭或被更新的传输复用。
///
/// 监听者在每次收到进度后检查这两个信号。
#[derive(Debug, Clone)]
pub struct CancelProbe {
    pub(crate) user: CancellationToken,
    pub(crate) slot: CancellationToken,
}

impl CancelProbe {
    pub fn user_canceled(&self) -> bool {
        self.user.is_cancelled()
    }

    pub fn slot_canceled(&self) -> bool {
        self.slot.is_cancelled()
    }
}

/// 展示通知后交给后台监听者的句柄。
#[derive(Debug, Clone)]
pub struct FileNotificationHandle {
    pub id: NotificationId,
    pub probe: CancelProbe,
}

/// 一次传输的展示记录，镜像传输控制的可见状态。
#[derive(Debug, Clone, Serialize)]
pub struct FileNotification {
    pub id: NotificationId,
    pub peer: String,
    /// 缩短后的展示名
    pub name: String,
    pub direction: TransferDirection,
    pub is_directory: bool,
    /// 进度比例，0～1，只增不减
    pub progress: f64,
    /// 用户是否请求了取消
    pub canceled: bool,
    pub status: TransferStatus,
    /// 展示时所在通知位的代次
    pub generation: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub(crate) user_cancel: CancellationToken,
    #[serde(skip)]
    pub(crate) slot: CancellationToken,
}

impl FileNotification {
    pub(crate) fn new(
        id: NotificationId,
        peer: &str,
        name: String,
        direction: TransferDirection,
        is_directory: bool,
        generation: u64,
        slot: CancellationToken,
    ) -> Self {
        Self {
            id,
            peer: peer.to_string(),
            name,
            direction,
            is_directory,
            progress: 0.0,
            canceled: false,
            status: TransferStatus::Pending,
            generation,
            started_at: Utc::now(),
            completed_at: None,
            user_cancel: CancellationToken::new(),
            slot,
        }
    }

    pub fn handle(&self) -> FileNotificationHandle {
        FileNotificationHandle {
            id: self.id,
            probe: CancelProbe {
                user: self.user_cancel.clone(),
                slot: self.slot.clone(),
            },
        }
    }

    /// 用户点击取消：设置标志并通知后台监听者。
    pub fn request_cancel(&mut self) {
        if self.is_settled() {
            return;
        }
        self.canceled = true;
        self.user_cancel.cancel();
    }

    /// 是否已由 finish / error 事件给出最终结果。
    pub fn is_settled(&self) -> bool {
        matches!(
            self.status,
            TransferStatus::Succeeded | TransferStatus::Failed(_)
        ) || (self.status == TransferStatus::Canceled && self.completed_at.is_some())
    }

    pub(crate) fn set_progress(&mut self, ratio: f64) {
        if self.is_settled() {
            return;
        }
        let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
        if ratio > self.progress {
            self.progress = ratio;
        }
        if self.status == TransferStatus::Pending {
            self.status = TransferStatus::InProgress;
        }
    }

    /// 用户取消后的即时渲染；最终结果仍以 error 事件为准。
    pub(crate) fn mark_canceling(&mut self) {
        if self.is_settled() {
            return;
        }
        self.canceled = true;
        self.status = TransferStatus::Canceled;
    }

    pub(crate) fn mark_succeeded(&mut self) {
        if self.is_settled() {
            return;
        }
        self.progress = 1.0;
        self.status = TransferStatus::Succeeded;
        self.completed_at = Some(Utc::now());
    }

    pub(crate) fn mark_failed(&mut self, canceled: bool, message: String) {
        if self.is_settled() {
            return;
        }
        self.status = if canceled {
            TransferStatus::Canceled
        } else {
            TransferStatus::Failed(message)
        };
        self.completed_at = Some(Utc::now());
    }
}
