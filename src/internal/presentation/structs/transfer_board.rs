use std::collections::HashMap;

use crate::internal::presentation::structs::conversation_transfers::ConversationTransfers;
use crate::internal::presentation::structs::file_name::{
    DEFAULT_DISPLAY_NAME_LIMIT, resize_file_name,
};
use crate::internal::presentation::structs::file_notification::{
    FileNotification, FileNotificationHandle, NotificationId,
};
use crate::internal::presentation::traits::TransferView;
use crate::internal::transfer::structs::{TransferDirection, TransferError, remove_resource};

/// 所有会话中的传输通知。
///
/// 按去掉 resource 的对方地址分组；编号全局递增，不会复用。
#[derive(Debug)]
pub struct TransferBoard {
    conversations: HashMap<String, ConversationTransfers>,
    index: HashMap<NotificationId, String>,
    next_id: u64,
    name_limit: usize,
}

impl Default for TransferBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferBoard {
    pub fn new() -> Self {
        Self::with_name_limit(DEFAULT_DISPLAY_NAME_LIMIT)
    }

    /// 指定展示名的最大长度（字符数）。
    pub fn with_name_limit(name_limit: usize) -> Self {
        Self {
            conversations: HashMap::new(),
            index: HashMap::new(),
            next_id: 1,
            name_limit,
        }
    }

    pub fn notification(&self, id: NotificationId) -> Option<&FileNotification> {
        let peer = self.index.get(&id)?;
        self.conversations.get(peer)?.file(id)
    }

    pub fn conversation(&self, peer: &str) -> Option<&ConversationTransfers> {
        self.conversations.get(remove_resource(peer))
    }

    /// 全部通知的数量（含已结束、未移除的）。
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// 用户点击某条通知的取消按钮。返回该通知是否存在且尚未结束。
    pub fn request_cancel(&mut self, id: NotificationId) -> bool {
        match self.notification_mut(id) {
            Some(file) if !file.is_settled() => {
                file.request_cancel();
                true
            }
            _ => false,
        }
    }

    /// 用户关闭与 `peer` 会话中的通知位。
    pub fn close_notification(&mut self, peer: &str) -> bool {
        match self.conversations.get_mut(remove_resource(peer)) {
            Some(conversation) if conversation.is_visible() => {
                conversation.close();
                true
            }
            _ => false,
        }
    }

    /// 移除一条已经结束的通知；进行中的通知不能移除。
    pub fn dismiss(&mut self, id: NotificationId) -> Option<FileNotification> {
        if !self.notification(id)?.is_settled() {
            return None;
        }
        let peer = self.index.remove(&id)?;
        self.conversations.get_mut(&peer)?.dismiss(id)
    }

    fn notification_mut(&mut self, id: NotificationId) -> Option<&mut FileNotification> {
        let peer = self.index.get(&id)?;
        self.conversations.get_mut(peer)?.file_mut(id)
    }
}

impl TransferView for TransferBoard {
    fn show_file_transfer(
        &mut self,
        peer: &str,
        name: &str,
        direction: TransferDirection,
        is_directory: bool,
    ) -> FileNotificationHandle {
        let bare = remove_resource(peer).to_string();
        let id = NotificationId(self.next_id);
        self.next_id += 1;

        let conversation = self
            .conversations
            .entry(bare.clone())
            .or_insert_with(|| ConversationTransfers::new(&bare));

        // 不可见时开启新一代，旧一代的编号随之失效
        let was_visible = conversation.is_visible();
        let stale: Vec<NotificationId> = if was_visible {
            Vec::new()
        } else {
            conversation.files().iter().map(|f| f.id).collect()
        };
        let (generation, slot) = conversation.claim_slot();

        let file = FileNotification::new(
            id,
            &bare,
            resize_file_name(name, self.name_limit),
            direction,
            is_directory,
            generation,
            slot,
        );
        let handle = file.handle();
        conversation.push(file);

        for old in stale {
            self.index.remove(&old);
        }
        self.index.insert(id, bare);

        tracing::debug!(
            "展示传输通知 {}: {} ({}，第 {} 代)",
            id,
            name,
            direction,
            generation
        );
        handle
    }

    fn start_file_transfer(&mut self, id: NotificationId, progress: f64) {
        if let Some(file) = self.notification_mut(id) {
            file.set_progress(progress);
        }
    }

    fn success_file_transfer(&mut self, id: NotificationId, _direction: TransferDirection) {
        if let Some(file) = self.notification_mut(id) {
            file.mark_succeeded();
        }
    }

    fn fail_file_transfer(&mut self, id: NotificationId, cause: &TransferError) {
        if let Some(file) = self.notification_mut(id) {
            file.mark_failed(cause.is_canceled(), cause.to_string());
        }
    }

    fn cancel_file_transfer(&mut self, id: NotificationId) {
        if let Some(file) = self.notification_mut(id) {
            file.mark_canceling();
        }
    }
}
