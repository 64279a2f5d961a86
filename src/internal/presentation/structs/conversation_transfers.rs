use tokio_util::sync::CancellationToken;

use super::file_notification::{FileNotification, NotificationId};

/// 与某个对方会话中的传输通知位。
///
/// 通知位不可见时展示新传输会开启新的一代，并让上一代仍在进行的传输失去通知位；
/// 通知位可见时新传输作为附加行加入当前这一代。
#[derive(Debug)]
pub struct ConversationTransfers {
    pub peer: String,
    visible: bool,
    generation: u64,
    slot: CancellationToken,
    files: Vec<FileNotification>,
}

impl ConversationTransfers {
    pub(crate) fn new(peer: &str) -> Self {
        Self {
            peer: peer.to_string(),
            visible: false,
            generation: 0,
            slot: CancellationToken::new(),
            files: Vec::new(),
        }
    }

    /// 通知位是否正在展示。
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn files(&self) -> &[FileNotification] {
        &self.files
    }

    pub(crate) fn file(&self, id: NotificationId) -> Option<&FileNotification> {
        self.files.iter().find(|f| f.id == id)
    }

    pub(crate) fn file_mut(&mut self, id: NotificationId) -> Option<&mut FileNotification> {
        self.files.iter_mut().find(|f| f.id == id)
    }

    /// 为新传输准备通知位，返回 (代次, 通知位令牌)。
    pub(crate) fn claim_slot(&mut self) -> (u64, CancellationToken) {
        if !self.visible {
            // 旧的一代被新传输复用
            self.slot.cancel();
            self.files.clear();
            self.generation += 1;
            self.slot = CancellationToken::new();
            self.visible = true;
        }
        (self.generation, self.slot.clone())
    }

    pub(crate) fn push(&mut self, file: FileNotification) {
        self.files.push(file);
    }

    /// 用户关闭整个通知位：当前这一代里还在进行的传输都会在下一次进度时被取消。
    pub(crate) fn close(&mut self) {
        self.slot.cancel();
        self.visible = false;
    }

    /// 移除一条已经结束的通知；全部移除后通知位随之隐藏。
    pub(crate) fn dismiss(&mut self, id: NotificationId) -> Option<FileNotification> {
        let index = self.files.iter().position(|f| f.id == id)?;
        let file = self.files.remove(index);
        if self.files.is_empty() {
            self.visible = false;
        }
        Some(file)
    }
}
