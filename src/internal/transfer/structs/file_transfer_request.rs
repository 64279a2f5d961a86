use std::path::PathBuf;

use tokio::sync::oneshot;

use super::file_transfer_control::FileTransferControl;

/// 对方发起的文件/目录传输请求。
///
/// 展示层决定是否接收以及保存位置，通过 [`FileTransferRequest::answer`] 回复会话；
/// 回复 `None` 表示拒绝。
#[derive(Debug)]
pub struct FileTransferRequest {
    /// 对方地址（可能带 resource）
    pub peer: String,
    pub name: String,
    pub is_directory: bool,
    pub description: Option<String>,
    pub date_last_modified: Option<String>,
    /// 文件大小（字节），未知时为 `None`
    pub size: Option<u64>,
    pub control: FileTransferControl,
    answer: Option<oneshot::Sender<Option<PathBuf>>>,
}

/// 询问用户时展示的两行文本。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOfferSummary {
    pub message: String,
    pub secondary: String,
}

impl FileTransferRequest {
    /// 创建请求，返回请求本身与会话端等待回复的接收端。
    pub fn new(
        peer: impl Into<String>,
        name: impl Into<String>,
        is_directory: bool,
        control: FileTransferControl,
    ) -> (Self, oneshot::Receiver<Option<PathBuf>>) {
        let (tx, rx) = oneshot::channel();
        let request = Self {
            peer: peer.into(),
            name: name.into(),
            is_directory,
            description: None,
            date_last_modified: None,
            size: None,
            control,
            answer: Some(tx),
        };
        (request, rx)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_date_last_modified(mut self, date: impl Into<String>) -> Self {
        self.date_last_modified = Some(date.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// 去掉 resource 部分的对方地址。
    pub fn bare_peer(&self) -> &str {
        remove_resource(&self.peer)
    }

    /// 回复会话；只有第一次回复有效，返回是否送达。
    pub fn answer(&mut self, destination: Option<PathBuf>) -> bool {
        match self.answer.take() {
            Some(tx) => tx.send(destination).is_ok(),
            None => false,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.answer.is_none()
    }

    /// 组装询问文本：名称、可选的描述、最后修改时间与大小。
    pub fn summary(&self) -> TransferOfferSummary {
        let peer = self.bare_peer();
        let (message, mut secondary) = if self.is_directory {
            (
                format!("{} 想向你发送一个目录，是否接收？", peer),
                format!("目录名: {}", self.name),
            )
        } else {
            (
                format!("{} 想向你发送一个文件，是否接收？", peer),
                format!("文件名: {}", self.name),
            )
        };

        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            secondary.push_str(&format!("\n描述: {}", description));
        }
        if let Some(date) = self.date_last_modified.as_deref().filter(|d| !d.is_empty()) {
            secondary.push_str(&format!("\n最后修改: {}", date));
        }
        if let Some(size) = self.size.filter(|&s| s != 0) {
            secondary.push_str(&format!("\n大小: {} 字节", size));
        }

        TransferOfferSummary { message, secondary }
    }
}

impl Drop for FileTransferRequest {
    fn drop(&mut self) {
        // 未回复就丢弃视为拒绝，会话端不会一直等待
        if let Some(tx) = self.answer.take() {
            let _ = tx.send(None);
        }
    }
}

/// 去掉地址中的 resource：`user@host/res` → `user@host`。
pub fn remove_resource(peer: &str) -> &str {
    match peer.split_once('/') {
        Some((bare, _)) => bare,
        None => peer,
    }
}
