use std::path::PathBuf;

use async_trait::async_trait;

use crate::internal::transfer::structs::FileTransferRequest;

/// 询问用户是否接收对方发来的文件/目录，以及保存到哪里。
///
/// 实现者通常会先展示 [`FileTransferRequest::summary`]，再打开保存对话框。
#[async_trait]
pub trait TransferPrompt: Send + Sync {
    /// 返回完整的保存路径；`None` 表示拒绝或取消了对话框。
    async fn choose_destination(&self, request: &FileTransferRequest) -> Option<PathBuf>;
}
