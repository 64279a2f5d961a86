//! 传输相关错误类型。

use thiserror::Error;

/// 通过 error 事件交付的传输失败原因。
///
/// 需要交付给多个等待者，因此实现 `Clone`，IO 错误只保留文本。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// 用户主动取消，同样通过 error 事件交付
    #[error("传输被用户取消")]
    Canceled,

    #[error("传输失败: {0}")]
    Transport(String),

    #[error("{context}失败: {message}")]
    Io { context: String, message: String },

    #[error("仅支持文件传输，当前为目录")]
    NotAFile,

    #[error("仅支持目录传输，当前不是目录")]
    NotADirectory,

    /// 生产者退出前没有汇报任何结果
    #[error("传输方已退出且未报告结果")]
    ProducerGone,

    #[error("等待传输结果超时")]
    TimedOut,

    #[error("对方拒绝接收")]
    Declined,
}

impl TransferError {
    pub fn io(context: impl Into<String>, err: std::io::Error) -> Self {
        TransferError::Io {
            context: context.into(),
            message: err.to_string(),
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, TransferError::Canceled)
    }
}
