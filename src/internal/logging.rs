//! 日志辅助：库本身只通过 `tracing` 输出，从不安装 subscriber。

use tracing::Span;

use crate::internal::transfer::structs::TransferDirection;

/// 一次传输的日志 span，监听任务都在其中运行。
pub fn transfer_span(direction: TransferDirection, name: &str) -> Span {
    tracing::info_span!("file_transfer", direction = direction.as_str(), name = %name)
}
