use thiserror::Error;

use crate::internal::ui_thread::structs::UiError;

/// 连接事件观察者的使用错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObserverError {
    /// 观察者已销毁，不能再登记回调
    #[error("连接事件观察者已销毁")]
    Destroyed,

    /// 第一次登记回调时找不到可以运行广播任务的 tokio 运行时
    #[error("没有可用的 tokio 运行时，无法启动连接事件广播")]
    NoRuntime,

    #[error("UI 执行器不可用: {0}")]
    Ui(#[from] UiError),
}
