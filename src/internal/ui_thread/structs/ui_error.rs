use thiserror::Error;

/// UI 执行器相关错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiError {
    /// 执行器已停止，任务无法再投递
    #[error("UI 执行器已关闭")]
    Closed,

    /// 任务在执行前被丢弃（执行器关闭时仍在排队）
    #[error("UI 任务未执行即被丢弃")]
    TaskDropped,
}
