pub mod ui_error;
pub mod ui_executor;
pub mod ui_handle;

// 重导出公共类型
pub use ui_error::UiError;
pub use ui_executor::UiExecutor;
pub use ui_handle::UiHandle;

/// 投递到 UI 线程的任务：拿到展示状态的独占引用执行一次。
pub(crate) type UiTask<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;
