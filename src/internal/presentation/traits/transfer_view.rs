//! 传输通知的渲染接口：只会在 UI 线程执行器的任务中被调用。

use crate::internal::transfer::structs::{TransferDirection, TransferError};

use crate::internal::presentation::structs::{FileNotificationHandle, NotificationId};

/// 展示层对传输通知的渲染能力。
///
/// 调用方（传输监听者）保证所有方法都经由 UI 执行器调用，实现者无需自行加锁。
pub trait TransferView {
    /// 在与 `peer` 的会话里展示一条传输通知，返回交给后台监听者的句柄。
    fn show_file_transfer(
        &mut self,
        peer: &str,
        name: &str,
        direction: TransferDirection,
        is_directory: bool,
    ) -> FileNotificationHandle;

    /// 渲染进度（0～1）。
    fn start_file_transfer(&mut self, id: NotificationId, progress: f64);

    /// 渲染成功结果。
    fn success_file_transfer(&mut self, id: NotificationId, direction: TransferDirection);

    /// 渲染失败结果；原因为取消时渲染为已取消。
    fn fail_file_transfer(&mut self, id: NotificationId, cause: &TransferError);

    /// 用户取消后的即时渲染。
    fn cancel_file_transfer(&mut self, id: NotificationId);
}
