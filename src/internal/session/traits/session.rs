use std::path::Path;

use crate::internal::session::structs::Subscriber;
use crate::internal::transfer::structs::FileTransferControl;

/// 账号背后的会话需要向展示层提供的能力。
///
/// `send_file_to` / `send_dir_to` 必须立即返回控制句柄，传输本身在后台进行。
pub trait Session: Send + Sync + 'static {
    /// 账号标识，用作菜单等展示记录的键。
    fn account_id(&self) -> &str;

    /// 登记一个事件订阅者；订阅者关闭后会话应停止向其发送。
    fn subscribe(&self, subscriber: Subscriber);

    fn is_connected(&self) -> bool;

    fn is_disconnected(&self) -> bool;

    fn send_file_to(&self, peer: &str, path: &Path) -> FileTransferControl;

    fn send_dir_to(&self, peer: &str, path: &Path) -> FileTransferControl;
}
