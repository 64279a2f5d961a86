use std::path::Path;

use crate::internal::listener::structs::TransferListeners;
use crate::internal::presentation::traits::TransferView;
use crate::internal::session::structs::loopback_session::base_name;
use crate::internal::session::traits::Session;
use crate::internal::transfer::structs::{FileTransferControl, TransferDirection, remove_resource};
use crate::internal::ui_thread::structs::{UiError, UiHandle};

use super::start_all_listeners::start_all_listeners;

/// 向 `peer` 发送文件：启动会话传输，在对应会话中展示通知并启动监听。
///
/// UI 执行器已关闭时取消刚启动的传输并返回错误。
pub async fn send_file_to<X, S>(
    session: &X,
    peer: &str,
    path: &Path,
    ui: &UiHandle<S>,
) -> Result<TransferListeners, UiError>
where
    X: Session + ?Sized,
    S: TransferView + 'static,
{
    let control = session.send_file_to(peer, path);
    show_and_listen(control, peer, path, false, ui).await
}

/// 向 `peer` 发送整个目录。
pub async fn send_dir_to<X, S>(
    session: &X,
    peer: &str,
    path: &Path,
    ui: &UiHandle<S>,
) -> Result<TransferListeners, UiError>
where
    X: Session + ?Sized,
    S: TransferView + 'static,
{
    let control = session.send_dir_to(peer, path);
    show_and_listen(control, peer, path, true, ui).await
}

async fn show_and_listen<S>(
    control: FileTransferControl,
    peer: &str,
    path: &Path,
    is_directory: bool,
    ui: &UiHandle<S>,
) -> Result<TransferListeners, UiError>
where
    S: TransferView + 'static,
{
    let peer = remove_resource(peer).to_string();
    let name = base_name(path);

    let shown = ui
        .call(move |view: &mut S| {
            view.show_file_transfer(&peer, &name, TransferDirection::Send, is_directory)
        })
        .await;
    let file = match shown {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!("无法展示发送通知，取消传输 {}: {}", path.display(), e);
            control.cancel();
            return Err(e);
        }
    };

    Ok(start_all_listeners(
        &control,
        ui,
        file,
        &path.display().to_string(),
        TransferDirection::Send,
    ))
}
