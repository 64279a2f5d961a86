use crate::internal::listener::structs::TransferListeners;
use crate::internal::listener::traits::TransferPrompt;
use crate::internal::presentation::traits::TransferView;
use crate::internal::transfer::structs::{FileTransferRequest, TransferDirection};
use crate::internal::ui_thread::structs::{UiError, UiHandle};

use super::start_all_listeners::start_all_listeners;

/// 处理对方发来的传输请求。
///
/// 询问 `prompt` 保存位置；拒绝时回复 `None` 并返回 `Ok(None)`。
/// 接受时先展示通知、启动监听，再把保存路径回复给会话，保证第一次进度不会丢失。
pub async fn handle_file_transfer<P, S>(
    mut request: FileTransferRequest,
    prompt: &P,
    ui: &UiHandle<S>,
) -> Result<Option<TransferListeners>, UiError>
where
    P: TransferPrompt + ?Sized,
    S: TransferView + 'static,
{
    let destination = prompt
        .choose_destination(&request)
        .await
        .filter(|p| !p.as_os_str().is_empty());

    let Some(destination) = destination else {
        tracing::info!("拒绝接收 {} 发来的 {}", request.bare_peer(), request.name);
        request.answer(None);
        return Ok(None);
    };

    let peer = request.bare_peer().to_string();
    let name = request.name.clone();
    let is_directory = request.is_directory;
    let shown = ui
        .call(move |view: &mut S| {
            view.show_file_transfer(&peer, &name, TransferDirection::Receive, is_directory)
        })
        .await;
    let file = match shown {
        Ok(file) => file,
        Err(e) => {
            request.answer(None);
            return Err(e);
        }
    };

    let listeners = start_all_listeners(
        &request.control,
        ui,
        file,
        &request.name,
        TransferDirection::Receive,
    );
    if !request.answer(Some(destination)) {
        tracing::warn!("会话已不再等待 {} 的回复", request.name);
    }
    Ok(Some(listeners))
}
