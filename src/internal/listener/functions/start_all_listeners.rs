use tracing::Instrument;

use crate::internal::listener::structs::TransferListeners;
use crate::internal::logging::transfer_span;
use crate::internal::presentation::structs::FileNotificationHandle;
use crate::internal::presentation::traits::TransferView;
use crate::internal::transfer::structs::{FileTransferControl, TransferDirection};
use crate::internal::ui_thread::structs::UiHandle;

/// 为一次传输启动 update / finish / error 三个独立的监听任务。
///
/// 所有展示状态的修改都通过 `ui` 投递；`name` 只用于日志。
pub fn start_all_listeners<S>(
    control: &FileTransferControl,
    ui: &UiHandle<S>,
    file: FileNotificationHandle,
    name: &str,
    direction: TransferDirection,
) -> TransferListeners
where
    S: TransferView + 'static,
{
    let span = transfer_span(direction, name);
    let id = file.id;
    let verb = direction.verb();

    let update = {
        let control = control.clone();
        let ui = ui.clone();
        let name = name.to_string();
        tokio::spawn(
            async move {
                control
                    .wait_for_update(|progress| {
                        let ratio = progress.ratio();
                        let _ = ui.post(move |view: &mut S| view.start_file_transfer(id, ratio));
                        tracing::info!(
                            "{} file transfer of file {}: {}/{} done",
                            verb,
                            name,
                            progress.done,
                            progress.total
                        );

                        if file.probe.user_canceled() {
                            let _ = ui.post(move |view: &mut S| view.cancel_file_transfer(id));
                            control.cancel();
                        } else if file.probe.slot_canceled() {
                            tracing::info!("{} file transfer of file canceled", verb);
                            control.cancel();
                        }
                    })
                    .await;
            }
            .instrument(span.clone()),
        )
    };

    let finish = {
        let control = control.clone();
        let ui = ui.clone();
        let name = name.to_string();
        tokio::spawn(
            async move {
                control
                    .wait_for_finish(|| {
                        let _ = ui
                            .post(move |view: &mut S| view.success_file_transfer(id, direction));
                        tracing::info!("{} file transfer of file {} finished with success", verb, name);
                    })
                    .await;
            }
            .instrument(span.clone()),
        )
    };

    let error = {
        let control = control.clone();
        let ui = ui.clone();
        let name = name.to_string();
        tokio::spawn(
            async move {
                control
                    .wait_for_error(|err| {
                        tracing::info!("{} file transfer of file {} failed with {}", verb, name, err);
                        let _ = ui.post(move |view: &mut S| view.fail_file_transfer(id, &err));
                    })
                    .await;
            }
            .instrument(span),
        )
    };

    TransferListeners {
        id,
        control: control.clone(),
        update,
        finish,
        error,
    }
}
