use std::path::{Path, PathBuf};

use crate::internal::config::structs::TransferConfig;
use crate::internal::session::traits::Session;
use crate::internal::states::reactive_core::{PropertyWatcher, ReactiveProperty};
use crate::internal::transfer::structs::{
    FileTransferControl, FileTransferRequest, TransferError, remove_resource,
};

use super::connection_state::ConnectionState;
use super::event_hub::SessionEventHub;
use super::loopback_transport::{transfer_dir, transfer_file};
use super::session_event::SessionEvent;
use super::subscription::Subscriber;

/// 进程内的回环会话。
///
/// - 连接状态由 `connect` / `disconnect` 等方法驱动，并向订阅者发布对应事件；
/// - 发出的文件复制到 `remote_root/<对方地址>/` 下；
/// - `offer_file` / `offer_dir` 模拟对方发来的传输请求。
///
/// 传输在 tokio 任务中进行，因此相关方法必须在 tokio 运行时内调用。
#[derive(Debug)]
pub struct LoopbackSession {
    account_id: String,
    state: ReactiveProperty<ConnectionState>,
    hub: SessionEventHub,
    remote_root: PathBuf,
    chunk_size: usize,
}

impl LoopbackSession {
    pub fn new(
        account_id: impl Into<String>,
        remote_root: impl Into<PathBuf>,
        config: &TransferConfig,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            state: ReactiveProperty::new(ConnectionState::Disconnected),
            hub: SessionEventHub::new(),
            remote_root: remote_root.into(),
            chunk_size: config.effective_chunk_size(),
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state.get_current().unwrap_or_default()
    }

    pub fn watch_connection_state(&self) -> PropertyWatcher<ConnectionState> {
        self.state.watch()
    }

    pub fn hub(&self) -> &SessionEventHub {
        &self.hub
    }

    /// 某个对方在回环远端的目录。
    pub fn remote_dir_for(&self, peer: &str) -> PathBuf {
        self.remote_root.join(remove_resource(peer))
    }

    /// 连接：依次经过 Connecting、Connected，然后收到联系人列表。
    ///
    /// 只有从 Disconnected 出发才生效；并发调用时只有一个会发布事件。
    pub fn connect(&self) {
        if !self.transition(
            |s| s == ConnectionState::Disconnected,
            ConnectionState::Connecting,
        ) {
            return;
        }
        self.hub.publish(SessionEvent::Connecting);

        // 期间被断开时不再进入 Connected
        if !self.transition(
            |s| s == ConnectionState::Connecting,
            ConnectionState::Connected,
        ) {
            return;
        }
        self.hub.publish(SessionEvent::Connected);
        self.hub.publish(SessionEvent::RosterReceived);
    }

    pub fn disconnect(&self) {
        if self.transition(
            |s| s != ConnectionState::Disconnected,
            ConnectionState::Disconnected,
        ) {
            self.hub.publish(SessionEvent::Disconnected);
        }
    }

    /// 连接意外中断。
    pub fn lose_connection(&self) {
        if self.transition(
            |s| s != ConnectionState::Disconnected,
            ConnectionState::Disconnected,
        ) {
            self.hub.publish(SessionEvent::ConnectionLost);
            self.hub.publish(SessionEvent::Disconnected);
        }
    }

    pub fn ping(&self) {
        self.hub.publish(SessionEvent::Ping);
    }

    pub fn stream_error(&self, message: impl Into<String>) {
        self.hub.publish(SessionEvent::StreamError(message.into()));
    }

    /// 模拟对方发来文件：请求被接受后把 `source` 复制到回复的路径。
    pub fn offer_file(&self, peer: &str, source: impl Into<PathBuf>) -> FileTransferRequest {
        self.offer(peer, source.into(), false)
    }

    /// 模拟对方发来目录。
    pub fn offer_dir(&self, peer: &str, source: impl Into<PathBuf>) -> FileTransferRequest {
        self.offer(peer, source.into(), true)
    }

    fn offer(&self, peer: &str, source: PathBuf, is_directory: bool) -> FileTransferRequest {
        let (control, reporter) = FileTransferControl::new();
        let name = base_name(&source);
        let size = if is_directory {
            None
        } else {
            std::fs::metadata(&source).ok().map(|m| m.len())
        };

        let (mut request, answer) = FileTransferRequest::new(peer, name, is_directory, control);
        if let Some(size) = size {
            request = request.with_size(size);
        }

        let chunk_size = self.chunk_size;
        tokio::spawn(async move {
            match answer.await {
                Ok(Some(dest)) if is_directory => {
                    transfer_dir(reporter, source, dest, chunk_size).await
                }
                Ok(Some(dest)) => transfer_file(reporter, source, dest, chunk_size).await,
                _ => {
                    tracing::info!("对方的传输请求被拒绝: {}", source.display());
                    reporter.fail(TransferError::Declined);
                }
            }
        });

        request
    }

    /// 当前状态满足 `allowed` 时切换到 `next`；判断与写入是一步完成的。
    fn transition<F>(&self, allowed: F, next: ConnectionState) -> bool
    where
        F: FnOnce(ConnectionState) -> bool,
    {
        self.state.modify_if(|current| {
            if !allowed(*current) {
                return false;
            }
            *current = next;
            true
        })
    }
}

impl Session for LoopbackSession {
    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn subscribe(&self, subscriber: Subscriber) {
        self.hub.subscribe(subscriber);
    }

    fn is_connected(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }

    fn is_disconnected(&self) -> bool {
        self.connection_state() == ConnectionState::Disconnected
    }

    fn send_file_to(&self, peer: &str, path: &Path) -> FileTransferControl {
        let (control, reporter) = FileTransferControl::new();
        let dest = self.remote_dir_for(peer).join(base_name(path));
        tokio::spawn(transfer_file(
            reporter,
            path.to_path_buf(),
            dest,
            self.chunk_size,
        ));
        control
    }

    fn send_dir_to(&self, peer: &str, path: &Path) -> FileTransferControl {
        let (control, reporter) = FileTransferControl::new();
        let dest = self.remote_dir_for(peer).join(base_name(path));
        tokio::spawn(transfer_dir(
            reporter,
            path.to_path_buf(),
            dest,
            self.chunk_size,
        ));
        control
    }
}

/// 路径的最后一段，取不到时用完整路径。
pub(crate) fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
