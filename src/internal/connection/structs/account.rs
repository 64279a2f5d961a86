use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;

use crate::internal::listener::functions::{handle_file_transfer, send_dir_to, send_file_to};
use crate::internal::listener::structs::TransferListeners;
use crate::internal::listener::traits::TransferPrompt;
use crate::internal::presentation::structs::{AccountMenu, AccountMenuItem};
use crate::internal::presentation::traits::{AccountMenuView, TransferView};
use crate::internal::session::traits::Session;
use crate::internal::config::structs::TransferConfig;
use crate::internal::transfer::structs::{FileTransferRequest, TransferError, TransferOutcome};
use crate::internal::ui_thread::structs::{UiError, UiHandle};

use super::connection_event_observer::ConnectionEventObserver;
use super::observer_error::ObserverError;

/// 账号的展示包装：持有会话、当前的连接事件观察者与 UI 投递句柄。
///
/// 观察者被销毁后不会复用，需要时会创建新的。
pub struct Account<S: 'static> {
    session: Arc<dyn Session>,
    ui: UiHandle<S>,
    observer: Mutex<Option<Arc<ConnectionEventObserver<S>>>>,
    runtime: Option<Handle>,
    terminal_timeout: Option<Duration>,
}

impl<S: 'static> std::fmt::Debug for Account<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.session.account_id())
            .field("observer", &*self.lock_observer())
            .finish()
    }
}

impl<S: 'static> Account<S> {
    /// 创建账号包装；在 tokio 运行时内调用时，之后创建的观察者都在该运行时上广播。
    pub fn new(session: Arc<dyn Session>, ui: UiHandle<S>) -> Self {
        Self {
            session,
            ui,
            observer: Mutex::new(None),
            runtime: Handle::try_current().ok(),
            terminal_timeout: None,
        }
    }

    /// 创建账号包装，观察者的广播任务固定在 `runtime` 上运行。
    pub fn with_runtime(session: Arc<dyn Session>, ui: UiHandle<S>, runtime: Handle) -> Self {
        Self {
            session,
            ui,
            observer: Mutex::new(None),
            runtime: Some(runtime),
            terminal_timeout: None,
        }
    }

    /// 应用传输配置：[`Account::wait_for_transfer`] 按其中的超时等待终态。
    pub fn with_transfer_config(mut self, config: &TransferConfig) -> Self {
        self.terminal_timeout = config.terminal_timeout();
        self
    }

    pub fn id(&self) -> &str {
        self.session.account_id()
    }

    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    pub fn connected(&self) -> bool {
        self.session.is_connected()
    }

    /// 当前的观察者（可能已销毁）。
    pub fn observer(&self) -> Option<Arc<ConnectionEventObserver<S>>> {
        self.lock_observer().clone()
    }

    /// 在当前观察者上登记回调；没有观察者或已销毁时先创建新的。
    pub fn observe_connection_events<F>(&self, handler: F) -> Result<(), ObserverError>
    where
        F: Fn(&mut S) + Send + Sync + 'static,
    {
        self.live_observer().observe_connection_events(handler)
    }

    fn live_observer(&self) -> Arc<ConnectionEventObserver<S>> {
        let mut slot = self.lock_observer();
        match slot.as_ref() {
            Some(observer) if !observer.is_closed() => Arc::clone(observer),
            _ => {
                let session = Arc::clone(&self.session);
                let ui = self.ui.clone();
                let observer = Arc::new(match &self.runtime {
                    Some(runtime) => {
                        ConnectionEventObserver::with_runtime(session, ui, runtime.clone())
                    }
                    None => ConnectionEventObserver::new(session, ui),
                });
                *slot = Some(Arc::clone(&observer));
                observer
            }
        }
    }

    /// 销毁当前观察者，返回是否确实销毁了一个仍在使用的观察者。
    fn destroy_observer(&self) -> bool {
        match self.lock_observer().take() {
            Some(observer) => observer.destroy(),
            None => false,
        }
    }

    fn lock_observer(&self) -> MutexGuard<'_, Option<Arc<ConnectionEventObserver<S>>>> {
        self.observer.lock().unwrap_or_else(|poisoned| {
            tracing::error!("账号观察者锁已中毒，继续使用其中的数据");
            poisoned.into_inner()
        })
    }
}

/// 账号菜单
impl<S> Account<S>
where
    S: AccountMenuView + 'static,
{
    /// 建立账号菜单：已有菜单时先销毁；菜单项的可点状态随连接事件更新。
    ///
    /// 需要在 UI 线程上调用（`state` 即展示状态）。回调全部登记成功后才放入菜单记录，
    /// 失败时不留下菜单，也不留下观察者。
    pub fn attach_menu(&self, state: &mut S) -> Result<(), ObserverError> {
        if state.account_menu_mut(self.id()).is_some() || self.observer().is_some() {
            self.destroy_menu(state);
        }

        for item in AccountMenuItem::ALL {
            let session = Arc::clone(&self.session);
            let id = self.id().to_string();
            let registered = self.observe_connection_events(move |state: &mut S| {
                if let Some(menu) = state.account_menu_mut(&id) {
                    menu.set_sensitive(item, item_sensitivity(session.as_ref(), item));
                }
            });
            if let Err(e) = registered {
                tracing::warn!("账号 {} 的菜单无法观察连接事件: {}", self.id(), e);
                self.destroy_observer();
                return Err(e);
            }
        }

        // 此后的连接事件都在本任务之后执行
        let mut menu = AccountMenu::new(self.id());
        for item in AccountMenuItem::ALL {
            menu.set_sensitive(item, item_sensitivity(self.session.as_ref(), item));
        }
        state.insert_account_menu(menu);
        Ok(())
    }

    /// 销毁账号菜单及其观察者，返回菜单是否存在。
    pub fn destroy_menu(&self, state: &mut S) -> bool {
        self.destroy_observer();
        state.remove_account_menu(self.id()).is_some()
    }
}

/// 文件传输
impl<S> Account<S>
where
    S: TransferView + 'static,
{
    pub async fn send_file_to(&self, peer: &str, path: &Path) -> Result<TransferListeners, UiError> {
        send_file_to(self.session.as_ref(), peer, path, &self.ui).await
    }

    pub async fn send_dir_to(&self, peer: &str, path: &Path) -> Result<TransferListeners, UiError> {
        send_dir_to(self.session.as_ref(), peer, path, &self.ui).await
    }

    pub async fn handle_file_transfer<P>(
        &self,
        request: FileTransferRequest,
        prompt: &P,
    ) -> Result<Option<TransferListeners>, UiError>
    where
        P: TransferPrompt + ?Sized,
    {
        handle_file_transfer(request, prompt, &self.ui).await
    }

    /// 等待一次传输结束并渲染完毕；配置了终态超时时，超时返回 [`TransferError::TimedOut`]。
    pub async fn wait_for_transfer(
        &self,
        listeners: TransferListeners,
    ) -> Result<TransferOutcome, TransferError> {
        listeners.wait_outcome(self.terminal_timeout).await
    }
}

impl<S: 'static> Drop for Account<S> {
    fn drop(&mut self) {
        self.destroy_observer();
    }
}

/// 菜单项可点的条件。
fn item_sensitivity(session: &dyn Session, item: AccountMenuItem) -> bool {
    match item {
        AccountMenuItem::Connect => session.is_disconnected(),
        AccountMenuItem::Disconnect => !session.is_disconnected(),
        AccountMenuItem::CheckConnection | AccountMenuItem::ConnectionInfo => {
            session.is_connected()
        }
    }
}
