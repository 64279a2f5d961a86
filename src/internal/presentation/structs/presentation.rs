use crate::internal::config::structs::ClientConfig;
use crate::internal::presentation::structs::account_menu::{AccountMenu, AccountMenus};
use crate::internal::presentation::structs::file_notification::{
    FileNotificationHandle, NotificationId,
};
use crate::internal::presentation::structs::transfer_board::TransferBoard;
use crate::internal::presentation::traits::{AccountMenuView, TransferView};
use crate::internal::transfer::structs::{TransferDirection, TransferError};

/// 完整的展示状态：交给 [`UiExecutor`](crate::ui_thread::UiExecutor) 独占。
#[derive(Debug, Default)]
pub struct Presentation {
    pub transfers: TransferBoard,
    pub menus: AccountMenus,
}

impl Presentation {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            transfers: TransferBoard::with_name_limit(config.transfer.display_name_limit),
            menus: AccountMenus::new(),
        }
    }
}

impl TransferView for Presentation {
    fn show_file_transfer(
        &mut self,
        peer: &str,
        name: &str,
        direction: TransferDirection,
        is_directory: bool,
    ) -> FileNotificationHandle {
        self.transfers
            .show_file_transfer(peer, name, direction, is_directory)
    }

    fn start_file_transfer(&mut self, id: NotificationId, progress: f64) {
        self.transfers.start_file_transfer(id, progress)
    }

    fn success_file_transfer(&mut self, id: NotificationId, direction: TransferDirection) {
        self.transfers.success_file_transfer(id, direction)
    }

    fn fail_file_transfer(&mut self, id: NotificationId, cause: &TransferError) {
        self.transfers.fail_file_transfer(id, cause)
    }

    fn cancel_file_transfer(&mut self, id: NotificationId) {
        self.transfers.cancel_file_transfer(id)
    }
}

impl AccountMenuView for Presentation {
    fn account_menu_mut(&mut self, account_id: &str) -> Option<&mut AccountMenu> {
        self.menus.account_menu_mut(account_id)
    }

    fn insert_account_menu(&mut self, menu: AccountMenu) {
        self.menus.insert_account_menu(menu)
    }

    fn remove_account_menu(&mut self, account_id: &str) -> Option<AccountMenu> {
        self.menus.remove_account_menu(account_id)
    }
}
