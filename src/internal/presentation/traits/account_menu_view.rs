use crate::internal::presentation::structs::AccountMenu;

/// 展示层对账号菜单的管理能力，只会在 UI 线程上调用。
pub trait AccountMenuView {
    fn account_menu_mut(&mut self, account_id: &str) -> Option<&mut AccountMenu>;

    fn insert_account_menu(&mut self, menu: AccountMenu);

    fn remove_account_menu(&mut self, account_id: &str) -> Option<AccountMenu>;
}
