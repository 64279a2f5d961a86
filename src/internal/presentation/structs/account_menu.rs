use std::collections::BTreeMap;

use serde::Serialize;

use crate::internal::presentation::traits::AccountMenuView;

/// 账号菜单中随连接状态变化的菜单项。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AccountMenuItem {
    Connect,
    Disconnect,
    CheckConnection,
    ConnectionInfo,
}

impl AccountMenuItem {
    pub const ALL: [AccountMenuItem; 4] = [
        AccountMenuItem::Connect,
        AccountMenuItem::Disconnect,
        AccountMenuItem::CheckConnection,
        AccountMenuItem::ConnectionInfo,
    ];
}

/// 一个账号的菜单记录：只保存各菜单项是否可点。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountMenu {
    pub account_id: String,
    sensitive: BTreeMap<AccountMenuItem, bool>,
}

impl AccountMenu {
    /// 新建菜单，所有菜单项初始不可点。
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            sensitive: AccountMenuItem::ALL.iter().map(|&i| (i, false)).collect(),
        }
    }

    pub fn set_sensitive(&mut self, item: AccountMenuItem, sensitive: bool) {
        self.sensitive.insert(item, sensitive);
    }

    pub fn is_sensitive(&self, item: AccountMenuItem) -> bool {
        self.sensitive.get(&item).copied().unwrap_or(false)
    }
}

/// 所有账号的菜单，按账号 id 排序。
#[derive(Debug, Default)]
pub struct AccountMenus {
    menus: BTreeMap<String, AccountMenu>,
}

impl AccountMenus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, account_id: &str) -> Option<&AccountMenu> {
        self.menus.get(account_id)
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }
}

impl AccountMenuView for AccountMenus {
    fn account_menu_mut(&mut self, account_id: &str) -> Option<&mut AccountMenu> {
        self.menus.get_mut(account_id)
    }

    fn insert_account_menu(&mut self, menu: AccountMenu) {
        self.menus.insert(menu.account_id.clone(), menu);
    }

    fn remove_account_menu(&mut self, account_id: &str) -> Option<AccountMenu> {
        self.menus.remove(account_id)
    }
}
