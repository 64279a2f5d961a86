pub mod account_menu_view;
pub mod transfer_view;

pub use account_menu_view::AccountMenuView;
pub use transfer_view::TransferView;
