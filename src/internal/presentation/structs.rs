pub mod account_menu;
pub mod conversation_transfers;
pub mod file_name;
pub mod file_notification;
pub mod presentation;
pub mod transfer_board;

// 重导出公共类型
pub use account_menu::{AccountMenu, AccountMenuItem, AccountMenus};
pub use conversation_transfers::ConversationTransfers;
pub use file_name::{DEFAULT_DISPLAY_NAME_LIMIT, resize_file_name};
pub use file_notification::{
    CancelProbe, FileNotification, FileNotificationHandle, NotificationId, TransferStatus,
};
pub use presentation::Presentation;
pub use transfer_board::TransferBoard;
