pub mod file_transfer_control;
pub mod file_transfer_request;
pub mod transfer_direction;
pub mod transfer_error;
pub mod transfer_progress;
pub mod transfer_reporter;
pub(crate) mod transfer_state;

// 重导出公共类型
pub use file_transfer_control::FileTransferControl;
pub use file_transfer_request::{FileTransferRequest, TransferOfferSummary, remove_resource};
pub use transfer_direction::TransferDirection;
pub use transfer_error::TransferError;
pub use transfer_progress::{TransferProgress, progress_ratio};
pub use transfer_reporter::TransferReporter;
pub use transfer_state::TransferOutcome;
