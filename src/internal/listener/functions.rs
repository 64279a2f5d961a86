pub mod handle_file_transfer;
pub mod send_to;
pub mod start_all_listeners;

pub use handle_file_transfer::handle_file_transfer;
pub use send_to::{send_dir_to, send_file_to};
pub use start_all_listeners::start_all_listeners;
