pub mod client_config;
pub mod transfer_config;

pub use client_config::ClientConfig;
pub use transfer_config::{
    DEFAULT_CHUNK_SIZE, DEFAULT_DISPLAY_NAME_LIMIT, TransferConfig, default_download_dir,
};
