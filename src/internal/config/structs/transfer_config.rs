use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 默认每块数据大小：64KB
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// 展示用文件名的默认最大字符数
pub use crate::internal::presentation::structs::DEFAULT_DISPLAY_NAME_LIMIT;

/// 传输相关配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// 本地传输每次读写的字节数，也是进度汇报与取消检查的粒度
    pub chunk_size: usize,
    /// 通知中展示名的最大字符数
    pub display_name_limit: usize,
    /// 等待传输结果的超时（毫秒）；`None` 表示一直等待
    pub terminal_timeout_ms: Option<u64>,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            display_name_limit: DEFAULT_DISPLAY_NAME_LIMIT,
            terminal_timeout_ms: None,
        }
    }
}

impl TransferConfig {
    pub fn terminal_timeout(&self) -> Option<Duration> {
        self.terminal_timeout_ms.map(Duration::from_millis)
    }

    /// 块大小至少为 1 字节。
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}

/// 接收文件时建议的默认保存目录：系统下载目录，取不到时退回主目录。
pub fn default_download_dir() -> Option<PathBuf> {
    dirs::download_dir().or_else(dirs::home_dir)
}
