use serde::{Deserialize, Serialize};

use super::transfer_config::TransferConfig;

/// 客户端配置的根。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub transfer: TransferConfig,
}
