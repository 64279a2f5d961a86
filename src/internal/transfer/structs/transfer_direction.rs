use serde::{Deserialize, Serialize};

/// 传输方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferDirection {
    Send,
    Receive,
}

impl TransferDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferDirection::Send => "send",
            TransferDirection::Receive => "receive",
        }
    }

    /// 日志中使用的动词。
    pub fn verb(&self) -> &'static str {
        match self {
            TransferDirection::Send => "Sending",
            TransferDirection::Receive => "Receiving",
        }
    }
}

impl std::fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
