use serde::Serialize;

/// 会话向订阅者发布的事件。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SessionEvent {
    Connecting,
    Connected,
    Disconnected,
    ConnectionLost,
    RosterReceived,
    StreamError(String),
    Ping,
}

impl SessionEvent {
    /// 是否为需要刷新连接相关界面的状态变化。
    pub fn is_connection_change(&self) -> bool {
        matches!(
            self,
            SessionEvent::Connecting | SessionEvent::Connected | SessionEvent::Disconnected
        )
    }
}
