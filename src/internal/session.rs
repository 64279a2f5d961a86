//! 会话协作方：连接状态事件的订阅、分发，以及一个进程内的回环会话实现。
//!
//! 真实的 XMPP 会话只需实现 [`traits::Session`]；回环会话用于演示与测试。

pub mod structs;
pub mod traits;
