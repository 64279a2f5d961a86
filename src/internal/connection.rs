//! 连接事件观察者：把会话的连接状态变化按登记顺序广播给多个展示层回调。
//!
//! 观察者按需启动（第一次登记回调时才订阅会话），由账号的展示包装显式销毁。

pub mod structs;
