//! 传输控制领域模块：后台发送/接收操作与展示层之间的控制面。
//!
//! 生产者持有 [`structs::TransferReporter`] 汇报进度与结果，消费者持有
//! [`structs::FileTransferControl`] 等待 update / finish / error 三路事件并可请求取消。
//! 对外导出以 [`crate::transfer`] 为准。

pub mod structs;
