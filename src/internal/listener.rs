//! 传输监听者：把传输控制的三路事件接到 UI 线程执行器上，并在每次进度后检查取消。
//!
//! 发送与接收两条流程（选择文件、展示通知、启动监听）也在这里。

pub mod functions;
pub mod structs;
pub mod traits;
