//! 展示状态领域模块：纯数据记录，供任意界面工具包渲染。
//!
//! 这些记录只能在 UI 线程执行器的任务中被修改；跨线程能看到的只有 [`structs::CancelProbe`]。

pub mod structs;
pub mod traits;
