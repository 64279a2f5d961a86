//! UI 线程执行器领域模块：所有展示状态的修改都必须经由 [`structs::UiHandle`] 投递到唯一的执行器上执行。
//!
//! 对外导出以 [`crate::ui_thread`] 为准，此处仅做模块划分。

pub mod structs;
