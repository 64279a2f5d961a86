//! 客户端配置：纯数据结构，带默认值，可嵌入应用自己的配置文件（serde）。

pub mod structs;
