/// 内部导出的模块
mod internal;


/// 响应式状态原语，传输控制的状态快照建立在它之上
pub mod states {
    pub mod reactive_core {
        use crate::internal;
        pub use internal::states::reactive_core::*;
    }
}

/// UI 线程执行器：展示状态唯一的修改入口
pub mod ui_thread {
    use crate::internal;
    pub use internal::ui_thread::structs::{UiError, UiExecutor, UiHandle};
}

/// 传输控制：生产者端、消费者端与传输请求
pub mod transfer {
    use crate::internal;
    pub use internal::transfer::structs::*;
}

/// 展示记录与渲染接口
pub mod presentation {
    use crate::internal;
    pub use internal::presentation::structs::*;
    pub use internal::presentation::traits::*;
}

/// 传输监听与发送/接收流程
pub mod listener {
    use crate::internal;
    pub use internal::listener::functions::*;
    pub use internal::listener::structs::*;
    pub use internal::listener::traits::*;
}

/// 会话协作方
pub mod session {
    use crate::internal;
    pub use internal::session::structs::*;
    pub use internal::session::traits::*;
}

/// 连接事件观察者与账号包装
pub mod connection {
    use crate::internal;
    pub use internal::connection::structs::*;
}

/// 客户端配置：传输分块、展示名长度与等待超时
pub mod config {
    use crate::internal;
    pub use internal::config::structs::*;
}

/// 日志辅助：传输的 tracing span
pub mod logging {
    use crate::internal;
    pub use internal::logging::*;
}
