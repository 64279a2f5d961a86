pub mod account;
pub mod connection_event_observer;
pub mod observer_error;

// 重导出公共类型
pub use account::Account;
pub use connection_event_observer::ConnectionEventObserver;
pub use observer_error::ObserverError;
