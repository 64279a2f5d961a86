pub mod connection_state;
pub mod event_hub;
pub mod loopback_session;
pub(crate) mod loopback_transport;
pub mod session_event;
pub mod subscription;

// 重导出公共类型
pub use connection_state::ConnectionState;
pub use event_hub::SessionEventHub;
pub use loopback_session::LoopbackSession;
pub use session_event::SessionEvent;
pub use subscription::{Subscriber, Subscription, SubscriptionHandle, subscription_channel};
