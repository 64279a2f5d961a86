pub mod transfer_listeners;

pub use transfer_listeners::TransferListeners;
