pub mod config;
pub mod connection;
pub mod listener;
pub mod logging;
pub mod presentation;
pub mod session;
pub mod states;
pub mod transfer;
pub mod ui_thread;
