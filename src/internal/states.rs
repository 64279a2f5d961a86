pub mod reactive_core;
pub(crate) mod task_queue;
