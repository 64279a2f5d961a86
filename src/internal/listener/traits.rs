pub mod transfer_prompt;

pub use transfer_prompt::TransferPrompt;
