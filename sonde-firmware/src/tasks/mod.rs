//! Embassy tasks
//!
//! Exactly one of these runs, chosen by `[debug] relay` in sonde.toml.

pub mod receiver;
pub mod relay;

pub use receiver::{receiver_task, SondeReceiver};
pub use relay::relay_task;
