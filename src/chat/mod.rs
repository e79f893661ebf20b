//! Chat: the guided assessment conversation.
//!
//! ARCHITECTURE
//! ============
//! `machine` is the controller; it owns a `log` of messages and the
//! selections `context` for one conversation. Nothing here performs I/O:
//! advisor calls and delays are returned as effects and executed by
//! `services::session`.

pub mod context;
pub mod copy;
pub mod log;
pub mod machine;
pub mod message;
pub mod options;
