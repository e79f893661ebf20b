//! Domain services used by websocket and HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own session lifecycles and background work so route
//! handlers can stay focused on protocol translation.

pub mod session;
pub mod sweeper;
