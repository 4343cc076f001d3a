//! Drone control session
//!
//! This module handles:
//! - Tracking whether the drone is connected
//! - Gating every command on the connection state
//! - Serializing access so only one command reaches the link at a time

mod handle;
mod machine;

pub use handle::SessionHandle;
pub use machine::{ConnectionState, Session};
