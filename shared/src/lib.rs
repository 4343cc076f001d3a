//! skyhop shared protocol types
//!
//! Wire messages and framing shared by the controller's API gateway and the
//! ground-station client.

pub mod codec;
pub mod protocol;

use std::time::{SystemTime, UNIX_EPOCH};

pub use protocol::*;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Defaults shared by the controller and its clients
pub mod defaults {
    /// Move distance used when a request leaves it out
    pub const MOVE_DISTANCE_CM: i32 = 50;

    /// Clockwise rotation used when a request leaves it out
    pub const ROTATION_DEG: i32 = 90;

    /// Direction used when a move request leaves it out
    pub const MOVE_DIRECTION: &str = "forward";

    /// Address the controller gateway listens on
    pub const GATEWAY_ADDRESS: &str = "0.0.0.0:5000";

    /// Address clients dial by default
    pub const GATEWAY_CLIENT_ADDRESS: &str = "127.0.0.1:5000";
}
