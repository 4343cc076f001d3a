//! Vehicle link trait abstraction for pluggable drone backends

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a vehicle link call
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("link is not open")]
    NotOpen,

    #[error("no response to '{command}' within {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("drone rejected '{command}': {reply}")]
    Rejected { command: String, reply: String },

    #[error("unexpected reply to '{command}': {reply}")]
    InvalidReply { command: String, reply: String },
}

/// Primitive operations understood by the drone
///
/// Every call is a single attempt. Implementations never retry and never
/// panic on link faults; they return a [`LinkError`] instead.
#[async_trait]
pub trait VehicleLink: Send {
    /// Open the link and put the drone into command mode
    async fn connect(&mut self) -> Result<(), LinkError>;

    /// Tear the link down (best effort)
    async fn disconnect(&mut self) -> Result<(), LinkError>;

    /// Battery charge in percent
    async fn battery(&mut self) -> Result<u8, LinkError>;

    async fn takeoff(&mut self) -> Result<(), LinkError>;

    async fn land(&mut self) -> Result<(), LinkError>;

    async fn move_forward(&mut self, distance_cm: u32) -> Result<(), LinkError>;

    async fn move_back(&mut self, distance_cm: u32) -> Result<(), LinkError>;

    async fn move_left(&mut self, distance_cm: u32) -> Result<(), LinkError>;

    async fn move_right(&mut self, distance_cm: u32) -> Result<(), LinkError>;

    async fn move_up(&mut self, distance_cm: u32) -> Result<(), LinkError>;

    async fn move_down(&mut self, distance_cm: u32) -> Result<(), LinkError>;

    /// Rotate clockwise; the value is passed to the drone unmodified
    async fn rotate_clockwise(&mut self, degrees: i32) -> Result<(), LinkError>;

    /// Human-readable name for this link
    fn name(&self) -> &'static str;
}
