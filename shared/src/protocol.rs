//! Gateway wire messages
//!
//! Declared directly with `prost` derives. Field tags are part of the wire
//! contract between the controller and its clients; never renumber them.
//!
//! The derive generates `Request::action()` and `Response::status()`; both
//! decode unknown values to the zero variant.

use prost::{Enumeration, Message};

/// Operation requested from the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum Action {
    Unknown = 0,
    Connect = 1,
    Battery = 2,
    Takeoff = 3,
    Land = 4,
    Move = 5,
    Rotate = 6,
    Disconnect = 7,
    Status = 8,
}

/// Outcome tag of a response
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum ReplyStatus {
    ReplyUnknown = 0,
    ReplySuccess = 1,
    ReplyFailure = 2,
}

/// A single request sent to the controller gateway
#[derive(Clone, PartialEq, Message)]
pub struct Request {
    #[prost(uint64, tag = "1")]
    pub request_id: u64,

    #[prost(enumeration = "Action", tag = "2")]
    pub action: i32,

    /// Move direction as typed by the caller (`forward`, `back`, ...)
    #[prost(string, optional, tag = "3")]
    pub direction: Option<String>,

    #[prost(int32, optional, tag = "4")]
    pub distance_cm: Option<i32>,

    #[prost(int32, optional, tag = "5")]
    pub angle_deg: Option<i32>,
}

/// The controller's answer to one [`Request`]
#[derive(Clone, PartialEq, Message)]
pub struct Response {
    #[prost(uint64, tag = "1")]
    pub request_id: u64,

    #[prost(enumeration = "ReplyStatus", tag = "2")]
    pub status: i32,

    #[prost(string, tag = "3")]
    pub message: String,

    /// Last battery percentage the session has seen, if any
    #[prost(uint32, optional, tag = "4")]
    pub battery_percent: Option<u32>,

    /// Session connection state after the request was handled
    #[prost(bool, tag = "5")]
    pub connected: bool,

    #[prost(uint64, tag = "6")]
    pub processing_time_ms: u64,
}

impl Request {
    /// Create a request carrying no parameters
    pub fn new(request_id: u64, action: Action) -> Self {
        Self {
            request_id,
            action: action.into(),
            ..Default::default()
        }
    }

    /// Create a move request; `None` fields fall back to controller defaults
    pub fn movement(request_id: u64, direction: Option<String>, distance_cm: Option<i32>) -> Self {
        Self {
            direction,
            distance_cm,
            ..Self::new(request_id, Action::Move)
        }
    }

    /// Create a clockwise rotation request
    pub fn rotation(request_id: u64, angle_deg: Option<i32>) -> Self {
        Self {
            angle_deg,
            ..Self::new(request_id, Action::Rotate)
        }
    }
}

impl Response {
    pub fn success(request_id: u64, message: impl Into<String>) -> Self {
        Self {
            request_id,
            status: ReplyStatus::ReplySuccess.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn failure(request_id: u64, message: impl Into<String>) -> Self {
        Self {
            request_id,
            status: ReplyStatus::ReplyFailure.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == ReplyStatus::ReplySuccess
    }
}
