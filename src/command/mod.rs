//! Commands accepted by the session
//!
//! This module handles:
//! - The semantic command set callers can request
//! - The uniform success/failure result every session operation returns
//! - Translating move/rotate commands into link primitives

mod result;
mod translator;

pub use result::CommandResult;
pub use translator::{translate_move, translate_rotate, TranslationError};

use skyhop_shared::{defaults, Action, Request};

/// A semantic request for one session operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect,
    QueryBattery,
    TakeOff,
    Land,
    /// Direction is kept as typed; it is validated by the translator
    Move {
        direction: String,
        distance_cm: Option<i32>,
    },
    Rotate {
        angle_deg: Option<i32>,
    },
    Disconnect,
    Status,
}

impl Command {
    /// Build a command from a gateway request
    ///
    /// Returns `None` for actions this controller does not implement.
    pub fn from_request(request: &Request) -> Option<Self> {
        let command = match request.action() {
            Action::Connect => Command::Connect,
            Action::Battery => Command::QueryBattery,
            Action::Takeoff => Command::TakeOff,
            Action::Land => Command::Land,
            Action::Move => Command::Move {
                direction: request
                    .direction
                    .clone()
                    .unwrap_or_else(|| defaults::MOVE_DIRECTION.to_string()),
                distance_cm: request.distance_cm,
            },
            Action::Rotate => Command::Rotate {
                angle_deg: request.angle_deg,
            },
            Action::Disconnect => Command::Disconnect,
            Action::Status => Command::Status,
            Action::Unknown => return None,
        };

        Some(command)
    }
}
