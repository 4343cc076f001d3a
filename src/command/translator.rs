//! Command translation
//!
//! Turns semantic move/rotate commands into the single link primitive that
//! carries them out. Validation happens here, before any link call.

use crate::link::{LinkError, VehicleLink};
use skyhop_shared::defaults;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Caller input that cannot be turned into a primitive
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("unknown direction: {0}")]
    UnknownDirection(String),

    #[error("invalid distance: {0} cm (must be positive)")]
    InvalidDistance(i32),
}

/// Directions the drone can move in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Forward,
        Direction::Back,
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Back => "back",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Direction::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TranslationError::UnknownDirection(wanted.to_string()))
    }
}

/// A validated primitive ready to be issued on a link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Move { direction: Direction, distance_cm: u32 },
    RotateClockwise { degrees: i32 },
}

/// Translate a move request; a missing distance means the default
pub fn translate_move(direction: &str, distance_cm: Option<i32>) -> Result<Motion, TranslationError> {
    let direction = direction.parse::<Direction>()?;
    let distance = distance_cm.unwrap_or(defaults::MOVE_DISTANCE_CM);

    // Upper bounds are the drone's call
    let distance_cm = u32::try_from(distance)
        .ok()
        .filter(|d| *d > 0)
        .ok_or(TranslationError::InvalidDistance(distance))?;

    Ok(Motion::Move {
        direction,
        distance_cm,
    })
}

/// Translate a rotation request; the angle is passed through unvalidated
pub fn translate_rotate(angle_deg: Option<i32>) -> Motion {
    Motion::RotateClockwise {
        degrees: angle_deg.unwrap_or(defaults::ROTATION_DEG),
    }
}

impl Motion {
    /// Issue exactly one link primitive for this motion
    pub async fn issue<L: VehicleLink + ?Sized>(&self, link: &mut L) -> Result<(), LinkError> {
        match *self {
            Motion::Move {
                direction,
                distance_cm,
            } => match direction {
                Direction::Forward => link.move_forward(distance_cm).await,
                Direction::Back => link.move_back(distance_cm).await,
                Direction::Left => link.move_left(distance_cm).await,
                Direction::Right => link.move_right(distance_cm).await,
                Direction::Up => link.move_up(distance_cm).await,
                Direction::Down => link.move_down(distance_cm).await,
            },
            Motion::RotateClockwise { degrees } => link.rotate_clockwise(degrees).await,
        }
    }

    /// Message reported once the link acknowledged the motion
    pub fn describe(&self) -> String {
        match self {
            Motion::Move {
                direction,
                distance_cm,
            } => format!("Drone moved {} by {} cm.", direction, distance_cm),
            Motion::RotateClockwise { degrees } => format!("Drone rotated {} degrees.", degrees),
        }
    }
}
