//! Vehicle link
//!
//! The only layer that talks to the drone. Everything above it sees the link
//! through the [`VehicleLink`] trait.

#[cfg(test)]
pub mod scripted;
mod tello;
mod traits;

pub use tello::{TelloConfig, TelloLink};
pub use traits::{LinkError, VehicleLink};
