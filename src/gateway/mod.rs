//! API gateway
//!
//! Exposes the session to ground stations over TCP using the shared
//! length-prefixed codec.

mod server;

pub use server::{Gateway, GatewayConfig};
