//! Controller configuration from flags and environment

use crate::gateway::GatewayConfig;
use crate::link::TelloConfig;
use clap::Parser;
use std::time::Duration;

/// Control session controller for a single Tello drone
#[derive(Parser, Debug, Clone)]
#[command(name = "skyhop-controller", version, about)]
pub struct Args {
    /// Address the API gateway listens on
    #[arg(long, env = "SKYHOP_LISTEN", default_value = skyhop_shared::defaults::GATEWAY_ADDRESS)]
    pub listen: String,

    /// Command endpoint of the drone
    #[arg(long, env = "SKYHOP_DRONE", default_value = "192.168.10.1:8889")]
    pub drone: String,

    /// Local address for the drone command socket
    #[arg(long, env = "SKYHOP_LOCAL", default_value = "0.0.0.0:8889")]
    pub local: String,

    /// Reply timeout for queries, in milliseconds
    #[arg(long, env = "SKYHOP_RESPONSE_TIMEOUT_MS", default_value_t = 7_000)]
    pub response_timeout_ms: u64,

    /// Reply timeout for takeoff/land/move/rotate, in milliseconds
    #[arg(long, env = "SKYHOP_MOTION_TIMEOUT_MS", default_value_t = 20_000)]
    pub motion_timeout_ms: u64,
}

impl Args {
    pub fn tello_config(&self) -> TelloConfig {
        TelloConfig {
            drone_address: self.drone.clone(),
            local_address: self.local.clone(),
            response_timeout: Duration::from_millis(self.response_timeout_ms),
            motion_timeout: Duration::from_millis(self.motion_timeout_ms),
        }
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            listen_address: self.listen.clone(),
        }
    }
}
