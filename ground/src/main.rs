mod client;

use clap::{Parser, Subcommand};
use client::GatewayClient;
use skyhop_shared::{defaults, Action, Request};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Send one command to a skyhop controller
#[derive(Parser, Debug)]
#[command(name = "skyhop-ground", version, about)]
struct Cli {
    /// Controller gateway address
    #[arg(long, env = "SKYHOP_GATEWAY", default_value = defaults::GATEWAY_CLIENT_ADDRESS)]
    gateway: String,

    /// How long to wait for the controller, in milliseconds
    #[arg(long, default_value_t = 60_000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: GroundCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum GroundCommand {
    /// Connect the controller to the drone
    Connect,
    /// Read the battery level
    Battery,
    Takeoff,
    Land,
    /// Move in a direction (forward, back, left, right, up, down)
    Move {
        direction: Option<String>,
        /// Distance in centimeters
        #[arg(long, allow_hyphen_values = true)]
        distance: Option<i32>,
    },
    /// Rotate clockwise
    Rotate {
        /// Angle in degrees
        #[arg(long, allow_hyphen_values = true)]
        angle: Option<i32>,
    },
    /// End the drone connection
    Disconnect,
    /// Show the controller's session state
    Status,
}

impl GroundCommand {
    /// Build the request; the client assigns the id
    fn into_request(self) -> Request {
        match self {
            GroundCommand::Connect => Request::new(0, Action::Connect),
            GroundCommand::Battery => Request::new(0, Action::Battery),
            GroundCommand::Takeoff => Request::new(0, Action::Takeoff),
            GroundCommand::Land => Request::new(0, Action::Land),
            GroundCommand::Move {
                direction,
                distance,
            } => Request::movement(0, direction, distance),
            GroundCommand::Rotate { angle } => Request::rotation(0, angle),
            GroundCommand::Disconnect => Request::new(0, Action::Disconnect),
            GroundCommand::Status => Request::new(0, Action::Status),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .init();

    let cli = Cli::parse();

    let mut client =
        GatewayClient::connect(&cli.gateway, Duration::from_millis(cli.timeout_ms)).await?;
    let response = client.request(cli.command.into_request()).await?;

    println!("{}", response.message);
    if let Some(percent) = response.battery_percent {
        println!("  battery: {}%", percent);
    }
    println!(
        "  session: {} ({}ms)",
        if response.connected { "connected" } else { "disconnected" },
        response.processing_time_ms
    );

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
