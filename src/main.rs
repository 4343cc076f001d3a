mod command;
mod config;
mod gateway;
mod link;
mod session;

use clap::Parser;
use config::Args;
use gateway::Gateway;
use link::{TelloLink, VehicleLink};
use session::{ConnectionState, Session, SessionHandle};

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = Args::parse();
    let tello_config = args.tello_config();
    let gateway_config = args.gateway_config();

    info!("skyhop controller starting");
    info!("  Drone: {}", tello_config.drone_address);

    let link = TelloLink::new(tello_config);
    info!("{} link ready (session disconnected)", link.name());

    let session = SessionHandle::new(Session::new(link));
    let gateway = Gateway::bind(&gateway_config, session.clone()).await?;
    info!("skyhop controller ready, gateway on {}", gateway.local_addr()?);

    tokio::select! {
        result = gateway.run() => {
            if let Err(e) = &result {
                error!("Gateway stopped: {}", e);
            }
            shutdown(&session).await;
            result
        }
        _ = shutdown_signal() => {
            info!("Shutdown requested");
            shutdown(&session).await;
            Ok(())
        }
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Release the drone before the process exits
async fn shutdown<L: VehicleLink>(session: &SessionHandle<L>) {
    if session.state().await == ConnectionState::Disconnected {
        return;
    }

    let result = session.apply(command::Command::Disconnect).await;
    if result.is_success() {
        info!("{}", result);
    } else {
        warn!("Disconnect on shutdown: {}", result);
    }
}
