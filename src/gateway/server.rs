//! TCP API gateway
//!
//! Accepts ground-station connections, decodes framed [`Request`]s, runs them
//! against the session and writes back framed [`Response`]s.

use crate::link::VehicleLink;
use crate::session::SessionHandle;
use anyhow::{anyhow, Result};
use skyhop_shared::{
    codec::{self, FrameDecoder},
    defaults, Request,
};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

/// Configuration for the API gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address the gateway listens on
    pub listen_address: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_address: defaults::GATEWAY_ADDRESS.into(),
        }
    }
}

/// Network front end of the session
pub struct Gateway<L> {
    listener: TcpListener,
    session: SessionHandle<L>,
}

impl<L: VehicleLink + 'static> Gateway<L> {
    /// Bind the listener; requests are served once [`Gateway::run`] is called
    pub async fn bind(config: &GatewayConfig, session: SessionHandle<L>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_address).await?;
        info!("[GATEWAY] Listening on {}", listener.local_addr()?);

        Ok(Self { listener, session })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept clients until the listener fails
    pub async fn run(self) -> Result<()> {
        loop {
            let (socket, addr) = self.listener.accept().await?;
            info!("[GATEWAY] Client connected: {}", addr);

            let session = self.session.clone();
            tokio::spawn(async move {
                match serve_client(socket, addr, session).await {
                    Ok(()) => info!("[GATEWAY] Client disconnected: {}", addr),
                    Err(e) => warn!("[GATEWAY] Dropping client {}: {}", addr, e),
                }
            });
        }
    }
}

/// Serve every request one client sends until it hangs up
async fn serve_client<L: VehicleLink + 'static>(
    mut socket: TcpStream,
    addr: SocketAddr,
    session: SessionHandle<L>,
) -> Result<()> {
    let mut decoder = FrameDecoder::new();
    let mut buf = vec![0u8; 4096];

    loop {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            if decoder.pending_len() > 0 {
                return Err(anyhow!("connection closed mid-frame"));
            }
            return Ok(());
        }
        decoder.extend(&buf[..n]);

        // Process all complete frames
        while let Some(request) = decoder.decode_next::<Request>()? {
            debug!(
                "[GATEWAY] {} -> request id={} action={:?}",
                addr,
                request.request_id,
                request.action()
            );

            let response = session.execute(&request).await;
            let encoded = match codec::encode(&response) {
                Ok(encoded) => encoded,
                Err(e) => {
                    error!("[GATEWAY] Failed to encode response {}: {}", request.request_id, e);
                    return Err(e.into());
                }
            };
            socket.write_all(&encoded).await?;
        }
    }
}
