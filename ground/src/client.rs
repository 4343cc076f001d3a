//! Gateway client connection

use anyhow::{anyhow, Context, Result};
use skyhop_shared::{
    codec::{self, FrameDecoder},
    Request, Response,
};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// A connection to the controller gateway
pub struct GatewayClient {
    stream: TcpStream,
    decoder: FrameDecoder,
    read_buf: Vec<u8>,
    next_request_id: u64,
    request_timeout: Duration,
}

impl GatewayClient {
    /// Connect to the gateway at `address`
    pub async fn connect(address: &str, request_timeout: Duration) -> Result<Self> {
        let stream = timeout(request_timeout, TcpStream::connect(address))
            .await
            .map_err(|_| anyhow!("Timed out connecting to {}", address))?
            .with_context(|| format!("Failed to connect to {}", address))?;

        debug!("Connected to gateway {}", address);

        Ok(Self {
            stream,
            decoder: FrameDecoder::new(),
            read_buf: vec![0u8; 4096],
            next_request_id: 1,
            request_timeout,
        })
    }

    /// Send a request and wait for the response carrying its id
    ///
    /// The request id is assigned here.
    pub async fn request(&mut self, mut request: Request) -> Result<Response> {
        request.request_id = self.next_request_id;
        self.next_request_id += 1;

        let encoded = codec::encode(&request)?;
        self.stream.write_all(&encoded).await?;
        debug!("Sent request id={} action={:?}", request.request_id, request.action());

        timeout(self.request_timeout, self.read_response(request.request_id))
            .await
            .map_err(|_| anyhow!("No response within {:?}", self.request_timeout))?
    }

    async fn read_response(&mut self, request_id: u64) -> Result<Response> {
        loop {
            while let Some(response) = self.decoder.decode_next::<Response>()? {
                if response.request_id == request_id {
                    return Ok(response);
                }
                debug!("Ignoring response for request {}", response.request_id);
            }

            let n = self.stream.read(&mut self.read_buf).await?;
            if n == 0 {
                return Err(anyhow!("Gateway closed the connection"));
            }
            self.decoder.extend(&self.read_buf[..n]);
        }
    }
}
