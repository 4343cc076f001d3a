//! Shared, serialized access to the session

use super::machine::{ConnectionState, Session};
use crate::command::{Command, CommandResult};
use crate::link::VehicleLink;
use skyhop_shared::{now_ms, Request, Response};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Cloneable handle to the one session of this process
///
/// Each operation holds the session lock until the link call and the state
/// update are both done, so commands never interleave.
pub struct SessionHandle<L> {
    inner: Arc<Mutex<Session<L>>>,
}

impl<L> Clone for SessionHandle<L> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<L: VehicleLink> SessionHandle<L> {
    pub fn new(session: Session<L>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Run one command to completion
    pub async fn apply(&self, command: Command) -> CommandResult {
        self.inner.lock().await.apply(command).await
    }

    /// Handle a gateway request and build its response
    pub async fn execute(&self, request: &Request) -> Response {
        let mut session = self.inner.lock().await;
        let start_time = now_ms();

        debug!(
            "[SESSION] Executing request: id={} action={:?}",
            request.request_id,
            request.action()
        );

        let result = match Command::from_request(request) {
            Some(command) => session.apply(command).await,
            None => {
                warn!("[SESSION] Rejecting request {}: unknown action {}", request.request_id, request.action);
                CommandResult::failure("unknown action")
            }
        };

        let mut response = result.into_response(request.request_id);
        response.connected = session.is_connected();
        response.battery_percent = session.last_known_battery().map(u32::from);
        response.processing_time_ms = now_ms().saturating_sub(start_time);

        response
    }

    pub async fn state(&self) -> ConnectionState {
        self.inner.lock().await.state()
    }
}
