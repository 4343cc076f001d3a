//! Session state machine
//!
//! Owns the vehicle link and the connection state. Every command is gated on
//! the state, and every link fault is folded into a [`CommandResult`].

use crate::command::{translate_move, translate_rotate, Command, CommandResult, TranslationError};
use crate::link::{LinkError, VehicleLink};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Connection state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::Connected => write!(f, "Connected"),
        }
    }
}

/// Why a session operation did not succeed
#[derive(Error, Debug)]
enum SessionError {
    #[error("Drone not connected.")]
    NotConnected,

    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error("{context}: {source}")]
    Link {
        context: &'static str,
        source: LinkError,
    },
}

/// Attach the user-facing context of an operation to a link error
fn link_failed(context: &'static str) -> impl FnOnce(LinkError) -> SessionError {
    move |source| SessionError::Link { context, source }
}

/// Control session for one drone
pub struct Session<L> {
    link: L,
    state: ConnectionState,
    last_known_battery: Option<u8>,
}

impl<L: VehicleLink> Session<L> {
    /// Create a disconnected session over `link`
    pub fn new(link: L) -> Self {
        Self {
            link,
            state: ConnectionState::Disconnected,
            last_known_battery: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Battery percentage from the last successful battery query
    pub fn last_known_battery(&self) -> Option<u8> {
        self.last_known_battery
    }

    /// Run one command to completion
    pub async fn apply(&mut self, command: Command) -> CommandResult {
        debug!("[SESSION] Applying {:?} in state {}", command, self.state);

        match command {
            Command::Connect => self.connect().await,
            Command::QueryBattery => self.battery().await,
            Command::TakeOff => self.takeoff().await,
            Command::Land => self.land().await,
            Command::Move {
                direction,
                distance_cm,
            } => self.move_in(&direction, distance_cm).await,
            Command::Rotate { angle_deg } => self.rotate(angle_deg).await,
            Command::Disconnect => self.disconnect().await,
            Command::Status => self.status(),
        }
    }

    /// Open the link; any failure leaves the session disconnected
    pub async fn connect(&mut self) -> CommandResult {
        info!("[SESSION] Connecting via {} link", self.link.name());

        let outcome = match self.link.connect().await {
            Ok(()) => {
                self.state = ConnectionState::Connected;
                Ok("Drone connected successfully.".to_string())
            }
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                self.last_known_battery = None;
                Err(link_failed("Error connecting to the drone")(e))
            }
        };

        self.finish("connect", outcome)
    }

    pub async fn battery(&mut self) -> CommandResult {
        let outcome = self.read_battery().await;
        self.finish("battery", outcome)
    }

    pub async fn takeoff(&mut self) -> CommandResult {
        let outcome = match self.require_connected() {
            Ok(()) => self
                .link
                .takeoff()
                .await
                .map(|_| "Drone is taking off.".to_string())
                .map_err(link_failed("Error taking off")),
            Err(e) => Err(e),
        };

        self.finish("takeoff", outcome)
    }

    pub async fn land(&mut self) -> CommandResult {
        let outcome = match self.require_connected() {
            Ok(()) => self
                .link
                .land()
                .await
                .map(|_| "Drone is landing.".to_string())
                .map_err(link_failed("Error landing")),
            Err(e) => Err(e),
        };

        self.finish("land", outcome)
    }

    /// Move in `direction`; `None` distance means the default
    pub async fn move_in(&mut self, direction: &str, distance_cm: Option<i32>) -> CommandResult {
        let outcome = self.try_move(direction, distance_cm).await;
        self.finish("move", outcome)
    }

    /// Rotate clockwise; `None` angle means the default
    pub async fn rotate(&mut self, angle_deg: Option<i32>) -> CommandResult {
        let outcome = self.try_rotate(angle_deg).await;
        self.finish("rotate", outcome)
    }

    /// Tear the link down; the session ends up disconnected either way
    pub async fn disconnect(&mut self) -> CommandResult {
        let teardown = self.link.disconnect().await;
        self.state = ConnectionState::Disconnected;
        self.last_known_battery = None;

        let outcome = teardown
            .map(|_| "Connection to the drone ended.".to_string())
            .map_err(link_failed("Error ending the drone connection"));

        self.finish("disconnect", outcome)
    }

    /// Report the state without touching the link
    pub fn status(&self) -> CommandResult {
        let outcome = self.require_connected().map(|_| match self.last_known_battery {
            Some(percent) => format!("Drone connected. Last battery: {}%.", percent),
            None => "Drone connected. Battery not read yet.".to_string(),
        });

        self.finish("status", outcome)
    }

    fn require_connected(&self) -> Result<(), SessionError> {
        match self.state {
            ConnectionState::Connected => Ok(()),
            ConnectionState::Disconnected => Err(SessionError::NotConnected),
        }
    }

    async fn read_battery(&mut self) -> Result<String, SessionError> {
        self.require_connected()?;

        let percent = self
            .link
            .battery()
            .await
            .map_err(link_failed("Error reading the battery"))?;
        self.last_known_battery = Some(percent);

        Ok(format!("Battery: {}%", percent))
    }

    async fn try_move(&mut self, direction: &str, distance_cm: Option<i32>) -> Result<String, SessionError> {
        self.require_connected()?;

        let motion = translate_move(direction, distance_cm)?;
        motion
            .issue(&mut self.link)
            .await
            .map_err(link_failed("Error moving the drone"))?;

        Ok(motion.describe())
    }

    async fn try_rotate(&mut self, angle_deg: Option<i32>) -> Result<String, SessionError> {
        self.require_connected()?;

        let motion = translate_rotate(angle_deg);
        motion
            .issue(&mut self.link)
            .await
            .map_err(link_failed("Error rotating the drone"))?;

        Ok(motion.describe())
    }

    /// Log and normalize the outcome of an operation
    fn finish(&self, operation: &str, outcome: Result<String, SessionError>) -> CommandResult {
        match outcome {
            Ok(message) => {
                info!("[SESSION] {} succeeded: {}", operation, message);
                CommandResult::success(message)
            }
            Err(e) => {
                warn!("[SESSION] {} failed ({}): {}", operation, self.state, e);
                CommandResult::failure(e.to_string())
            }
        }
    }
}
