//! Tello SDK link
//!
//! Speaks the Tello text protocol over UDP: every command is one ASCII
//! datagram and the drone answers each with one datagram (`ok`, `error ...`,
//! or a value for queries such as `battery?`).

use super::traits::{LinkError, VehicleLink};
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Configuration for the Tello link
#[derive(Debug, Clone)]
pub struct TelloConfig {
    /// Command endpoint of the drone
    pub drone_address: String,
    /// Local address the command socket binds to
    pub local_address: String,
    /// How long to wait for the reply to a query or mode command
    pub response_timeout: Duration,
    /// How long to wait for takeoff/land/move/rotate to be acknowledged
    pub motion_timeout: Duration,
}

impl Default for TelloConfig {
    fn default() -> Self {
        Self {
            drone_address: "192.168.10.1:8889".into(),
            local_address: "0.0.0.0:8889".into(),
            response_timeout: Duration::from_secs(7),
            // The drone only answers a motion command once it has finished it
            motion_timeout: Duration::from_secs(20),
        }
    }
}

/// Vehicle link to a DJI/Ryze Tello over its UDP command port
pub struct TelloLink {
    config: TelloConfig,
    socket: Option<UdpSocket>,
    /// Set after an acknowledged takeoff; cleared after an acknowledged land
    /// or a teardown. Survives a reconnect.
    airborne: bool,
}

impl TelloLink {
    pub fn new(config: TelloConfig) -> Self {
        Self {
            config,
            socket: None,
            airborne: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.socket.is_some()
    }

    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    /// Send one command and wait for its reply
    async fn send_command(&self, command: &str, wait: Duration) -> Result<String, LinkError> {
        let socket = self.socket.as_ref().ok_or(LinkError::NotOpen)?;
        let mut buf = [0u8; 1024];

        // Replies to earlier, timed-out commands must not be read as ours
        while let Ok(n) = socket.try_recv(&mut buf) {
            debug!(
                "[TELLO] Discarding stale reply: {}",
                String::from_utf8_lossy(&buf[..n]).trim()
            );
        }

        debug!("[TELLO] -> {}", command);
        socket.send(command.as_bytes()).await?;

        match timeout(wait, socket.recv(&mut buf)).await {
            Ok(Ok(n)) => {
                let reply = String::from_utf8_lossy(&buf[..n]).trim().to_string();
                debug!("[TELLO] <- {}", reply);
                Ok(reply)
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(LinkError::Timeout {
                command: command.to_string(),
                timeout: wait,
            }),
        }
    }

    /// Send a command that the drone acknowledges with `ok`
    async fn send_control(&self, command: &str, wait: Duration) -> Result<(), LinkError> {
        let reply = self.send_command(command, wait).await?;

        if reply.eq_ignore_ascii_case("ok") {
            Ok(())
        } else {
            Err(LinkError::Rejected {
                command: command.to_string(),
                reply,
            })
        }
    }

    async fn send_motion(&self, command: String) -> Result<(), LinkError> {
        self.send_control(&command, self.config.motion_timeout).await
    }
}

#[async_trait]
impl VehicleLink for TelloLink {
    async fn connect(&mut self) -> Result<(), LinkError> {
        info!("[TELLO] Connecting to {}", self.config.drone_address);

        // A reconnect must release the previous socket before binding again
        self.socket = None;
        let socket = UdpSocket::bind(&self.config.local_address).await?;
        socket.connect(&self.config.drone_address).await?;
        self.socket = Some(socket);

        // Enter SDK mode
        if let Err(e) = self.send_control("command", self.config.response_timeout).await {
            warn!("[TELLO] Drone did not enter SDK mode: {}", e);
            self.socket = None;
            return Err(e);
        }

        info!("[TELLO] SDK mode active");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), LinkError> {
        if !self.is_open() {
            return Ok(());
        }

        let landing = if self.is_airborne() {
            info!("[TELLO] Landing before closing the link");
            self.land().await
        } else {
            Ok(())
        };

        self.socket = None;
        self.airborne = false;
        info!("[TELLO] Link closed");

        landing
    }

    async fn battery(&mut self) -> Result<u8, LinkError> {
        let command = "battery?";
        let reply = self
            .send_command(command, self.config.response_timeout)
            .await?;

        match reply.parse::<u8>() {
            Ok(percent) if percent <= 100 => Ok(percent),
            _ => Err(LinkError::InvalidReply {
                command: command.to_string(),
                reply,
            }),
        }
    }

    async fn takeoff(&mut self) -> Result<(), LinkError> {
        self.send_motion("takeoff".into()).await?;
        self.airborne = true;
        Ok(())
    }

    async fn land(&mut self) -> Result<(), LinkError> {
        self.send_motion("land".into()).await?;
        self.airborne = false;
        Ok(())
    }

    async fn move_forward(&mut self, distance_cm: u32) -> Result<(), LinkError> {
        self.send_motion(format!("forward {}", distance_cm)).await
    }

    async fn move_back(&mut self, distance_cm: u32) -> Result<(), LinkError> {
        self.send_motion(format!("back {}", distance_cm)).await
    }

    async fn move_left(&mut self, distance_cm: u32) -> Result<(), LinkError> {
        self.send_motion(format!("left {}", distance_cm)).await
    }

    async fn move_right(&mut self, distance_cm: u32) -> Result<(), LinkError> {
        self.send_motion(format!("right {}", distance_cm)).await
    }

    async fn move_up(&mut self, distance_cm: u32) -> Result<(), LinkError> {
        self.send_motion(format!("up {}", distance_cm)).await
    }

    async fn move_down(&mut self, distance_cm: u32) -> Result<(), LinkError> {
        self.send_motion(format!("down {}", distance_cm)).await
    }

    async fn rotate_clockwise(&mut self, degrees: i32) -> Result<(), LinkError> {
        self.send_motion(format!("cw {}", degrees)).await
    }

    fn name(&self) -> &'static str {
        "Tello"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::sync::mpsc;

    /// Fake drone on loopback: records every command and sends back each
    /// datagram `reply` returns for it, in order
    async fn fake_drone(
        reply: fn(&str) -> Vec<&'static str>,
    ) -> (SocketAddr, mpsc::UnboundedReceiver<String>) {
        let socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind fake drone");
        let addr = socket.local_addr().expect("fake drone addr");
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut buf = [0u8; 256];
            while let Ok((n, from)) = socket.recv_from(&mut buf).await {
                let command = String::from_utf8_lossy(&buf[..n]).to_string();
                let answers = reply(&command);
                let _ = tx.send(command);
                for answer in answers {
                    let _ = socket.send_to(answer.as_bytes(), from).await;
                }
            }
        });

        (addr, rx)
    }

    fn test_config(drone: SocketAddr) -> TelloConfig {
        TelloConfig {
            drone_address: drone.to_string(),
            local_address: "127.0.0.1:0".into(),
            response_timeout: Duration::from_millis(200),
            motion_timeout: Duration::from_millis(200),
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
        let mut commands = Vec::new();
        while let Ok(command) = rx.try_recv() {
            commands.push(command);
        }
        commands
    }

    fn cooperative(command: &str) -> Vec<&'static str> {
        match command {
            "battery?" => vec!["87\r\n"],
            c if c.starts_with("forward 900") => vec!["error Out of range"],
            _ => vec!["ok"],
        }
    }

    #[test]
    fn test_default_config() {
        let config = TelloConfig::default();
        assert_eq!(config.drone_address, "192.168.10.1:8889");
        assert_eq!(config.response_timeout, Duration::from_secs(7));
        assert!(config.motion_timeout > config.response_timeout);
    }

    #[tokio::test]
    async fn test_connect_enters_sdk_mode_and_reads_battery() {
        let (drone, mut commands) = fake_drone(cooperative).await;
        let mut link = TelloLink::new(test_config(drone));

        link.connect().await.expect("connect");
        assert!(link.is_open());
        assert_eq!(link.battery().await.expect("battery"), 87);

        assert_eq!(drain(&mut commands), vec!["command", "battery?"]);
    }

    #[tokio::test]
    async fn test_motion_commands_on_the_wire() {
        let (drone, mut commands) = fake_drone(cooperative).await;
        let mut link = TelloLink::new(test_config(drone));
        link.connect().await.expect("connect");

        link.move_forward(100).await.expect("forward");
        link.move_down(20).await.expect("down");
        link.rotate_clockwise(-45).await.expect("negative angles pass through");

        assert_eq!(
            drain(&mut commands),
            vec!["command", "forward 100", "down 20", "cw -45"]
        );
    }

    #[tokio::test]
    async fn test_rejection_surfaces_reply_text() {
        let (drone, _commands) = fake_drone(cooperative).await;
        let mut link = TelloLink::new(test_config(drone));
        link.connect().await.expect("connect");

        let err = link.move_forward(900).await.expect_err("out of range");
        assert!(matches!(err, LinkError::Rejected { .. }));
        assert!(err.to_string().contains("Out of range"));
    }

    #[tokio::test]
    async fn test_silent_drone_times_out_and_connect_releases_socket() {
        let (drone, _commands) = fake_drone(|_| Vec::new()).await;
        let mut link = TelloLink::new(test_config(drone));

        let err = link.connect().await.expect_err("no reply");
        assert!(matches!(err, LinkError::Timeout { .. }));
        assert!(!link.is_open());
    }

    #[tokio::test]
    async fn test_invalid_battery_reply() {
        let (drone, _commands) = fake_drone(|c| match c {
            "battery?" => vec!["unknown command"],
            _ => vec!["ok"],
        })
        .await;
        let mut link = TelloLink::new(test_config(drone));
        link.connect().await.expect("connect");

        let err = link.battery().await.expect_err("not a number");
        assert!(matches!(err, LinkError::InvalidReply { .. }));
    }

    #[tokio::test]
    async fn test_commands_before_connect_fail_without_io() {
        let mut link = TelloLink::new(TelloConfig::default());
        assert!(matches!(link.takeoff().await, Err(LinkError::NotOpen)));
        assert!(matches!(link.battery().await, Err(LinkError::NotOpen)));
        assert!(link.disconnect().await.is_ok());
    }

    #[tokio::test]
    async fn test_disconnect_lands_an_airborne_drone() {
        let (drone, mut commands) = fake_drone(cooperative).await;
        let mut link = TelloLink::new(test_config(drone));
        link.connect().await.expect("connect");
        link.takeoff().await.expect("takeoff");
        assert!(link.is_airborne());

        link.disconnect().await.expect("disconnect");
        assert!(!link.is_open());
        assert!(!link.is_airborne());
        assert_eq!(drain(&mut commands), vec!["command", "takeoff", "land"]);
    }

    #[tokio::test]
    async fn test_reconnect_in_flight_still_lands_on_disconnect() {
        let (drone, mut commands) = fake_drone(cooperative).await;
        let mut link = TelloLink::new(test_config(drone));
        link.connect().await.expect("connect");
        link.takeoff().await.expect("takeoff");

        link.connect().await.expect("reconnect");
        assert!(link.is_airborne());

        link.disconnect().await.expect("disconnect");
        assert!(!link.is_airborne());
        assert_eq!(
            drain(&mut commands),
            vec!["command", "takeoff", "command", "land"]
        );
    }

    #[tokio::test]
    async fn test_failed_landing_still_closes_the_link() {
        let (drone, mut commands) = fake_drone(|c| match c {
            "land" => vec!["error Motor stop"],
            _ => vec!["ok"],
        })
        .await;
        let mut link = TelloLink::new(test_config(drone));
        link.connect().await.expect("connect");
        link.takeoff().await.expect("takeoff");

        let err = link.disconnect().await.expect_err("landing rejected");
        assert!(matches!(err, LinkError::Rejected { .. }));
        assert!(!link.is_open());
        assert_eq!(drain(&mut commands), vec!["command", "takeoff", "land"]);
    }

    #[tokio::test]
    async fn test_stale_reply_is_not_taken_for_the_next_answer() {
        // The drone acknowledges SDK mode twice; the second `ok` is stale
        let (drone, _commands) = fake_drone(|c| match c {
            "command" => vec!["ok", "ok"],
            "battery?" => vec!["64"],
            _ => vec!["ok"],
        })
        .await;
        let mut link = TelloLink::new(test_config(drone));
        link.connect().await.expect("connect");
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(link.battery().await.expect("battery"), 64);
    }
}
