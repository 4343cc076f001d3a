//! In-memory vehicle link for tests
//!
//! Records every primitive call and fails the operations it is told to fail.

use super::traits::{LinkError, VehicleLink};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One primitive call as seen by the link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkCall {
    Connect,
    Disconnect,
    Battery,
    Takeoff,
    Land,
    MoveForward(u32),
    MoveBack(u32),
    MoveLeft(u32),
    MoveRight(u32),
    MoveUp(u32),
    MoveDown(u32),
    RotateClockwise(i32),
}

/// Operation names used to script failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkOp {
    Connect,
    Disconnect,
    Battery,
    Takeoff,
    Land,
    Move,
    Rotate,
}

impl LinkCall {
    fn op(&self) -> LinkOp {
        match self {
            LinkCall::Connect => LinkOp::Connect,
            LinkCall::Disconnect => LinkOp::Disconnect,
            LinkCall::Battery => LinkOp::Battery,
            LinkCall::Takeoff => LinkOp::Takeoff,
            LinkCall::Land => LinkOp::Land,
            LinkCall::MoveForward(_)
            | LinkCall::MoveBack(_)
            | LinkCall::MoveLeft(_)
            | LinkCall::MoveRight(_)
            | LinkCall::MoveUp(_)
            | LinkCall::MoveDown(_) => LinkOp::Move,
            LinkCall::RotateClockwise(_) => LinkOp::Rotate,
        }
    }
}

/// Shared view of the calls a [`ScriptedLink`] received
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<LinkCall>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl CallLog {
    pub fn calls(&self) -> Vec<LinkCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.calls().is_empty()
    }

    /// Highest number of calls that were ever running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

pub struct ScriptedLink {
    log: CallLog,
    failing: HashSet<LinkOp>,
    battery: u8,
    delay: Option<Duration>,
}

impl ScriptedLink {
    pub fn new() -> Self {
        Self {
            log: CallLog::default(),
            failing: HashSet::new(),
            battery: 87,
            delay: None,
        }
    }

    /// Make every call of `op` fail with a rejection
    pub fn failing(mut self, op: LinkOp) -> Self {
        self.failing.insert(op);
        self
    }

    pub fn with_battery(mut self, percent: u8) -> Self {
        self.battery = percent;
        self
    }

    /// Hold every call open for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    async fn call(&mut self, call: LinkCall) -> Result<(), LinkError> {
        let running = self.log.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.max_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Ok(mut calls) = self.log.calls.lock() {
            calls.push(call);
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&call.op()) {
            Err(LinkError::Rejected {
                command: format!("{:?}", call),
                reply: "error".into(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl VehicleLink for ScriptedLink {
    async fn connect(&mut self) -> Result<(), LinkError> {
        self.call(LinkCall::Connect).await
    }

    async fn disconnect(&mut self) -> Result<(), LinkError> {
        self.call(LinkCall::Disconnect).await
    }

    async fn battery(&mut self) -> Result<u8, LinkError> {
        self.call(LinkCall::Battery).await?;
        Ok(self.battery)
    }

    async fn takeoff(&mut self) -> Result<(), LinkError> {
        self.call(LinkCall::Takeoff).await
    }

    async fn land(&mut self) -> Result<(), LinkError> {
        self.call(LinkCall::Land).await
    }

    async fn move_forward(&mut self, distance_cm: u32) -> Result<(), LinkError> {
        self.call(LinkCall::MoveForward(distance_cm)).await
    }

    async fn move_back(&mut self, distance_cm: u32) -> Result<(), LinkError> {
        self.call(LinkCall::MoveBack(distance_cm)).await
    }

    async fn move_left(&mut self, distance_cm: u32) -> Result<(), LinkError> {
        self.call(LinkCall::MoveLeft(distance_cm)).await
    }

    async fn move_right(&mut self, distance_cm: u32) -> Result<(), LinkError> {
        self.call(LinkCall::MoveRight(distance_cm)).await
    }

    async fn move_up(&mut self, distance_cm: u32) -> Result<(), LinkError> {
        self.call(LinkCall::MoveUp(distance_cm)).await
    }

    async fn move_down(&mut self, distance_cm: u32) -> Result<(), LinkError> {
        self.call(LinkCall::MoveDown(distance_cm)).await
    }

    async fn rotate_clockwise(&mut self, degrees: i32) -> Result<(), LinkError> {
        self.call(LinkCall::RotateClockwise(degrees)).await
    }

    fn name(&self) -> &'static str {
        "Scripted"
    }
}
