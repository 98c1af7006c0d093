//! Companion lock/dispenser link.
//!
//! A small finite-state machine over the accessory connection. It never
//! talks to a radio itself: the host feeds it connection events and
//! peripheral notifications, and sends the command bytes it hands back. The
//! reminder engine only ever reads [`DeviceLink::is_locked`].

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{PillboxError, Result};

/// Lock command byte: unlock.
pub const UNLOCK_COMMAND: u8 = 0;

/// Lock command byte: lock.
pub const LOCK_COMMAND: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
    Failed,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnecting => "disconnecting",
            ConnectionState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection and lock state of one accessory.
#[derive(Debug, Clone)]
pub struct DeviceLink {
    state: ConnectionState,
    device_id: Option<String>,
    locked: bool,
    battery_level: u8,
    reconnecting: bool,
}

impl Default for DeviceLink {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceLink {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            device_id: None,
            locked: false,
            battery_level: 0,
            reconnecting: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// Lock state, known only while connected.
    pub fn is_locked(&self) -> Option<bool> {
        (self.state == ConnectionState::Connected).then_some(self.locked)
    }

    /// Last reported battery percentage, known only while connected.
    pub fn battery_level(&self) -> Option<u8> {
        (self.state == ConnectionState::Connected).then_some(self.battery_level)
    }

    fn invalid(&self, event: &str) -> PillboxError {
        PillboxError::Device(format!("Cannot {} while {}", event, self.state))
    }

    /// Start connecting to `device_id`.
    pub fn connect(&mut self, device_id: impl Into<String>) -> Result<()> {
        match self.state {
            ConnectionState::Disconnected | ConnectionState::Failed => {
                let device_id = device_id.into();
                debug!(device_id = %device_id, "Connecting to device");
                self.device_id = Some(device_id);
                self.reconnecting = false;
                self.state = ConnectionState::Connecting;
                Ok(())
            }
            _ => Err(self.invalid("connect")),
        }
    }

    pub fn connection_established(&mut self) -> Result<()> {
        if self.state != ConnectionState::Connecting {
            return Err(self.invalid("complete a connection"));
        }
        info!(device_id = ?self.device_id, "Device connected");
        self.state = ConnectionState::Connected;
        self.reconnecting = false;
        Ok(())
    }

    pub fn connection_failed(&mut self, reason: &str) -> Result<()> {
        if self.state != ConnectionState::Connecting {
            return Err(self.invalid("fail a connection"));
        }
        warn!(device_id = ?self.device_id, reason, "Device connection failed");
        self.state = ConnectionState::Failed;
        self.reconnecting = false;
        Ok(())
    }

    /// User-requested disconnect.
    pub fn disconnect(&mut self) -> Result<()> {
        if self.state != ConnectionState::Connected {
            return Err(self.invalid("disconnect"));
        }
        self.state = ConnectionState::Disconnecting;
        Ok(())
    }

    /// The link went down.
    ///
    /// After a requested disconnect this settles in `Disconnected`. An
    /// unexpected drop from `Connected` starts one automatic reconnect and
    /// returns `true`; a second drop before that reconnect succeeds gives up.
    pub fn disconnected(&mut self) -> Result<bool> {
        match self.state {
            ConnectionState::Disconnecting => {
                info!(device_id = ?self.device_id, "Device disconnected");
                self.state = ConnectionState::Disconnected;
                self.device_id = None;
                Ok(false)
            }
            ConnectionState::Connected => {
                warn!(device_id = ?self.device_id, "Device connection dropped, reconnecting");
                self.state = ConnectionState::Connecting;
                self.reconnecting = true;
                Ok(true)
            }
            ConnectionState::Connecting if self.reconnecting => {
                warn!(device_id = ?self.device_id, "Reconnect dropped, giving up");
                self.state = ConnectionState::Failed;
                self.reconnecting = false;
                Ok(false)
            }
            _ => Err(self.invalid("handle a disconnect")),
        }
    }

    /// Flip the lock and return the command byte to send to the accessory.
    pub fn toggle_lock(&mut self) -> Result<u8> {
        if self.state != ConnectionState::Connected {
            return Err(self.invalid("toggle the lock"));
        }
        self.locked = !self.locked;
        Ok(if self.locked {
            LOCK_COMMAND
        } else {
            UNLOCK_COMMAND
        })
    }

    /// Apply a lock-state notification from the accessory (non-zero = locked).
    pub fn on_lock_state(&mut self, value: u8) -> Result<()> {
        if self.state != ConnectionState::Connected {
            return Err(self.invalid("apply a lock state"));
        }
        self.locked = value != 0;
        Ok(())
    }

    /// Apply a battery notification; values above 100 are clamped.
    pub fn on_battery_level(&mut self, value: u8) -> Result<()> {
        if self.state != ConnectionState::Connected {
            return Err(self.invalid("apply a battery level"));
        }
        self.battery_level = value.min(100);
        Ok(())
    }
}
