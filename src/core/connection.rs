//! # Connection Monitor
//!
//! Passive view of whether the chat service looks reachable. It only feeds
//! the status indicator; sends are attempted regardless of what it says.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Online,
    Offline,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Online => "Online",
            ConnectionStatus::Offline => "Offline",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionMonitor {
    status: ConnectionStatus,
}

impl ConnectionMonitor {
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Records a reachability notification. Returns the new status if it changed.
    pub fn observe(&mut self, reachable: bool) -> Option<ConnectionStatus> {
        let status = if reachable {
            ConnectionStatus::Online
        } else {
            ConnectionStatus::Offline
        };
        if status == self.status {
            return None;
        }
        self.status = status;
        Some(status)
    }
}
