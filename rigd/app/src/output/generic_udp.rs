use anyhow::{Context, Result};
use log::info;
use std::net::UdpSocket;

use super::{PoseSink, PoseSnapshot};

/// Sends each snapshot as one JSON datagram.
pub struct UdpPoseSink {
    socket: Option<UdpSocket>,
    target_address: String,
}

impl UdpPoseSink {
    pub fn new(target_address: String) -> Self {
        Self {
            socket: None,
            target_address,
        }
    }

    pub fn target_address(&self) -> &str {
        &self.target_address
    }
}

impl PoseSink for UdpPoseSink {
    fn initialize(&mut self) -> Result<()> {
        info!("Initializing UDP pose sink...");
        let socket = UdpSocket::bind("0.0.0.0:0").context("Failed to bind UDP socket")?;
        socket
            .connect(&self.target_address)
            .with_context(|| format!("Failed to connect to {}", self.target_address))?;
        socket
            .set_nonblocking(true)
            .context("Failed to set non-blocking mode")?;

        self.socket = Some(socket);
        info!("UDP pose sink initialized. Target: {}", self.target_address);
        Ok(())
    }

    fn send(&self, snapshot: &PoseSnapshot) -> Result<()> {
        if let Some(socket) = &self.socket {
            let json_data = serde_json::to_vec(snapshot)?;
            socket.send(&json_data)?;
        }
        Ok(())
    }
}
