use anyhow::{Context, Result};
use api::{FrameInput, LandmarkSource, SourceLogger};
use std::io::ErrorKind;
use std::net::UdpSocket;

const MAX_DATAGRAM: usize = 65535;

/// Receives `FrameInput` JSON datagrams from an external estimator process.
pub struct UdpSource {
    port: u16,
    socket: Option<UdpSocket>,
    logger: Option<SourceLogger>,
    buf: Vec<u8>,
    rejected: u64,
}

impl UdpSource {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            socket: None,
            logger: None,
            buf: vec![0u8; MAX_DATAGRAM],
            rejected: 0,
        }
    }

    pub fn local_port(&self) -> Option<u16> {
        self.socket
            .as_ref()
            .and_then(|s| s.local_addr().ok())
            .map(|a| a.port())
    }

    fn reject(&mut self, error: &serde_json::Error) {
        self.rejected += 1;
        if let Some(logger) = &self.logger {
            // First five, then every 100th.
            if self.rejected <= 5 || self.rejected % 100 == 0 {
                logger.warn(&format!(
                    "Dropped malformed frame #{}: {}",
                    self.rejected, error
                ));
            }
        }
    }
}

impl LandmarkSource for UdpSource {
    fn initialize(&mut self, logger: SourceLogger) -> Result<()> {
        logger.info("Initializing UDP landmark source");
        let socket = UdpSocket::bind(format!("0.0.0.0:{}", self.port))
            .with_context(|| format!("Failed to bind UDP port {}", self.port))?;
        socket
            .set_nonblocking(true)
            .context("Failed to set non-blocking mode")?;
        self.socket = Some(socket);
        logger.info(&format!(
            "Listening for landmark frames on UDP port {}",
            self.local_port().unwrap_or(self.port)
        ));
        self.logger = Some(logger);
        Ok(())
    }

    fn update(&mut self, frame: &mut FrameInput) -> Result<()> {
        let Some(socket) = self.socket.as_ref() else {
            return Ok(());
        };

        // Drain everything queued and keep only the newest frame.
        let mut newest: Option<FrameInput> = None;
        let mut failures = Vec::new();
        loop {
            match socket.recv_from(&mut self.buf) {
                Ok((amt, _src)) => match serde_json::from_slice::<FrameInput>(&self.buf[..amt]) {
                    Ok(received) => {
                        if newest
                            .as_ref()
                            .map_or(true, |n| received.timestamp_ms > n.timestamp_ms)
                        {
                            newest = Some(received);
                        }
                    }
                    Err(e) => failures.push(e),
                },
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => return Err(e).context("Failed to receive landmark frame"),
            }
        }
        for error in &failures {
            self.reject(error);
        }

        if let Some(received) = newest {
            *frame = received;
        }
        Ok(())
    }

    fn unload(&mut self) {
        if let Some(logger) = &self.logger {
            logger.info(&format!(
                "Closing UDP landmark source ({} malformed frames dropped)",
                self.rejected
            ));
        }
        self.socket = None;
    }
}
