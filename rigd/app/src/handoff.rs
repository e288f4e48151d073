use api::FrameInput;
use std::sync::mpsc::{Receiver, SyncSender, TrySendError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forward {
    Sent,
    /// Nothing new since the last delivered frame.
    Unchanged,
    /// The consumer has not taken the previous frame yet. Offer again later.
    Full,
    Closed,
}

/// Producer side of the frame channel.
///
/// A frame counts as delivered only once the channel accepted it, so the
/// newest frame is retried after a `Full` instead of being lost.
#[derive(Debug, Default)]
pub struct FrameForwarder {
    last_sent: Option<f64>,
}

impl FrameForwarder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_sent(&self) -> Option<f64> {
        self.last_sent
    }

    pub fn forward(&mut self, tx: &SyncSender<FrameInput>, frame: &FrameInput) -> Forward {
        let fresh = match self.last_sent {
            Some(t) => frame.timestamp_ms != t,
            None => *frame != FrameInput::default(),
        };
        if !fresh {
            return Forward::Unchanged;
        }
        match tx.try_send(frame.clone()) {
            Ok(()) => {
                self.last_sent = Some(frame.timestamp_ms);
                Forward::Sent
            }
            Err(TrySendError::Full(_)) => Forward::Full,
            Err(TrySendError::Disconnected(_)) => Forward::Closed,
        }
    }
}

/// Newest frame waiting in the channel, if any.
pub fn latest(rx: &Receiver<FrameInput>) -> Option<FrameInput> {
    rx.try_iter().last()
}
