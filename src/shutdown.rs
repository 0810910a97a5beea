//! Run-scoped cancellation and background shutdown primitives.
//!
//! [`StopSignal`] is the cooperative cancellation flag read by the dispatcher.
//! It is monotone: once triggered it stays set for the rest of the run, and
//! the first trigger decides the reported [`StopReason`]. The broadcast
//! channel is separate and only tells background activities (interrupt
//! handler, key listener, progress line) that the run is over.
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::Serialize;
use tokio::sync::broadcast;

pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;

const NOT_STOPPED: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Ctrl+C or SIGTERM.
    Interrupt,
    /// The `s` key from the terminal listener.
    Keypress,
    /// `--max-requests` was reached.
    RequestCap,
}

impl StopReason {
    const fn to_raw(self) -> u8 {
        match self {
            Self::Interrupt => 1,
            Self::Keypress => 2,
            Self::RequestCap => 3,
        }
    }

    const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Interrupt),
            2 => Some(Self::Keypress),
            3 => Some(Self::RequestCap),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interrupt => "interrupted",
            Self::Keypress => "stopped by keypress",
            Self::RequestCap => "request cap reached",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    state: Arc<AtomicU8>,
}

impl StopSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag. Returns `true` only for the call that actually flipped
    /// it; later triggers keep the original reason.
    pub fn trigger(&self, reason: StopReason) -> bool {
        self.state
            .compare_exchange(
                NOT_STOPPED,
                reason.to_raw(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.state.load(Ordering::Acquire) != NOT_STOPPED
    }

    #[must_use]
    pub fn reason(&self) -> Option<StopReason> {
        StopReason::from_raw(self.state.load(Ordering::Acquire))
    }
}
