use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll, read};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::shutdown::{ShutdownReceiver, ShutdownSender, StopReason, StopSignal};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Broadcast channel size for shutdown notifications (single signal fan-out).
const SHUTDOWN_CHANNEL_CAPACITY: usize = 1;
/// Keyboard polling interval; keeps the listener responsive to both a
/// keypress and the stop flag.
const KEYBOARD_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    broadcast::channel::<()>(SHUTDOWN_CHANNEL_CAPACITY)
}

/// Turns Ctrl+C (and SIGTERM on unix) into a stop request instead of
/// terminating the process, so the partial run is still summarized.
pub fn setup_interrupt_handler(
    signal_flag: &StopSignal,
    shutdown_tx: &ShutdownSender,
) -> JoinHandle<()> {
    let stop = signal_flag.clone();
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(term) => Some(term),
            Err(err) => {
                warn!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        loop {
            #[cfg(unix)]
            {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    result = tokio::signal::ctrl_c() => {
                        if result.is_err() {
                            break;
                        }
                    }
                    () = async {
                        if let Some(term) = term_signal.as_mut() {
                            term.recv().await;
                        } else {
                            std::future::pending::<()>().await;
                        }
                    } => {}
                }
            }

            #[cfg(not(unix))]
            {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    result = tokio::signal::ctrl_c() => {
                        if result.is_err() {
                            break;
                        }
                    }
                }
            }

            if stop.trigger(StopReason::Interrupt) {
                info!("Interrupted; summarizing partial results once in-flight requests finish.");
            } else {
                info!("Already stopping; waiting for in-flight requests.");
            }
        }
    })
}

/// Background single-key stop listener.
pub trait KeyListener: Send + Sync {
    fn spawn(&self, signal_flag: &StopSignal, shutdown_tx: &ShutdownSender) -> JoinHandle<()>;

    /// Whether a keypress can actually stop the run.
    fn interactive(&self) -> bool {
        false
    }
}

/// Reads raw keys from the controlling terminal. `s`/`S` requests a stop;
/// Ctrl+C is handled here as well because raw mode suppresses SIGINT.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyListener {
    poll_interval: Duration,
}

impl Default for RawKeyListener {
    fn default() -> Self {
        Self {
            poll_interval: KEYBOARD_POLL_INTERVAL,
        }
    }
}

impl KeyListener for RawKeyListener {
    fn spawn(&self, signal_flag: &StopSignal, shutdown_tx: &ShutdownSender) -> JoinHandle<()> {
        let stop = signal_flag.clone();
        let mut shutdown_rx = shutdown_tx.subscribe();
        let poll_interval = self.poll_interval;

        tokio::task::spawn_blocking(move || {
            let Some(_raw_mode) = RawModeGuard::enable() else {
                return;
            };

            loop {
                if stop.is_set() {
                    break;
                }
                match shutdown_rx.try_recv() {
                    Ok(()) | Err(broadcast::error::TryRecvError::Closed) => break,
                    Err(
                        broadcast::error::TryRecvError::Empty
                        | broadcast::error::TryRecvError::Lagged(_),
                    ) => {}
                }

                let Ok(has_event) = poll(poll_interval) else {
                    break;
                };
                if !has_event {
                    continue;
                }
                let Ok(event) = read() else {
                    break;
                };
                if let Some(reason) = classify_event(&event) {
                    if stop.trigger(reason) {
                        debug!("Stop requested from the terminal: {}", reason.as_str());
                    }
                    break;
                }
            }
        })
    }

    fn interactive(&self) -> bool {
        true
    }
}

/// Used when the terminal cannot deliver raw single-key reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopKeyListener;

impl KeyListener for NoopKeyListener {
    fn spawn(&self, _signal_flag: &StopSignal, _shutdown_tx: &ShutdownSender) -> JoinHandle<()> {
        tokio::spawn(std::future::ready(()))
    }
}

/// Picks the listener once at startup. Any failure probing raw mode falls
/// back to the no-op listener without surfacing an error.
#[must_use]
pub fn select_key_listener() -> Arc<dyn KeyListener> {
    if !std::io::stdin().is_terminal() {
        debug!("stdin is not a TTY; press-to-stop disabled.");
        return Arc::new(NoopKeyListener);
    }
    match RawModeGuard::enable() {
        Some(probe) => {
            drop(probe);
            Arc::new(RawKeyListener::default())
        }
        None => {
            debug!("Raw terminal mode unavailable; press-to-stop disabled.");
            Arc::new(NoopKeyListener)
        }
    }
}

pub(crate) fn classify_event(event: &Event) -> Option<StopReason> {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind,
        ..
    }) = event
    else {
        return None;
    };
    if *kind != KeyEventKind::Press {
        return None;
    }
    let KeyCode::Char(ch) = code else {
        return None;
    };
    if modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(ch, 'c' | 'C').then_some(StopReason::Interrupt);
    }
    matches!(ch, 's' | 'S').then_some(StopReason::Keypress)
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Option<Self> {
        enable_raw_mode().ok().map(|()| Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        drop(disable_raw_mode());
    }
}
