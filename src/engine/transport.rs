use std::{
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use crossbeam_channel::{after, bounded, select, Sender};
use tracing::{trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lifecycle of continuous music playback.
///
/// `Stopped -> Starting -> Running -> Stopped`. `Starting` covers the
/// window where the session exists but the polling tick is not yet live.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Stopped,
    Starting,
    Running,
}

impl TransportState {
    pub fn is_playing(self) -> bool {
        self != TransportState::Stopped
    }
}

/// Background thread calling `tick` roughly every `interval` until
/// cancelled or dropped.
///
/// Deadlines advance by whole intervals, so a slow tick shortens the next
/// wait instead of pushing every later tick back.
pub struct Ticker {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

/// Decrements the live-ticker count when the thread exits, even on panic.
struct LiveGuard(Arc<AtomicUsize>);

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Ticker {
    pub fn spawn<F>(interval: Duration, live: Arc<AtomicUsize>, mut tick: F) -> io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (stop_tx, stop_rx) = bounded::<()>(1);

        live.fetch_add(1, Ordering::SeqCst);
        let guard = LiveGuard(live);

        let handle = thread::Builder::new()
            .name("chiptone-sequencer".into())
            .spawn(move || {
                let _guard = guard;
                let mut deadline = Instant::now() + interval;
                loop {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(after(wait)) -> _ => {
                            tick();
                            deadline += interval;
                            let now = Instant::now();
                            if deadline < now {
                                trace!("sequencer tick overran");
                                deadline = now + interval;
                            }
                        }
                    }
                }
            })?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stop the thread and wait for it; no tick runs after this returns.
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.try_send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("sequencer thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
