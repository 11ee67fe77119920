pub mod frame;

use gyrocast_orientation::Entry;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Default bound on a subscriber's outbound queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 30;

struct Subscriber {
    id: u64,
    tx: mpsc::Sender<Entry>,
    active: Arc<AtomicBool>,
    dropped: u64,
}

/// Shared registry of live subscribers. Cloning shares the same set.
///
/// Subscribers are soft-deleted: a failed writer flips its `active`
/// flag and later broadcasts skip it. Entries in the registry are
/// never removed; the transport layer closes truly dead connections.
#[derive(Clone, Default)]
pub struct SubscriberRegistry {
    inner: Arc<Mutex<Vec<Subscriber>>>,
    next_id: Arc<AtomicU64>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber with a bounded queue. Returns its id,
    /// the entry receiver, and the shared active flag for the writer.
    pub fn subscribe(&self, capacity: usize) -> (u64, mpsc::Receiver<Entry>, Arc<AtomicBool>) {
        let (tx, rx) = mpsc::channel(capacity);
        let active = Arc::new(AtomicBool::new(true));
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.lock().unwrap().push(Subscriber {
            id,
            tx,
            active: active.clone(),
            dropped: 0,
        });
        tracing::info!(id, capacity, "Subscriber registered");
        (id, rx, active)
    }

    /// Deliver one entry to every active subscriber without blocking.
    /// A full queue drops the entry for that subscriber only; a closed
    /// one marks the subscriber inactive.
    pub fn broadcast(&self, entry: Entry) {
        let mut subs = self.inner.lock().unwrap();
        for sub in subs.iter_mut() {
            if !sub.active.load(Ordering::Acquire) {
                continue;
            }
            match sub.tx.try_send(entry) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    sub.dropped += 1;
                    tracing::debug!(
                        id = sub.id,
                        dropped = sub.dropped,
                        "Subscriber queue full, dropping frame"
                    );
                }
                Err(TrySendError::Closed(_)) => {
                    sub.active.store(false, Ordering::Release);
                }
            }
        }
    }

    /// Subscribers whose writer is still running.
    pub fn active_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.active.load(Ordering::Acquire))
            .count()
    }

    /// Frames dropped on full queues, summed over all subscribers.
    pub fn dropped_total(&self) -> u64 {
        self.inner.lock().unwrap().iter().map(|s| s.dropped).sum()
    }
}

/// Fan-out task: consumes computed entries and hands each one to the
/// registry for delivery.
pub struct Broadcaster {
    registry: SubscriberRegistry,
    entry_rx: mpsc::Receiver<Entry>,
}

impl Broadcaster {
    pub fn new(registry: SubscriberRegistry, entry_rx: mpsc::Receiver<Entry>) -> Self {
        Self { registry, entry_rx }
    }

    pub async fn run(mut self) {
        while let Some(entry) = self.entry_rx.recv().await {
            self.registry.broadcast(entry);
        }
        tracing::debug!("Broadcaster stopped");
    }
}

/// Per-subscriber write loop: encode each entry and write one frame,
/// stopping on the first error or timeout. The subscriber is marked
/// inactive on exit and stays in the registry.
pub async fn write_frames<W>(
    mut writer: W,
    mut rx: mpsc::Receiver<Entry>,
    active: Arc<AtomicBool>,
    write_timeout: Duration,
) where
    W: AsyncWrite + Unpin,
{
    while let Some(entry) = rx.recv().await {
        let frame = frame::encode(&entry);
        match tokio::time::timeout(write_timeout, writer.write_all(&frame)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Subscriber write failed");
                break;
            }
            Err(_) => {
                tracing::warn!(?write_timeout, "Subscriber write timed out");
                break;
            }
        }
    }
    active.store(false, Ordering::Release);
}

/// Attach an accepted connection as a new subscriber and spawn its
/// write loop. The subscriber sees every entry broadcast from now on;
/// there is no replay of history.
pub fn attach(
    registry: &SubscriberRegistry,
    stream: TcpStream,
    capacity: usize,
    write_timeout: Duration,
) -> tokio::task::JoinHandle<()> {
    let (id, rx, active) = registry.subscribe(capacity);
    tokio::spawn(async move {
        write_frames(stream, rx, active, write_timeout).await;
        tracing::info!(id, "Subscriber detached");
    })
}

/// Accept subscriber connections and attach each one to the registry.
pub async fn serve(
    listener: TcpListener,
    registry: SubscriberRegistry,
    capacity: usize,
    write_timeout: Duration,
) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tracing::info!(%peer, "Accepted subscriber connection");
                attach(&registry, stream, capacity, write_timeout);
            }
            Err(e) => {
                tracing::error!(error = %e, "Accept failed");
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    }
}
