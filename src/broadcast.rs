//! Periodic telemetry fan-out to WebSocket subscribers.
//!
//! The loop owns no connections. Each WebSocket session registers with the
//! [`SubscriberSet`] and drains its own bounded queue; the loop only pushes
//! serialized frames into those queues, so a slow or dead socket can never
//! stall a tick or affect other subscribers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::{telemetry, AppState, TelemetryUpdate};

// ---

/// A serialized message ready to be written to a socket.
pub type Frame = Arc<str>;

pub type SubscriberId = u64;

/// Outcome of pushing one frame to every subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    // ---
    /// Subscribers whose queue accepted the frame.
    pub delivered: usize,
    /// Subscribers whose queue was full; they miss this frame only.
    pub skipped: usize,
    /// Subscribers whose session had ended; they are removed.
    pub dropped: usize,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: SubscriberId,
    senders: HashMap<SubscriberId, mpsc::Sender<Frame>>,
}

/// Thread-safe set of active subscribers.
#[derive(Debug, Clone)]
pub struct SubscriberSet {
    registry: Arc<Mutex<Registry>>,
    buffer: usize,
}

impl SubscriberSet {
    /// Create an empty set whose subscribers each buffer up to `buffer` frames.
    pub fn new(buffer: usize) -> Self {
        // ---
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            buffer: buffer.max(1),
        }
    }

    /// Register a new subscriber. It stays registered until the returned
    /// [`Subscription`] is dropped or a publish finds its queue closed.
    pub fn register(&self) -> Subscription {
        // ---
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = {
            let mut registry = self.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.senders.insert(id, tx);
            id
        };
        info!(subscriber = id, active = self.len(), "subscriber registered");

        Subscription {
            id,
            frames: rx,
            set: self.clone(),
        }
    }

    /// Remove a subscriber. Returns false if it was already gone.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        // ---
        let removed = self.registry.lock().senders.remove(&id).is_some();
        if removed {
            info!(subscriber = id, active = self.len(), "subscriber removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.registry.lock().senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Push `frame` to every subscriber without waiting on any of them.
    pub fn publish(&self, frame: &Frame) -> Delivery {
        // ---
        let mut delivery = Delivery::default();
        let mut registry = self.registry.lock();

        registry.senders.retain(|id, tx| match tx.try_send(Arc::clone(frame)) {
            Ok(()) => {
                delivery.delivered += 1;
                true
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(subscriber = *id, "subscriber queue full; skipping frame");
                delivery.skipped += 1;
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(subscriber = *id, "subscriber closed; dropping");
                delivery.dropped += 1;
                false
            }
        });

        delivery
    }
}

/// A registered subscriber's receiving end. Dropping it deregisters.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    frames: mpsc::Receiver<Frame>,
    set: SubscriberSet,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next frame. `None` once the subscriber has been removed.
    pub async fn recv(&mut self) -> Option<Frame> {
        self.frames.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.set.unregister(self.id);
    }
}

// ---

/// Build one telemetry update covering every catalog asset, in catalog order.
pub fn snapshot(state: &AppState) -> TelemetryUpdate {
    // ---
    let now = Utc::now();
    let mut rng = state.rng.lock();
    let data = state
        .catalog
        .assets()
        .iter()
        .filter_map(|asset| telemetry::generate(&state.catalog, &asset.id, now, &mut *rng).ok())
        .collect();
    TelemetryUpdate::new(now, data)
}

/// Run a single broadcast tick. Skips generation entirely while nobody is
/// listening.
pub fn tick(state: &AppState) -> Option<Delivery> {
    // ---
    if state.subscribers.is_empty() {
        return None;
    }

    let update = snapshot(state);
    let frame: Frame = match serde_json::to_string(&update) {
        Ok(text) => text.into(),
        Err(e) => {
            warn!("Failed to serialize telemetry update: {}", e);
            return None;
        }
    };

    let delivery = state.subscribers.publish(&frame);
    debug!(
        assets = update.data.len(),
        delivered = delivery.delivered,
        skipped = delivery.skipped,
        dropped = delivery.dropped,
        "telemetry broadcast"
    );
    Some(delivery)
}

/// Spawn the broadcast loop. It ticks every `period` until `shutdown`
/// flips to `true` or its sender is dropped.
pub fn spawn(
    state: AppState,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    // ---
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(period_ms = period.as_millis() as u64, "broadcast loop started");

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    tick(&state);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("broadcast loop stopped");
    })
}
