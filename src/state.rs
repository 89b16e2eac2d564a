//! Shared application state handed to every route and to the broadcast loop.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{Catalog, ConfigurationStore, SubscriberSet};

// ---

/// Random source shared by request handlers and the broadcast loop.
pub type SharedRng = Arc<Mutex<StdRng>>;

/// Build the shared random source, seeded when `seed` is given so runs can be
/// reproduced.
pub fn shared_rng(seed: Option<u64>) -> SharedRng {
    // ---
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Arc::new(Mutex::new(rng))
}

/// Everything a handler needs. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ---
    pub catalog: Arc<Catalog>,
    pub store: Arc<ConfigurationStore>,
    pub rng: SharedRng,
    pub subscribers: SubscriberSet,
}

impl AppState {
    pub fn new(catalog: Catalog, rng: SharedRng, subscriber_buffer: usize) -> Self {
        // ---
        Self {
            catalog: Arc::new(catalog),
            store: Arc::new(ConfigurationStore::new()),
            rng,
            subscribers: SubscriberSet::new(subscriber_buffer),
        }
    }
}
