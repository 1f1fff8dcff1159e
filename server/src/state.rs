use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

use crate::chat::dispatcher::EventDispatcher;
use crate::config::Config;
use crate::identity::IdentityGenerator;
use crate::registry::ConnectionRegistry;
use crate::ws::broadcast::WsBroadcaster;

/// Dispatcher wired to the live WebSocket connections.
pub type Dispatcher = EventDispatcher<WsBroadcaster>;

/// Shared application state passed to all handlers via axum State extractor.
#[derive(Clone)]
pub struct AppState {
    /// Registry owner and event handlers
    pub dispatcher: Arc<Dispatcher>,
    /// Open sockets; the same instance the dispatcher broadcasts through
    pub connections: Arc<WsBroadcaster>,
    pub ping_interval: Duration,
    pub pong_timeout: Duration,
}

impl AppState {
    pub fn new(
        identities: IdentityGenerator,
        rng: StdRng,
        ping_interval: Duration,
        pong_timeout: Duration,
    ) -> Self {
        let connections = Arc::new(WsBroadcaster::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = Arc::new(EventDispatcher::new(
            registry,
            connections.clone(),
            identities,
            rng,
        ));
        Self {
            dispatcher,
            connections,
            ping_interval,
            pong_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(
            IdentityGenerator::new(config.avatar_url_template.clone()),
            rng,
            Duration::from_secs(config.ping_interval_secs),
            Duration::from_secs(config.pong_timeout_secs),
        )
    }
}
