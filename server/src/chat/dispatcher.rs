//! Connection lifecycle and chat event handling.
//!
//! Each connection moves UNREGISTERED → REGISTERED (connect) → REMOVED
//! (disconnect). Registry mutation and fan-out happen here; delivery is
//! delegated to a [`Broadcaster`].

use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};

use crate::chat::events::{ClientEvent, ServerEvent};
use crate::identity::{IdentityGenerator, UserRecord};
use crate::registry::{ConnectionId, RegistryError, SharedRegistry};
use crate::ws::broadcast::Broadcaster;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The event came from a connection with no registry entry (never
    /// connected, or already disconnected).
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),
}

impl From<RegistryError> for DispatchError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownConnection(id) => DispatchError::UnknownConnection(id),
        }
    }
}

pub struct EventDispatcher<B: Broadcaster> {
    registry: SharedRegistry,
    broadcaster: Arc<B>,
    identities: IdentityGenerator,
    rng: Mutex<StdRng>,
}

impl<B: Broadcaster> EventDispatcher<B> {
    pub fn new(
        registry: SharedRegistry,
        broadcaster: Arc<B>,
        identities: IdentityGenerator,
        rng: StdRng,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            identities,
            rng: Mutex::new(rng),
        }
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Assign a fresh identity, announce it to everyone, and tell the new
    /// client its own name.
    pub fn on_connect(&self, id: ConnectionId) -> UserRecord {
        let record = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            self.identities.generate(&mut *rng)
        };
        self.registry.put(id, record.clone());

        tracing::info!(
            connection_id = %id,
            username = %record.display_name,
            "User joined"
        );

        self.broadcaster.send_to_all(&ServerEvent::UserJoined {
            username: record.display_name.clone(),
            avatar: record.avatar_url.clone(),
        });
        self.broadcaster.send_to(
            id,
            &ServerEvent::SetUsername {
                username: record.display_name.clone(),
            },
        );

        record
    }

    /// Remove the connection. A second disconnect, or one without a prior
    /// connect, is a no-op.
    pub fn on_disconnect(&self, id: ConnectionId) -> Option<UserRecord> {
        let record = self.registry.remove(id)?;

        tracing::info!(
            connection_id = %id,
            username = %record.display_name,
            "User left"
        );

        self.broadcaster.send_to_all(&ServerEvent::UserLeft {
            username: record.display_name.clone(),
        });
        Some(record)
    }

    /// Fan out a chat message. Returns `false` if the sender is unknown and
    /// the message was dropped.
    pub fn on_send_message(&self, id: ConnectionId, message: String) -> bool {
        let Some(record) = self.registry.get(id) else {
            tracing::debug!(connection_id = %id, "Dropping message from unregistered connection");
            return false;
        };

        tracing::debug!(
            connection_id = %id,
            username = %record.display_name,
            len = message.len(),
            "Broadcasting message"
        );

        self.broadcaster.send_to_all(&ServerEvent::NewMessage {
            username: record.display_name,
            avatar: record.avatar_url,
            message,
        });
        true
    }

    /// Rename the connection's user and announce the change.
    ///
    /// Fails with [`DispatchError::UnknownConnection`] if the connection has no
    /// registry entry; nothing is broadcast in that case.
    pub fn on_update_username(
        &self,
        id: ConnectionId,
        username: String,
    ) -> Result<(), DispatchError> {
        let old_username = self.registry.rename(id, &username)?;

        tracing::info!(
            connection_id = %id,
            old_username = %old_username,
            new_username = %username,
            "Username updated"
        );

        self.broadcaster.send_to_all(&ServerEvent::UsernameUpdated {
            old_username,
            new_username: username,
        });
        Ok(())
    }

    /// Route a decoded client frame to its handler.
    pub fn handle_client_event(
        &self,
        id: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), DispatchError> {
        match event {
            ClientEvent::SendMessage { message } => {
                self.on_send_message(id, message);
                Ok(())
            }
            ClientEvent::UpdateUsername { username } => self.on_update_username(id, username),
        }
    }
}
