use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::identity::UserRecord;

/// Opaque per-socket token assigned by the WebSocket layer on upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),
}

/// Live mapping of connection id to user identity.
///
/// An entry exists exactly while its connection is open and registered.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    users: DashMap<ConnectionId, UserRecord>,
}

/// Shared handle, cloned into every connection actor.
pub type SharedRegistry = Arc<ConnectionRegistry>;

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    /// Insert or overwrite the record for `id`.
    pub fn put(&self, id: ConnectionId, record: UserRecord) {
        self.users.insert(id, record);
    }

    pub fn get(&self, id: ConnectionId) -> Option<UserRecord> {
        self.users.get(&id).map(|entry| entry.value().clone())
    }

    /// Delete and return the record, or `None` if `id` was never registered
    /// or has already been removed.
    pub fn remove(&self, id: ConnectionId) -> Option<UserRecord> {
        self.users.remove(&id).map(|(_, record)| record)
    }

    /// Replace the display name in place, keeping the avatar. Returns the old name.
    pub fn rename(&self, id: ConnectionId, new_name: &str) -> Result<String, RegistryError> {
        let mut entry = self
            .users
            .get_mut(&id)
            .ok_or(RegistryError::UnknownConnection(id))?;
        Ok(std::mem::replace(
            &mut entry.display_name,
            new_name.to_string(),
        ))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> UserRecord {
        UserRecord {
            display_name: name.to_string(),
            avatar_url: format!("https://avatars.test/boy?username={}", name),
        }
    }

    #[test]
    fn test_unknown_id_is_absent() {
        let registry = ConnectionRegistry::new();
        assert!(registry.get(ConnectionId::new()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_put_get_remove() {
        let registry = ConnectionRegistry::new();
        let id = ConnectionId::new();
        registry.put(id, record("user_1111"));
        assert_eq!(registry.get(id), Some(record("user_1111")));
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.remove(id), Some(record("user_1111")));
        assert!(registry.get(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_put_overwrites() {
        let registry = ConnectionRegistry::new();
        let id = ConnectionId::new();
        registry.put(id, record("user_1111"));
        registry.put(id, record("user_2222"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(id).unwrap().display_name, "user_2222");
    }

    #[test]
    fn test_double_remove_is_absent() {
        let registry = ConnectionRegistry::new();
        let id = ConnectionId::new();
        registry.put(id, record("user_1111"));
        assert!(registry.remove(id).is_some());
        assert!(registry.remove(id).is_none());
    }

    #[test]
    fn test_rename_preserves_avatar() {
        let registry = ConnectionRegistry::new();
        let id = ConnectionId::new();
        let original = record("user_1111");
        registry.put(id, original.clone());

        let old = registry.rename(id, "bob").unwrap();
        assert_eq!(old, "user_1111");

        let updated = registry.get(id).unwrap();
        assert_eq!(updated.display_name, "bob");
        assert_eq!(updated.avatar_url, original.avatar_url);
    }

    #[test]
    fn test_rename_unknown_fails_without_insert() {
        let registry = ConnectionRegistry::new();
        let id = ConnectionId::new();
        assert_eq!(
            registry.rename(id, "bob"),
            Err(RegistryError::UnknownConnection(id))
        );
        assert!(registry.get(id).is_none());
    }
}
