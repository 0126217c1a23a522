//! Currently selected role
//!
//! [`RoleSelection`] is the single holder of the active role. The chosen id is
//! written to a [`KeyValueStore`] so it survives restarts; anything stored that
//! no longer names a role falls back to the registry's default role.

use std::sync::Arc;
use storage::kv::KeyValueStore;

use crate::registry::{Registry, Role};
use crate::{NavigationError, Result};

/// Storage key holding the selected role id
pub const SELECTED_ROLE_KEY: &str = "selected_role";

/// Active role, persisted through a key-value store
pub struct RoleSelection<S: KeyValueStore> {
    registry: Arc<Registry>,
    store: S,
    current: Role,
}

impl<S: KeyValueStore> RoleSelection<S> {
    /// Restore the persisted selection
    ///
    /// Missing, unknown or unreadable ids fall back to
    /// [`Registry::default_role`].
    pub fn load(registry: Arc<Registry>, store: S) -> Result<Self> {
        let stored = match store.get_string(SELECTED_ROLE_KEY) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read selected role, using default");
                None
            }
        };

        let restored = stored.as_deref().and_then(|id| {
            let role = registry.role_by_id(id);
            if role.is_none() {
                tracing::warn!(role = %id, "stored role no longer exists, using default");
            }
            role.cloned()
        });

        let current = match restored {
            Some(role) => role,
            None => registry
                .default_role()
                .cloned()
                .ok_or_else(|| NavigationError::InvalidConfig("registry has no visible roles".to_string()))?,
        };

        tracing::debug!(role = %current.id, "role selection loaded");
        Ok(Self { registry, store, current })
    }

    /// The selected role
    pub fn current(&self) -> &Role {
        &self.current
    }

    /// Select and persist a role
    ///
    /// The current role is unchanged if the id is unknown or persisting fails.
    pub fn select(&mut self, role_id: &str) -> Result<&Role> {
        let role = self
            .registry
            .role_by_id(role_id)
            .cloned()
            .ok_or_else(|| NavigationError::UnknownRole(role_id.to_string()))?;

        self.store.set_string(SELECTED_ROLE_KEY, role_id)?;
        tracing::info!(from = %self.current.id, to = %role.id, "role selected");
        self.current = role;
        Ok(&self.current)
    }

    /// Forget the persisted choice and return to the default role
    pub fn reset(&mut self) -> Result<&Role> {
        let default = self
            .registry
            .default_role()
            .cloned()
            .ok_or_else(|| NavigationError::InvalidConfig("registry has no visible roles".to_string()))?;

        self.store.remove(SELECTED_ROLE_KEY)?;
        self.current = default;
        Ok(&self.current)
    }

    /// The registry roles are selected from
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }
}
