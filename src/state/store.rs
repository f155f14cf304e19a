//! Process-wide state store.
//!
//! One [`StateStore`] owns the named cells every view shares: where
//! the dashboard is navigated, the sub-path within that section, the
//! server version string, and the authenticated user. The store is an
//! explicit injectable value, not a global; construct one at startup
//! and hand it to whoever needs it.
//!
//! The user cell is the only durable one. Writes go to the
//! [`UserStore`] before observers hear about them, so an observer that
//! reads back through the store sees the persisted record.

use crate::storage::{StoredUser, UserCreds, UserStore};

use super::cell::StateCell;
use super::nav::NavLocation;

pub struct StateStore {
    nav: StateCell<NavLocation>,
    subnav: StateCell<String>,
    version: StateCell<String>,
    user: StateCell<Option<StoredUser>>,
    user_store: Option<UserStore>,
}

impl StateStore {
    /// Memory-only store. The user cell starts empty and nothing is
    /// persisted.
    pub fn new() -> Self {
        Self {
            nav: StateCell::new("nav", NavLocation::default()),
            subnav: StateCell::new("subnav", String::new()),
            version: StateCell::new("version", String::new()),
            user: StateCell::new("user", None),
            user_store: None,
        }
    }

    /// Store with a durable user cell. The persisted record, if any,
    /// seeds the cell without notifying anyone.
    pub fn with_user_store(user_store: UserStore) -> Self {
        let initial_user = user_store.load();
        Self {
            nav: StateCell::new("nav", NavLocation::default()),
            subnav: StateCell::new("subnav", String::new()),
            version: StateCell::new("version", String::new()),
            user: StateCell::new("user", initial_user),
            user_store: Some(user_store),
        }
    }

    /// Current dashboard section.
    pub fn nav(&self) -> &StateCell<NavLocation> {
        &self.nav
    }

    /// Sub-path within the current section, e.g. `jobs/types`.
    pub fn subnav(&self) -> &StateCell<String> {
        &self.subnav
    }

    /// Server version string, as reported by the version endpoint.
    pub fn version(&self) -> &StateCell<String> {
        &self.version
    }

    /// The authenticated user record.
    pub fn user(&self) -> &StateCell<Option<StoredUser>> {
        &self.user
    }

    /// Replace the user record. `Some` persists the record, `None`
    /// clears it; observers of the user cell are notified either way.
    pub fn set_user_creds(&self, creds: Option<UserCreds>) {
        match creds {
            Some(creds) => {
                if let Some(store) = &self.user_store {
                    if !store.save(&creds) {
                        tracing::warn!("failed to persist user record");
                    }
                }
                self.user.set(Some(StoredUser::Creds(creds)));
            }
            None => {
                if let Some(store) = &self.user_store {
                    if !store.clear() {
                        tracing::warn!("failed to clear stored user record");
                    }
                }
                self.user.set(None);
            }
        }
    }

    /// The parsed user record, if one is set and parsed.
    pub fn user_creds(&self) -> Option<UserCreds> {
        self.user.get().and_then(|stored| stored.creds().cloned())
    }

    /// Whether the current user has admin rights.
    pub fn is_admin(&self) -> bool {
        self.user
            .get()
            .map(|stored| stored.is_admin())
            .unwrap_or(false)
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("nav", &self.nav.get())
            .field("subnav", &self.subnav.get())
            .field("version", &self.version.get())
            .field("durable_user", &self.user_store.is_some())
            .finish()
    }
}
