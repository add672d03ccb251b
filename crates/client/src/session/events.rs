//! Session change notifications.
//!
//! The browser build broadcast `user-updated` / `company-updated` window
//! events so any surface could react without prop-drilling. The SDK owns
//! that signal explicitly: callers subscribe through [`SessionEvents`] and
//! hold the returned [`Subscription`] for as long as they care.
//!
//! Delivery is synchronous and at-most-once per change, to the listeners
//! registered at dispatch time. There is no replay: a listener registered
//! after a change fires will not see it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use backroom_core::UserProfile;
use serde_json::Value;

type UserCallback = Box<dyn Fn(&UserProfile) + Send + Sync>;
type CompanyCallback = Box<dyn Fn(&Value) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    user_listeners: Mutex<Vec<(u64, UserCallback)>>,
    company_listeners: Mutex<Vec<(u64, CompanyCallback)>>,
}

/// Observer registry for session data changes.
///
/// Cheap to clone; clones share one registry.
#[derive(Clone, Default)]
pub struct SessionEvents {
    registry: Arc<Registry>,
}

impl SessionEvents {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to cached-user updates. The callback runs synchronously
    /// on every change until the returned subscription is dropped.
    #[must_use]
    pub fn on_user_changed(
        &self,
        callback: impl Fn(&UserProfile) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut listeners) = self.registry.user_listeners.lock() {
            listeners.push((id, Box::new(callback)));
        }

        Subscription {
            registry: Arc::downgrade(&self.registry),
            id,
            kind: SubscriptionKind::User,
        }
    }

    /// Subscribe to cached-company updates.
    #[must_use]
    pub fn on_company_changed(
        &self,
        callback: impl Fn(&Value) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut listeners) = self.registry.company_listeners.lock() {
            listeners.push((id, Box::new(callback)));
        }

        Subscription {
            registry: Arc::downgrade(&self.registry),
            id,
            kind: SubscriptionKind::Company,
        }
    }

    /// Notify all current user listeners of a change.
    ///
    /// Fired by the session layer whenever it updates the cached user;
    /// embedders that mutate the cache out-of-band fire it themselves.
    pub fn emit_user_changed(&self, profile: &UserProfile) {
        if let Ok(listeners) = self.registry.user_listeners.lock() {
            for (_, callback) in listeners.iter() {
                callback(profile);
            }
        }
    }

    /// Notify all current company listeners of a change.
    pub fn emit_company_changed(&self, company: &Value) {
        if let Ok(listeners) = self.registry.company_listeners.lock() {
            for (_, callback) in listeners.iter() {
                callback(company);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum SubscriptionKind {
    User,
    Company,
}

/// A live subscription. Dropping it unregisters the callback.
#[must_use = "dropping a subscription unregisters its callback"]
pub struct Subscription {
    registry: Weak<Registry>,
    id: u64,
    kind: SubscriptionKind,
}

impl Subscription {
    /// Explicitly unregister. Equivalent to dropping.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };

        match self.kind {
            SubscriptionKind::User => {
                if let Ok(mut listeners) = registry.user_listeners.lock() {
                    listeners.retain(|(id, _)| *id != self.id);
                }
            }
            SubscriptionKind::Company => {
                if let Ok(mut listeners) = registry.company_listeners.lock() {
                    listeners.retain(|(id, _)| *id != self.id);
                }
            }
        }
    }
}
