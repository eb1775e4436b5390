//! Page-context registry
//!
//! The host runtime registers every open page context here. The context's
//! id and URL come from registration, not from the requests it sends, so
//! the proxy can trust them when validating origins and when fanning out
//! change notifications.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use sitemode_channel::{ContextId, CookieChangedEvent};

struct PageContext {
    url: String,
    events: mpsc::UnboundedSender<CookieChangedEvent>,
}

/// Handed back to the host on registration: the runtime-assigned id plus
/// the receiving end of the context's notification stream.
pub struct ContextHandle {
    pub id: ContextId,
    pub events: mpsc::UnboundedReceiver<CookieChangedEvent>,
}

#[derive(Clone, Default)]
pub struct ContextRegistry {
    contexts: Arc<RwLock<HashMap<ContextId, PageContext>>>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an open page context at the given URL.
    pub fn register(&self, url: impl Into<String>) -> ContextHandle {
        let id = ContextId::new();
        let (tx, rx) = mpsc::unbounded_channel();

        self.contexts.write().insert(
            id,
            PageContext {
                url: url.into(),
                events: tx,
            },
        );

        tracing::debug!(context_id = %id, "Registered page context");
        ContextHandle { id, events: rx }
    }

    /// Record a navigation: the context now shows a different URL.
    pub fn update_url(&self, id: ContextId, url: impl Into<String>) -> bool {
        match self.contexts.write().get_mut(&id) {
            Some(context) => {
                context.url = url.into();
                true
            }
            None => false,
        }
    }

    pub fn unregister(&self, id: ContextId) {
        self.contexts.write().remove(&id);
        tracing::debug!(context_id = %id, "Unregistered page context");
    }

    /// The registered URL for a context, if it is still open.
    pub fn url_of(&self, id: ContextId) -> Option<String> {
        self.contexts.read().get(&id).map(|c| c.url.clone())
    }

    pub fn len(&self) -> usize {
        self.contexts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.read().is_empty()
    }

    /// Snapshot of every open context's id, URL, and event sender.
    pub(crate) fn snapshot(
        &self,
    ) -> Vec<(ContextId, String, mpsc::UnboundedSender<CookieChangedEvent>)> {
        self.contexts
            .read()
            .iter()
            .map(|(id, c)| (*id, c.url.clone(), c.events.clone()))
            .collect()
    }
}
