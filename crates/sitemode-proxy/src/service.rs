//! Cookie proxy service
//!
//! Consumes the envelope queue, validates every request against the
//! requester's registered origin, performs the cookie operation, and fans
//! change notifications out to the other contexts at the written origin.
//! The proxy always answers; rejections and internal failures come back
//! as `{success: false, error}` and never cross the channel as panics.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

use sitemode_channel::{
    ContextId, CookieChangedEvent, CookieRecord, Envelope, ProxyRequest, ProxyResponse, SameSite,
};

use crate::registry::ContextRegistry;
use crate::store::CookieStore;

const ERR_INVALID_SENDER: &str = "Invalid sender";
const ERR_INVALID_URL: &str = "Invalid URL format";
const ERR_ORIGIN_MISMATCH: &str = "Origin mismatch";
const ERR_UNKNOWN_TYPE: &str = "Unknown message type";

const REQUEST_QUEUE_CAPACITY: usize = 32;

pub struct CookieProxy<S: CookieStore> {
    store: Arc<S>,
    registry: ContextRegistry,
    rx: mpsc::Receiver<Envelope>,
}

impl<S: CookieStore> CookieProxy<S> {
    pub fn new(store: S, registry: ContextRegistry, rx: mpsc::Receiver<Envelope>) -> Self {
        Self {
            store: Arc::new(store),
            registry,
            rx,
        }
    }

    /// Spawn the proxy as a background task, returning the request queue
    /// the host hands to page-context clients.
    pub fn start(
        store: S,
        registry: ContextRegistry,
    ) -> (mpsc::Sender<Envelope>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(REQUEST_QUEUE_CAPACITY);
        let proxy = Self::new(store, registry, rx);
        let handle = tokio::spawn(proxy.run());
        (tx, handle)
    }

    /// Process requests until every queue sender is gone.
    pub async fn run(mut self) {
        tracing::info!("Cookie proxy started");

        while let Some(envelope) = self.rx.recv().await {
            let response = self.handle(envelope.sender, &envelope.request);

            if !response.success {
                tracing::warn!(
                    request_id = %envelope.request_id,
                    sender = %envelope.sender,
                    error = response.error.as_deref().unwrap_or(""),
                    "Rejected cookie request"
                );
            }

            // Caller may have timed out and dropped its receiver
            let _ = envelope.respond_to.send(response);
        }

        tracing::info!("Cookie proxy stopped");
    }

    fn handle(&self, sender: ContextId, request: &ProxyRequest) -> ProxyResponse {
        let target_url = match request {
            ProxyRequest::GetCookie { url, .. } => url,
            ProxyRequest::SetCookie { url, .. } => url,
            ProxyRequest::GetAllCookies { url } => url,
            ProxyRequest::Unknown => return ProxyResponse::err(ERR_UNKNOWN_TYPE),
        };

        let target = match self.validate(sender, target_url) {
            Ok(target) => target,
            Err(reason) => return ProxyResponse::err(reason),
        };

        match request {
            ProxyRequest::GetCookie { name, .. } => match self.store.get(&target, name) {
                Ok(cookie) => ProxyResponse::ok_cookie(cookie),
                Err(e) => ProxyResponse::err(e.to_string()),
            },
            ProxyRequest::SetCookie { name, value, .. } => {
                self.set_cookie(sender, &target, name, value)
            }
            ProxyRequest::GetAllCookies { .. } => match self.store.get_all(&target) {
                Ok(cookies) => ProxyResponse::ok_cookies(cookies),
                Err(e) => ProxyResponse::err(e.to_string()),
            },
            ProxyRequest::Unknown => unreachable!("handled above"),
        }
    }

    /// Security gate run before any cookie operation.
    ///
    /// The requester must be a registered context with a known URL, both
    /// URLs must parse, and the requester's origin must equal the target
    /// URL's origin. A page embedded in origin A can never touch cookies
    /// scoped to origin B through this channel.
    fn validate(&self, sender: ContextId, target_url: &str) -> Result<Url, &'static str> {
        let sender_url = self.registry.url_of(sender).ok_or(ERR_INVALID_SENDER)?;

        let sender_url = Url::parse(&sender_url).map_err(|_| ERR_INVALID_URL)?;
        let target = Url::parse(target_url).map_err(|_| ERR_INVALID_URL)?;
        if target.host_str().is_none() {
            return Err(ERR_INVALID_URL);
        }

        if sender_url.origin() != target.origin() {
            return Err(ERR_ORIGIN_MISMATCH);
        }

        Ok(target)
    }

    /// Remove-then-set, with attributes derived from the target URL. The
    /// two steps are not atomic with respect to concurrent writers of the
    /// same name; last write wins.
    fn set_cookie(
        &self,
        sender: ContextId,
        url: &Url,
        name: &str,
        value: &str,
    ) -> ProxyResponse {
        // Best-effort: a missing prior cookie is the normal case
        if let Err(e) = self.store.remove(url, name) {
            tracing::debug!(cookie = name, error = %e, "Prior-cookie removal failed");
        }

        let record = CookieRecord {
            name: name.to_string(),
            value: value.to_string(),
            domain: url.host_str().unwrap_or_default().to_lowercase(),
            path: "/".to_string(),
            secure: url.scheme() == "https",
            same_site: SameSite::Lax,
        };

        match self.store.set(record) {
            Ok(written) => {
                tracing::debug!(cookie = name, domain = %written.domain, "Cookie written");
                self.notify_origin(sender, url);
                ProxyResponse::ok_result(written)
            }
            Err(e) => ProxyResponse::err(e.to_string()),
        }
    }

    /// Fire-and-forget fan-out to every other open context at the written
    /// URL's origin. One task per observer; a closed or deaf context is
    /// its own problem and never affects the others or the caller.
    fn notify_origin(&self, writer: ContextId, url: &Url) {
        let origin = url.origin();
        let event = CookieChangedEvent {
            url: url.to_string(),
        };

        for (id, context_url, events) in self.registry.snapshot() {
            if id == writer {
                continue;
            }
            let Ok(context_url) = Url::parse(&context_url) else {
                continue;
            };
            if context_url.origin() != origin {
                continue;
            }

            let event = event.clone();
            tokio::spawn(async move {
                let _ = events.send(event);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryCookieStore, Result as StoreResult};
    use sitemode_channel::ProxyClient;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Wraps the memory store and counts every call that reaches it.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryCookieStore,
        calls: Arc<AtomicUsize>,
    }

    impl CookieStore for CountingStore {
        fn get(&self, url: &Url, name: &str) -> StoreResult<Option<CookieRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get(url, name)
        }

        fn set(&self, record: CookieRecord) -> StoreResult<CookieRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.set(record)
        }

        fn remove(&self, url: &Url, name: &str) -> StoreResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.remove(url, name)
        }

        fn get_all(&self, url: &Url) -> StoreResult<Vec<CookieRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get_all(url)
        }
    }

    fn start_proxy() -> (ContextRegistry, mpsc::Sender<Envelope>, Arc<AtomicUsize>) {
        let registry = ContextRegistry::new();
        let store = CountingStore::default();
        let calls = Arc::clone(&store.calls);
        let (tx, _handle) = CookieProxy::start(store, registry.clone());
        (registry, tx, calls)
    }

    #[tokio::test]
    async fn test_origin_mismatch_rejected_without_store_access() {
        let (registry, tx, calls) = start_proxy();
        let handle = registry.register("https://a.test/page");
        let client = ProxyClient::new(tx, handle.id);

        for request in [
            ProxyRequest::GetCookie {
                url: "https://b.test/".to_string(),
                name: "deviceoutput".to_string(),
            },
            ProxyRequest::SetCookie {
                url: "https://b.test/".to_string(),
                name: "deviceoutput".to_string(),
                value: "mobile".to_string(),
            },
            ProxyRequest::GetAllCookies {
                url: "https://b.test/".to_string(),
            },
        ] {
            let err = client.send(request).await.unwrap_err();
            assert_eq!(
                err,
                sitemode_channel::ChannelError::OperationFailed("Origin mismatch".to_string())
            );
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unregistered_sender_rejected() {
        let (_registry, tx, calls) = start_proxy();
        let client = ProxyClient::new(tx, ContextId::new());

        let err = client
            .get_cookie("https://a.test/", "deviceoutput")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            sitemode_channel::ChannelError::OperationFailed("Invalid sender".to_string())
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unparseable_url_rejected() {
        let (registry, tx, _calls) = start_proxy();
        let handle = registry.register("https://a.test/");
        let client = ProxyClient::new(tx, handle.id);

        let err = client.get_cookie("not a url", "x").await.unwrap_err();
        assert_eq!(
            err,
            sitemode_channel::ChannelError::OperationFailed("Invalid URL format".to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_message_type_rejected() {
        let (registry, tx, calls) = start_proxy();
        let handle = registry.register("https://a.test/");
        let client = ProxyClient::new(tx, handle.id);

        let err = client.send(ProxyRequest::Unknown).await.unwrap_err();
        assert_eq!(
            err,
            sitemode_channel::ChannelError::OperationFailed("Unknown message type".to_string())
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_set_cookie_assigns_attributes() {
        let (registry, tx, _calls) = start_proxy();
        let handle = registry.register("https://Shop.Example.com/cart");
        let client = ProxyClient::new(tx, handle.id);

        let written = client
            .set_cookie("https://Shop.Example.com/cart", "deviceoutput", "mobile")
            .await
            .unwrap();

        assert_eq!(written.domain, "shop.example.com");
        assert_eq!(written.path, "/");
        assert!(written.secure);
        assert_eq!(written.same_site, SameSite::Lax);
    }

    #[tokio::test]
    async fn test_http_url_writes_insecure_cookie() {
        let (registry, tx, _calls) = start_proxy();
        let handle = registry.register("http://localhost:3000/");
        let client = ProxyClient::new(tx, handle.id);

        let written = client
            .set_cookie("http://localhost:3000/", "devicetype", "app")
            .await
            .unwrap();
        assert!(!written.secure);
    }

    #[tokio::test]
    async fn test_set_then_get_roundtrip() {
        let (registry, tx, _calls) = start_proxy();
        let handle = registry.register("https://a.test/");
        let client = ProxyClient::new(tx, handle.id);

        assert!(client
            .get_cookie("https://a.test/", "deviceoutput")
            .await
            .unwrap()
            .is_none());

        client
            .set_cookie("https://a.test/", "deviceoutput", "desktop")
            .await
            .unwrap();

        let cookie = client
            .get_cookie("https://a.test/", "deviceoutput")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cookie.value, "desktop");

        let all = client.get_all_cookies("https://a.test/").await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_notification_reaches_other_same_origin_contexts_only() {
        let (registry, tx, _calls) = start_proxy();

        let writer = registry.register("https://a.test/page1");
        let mut same_origin = registry.register("https://a.test/page2");
        let mut cross_origin = registry.register("https://b.test/");

        let client = ProxyClient::new(tx, writer.id);
        client
            .set_cookie("https://a.test/page1", "deviceoutput", "mobile")
            .await
            .unwrap();

        let event =
            tokio::time::timeout(std::time::Duration::from_secs(1), same_origin.events.recv())
                .await
                .expect("same-origin context should be notified")
                .unwrap();
        assert_eq!(event.url, "https://a.test/page1");

        // Exactly one event for a single write
        assert!(same_origin.events.try_recv().is_err());
        // Cross-origin context hears nothing
        assert!(cross_origin.events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_observer_does_not_break_write_or_others() {
        let (registry, tx, _calls) = start_proxy();

        let writer = registry.register("https://a.test/");
        let closed = registry.register("https://a.test/closed");
        drop(closed.events);
        let mut listening = registry.register("https://a.test/listening");

        let client = ProxyClient::new(tx, writer.id);
        client
            .set_cookie("https://a.test/", "deviceoutput", "app")
            .await
            .unwrap();

        let event =
            tokio::time::timeout(std::time::Duration::from_secs(1), listening.events.recv())
                .await
                .expect("listening context should still be notified")
                .unwrap();
        assert_eq!(event.url, "https://a.test/");
    }
}
