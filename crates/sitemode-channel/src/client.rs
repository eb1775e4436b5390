//! Caller-side proxy client
//!
//! Wraps the envelope queue into typed request/response calls. Every call
//! races the proxy's reply against a timer; a reply landing after the
//! timer has settled the call is dropped on the floor.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::error::ChannelError;
use crate::protocol::{
    ContextId, CookieRecord, Envelope, ProxyRequest, ProxyResponse, DEFAULT_TIMEOUT_MS,
};
use crate::Result;

#[derive(Clone)]
pub struct ProxyClient {
    tx: mpsc::Sender<Envelope>,
    sender: ContextId,
    timeout: Duration,
}

impl ProxyClient {
    pub fn new(tx: mpsc::Sender<Envelope>, sender: ContextId) -> Self {
        Self {
            tx,
            sender,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn context_id(&self) -> ContextId {
        self.sender
    }

    /// Dispatch a request and wait for the proxy's verdict.
    ///
    /// A response with `success == false` becomes `OperationFailed` with
    /// the proxy-supplied reason, so callers only ever see `Ok` for
    /// operations that actually happened.
    pub async fn send(&self, request: ProxyRequest) -> Result<ProxyResponse> {
        let (respond_to, response_rx) = oneshot::channel();
        let request_id = Uuid::new_v4();

        let envelope = Envelope {
            sender: self.sender,
            request_id,
            request,
            respond_to,
        };

        self.tx
            .send(envelope)
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;

        tracing::debug!(%request_id, "Dispatched request to cookie proxy");

        let response = match tokio::time::timeout(self.timeout, response_rx).await {
            Ok(Ok(response)) => response,
            // Responder dropped without ever answering
            Ok(Err(_)) => return Err(ChannelError::EmptyResponse),
            Err(_) => return Err(ChannelError::Timeout(self.timeout.as_millis() as u64)),
        };

        if response.success {
            Ok(response)
        } else {
            let reason = response
                .error
                .unwrap_or_else(|| "Unknown error".to_string());
            Err(ChannelError::OperationFailed(reason))
        }
    }

    pub async fn get_cookie(&self, url: &str, name: &str) -> Result<Option<CookieRecord>> {
        let response = self
            .send(ProxyRequest::GetCookie {
                url: url.to_string(),
                name: name.to_string(),
            })
            .await?;
        Ok(response.cookie)
    }

    pub async fn set_cookie(&self, url: &str, name: &str, value: &str) -> Result<CookieRecord> {
        let response = self
            .send(ProxyRequest::SetCookie {
                url: url.to_string(),
                name: name.to_string(),
                value: value.to_string(),
            })
            .await?;
        response.result.ok_or(ChannelError::EmptyResponse)
    }

    pub async fn get_all_cookies(&self, url: &str) -> Result<Vec<CookieRecord>> {
        let response = self
            .send(ProxyRequest::GetAllCookies {
                url: url.to_string(),
            })
            .await?;
        response.cookies.ok_or(ChannelError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::SameSite;

    fn client_with_queue(capacity: usize) -> (ProxyClient, mpsc::Receiver<Envelope>) {
        let (tx, rx) = mpsc::channel(capacity);
        (ProxyClient::new(tx, ContextId::new()), rx)
    }

    fn record(name: &str, value: &str) -> CookieRecord {
        CookieRecord {
            name: name.to_string(),
            value: value.to_string(),
            domain: "example.com".to_string(),
            path: "/".to_string(),
            secure: true,
            same_site: SameSite::Lax,
        }
    }

    #[tokio::test]
    async fn test_send_returns_successful_response() {
        let (client, mut rx) = client_with_queue(1);

        tokio::spawn(async move {
            let envelope = rx.recv().await.unwrap();
            let _ = envelope
                .respond_to
                .send(ProxyResponse::ok_cookie(Some(record("a", "b"))));
        });

        let cookie = client.get_cookie("https://example.com", "a").await.unwrap();
        assert_eq!(cookie.unwrap().value, "b");
    }

    #[tokio::test]
    async fn test_send_times_out_on_silent_proxy() {
        let (client, _rx) = client_with_queue(1);
        let client = client.with_timeout(Duration::from_millis(20));

        let err = client
            .send(ProxyRequest::GetAllCookies {
                url: "https://example.com".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, ChannelError::Timeout(20));
    }

    #[tokio::test]
    async fn test_send_maps_closed_queue_to_transport_error() {
        let (client, rx) = client_with_queue(1);
        drop(rx);

        let err = client
            .get_cookie("https://example.com", "a")
            .await
            .unwrap_err();
        assert!(matches!(err, ChannelError::Transport(_)));
    }

    #[tokio::test]
    async fn test_send_maps_dropped_responder_to_empty_response() {
        let (client, mut rx) = client_with_queue(1);

        tokio::spawn(async move {
            let envelope = rx.recv().await.unwrap();
            drop(envelope.respond_to);
        });

        let err = client
            .get_cookie("https://example.com", "a")
            .await
            .unwrap_err();
        assert_eq!(err, ChannelError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_send_maps_failure_response_to_operation_failed() {
        let (client, mut rx) = client_with_queue(1);

        tokio::spawn(async move {
            let envelope = rx.recv().await.unwrap();
            let _ = envelope
                .respond_to
                .send(ProxyResponse::err("Origin mismatch"));
        });

        let err = client
            .set_cookie("https://example.com", "deviceoutput", "mobile")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ChannelError::OperationFailed("Origin mismatch".to_string())
        );
    }
}
