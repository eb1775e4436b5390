//! Wire protocol between page contexts and the cookie proxy
//!
//! Requests are tagged objects (`type` field); responses always carry a
//! `success` flag and either a payload or an `error` reason. The proxy
//! answers every request with exactly one response.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use uuid::Uuid;

/// Bounded wait for a proxy response before the call settles as a timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Identity of a registered page context, assigned by the host runtime at
/// registration. Callers never pick their own id, so a page embedded in
/// one origin cannot impersonate a context at another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId(Uuid);

impl ContextId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

/// A cookie as the proxy stores and reports it. Attributes beyond
/// name/value are proxy-assigned at write time, never caller-supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub same_site: SameSite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProxyRequest {
    #[serde(rename = "GET_COOKIE")]
    GetCookie { url: String, name: String },

    #[serde(rename = "SET_COOKIE")]
    SetCookie {
        url: String,
        name: String,
        value: String,
    },

    #[serde(rename = "GET_ALL_COOKIES")]
    GetAllCookies { url: String },

    /// Anything with an unrecognized `type` tag.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie: Option<CookieRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CookieRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Vec<CookieRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProxyResponse {
    pub fn ok_cookie(cookie: Option<CookieRecord>) -> Self {
        Self {
            success: true,
            cookie,
            ..Default::default()
        }
    }

    pub fn ok_result(result: CookieRecord) -> Self {
        Self {
            success: true,
            result: Some(result),
            ..Default::default()
        }
    }

    pub fn ok_cookies(cookies: Vec<CookieRecord>) -> Self {
        Self {
            success: true,
            cookies: Some(cookies),
            ..Default::default()
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

/// Change notification fanned out to other page contexts at the origin of
/// a freshly written cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "COOKIE_CHANGED")]
pub struct CookieChangedEvent {
    pub url: String,
}

/// A request in flight: the sender's runtime-assigned context, a
/// correlation id for tracing, and the one-shot responder the proxy must
/// settle. Dropped responders surface to the caller as an empty response.
#[derive(Debug)]
pub struct Envelope {
    pub sender: ContextId,
    pub request_id: Uuid,
    pub request: ProxyRequest,
    pub respond_to: oneshot::Sender<ProxyResponse>,
}
