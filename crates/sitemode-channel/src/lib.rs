//! SiteMode Messaging Channel
//!
//! The only connection between an unprivileged page context and the
//! privileged cookie proxy: a request/response transport with a bounded
//! wait and typed failures. This crate deliberately exposes no
//! cookie-store capability, only the wire protocol and the client.

mod client;
mod error;
mod protocol;

pub use client::ProxyClient;
pub use error::ChannelError;
pub use protocol::{
    ContextId, CookieChangedEvent, CookieRecord, Envelope, ProxyRequest, ProxyResponse, SameSite,
    DEFAULT_TIMEOUT_MS,
};

pub type Result<T> = std::result::Result<T, ChannelError>;
