//! SiteMode Cookie Access Proxy
//!
//! The privileged side of the system: the only component holding a
//! capability to the real cookie store. Page contexts reach it solely
//! through the messaging channel, and every request is validated against
//! the requester's own origin before any cookie operation runs.

mod registry;
mod service;
mod store;

pub use registry::{ContextHandle, ContextRegistry};
pub use service::CookieProxy;
pub use store::{CookieStore, MemoryCookieStore, StoreError};
