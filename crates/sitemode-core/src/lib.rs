//! SiteMode Core
//!
//! Caller-side coordination for the per-site device output toggle: the
//! device identity written into the two cookies, the switcher that talks
//! to the cookie proxy over the messaging channel, whitelist gating, and
//! the controller that reflects everything into the UI surface.

pub mod constants;
mod config;
mod controller;
mod device;
mod error;
mod navigation;
mod switcher;
mod ui;

pub use config::Config;
pub use controller::Controller;
pub use device::DeviceIdentity;
pub use error::CoreError;
pub use navigation::NavigationDebouncer;
pub use switcher::DeviceSwitcher;
pub use ui::{UiIntent, UiSurface};

// Re-export the pieces a host needs to wire a caller together
pub use sitemode_channel::{ChannelError, CookieRecord, ProxyClient, SameSite};
pub use sitemode_domain::{matches_whitelist, Domain, DomainError};
pub use sitemode_storage::{Database, StorageError};
pub use sitemode_whitelist::{WhitelistError, WhitelistStore};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
