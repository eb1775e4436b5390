//! UI collaborator boundary
//!
//! The floating card, its buttons, and the settings panel live outside
//! the core; this trait is everything the core knows about them. Intent
//! flows the other way as `UiIntent` values.

use sitemode_domain::Domain;

use crate::device::DeviceIdentity;

pub trait UiSurface: Send + Sync {
    /// Reflect the currently active identity (or none) in the card.
    fn show_active_device(&self, identity: Option<DeviceIdentity>);

    /// Surface a failure to the user.
    fn show_error(&self, message: &str);

    /// Re-render the whitelist in the settings panel.
    fn render_whitelist(&self, domains: &[Domain]);
}

/// User intent arriving from the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiIntent {
    DeviceSelected(DeviceIdentity),
    AddDomainRequested(String),
    RemoveDomainRequested(String),
}
