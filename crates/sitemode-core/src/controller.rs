//! Caller-side controller
//!
//! Wires the whitelist store, the device switcher, and the UI surface
//! together. Every failure is caught here and routed to the UI error
//! surface; nothing propagates out of the intent loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use url::Url;

use sitemode_whitelist::WhitelistStore;

use crate::device::DeviceIdentity;
use crate::switcher::DeviceSwitcher;
use crate::ui::{UiIntent, UiSurface};
use crate::{CoreError, Result};

pub struct Controller<U: UiSurface> {
    whitelist: WhitelistStore,
    switcher: DeviceSwitcher,
    ui: Arc<U>,
}

impl<U: UiSurface> Controller<U> {
    pub fn new(whitelist: WhitelistStore, switcher: DeviceSwitcher, ui: Arc<U>) -> Self {
        Self {
            whitelist,
            switcher,
            ui,
        }
    }

    /// Whether the toggle is active on the current page, per the
    /// whitelist. Consulted before any cookie flow is attempted.
    pub fn is_active(&self) -> Result<bool> {
        let host = page_host(self.switcher.page_url())?;
        Ok(self.whitelist.is_current_domain_whitelisted(&host)?)
    }

    /// Push current state into the UI: whitelist contents plus, when the
    /// page is whitelisted, the active device identity.
    pub async fn refresh(&self) {
        match self.whitelist.get() {
            Ok(domains) => self.ui.render_whitelist(&domains),
            Err(e) => self.ui.show_error(&e.to_string()),
        }

        match self.is_active() {
            Ok(true) => match self.switcher.current_device().await {
                Ok(identity) => self.ui.show_active_device(identity),
                Err(e) => self.ui.show_error(&e.to_string()),
            },
            Ok(false) => {}
            Err(e) => self.ui.show_error(&e.to_string()),
        }
    }

    /// Apply one piece of user intent. Failures surface through the UI
    /// and leave no partial state unreported.
    pub async fn handle_intent(&self, intent: UiIntent) {
        match intent {
            UiIntent::DeviceSelected(identity) => self.select_device(identity).await,
            UiIntent::AddDomainRequested(raw) => match self.whitelist.add(&raw) {
                Ok(domains) => self.ui.render_whitelist(&domains),
                Err(e) => self.ui.show_error(&e.to_string()),
            },
            UiIntent::RemoveDomainRequested(raw) => match self.whitelist.remove(&raw) {
                Ok(domains) => self.ui.render_whitelist(&domains),
                Err(e) => self.ui.show_error(&e.to_string()),
            },
        }
    }

    async fn select_device(&self, identity: DeviceIdentity) {
        match self.is_active() {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(
                    url = %self.switcher.page_url(),
                    "Ignoring device selection on non-whitelisted page"
                );
                return;
            }
            Err(e) => {
                self.ui.show_error(&e.to_string());
                return;
            }
        }

        match self.switcher.set_device(identity).await {
            Ok(()) => self.ui.show_active_device(Some(identity)),
            Err(e) => self.ui.show_error(&e.to_string()),
        }
    }

    /// The page navigated; repoint the switcher and re-sync the UI.
    pub async fn handle_navigation(&mut self, url: String) {
        self.switcher.set_page_url(url);
        self.refresh().await;
    }

    /// Consume intents until the UI side hangs up.
    pub async fn run(self, mut intents: mpsc::UnboundedReceiver<UiIntent>) {
        while let Some(intent) = intents.recv().await {
            self.handle_intent(intent).await;
        }
    }
}

fn page_host(page_url: &str) -> Result<String> {
    let url =
        Url::parse(page_url).map_err(|_| CoreError::InvalidPageUrl(page_url.to_string()))?;
    url.host_str()
        .map(|h| h.to_string())
        .ok_or_else(|| CoreError::InvalidPageUrl(page_url.to_string()))
}
