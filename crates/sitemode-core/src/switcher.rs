//! Device switcher
//!
//! Writes the selected identity into both device cookies for the current
//! page and reads the active identity back out.

use sitemode_channel::ProxyClient;

use crate::constants::{DEVICE_OUTPUT_COOKIE, DEVICE_TYPE_COOKIE};
use crate::device::DeviceIdentity;
use crate::Result;

pub struct DeviceSwitcher {
    client: ProxyClient,
    page_url: String,
}

impl DeviceSwitcher {
    pub fn new(client: ProxyClient, page_url: impl Into<String>) -> Self {
        Self {
            client,
            page_url: page_url.into(),
        }
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    pub fn set_page_url(&mut self, url: impl Into<String>) {
        self.page_url = url.into();
    }

    /// Write the identity into both cookies.
    ///
    /// The two writes are sequential; a failure on either one propagates
    /// to the caller. The second write failing must never be swallowed,
    /// or the cookies would silently disagree.
    pub async fn set_device(&self, identity: DeviceIdentity) -> Result<()> {
        self.client
            .set_cookie(&self.page_url, DEVICE_OUTPUT_COOKIE, identity.as_str())
            .await?;
        self.client
            .set_cookie(&self.page_url, DEVICE_TYPE_COOKIE, identity.as_str())
            .await?;

        tracing::info!(device = %identity, url = %self.page_url, "Device identity set");
        Ok(())
    }

    /// The currently active identity for this page, if any.
    ///
    /// Prefers `deviceoutput`, falls back to `devicetype`; a missing
    /// cookie or an unrecognized value both read as "nothing selected".
    pub async fn current_device(&self) -> Result<Option<DeviceIdentity>> {
        if let Some(cookie) = self
            .client
            .get_cookie(&self.page_url, DEVICE_OUTPUT_COOKIE)
            .await?
        {
            if let Some(identity) = DeviceIdentity::from_cookie_value(&cookie.value) {
                return Ok(Some(identity));
            }
        }

        if let Some(cookie) = self
            .client
            .get_cookie(&self.page_url, DEVICE_TYPE_COOKIE)
            .await?
        {
            return Ok(DeviceIdentity::from_cookie_value(&cookie.value));
        }

        Ok(None)
    }
}
