//! Cookie store abstraction
//!
//! `CookieStore` is the capability the proxy mediates. It lives only in
//! this crate; the caller side links against the channel crate and never
//! sees these methods.

use parking_lot::Mutex;
use thiserror::Error;
use url::Url;

use sitemode_channel::CookieRecord;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Cookie store failure: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

pub trait CookieStore: Send + Sync + 'static {
    /// Look up a cookie visible to `url` by name.
    fn get(&self, url: &Url, name: &str) -> Result<Option<CookieRecord>>;

    /// Write a cookie. The proxy has already assigned all attributes.
    fn set(&self, record: CookieRecord) -> Result<CookieRecord>;

    /// Remove a cookie by name for the URL's host. Removing a cookie that
    /// does not exist is not an error.
    fn remove(&self, url: &Url, name: &str) -> Result<()>;

    /// Enumerate every cookie visible to `url`.
    fn get_all(&self, url: &Url) -> Result<Vec<CookieRecord>>;
}

/// In-process cookie jar with RFC 6265-style domain matching: a cookie is
/// visible to a host that equals its domain or sits below it.
#[derive(Default)]
pub struct MemoryCookieStore {
    cookies: Mutex<Vec<CookieRecord>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cookies.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.lock().is_empty()
    }
}

fn domain_matches(host: &str, cookie_domain: &str) -> bool {
    host == cookie_domain || host.ends_with(&format!(".{cookie_domain}"))
}

fn host_of(url: &Url) -> Result<String> {
    url.host_str()
        .map(|h| h.to_lowercase())
        .ok_or_else(|| StoreError::Backend(format!("URL has no host: {url}")))
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, url: &Url, name: &str) -> Result<Option<CookieRecord>> {
        let host = host_of(url)?;
        let cookies = self.cookies.lock();
        Ok(cookies
            .iter()
            .find(|c| c.name == name && domain_matches(&host, &c.domain))
            .cloned())
    }

    fn set(&self, record: CookieRecord) -> Result<CookieRecord> {
        let mut cookies = self.cookies.lock();
        cookies.retain(|c| {
            !(c.name == record.name && c.domain == record.domain && c.path == record.path)
        });
        cookies.push(record.clone());
        Ok(record)
    }

    fn remove(&self, url: &Url, name: &str) -> Result<()> {
        let host = host_of(url)?;
        let mut cookies = self.cookies.lock();
        cookies.retain(|c| !(c.name == name && c.domain == host));
        Ok(())
    }

    fn get_all(&self, url: &Url) -> Result<Vec<CookieRecord>> {
        let host = host_of(url)?;
        let cookies = self.cookies.lock();
        Ok(cookies
            .iter()
            .filter(|c| domain_matches(&host, &c.domain))
            .cloned()
            .collect())
    }
}
