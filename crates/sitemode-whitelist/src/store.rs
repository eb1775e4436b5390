//! Whitelist store
//!
//! Persists the domain list as a single settings entry holding a JSON
//! array of normalized domain strings. An absent entry is an empty list.

use sitemode_domain::{matches_whitelist, Domain};
use sitemode_storage::Database;

use crate::Result;

const WHITELIST_KEY: &str = "whitelist";

pub struct WhitelistStore {
    db: Database,
}

impl WhitelistStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The persisted list, insertion order preserved.
    pub fn get(&self) -> Result<Vec<Domain>> {
        match self.db.get_setting(WHITELIST_KEY)? {
            Some(json) => {
                let domains: Vec<Domain> = serde_json::from_str(&json)
                    .map_err(sitemode_storage::StorageError::from)?;
                Ok(domains)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Normalize and append a domain, returning the updated list.
    ///
    /// Adding a domain that is already present is a no-op that still
    /// returns the current list.
    pub fn add(&self, raw_domain: &str) -> Result<Vec<Domain>> {
        let domain = Domain::normalize(raw_domain)?;
        let mut domains = self.get()?;

        if !domains.contains(&domain) {
            tracing::info!(domain = %domain, "Adding domain to whitelist");
            domains.push(domain);
            self.persist(&domains)?;
        }

        Ok(domains)
    }

    /// Normalize and remove a domain, returning the updated list.
    /// Removing an absent domain is a no-op.
    pub fn remove(&self, raw_domain: &str) -> Result<Vec<Domain>> {
        let domain = Domain::normalize(raw_domain)?;
        let mut domains = self.get()?;

        let before = domains.len();
        domains.retain(|d| d != &domain);

        if domains.len() != before {
            tracing::info!(domain = %domain, "Removing domain from whitelist");
            self.persist(&domains)?;
        }

        Ok(domains)
    }

    /// Whether the feature is active for the given page hostname.
    pub fn is_current_domain_whitelisted(&self, current_hostname: &str) -> Result<bool> {
        let current = Domain::normalize(current_hostname)?;
        let domains = self.get()?;
        Ok(matches_whitelist(&current, &domains))
    }

    fn persist(&self, domains: &[Domain]) -> Result<()> {
        let json =
            serde_json::to_string(domains).map_err(sitemode_storage::StorageError::from)?;
        self.db.set_setting(WHITELIST_KEY, &json)?;
        Ok(())
    }
}

impl Clone for WhitelistStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WhitelistError;

    fn store() -> WhitelistStore {
        WhitelistStore::new(Database::open_in_memory().unwrap())
    }

    #[test]
    fn test_get_on_fresh_store_is_empty() {
        assert!(store().get().unwrap().is_empty());
    }

    #[test]
    fn test_add_normalizes_and_persists() {
        let store = store();
        let domains = store.add("HTTPS://WWW.Example.com/").unwrap();
        assert_eq!(domains.len(), 1);
        assert_eq!(domains[0].as_str(), "example.com");

        // Visible through a second store over the same database
        let again = WhitelistStore::new(store.db.clone());
        assert_eq!(again.get().unwrap(), domains);
    }

    #[test]
    fn test_add_is_idempotent() {
        let store = store();
        store.add("example.com").unwrap();
        let domains = store.add("www.example.com").unwrap();
        assert_eq!(domains.len(), 1);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let store = store();
        store.add("b.com").unwrap();
        store.add("a.com").unwrap();
        let domains = store.add("c.com").unwrap();

        let order: Vec<&str> = domains.iter().map(|d| d.as_str()).collect();
        assert_eq!(order, ["b.com", "a.com", "c.com"]);
    }

    #[test]
    fn test_add_rejects_invalid_domain() {
        let err = store().add("not a domain").unwrap_err();
        assert!(matches!(err, WhitelistError::InvalidDomain(_)));
    }

    #[test]
    fn test_remove_absent_domain_is_noop() {
        let store = store();
        store.add("example.com").unwrap();
        let domains = store.remove("missing.org").unwrap();
        assert_eq!(domains.len(), 1);
    }

    #[test]
    fn test_remove_filters_entry() {
        let store = store();
        store.add("example.com").unwrap();
        store.add("other.org").unwrap();

        let domains = store.remove("http://example.com").unwrap();
        assert_eq!(domains.len(), 1);
        assert_eq!(domains[0].as_str(), "other.org");
    }

    #[test]
    fn test_is_current_domain_whitelisted() {
        let store = store();
        store.add("example.com").unwrap();

        assert!(store
            .is_current_domain_whitelisted("shop.example.com")
            .unwrap());
        assert!(!store
            .is_current_domain_whitelisted("evilexample.com")
            .unwrap());
    }

    #[test]
    fn test_empty_whitelist_is_open_by_default() {
        assert!(store().is_current_domain_whitelisted("anywhere.net").unwrap());
    }

    #[test]
    fn test_storage_failure_surfaces_as_storage_error() {
        let store = store();
        store.add("example.com").unwrap();

        // Break the backing store out from under the whitelist
        store
            .db
            .with_connection(|conn| {
                conn.execute("DROP TABLE settings", [])?;
                Ok(())
            })
            .unwrap();

        assert!(matches!(
            store.get().unwrap_err(),
            WhitelistError::Storage(_)
        ));
        assert!(matches!(
            store.add("other.org").unwrap_err(),
            WhitelistError::Storage(_)
        ));
        assert!(matches!(
            store
                .is_current_domain_whitelisted("example.com")
                .unwrap_err(),
            WhitelistError::Storage(_)
        ));
    }
}
