//! Whitelist matching
//!
//! Decides whether the device toggle is active for the current domain.

use crate::domain::Domain;

/// True if `current` is covered by the whitelist.
///
/// An empty whitelist means the feature is active everywhere. Otherwise
/// `current` must equal an entry exactly or be a subdomain of one.
pub fn matches_whitelist(current: &Domain, whitelist: &[Domain]) -> bool {
    if whitelist.is_empty() {
        return true;
    }

    whitelist
        .iter()
        .any(|entry| current == entry || current.is_subdomain_of(entry))
}
