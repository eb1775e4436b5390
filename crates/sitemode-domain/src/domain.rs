//! Canonical domain representation
//!
//! A `Domain` is only constructible through normalization, so any value
//! held by the whitelist or compared by the matcher is already canonical.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::Result;

const MAX_LABEL_LEN: usize = 63;

/// A normalized domain: lowercase, no scheme, no leading `www.`,
/// no trailing slash. Deserialization routes through [`Domain::normalize`],
/// so a hand-edited settings row cannot smuggle a non-canonical value in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Domain(String);

impl Domain {
    /// Normalize raw user or host input into a canonical domain.
    ///
    /// Lowercases, strips `http(s)://`, a leading `www.`, a trailing `/`,
    /// and surrounding whitespace, then validates the result as either a
    /// single DNS label or a dotted hostname. Normalization is idempotent:
    /// feeding an already-normalized domain back in yields the same value.
    pub fn normalize(input: &str) -> Result<Domain> {
        let mut s = input.trim().to_lowercase();

        for scheme in ["https://", "http://"] {
            if let Some(rest) = s.strip_prefix(scheme) {
                s = rest.to_string();
                break;
            }
        }

        if let Some(rest) = s.strip_prefix("www.") {
            s = rest.to_string();
        }

        if let Some(rest) = s.strip_suffix('/') {
            s = rest.to_string();
        }

        if is_single_label(&s) || is_dotted_hostname(&s) {
            Ok(Domain(s))
        } else {
            Err(DomainError::InvalidFormat(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// DNS labels of this domain, most-specific first.
    pub fn labels(&self) -> Vec<&str> {
        self.0.split('.').collect()
    }

    /// Strict label-wise subdomain check.
    ///
    /// The candidate must carry strictly more labels than the parent, and
    /// its label-suffix of the parent's length must equal the parent label
    /// for label. This is deliberately not a string-suffix comparison:
    /// `evilcom.example.com` must not match `example.com`.
    pub fn is_subdomain_of(&self, parent: &Domain) -> bool {
        let child_labels = self.labels();
        let parent_labels = parent.labels();

        if child_labels.len() <= parent_labels.len() {
            return false;
        }

        let offset = child_labels.len() - parent_labels.len();
        child_labels[offset..]
            .iter()
            .zip(parent_labels.iter())
            .all(|(a, b)| a == b)
    }
}

impl TryFrom<String> for Domain {
    type Error = DomainError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Domain::normalize(&value)
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Single bare label like "localhost" or "myapp": letters, digits,
/// hyphens, nothing else.
fn is_single_label(s: &str) -> bool {
    !s.is_empty()
        && !s.contains('.')
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Conservative dotted-hostname grammar: each label 1-63 chars,
/// alphanumeric with internal hyphens only.
fn is_dotted_hostname(s: &str) -> bool {
    let labels: Vec<&str> = s.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    labels.iter().all(|label| is_valid_label(label))
}

fn is_valid_label(label: &str) -> bool {
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return false;
    }
    if label.starts_with('-') || label.ends_with('-') {
        return false;
    }
    label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
