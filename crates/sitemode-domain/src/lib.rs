//! SiteMode Domain Layer
//!
//! Canonical domain strings and the subdomain-matching rules that decide
//! where the device toggle activates.

mod domain;
mod error;
mod matcher;

pub use domain::Domain;
pub use error::DomainError;
pub use matcher::matches_whitelist;

pub type Result<T> = std::result::Result<T, DomainError>;
