//! Shared constants
//!
//! Imported by value wherever needed; nothing here is mutable state.

/// Primary cookie carrying the selected device identity.
pub const DEVICE_OUTPUT_COOKIE: &str = "deviceoutput";

/// Companion cookie, always written with the same value; reads fall back
/// to it when the primary is missing.
pub const DEVICE_TYPE_COOKIE: &str = "devicetype";

/// Window for coalescing bursts of navigation events.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

pub use sitemode_channel::DEFAULT_TIMEOUT_MS;
