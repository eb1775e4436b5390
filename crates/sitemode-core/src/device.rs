//! Device identity
//!
//! The desktop/mobile/app mode encoded redundantly into the two device
//! cookies for the current origin.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceIdentity {
    Desktop,
    Mobile,
    App,
}

impl DeviceIdentity {
    pub const ALL: [DeviceIdentity; 3] = [
        DeviceIdentity::Desktop,
        DeviceIdentity::Mobile,
        DeviceIdentity::App,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceIdentity::Desktop => "desktop",
            DeviceIdentity::Mobile => "mobile",
            DeviceIdentity::App => "app",
        }
    }

    /// Lenient parse of a cookie value. Anything outside the three known
    /// identities means "no identity set", never an error.
    pub fn from_cookie_value(value: &str) -> Option<DeviceIdentity> {
        match value {
            "desktop" => Some(DeviceIdentity::Desktop),
            "mobile" => Some(DeviceIdentity::Mobile),
            "app" => Some(DeviceIdentity::App),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
