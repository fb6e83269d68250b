//! Device family selection
//!
//! The family is fixed for the whole run. It decides which remote command is
//! issued, how its output is parsed and which column block of the report is
//! populated.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Vendor/model class of the transport hardware behind the link under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeviceFamily {
    /// No device stats are collected for this run
    None,
    /// Cradlepoint 350, legacy firmware reporting free-text banners
    Cradlepoint350,
    /// Cradlepoint 750, reports a structured status tree
    Cradlepoint750,
    /// Zyxel DSL modem
    Zyxel,
}

impl DeviceFamily {
    /// Command-line selectors in the order they are listed in help output
    pub const SELECTORS: [&'static str; 4] = ["none", "350", "750", "zyxel"];

    /// Whether a device session is opened for this family
    pub fn needs_device(self) -> bool {
        !matches!(self, DeviceFamily::None)
    }

    pub fn is_cradlepoint(self) -> bool {
        matches!(
            self,
            DeviceFamily::Cradlepoint350 | DeviceFamily::Cradlepoint750
        )
    }

    /// Selector string accepted on the command line
    pub fn selector(self) -> &'static str {
        match self {
            DeviceFamily::None => "none",
            DeviceFamily::Cradlepoint350 => "350",
            DeviceFamily::Cradlepoint750 => "750",
            DeviceFamily::Zyxel => "zyxel",
        }
    }
}

impl fmt::Display for DeviceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceFamily::None => "no device",
            DeviceFamily::Cradlepoint350 => "Cradlepoint 350",
            DeviceFamily::Cradlepoint750 => "Cradlepoint 750",
            DeviceFamily::Zyxel => "Zyxel",
        };
        f.write_str(name)
    }
}

impl FromStr for DeviceFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "no_modem" => Ok(DeviceFamily::None),
            "350" => Ok(DeviceFamily::Cradlepoint350),
            "750" => Ok(DeviceFamily::Cradlepoint750),
            "zyxel" => Ok(DeviceFamily::Zyxel),
            other => Err(format!(
                "unknown device family '{}', expected one of: {}",
                other,
                Self::SELECTORS.join(", ")
            )),
        }
    }
}
