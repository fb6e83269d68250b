use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::family::DeviceFamily;

/// Tunable settings of a link check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Echo requests sent to the FTP host
    pub ping_count: u32,
    /// Local file uploaded and then downloaded over FTP
    pub test_file: String,
    /// CSV report that receives one row per run
    pub report_path: String,
    pub ftp: FtpSettings,
    pub device: DeviceSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FtpSettings {
    pub port: u16,
    pub passive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSettings {
    pub ssh_port: u16,
    /// Remote shell timeout for Cradlepoint routers (seconds)
    pub cradlepoint_timeout_secs: u64,
    /// Remote shell timeout for Zyxel modems (seconds), their status command is slow
    pub zyxel_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ping_count: 2,
            test_file: "1kb.test".to_string(),
            report_path: "modemtestreport.csv".to_string(),
            ftp: FtpSettings {
                port: 21,
                passive: true,
            },
            device: DeviceSettings {
                ssh_port: 22,
                cradlepoint_timeout_secs: 30,
                zyxel_timeout_secs: 600,
            },
        }
    }
}

impl DeviceSettings {
    /// Session timeout for `family`
    pub fn timeout_for(&self, family: DeviceFamily) -> Duration {
        let secs = match family {
            DeviceFamily::Zyxel => self.zyxel_timeout_secs,
            DeviceFamily::None | DeviceFamily::Cradlepoint350 | DeviceFamily::Cradlepoint750 => {
                self.cradlepoint_timeout_secs
            }
        };
        Duration::from_secs(secs)
    }
}
