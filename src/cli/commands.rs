use clap::Parser;
use std::path::PathBuf;

use crate::collectors::{DeviceTarget, FtpEndpoint};
use crate::config::Settings;
use crate::errors::ConfigError;
use crate::models::family::DeviceFamily;

/// Command-line interface of the link checker
/// Positional arguments follow the order used by the scheduler scripts that call it
#[derive(Parser, Debug)]
#[command(version)] // Automatically uses version from Cargo.toml
#[command(about = "Link quality check: ping and FTP throughput against a server, plus cellular modem diagnostics, appended to a CSV report")]
#[command(long_about = "Pings the FTP server, times an upload and a download of the test file, \
optionally logs into the transport device over SSH to read its signal and carrier diagnostics, \
then appends one row to the CSV report.\n\n\
Examples:\n  \
linkcheck 192.0.2.10 ftpuser ftppass none\n  \
linkcheck 192.0.2.10 ftpuser ftppass 750 192.168.0.1 admin secret\n  \
linkcheck 192.0.2.10 ftpuser ftppass zyxel 192.168.1.1 admin 1234 --verbose")]
pub struct Cli {
    /// FTP server address, also used as the ping target
    pub ftp_host: String,

    /// Username for the FTP server
    pub ftp_username: String,

    /// Password for the FTP server
    pub ftp_password: String,

    /// Transport device family
    #[arg(value_parser = parse_family, help = "Device family: none, 350, 750, zyxel")]
    pub family: DeviceFamily,

    /// Device address, required unless the family is none
    pub device_host: Option<String>,

    /// Device username, required unless the family is none
    pub device_username: Option<String>,

    /// Device password, required unless the family is none
    pub device_password: Option<String>,

    /// Log every stage and extracted field
    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,

    /// Settings file (TOML)
    #[arg(short, long, help = "Settings file, defaults to ./linkcheck.toml when present")]
    pub config: Option<PathBuf>,

    /// Overrides the report path from the settings
    #[arg(long, help = "CSV report to append to")]
    pub report: Option<PathBuf>,

    /// Overrides the test file from the settings
    #[arg(long, help = "Local file used for the FTP transfers")]
    pub test_file: Option<PathBuf>,
}

fn parse_family(value: &str) -> Result<DeviceFamily, String> {
    value.parse()
}

impl Cli {
    /// Applies command-line overrides on top of loaded settings
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(report) = &self.report {
            settings.report_path = report.display().to_string();
        }
        if let Some(test_file) = &self.test_file {
            settings.test_file = test_file.display().to_string();
        }
    }

    pub fn ftp_endpoint(&self, settings: &Settings) -> FtpEndpoint {
        FtpEndpoint {
            host: self.ftp_host.clone(),
            port: settings.ftp.port,
            username: self.ftp_username.clone(),
            password: self.ftp_password.clone(),
            passive: settings.ftp.passive,
        }
    }

    /// Device address and credentials, `None` when no device is queried.
    ///
    /// Every device family other than `none` needs all three device arguments.
    pub fn device_target(&self, settings: &Settings) -> Result<Option<DeviceTarget>, ConfigError> {
        if !self.family.needs_device() {
            return Ok(None);
        }

        match (&self.device_host, &self.device_username, &self.device_password) {
            (Some(host), Some(username), Some(password)) => Ok(Some(DeviceTarget {
                host: host.clone(),
                port: settings.device.ssh_port,
                username: username.clone(),
                password: password.clone(),
            })),
            _ => Err(ConfigError::MissingDeviceArguments {
                family: self.family.selector().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_device() {
        let cli = Cli::try_parse_from(["linkcheck", "192.0.2.10", "ftp", "pw", "none"]).unwrap();
        assert_eq!(cli.family, DeviceFamily::None);
        assert!(cli.device_target(&Settings::default()).unwrap().is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_with_device() {
        let cli = Cli::try_parse_from([
            "linkcheck", "192.0.2.10", "ftp", "pw", "750", "192.168.0.1", "admin", "secret", "-v",
        ])
        .unwrap();
        assert_eq!(cli.family, DeviceFamily::Cradlepoint750);
        assert!(cli.verbose);

        let target = cli.device_target(&Settings::default()).unwrap().unwrap();
        assert_eq!(target.host, "192.168.0.1");
        assert_eq!(target.port, 22);
        assert_eq!(target.username, "admin");
    }

    #[test]
    fn test_device_family_requires_device_arguments() {
        let cli =
            Cli::try_parse_from(["linkcheck", "192.0.2.10", "ftp", "pw", "zyxel", "192.168.1.1"])
                .unwrap();
        assert!(matches!(
            cli.device_target(&Settings::default()),
            Err(ConfigError::MissingDeviceArguments { .. })
        ));
    }

    #[test]
    fn test_unknown_family_is_rejected() {
        assert!(Cli::try_parse_from(["linkcheck", "192.0.2.10", "ftp", "pw", "1100"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "linkcheck",
            "192.0.2.10",
            "ftp",
            "pw",
            "none",
            "--report",
            "out.csv",
            "--test-file",
            "10mb.test",
        ])
        .unwrap();
        let mut settings = Settings::default();
        cli.apply_overrides(&mut settings);

        assert_eq!(settings.report_path, "out.csv");
        assert_eq!(settings.test_file, "10mb.test");
        assert_eq!(cli.ftp_endpoint(&settings).port, 21);
    }
}
