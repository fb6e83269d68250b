//! Layered configuration
//!
//! Built-in defaults, then an optional TOML file, then `LINKCHECK_*`
//! environment variables (`__` separates nested keys, e.g.
//! `LINKCHECK_DEVICE__ZYXEL_TIMEOUT_SECS=900`). Command-line options are
//! applied on top by the caller.

use ::config::{Config, Environment, File};
use log::debug;
use std::path::Path;

pub mod settings;

pub use settings::{DeviceSettings, FtpSettings, Settings};

use crate::errors::ConfigError;

/// Settings file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_NAME: &str = "linkcheck";

const ENV_PREFIX: &str = "LINKCHECK";

/// Loads settings, reading `path` if given (it must then exist)
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

    builder = match path {
        Some(path) => {
            debug!("Loading settings from {}", path.display());
            builder.add_source(File::from(path).required(true))
        }
        None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
    };

    let settings: Settings = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.ping_count == 0 {
        return Err(ConfigError::Invalid {
            key: "ping_count",
            message: "at least one echo request is needed".to_string(),
        });
    }
    if settings.test_file.trim().is_empty() {
        return Err(ConfigError::Invalid {
            key: "test_file",
            message: "must not be empty".to_string(),
        });
    }
    if settings.report_path.trim().is_empty() {
        return Err(ConfigError::Invalid {
            key: "report_path",
            message: "must not be empty".to_string(),
        });
    }
    if settings.device.cradlepoint_timeout_secs == 0 || settings.device.zyxel_timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            key: "device",
            message: "session timeouts must be positive".to_string(),
        });
    }
    Ok(())
}
