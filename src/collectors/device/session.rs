//! Remote shell sessions to network devices
//!
//! A session authenticates with a password, runs exactly one status command
//! and returns whatever the device printed. The blocking SSH client runs on
//! tokio's blocking pool and the whole exchange is bounded by a timeout.

use async_trait::async_trait;
use log::{debug, error, info};
use ssh2::Session;
use std::fmt;
use std::io::Read;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use crate::errors::DeviceError;

/// Bytes printed by the device in response to one command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawDeviceOutput {
    bytes: Vec<u8>,
}

impl RawDeviceOutput {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Output as text, or `None` when it is not valid UTF-8
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for RawDeviceOutput {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<&str> for RawDeviceOutput {
    fn from(text: &str) -> Self {
        Self {
            bytes: text.as_bytes().to_vec(),
        }
    }
}

/// Address and credentials of the device to query
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceTarget {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for DeviceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceTarget")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Capability to run one command on a device and collect its output
#[async_trait]
pub trait DeviceSession: Send + Sync {
    async fn run_command(
        &self,
        target: &DeviceTarget,
        command: &str,
    ) -> Result<RawDeviceOutput, DeviceError>;
}

/// Password-authenticated SSH session backed by libssh2
#[derive(Debug, Clone)]
pub struct SshDeviceSession {
    timeout: Duration,
}

impl SshDeviceSession {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl DeviceSession for SshDeviceSession {
    async fn run_command(
        &self,
        target: &DeviceTarget,
        command: &str,
    ) -> Result<RawDeviceOutput, DeviceError> {
        info!(
            "Opening SSH session to {}@{}:{} (timeout={}s)",
            target.username,
            target.host,
            target.port,
            self.timeout.as_secs()
        );

        let owned_target = target.clone();
        let owned_command = command.to_string();
        let timeout = self.timeout;
        let task = tokio::task::spawn_blocking(move || {
            exec_blocking(&owned_target, &owned_command, timeout)
        });

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(DeviceError::Task(join_error.to_string())),
            Err(_) => {
                error!(
                    "Device session with {} exceeded {}s",
                    target.host,
                    timeout.as_secs()
                );
                Err(DeviceError::Timeout {
                    host: target.host.clone(),
                    timeout_secs: timeout.as_secs(),
                })
            }
        }
    }
}

fn exec_blocking(
    target: &DeviceTarget,
    command: &str,
    timeout: Duration,
) -> Result<RawDeviceOutput, DeviceError> {
    let started = Instant::now();
    let unreachable = |source: std::io::Error| DeviceError::Unreachable {
        host: target.host.clone(),
        port: target.port,
        source,
    };

    let addr = (target.host.as_str(), target.port)
        .to_socket_addrs()
        .map_err(unreachable)?
        .next()
        .ok_or_else(|| {
            unreachable(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "host name resolved to no addresses",
            ))
        })?;
    let tcp = TcpStream::connect_timeout(&addr, timeout).map_err(unreachable)?;

    let handshake_error = |e: ssh2::Error| DeviceError::Handshake {
        host: target.host.clone(),
        message: e.to_string(),
    };
    let mut session = Session::new().map_err(handshake_error)?;
    session.set_tcp_stream(tcp);
    session.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));
    session.handshake().map_err(handshake_error)?;

    if let Err(e) = session.userauth_password(&target.username, &target.password) {
        debug!("Password authentication to {} failed: {}", target.host, e);
    }
    if !session.authenticated() {
        return Err(DeviceError::AuthRejected {
            host: target.host.clone(),
            user: target.username.clone(),
        });
    }

    let exec_error = |message: String| DeviceError::Exec {
        host: target.host.clone(),
        command: command.to_string(),
        message,
    };
    let mut channel = session
        .channel_session()
        .map_err(|e| exec_error(e.to_string()))?;
    channel.exec(command).map_err(|e| exec_error(e.to_string()))?;

    let mut output = Vec::new();
    channel
        .read_to_end(&mut output)
        .map_err(|e| exec_error(e.to_string()))?;
    // The device may drop the connection right after printing; output is already complete.
    if let Err(e) = channel.wait_close() {
        debug!("Channel close on {} reported: {}", target.host, e);
    }

    debug!(
        "Command '{}' on {} returned {} bytes in {:.3}s",
        command,
        target.host,
        output.len(),
        started.elapsed().as_secs_f64()
    );

    Ok(RawDeviceOutput::from(output))
}
