//! Timed FTP transfers of the test file
//!
//! Each direction opens its own passive-mode session, logs in, moves the file
//! in binary mode and quits. Only the transfer itself is timed.

use log::{debug, info, warn};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;
use suppaftp::types::FileType;
use suppaftp::{FtpStream, Mode};

use crate::errors::ProbeError;
use crate::models::probe::TransferMeasurement;

/// FTP server address and credentials
#[derive(Clone)]
pub struct FtpEndpoint {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub passive: bool,
}

impl std::fmt::Debug for FtpEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FtpEndpoint")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("passive", &self.passive)
            .finish_non_exhaustive()
    }
}

/// Uploads and downloads one local test file
#[derive(Debug, Clone)]
pub struct FtpTransfer {
    endpoint: FtpEndpoint,
    test_file: PathBuf,
}

impl FtpTransfer {
    pub fn new(endpoint: FtpEndpoint, test_file: impl Into<PathBuf>) -> Self {
        Self {
            endpoint,
            test_file: test_file.into(),
        }
    }

    pub fn test_file(&self) -> &Path {
        &self.test_file
    }

    /// Stores the local test file on the server
    pub async fn upload(&self) -> Result<TransferMeasurement, ProbeError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.upload_blocking())
            .await
            .map_err(|e| ProbeError::Task(e.to_string()))?
    }

    /// Retrieves the test file from the server, overwriting the local copy
    pub async fn download(&self) -> Result<TransferMeasurement, ProbeError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.download_blocking())
            .await
            .map_err(|e| ProbeError::Task(e.to_string()))?
    }

    fn upload_blocking(&self) -> Result<TransferMeasurement, ProbeError> {
        info!("Uploading {} to {}", self.test_file.display(), self.endpoint.host);

        let contents = fs::read(&self.test_file).map_err(|source| ProbeError::TestFile {
            operation: "read",
            path: self.test_file.clone(),
            source,
        })?;
        let remote_name = self.remote_name()?;

        let mut session = self.open_session()?;
        let mut reader = Cursor::new(contents);
        let started = Instant::now();
        let stored = session
            .put_file(remote_name.as_str(), &mut reader)
            .map_err(|e| self.transfer_error("upload", &e))?;
        let elapsed_secs = started.elapsed().as_secs_f64();
        close_session(session);

        debug!("Stored {} bytes in {:.3}s", stored, elapsed_secs);
        Ok(TransferMeasurement {
            bytes: stored,
            elapsed_secs,
        })
    }

    fn download_blocking(&self) -> Result<TransferMeasurement, ProbeError> {
        info!(
            "Downloading {} from {}",
            self.test_file.display(),
            self.endpoint.host
        );

        let remote_name = self.remote_name()?;
        let mut session = self.open_session()?;
        let started = Instant::now();
        let buffer = session
            .retr_as_buffer(remote_name.as_str())
            .map_err(|e| self.transfer_error("download", &e))?;
        let elapsed_secs = started.elapsed().as_secs_f64();
        close_session(session);

        let contents = buffer.into_inner();
        fs::write(&self.test_file, &contents).map_err(|source| ProbeError::TestFile {
            operation: "write",
            path: self.test_file.clone(),
            source,
        })?;

        debug!("Retrieved {} bytes in {:.3}s", contents.len(), elapsed_secs);
        Ok(TransferMeasurement {
            bytes: contents.len() as u64,
            elapsed_secs,
        })
    }

    fn open_session(&self) -> Result<FtpStream, ProbeError> {
        let endpoint = &self.endpoint;
        let mut session = FtpStream::connect((endpoint.host.as_str(), endpoint.port)).map_err(
            |e| ProbeError::FtpConnect {
                host: endpoint.host.clone(),
                message: e.to_string(),
            },
        )?;

        session
            .login(endpoint.username.as_str(), endpoint.password.as_str())
            .map_err(|e| ProbeError::FtpLogin {
                host: endpoint.host.clone(),
                user: endpoint.username.clone(),
                message: e.to_string(),
            })?;

        if endpoint.passive {
            session.set_mode(Mode::Passive);
        } else {
            session.set_mode(Mode::Active);
        }
        session
            .transfer_type(FileType::Binary)
            .map_err(|e| ProbeError::FtpConnect {
                host: endpoint.host.clone(),
                message: format!("cannot switch to binary mode: {}", e),
            })?;

        debug!("FTP session with {} ready", endpoint.host);
        Ok(session)
    }

    /// Remote files live in the login directory under the local file name
    fn remote_name(&self) -> Result<String, ProbeError> {
        self.test_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ProbeError::TestFile {
                operation: "name",
                path: self.test_file.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "test file path has no file name",
                ),
            })
    }

    fn transfer_error(&self, operation: &'static str, error: &suppaftp::FtpError) -> ProbeError {
        ProbeError::FtpTransfer {
            operation,
            file: self.test_file.display().to_string(),
            message: error.to_string(),
        }
    }
}

fn close_session(mut session: FtpStream) {
    if let Err(e) = session.quit() {
        warn!("FTP QUIT failed after a completed transfer: {}", e);
    }
}
