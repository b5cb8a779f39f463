//! Periodic upload of the current log file to an FTP server
//!
//! The server is described by the `[RADIATION_SERVER]` section of
//! `radser.cfg`:
//!
//! ```ini
//! [RADIATION_SERVER]
//! IP = 192.168.1.1
//! Username = Username
//! Password = Password
//! ```
//!
//! Each cycle stores the log file of the current month in a directory named
//! after the unit. Every failure is logged and the next cycle tries again;
//! nothing here can stop the monitor.

use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;
use std::thread;
use std::time::Duration;

use config::{Config, FileFormat};
use log::{debug, info, warn};
use radmon_core::{LogFileName, NameError, UnitName, WallClock, YearMonth};
use serde::Deserialize;
use suppaftp::FtpStream;
use thiserror_no_std::Error;

use crate::error::AppError;
use crate::fs_store::FsLogStore;

/// Server config file looked up in the working directory by default.
pub const DEFAULT_SERVER_CONFIG_FILE: &str = "radser.cfg";

pub const DEFAULT_UPLOAD_PERIOD_SECS: u64 = 600;

pub const FTP_PORT: u16 = 21;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

const SERVER_CONFIG_TEMPLATE: &str = "[RADIATION_SERVER]
IP = 192.168.1.1
Username = Username
Password = Password
";

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    #[serde(alias = "IP")]
    pub ip: String,
    #[serde(alias = "Username")]
    pub username: String,
    #[serde(alias = "Password")]
    pub password: String,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("ip", &self.ip)
            .field("username", &self.username)
            .field("password", &"*****")
            .finish()
    }
}

#[derive(Deserialize)]
struct ServerConfigFile {
    #[serde(alias = "RADIATION_SERVER")]
    radiation_server: ServerConfig,
}

/// Read the server settings from `path`.
///
/// A missing file is replaced by a template to be filled in, and reported as
/// a fatal error so the operator notices before the monitor starts.
pub fn load_server_config(path: &Path) -> Result<ServerConfig, AppError> {
    let shown = path.display().to_string();
    if !path.is_file() {
        info!("Couldn't find server info file. Creating a new one...");
        fs::write(path, SERVER_CONFIG_TEMPLATE).map_err(|e| AppError::ServerConfigUnreadable {
            path: shown.clone(),
            details: e.to_string(),
        })?;
        return Err(AppError::ServerConfigCreated { path: shown });
    }

    let file: ServerConfigFile = Config::builder()
        .add_source(config::File::from(path).format(FileFormat::Ini))
        .build()
        .and_then(|settings| settings.try_deserialize())
        .map_err(|e| AppError::ServerConfigUnreadable {
            path: shown.clone(),
            details: e.to_string(),
        })?;

    let server = file.radiation_server;
    if server.ip.trim().is_empty() {
        return Err(AppError::ServerConfigUnreadable {
            path: shown,
            details: "IP is empty".to_string(),
        });
    }
    info!("Server: {}, user {}", server.ip, server.username);
    Ok(server)
}

/// A failed upload cycle. Logged, never fatal.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("{0}")]
    Name(NameError),
    #[error("Could not resolve server address \"{host}\": {details}")]
    Resolve { host: String, details: String },
    #[error("Could not connect to {addr}: {details}")]
    Connect { addr: SocketAddr, details: String },
    #[error("Server rejected the login: {details}")]
    Login { details: String },
    #[error("Could not enter remote directory {dir}: {details}")]
    ChangeDir { dir: String, details: String },
    #[error("Could not open log file {file}: {details}")]
    OpenLog { file: String, details: String },
    #[error("Could not send {file}: {details}")]
    Store { file: String, details: String },
}

/// The remote operations one upload needs.
pub trait FtpSession {
    type Error: fmt::Display;

    fn make_dir(&mut self, dir: &str) -> Result<(), Self::Error>;

    fn change_dir(&mut self, dir: &str) -> Result<(), Self::Error>;

    /// Store everything `reader` yields as `name`; returns the byte count.
    fn store(&mut self, name: &str, reader: &mut dyn Read) -> Result<u64, Self::Error>;

    fn quit(&mut self) -> Result<(), Self::Error>;
}

impl FtpSession for FtpStream {
    type Error = suppaftp::FtpError;

    fn make_dir(&mut self, dir: &str) -> Result<(), Self::Error> {
        self.mkdir(dir)
    }

    fn change_dir(&mut self, dir: &str) -> Result<(), Self::Error> {
        self.cwd(dir)
    }

    fn store(&mut self, name: &str, mut reader: &mut dyn Read) -> Result<u64, Self::Error> {
        self.put_file(name, &mut reader)
    }

    fn quit(&mut self) -> Result<(), Self::Error> {
        FtpStream::quit(self)
    }
}

/// Server address from the config: `host` or `host:port`, port 21 by default.
pub fn resolve(host: &str) -> Result<SocketAddr, UploadError> {
    let host = host.trim();
    if let Ok(addr) = host.parse::<SocketAddr>() {
        return Ok(addr);
    }
    let resolve_err = |details: String| UploadError::Resolve {
        host: host.to_string(),
        details,
    };
    (host, FTP_PORT)
        .to_socket_addrs()
        .map_err(|e| resolve_err(e.to_string()))?
        .next()
        .ok_or_else(|| resolve_err("no address found".to_string()))
}

pub struct Uploader<C> {
    server: ServerConfig,
    unit: UnitName,
    logs: FsLogStore,
    clock: C,
}

impl<C: WallClock> Uploader<C> {
    pub fn new(server: ServerConfig, unit: UnitName, logs: FsLogStore, clock: C) -> Self {
        Self {
            server,
            unit,
            logs,
            clock,
        }
    }

    /// The log file samples are going to right now.
    pub fn current_file(&self) -> Result<LogFileName, NameError> {
        LogFileName::new(&self.unit, YearMonth::of(&self.clock.now()))
    }

    /// Put `local` into the unit's directory on an open session.
    ///
    /// The directory usually exists already, so a failed create is only
    /// noted; failing to enter it ends the cycle.
    pub fn upload_with<F: FtpSession>(
        &self,
        session: &mut F,
        file: &LogFileName,
        local: &mut dyn Read,
    ) -> Result<u64, UploadError> {
        let dir = self.unit.as_str();
        match session.make_dir(dir) {
            Ok(()) => info!("Created remote directory {}", dir),
            Err(e) => debug!("Remote directory {} not created, may already exist: {}", dir, e),
        }

        session
            .change_dir(dir)
            .map_err(|e| UploadError::ChangeDir {
                dir: dir.to_string(),
                details: e.to_string(),
            })?;

        let bytes = session
            .store(file.as_str(), local)
            .map_err(|e| UploadError::Store {
                file: file.to_string(),
                details: e.to_string(),
            })?;

        if let Err(e) = session.quit() {
            debug!("Server did not acknowledge QUIT: {}", e);
        }
        Ok(bytes)
    }

    fn connect(&self) -> Result<FtpStream, UploadError> {
        let addr = resolve(&self.server.ip)?;
        let mut stream =
            FtpStream::connect_timeout(addr, CONNECT_TIMEOUT).map_err(|e| UploadError::Connect {
                addr,
                details: e.to_string(),
            })?;
        stream
            .login(&self.server.username, &self.server.password)
            .map_err(|e| UploadError::Login {
                details: e.to_string(),
            })?;
        if let Some(welcome) = stream.get_welcome_msg() {
            debug!("The server said: {}", welcome.trim_end());
        }
        Ok(stream)
    }

    /// One full cycle: open the local file, connect, store, disconnect.
    pub fn upload_once(&self) -> Result<u64, UploadError> {
        let file = self.current_file().map_err(UploadError::Name)?;
        let mut local = File::open(self.logs.path_of(file.as_str())).map_err(|e| {
            UploadError::OpenLog {
                file: file.to_string(),
                details: e.to_string(),
            }
        })?;

        let mut session = self.connect()?;
        self.upload_with(&mut session, &file, &mut local)
    }

    /// Upload every `period`, forever.
    pub fn run(self, period: Duration) -> ! {
        loop {
            thread::sleep(period);
            match self.upload_once() {
                Ok(bytes) => info!("Log uploaded ({} bytes)", bytes),
                Err(e) => warn!("Upload skipped: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct FixedClock;

    impl WallClock for FixedClock {
        fn now(&self) -> chrono::NaiveDateTime {
            chrono::NaiveDate::from_ymd_opt(2026, 10, 19)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        }
    }

    /// Records the commands it receives; the listed ones fail.
    #[derive(Default)]
    struct RecordingSession {
        commands: Vec<String>,
        stored: Vec<u8>,
        failing: Vec<&'static str>,
    }

    impl RecordingSession {
        fn run(&mut self, command: &'static str, arg: &str) -> Result<(), String> {
            self.commands.push(format!("{command} {arg}").trim_end().to_string());
            if self.failing.contains(&command) {
                return Err(format!("550 {command} failed"));
            }
            Ok(())
        }
    }

    impl FtpSession for RecordingSession {
        type Error = String;

        fn make_dir(&mut self, dir: &str) -> Result<(), Self::Error> {
            self.run("MKD", dir)
        }

        fn change_dir(&mut self, dir: &str) -> Result<(), Self::Error> {
            self.run("CWD", dir)
        }

        fn store(&mut self, name: &str, reader: &mut dyn Read) -> Result<u64, Self::Error> {
            self.run("STOR", name)?;
            reader.read_to_end(&mut self.stored).map_err(|e| e.to_string())?;
            Ok(self.stored.len() as u64)
        }

        fn quit(&mut self) -> Result<(), Self::Error> {
            self.run("QUIT", "")
        }
    }

    fn uploader(dir: &Path) -> Uploader<FixedClock> {
        let server = ServerConfig {
            ip: "127.0.0.1".to_string(),
            username: "user".to_string(),
            password: "secret".to_string(),
        };
        Uploader::new(
            server,
            UnitName::new("station1").unwrap(),
            FsLogStore::new(dir),
            FixedClock,
        )
    }

    #[test]
    fn test_missing_config_writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SERVER_CONFIG_FILE);

        let err = load_server_config(&path).unwrap_err();
        assert!(matches!(err, AppError::ServerConfigCreated { .. }));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), SERVER_CONFIG_TEMPLATE);

        // The untouched template is itself a valid config
        let server = load_server_config(&path).unwrap();
        assert_eq!(server.ip, "192.168.1.1");
        assert_eq!(server.username, "Username");
        assert_eq!(server.password, "Password");
    }

    #[test]
    fn test_parses_lowercase_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SERVER_CONFIG_FILE);
        fs::write(
            &path,
            "[RADIATION_SERVER]\nip = 10.0.0.5\nusername = geiger\npassword = hunter2\n",
        )
        .unwrap();

        let server = load_server_config(&path).unwrap();
        assert_eq!(server.ip, "10.0.0.5");
        assert_eq!(server.username, "geiger");
        assert!(!format!("{server:?}").contains("hunter2"));
    }

    #[test]
    fn test_missing_section_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SERVER_CONFIG_FILE);
        fs::write(&path, "[OTHER]\nIP = 10.0.0.5\n").unwrap();

        assert!(matches!(
            load_server_config(&path),
            Err(AppError::ServerConfigUnreadable { .. })
        ));
    }

    #[test]
    fn test_resolve_defaults_to_ftp_port() {
        assert_eq!(resolve("127.0.0.1").unwrap(), "127.0.0.1:21".parse().unwrap());
        assert_eq!(
            resolve(" 127.0.0.1:2121 ").unwrap(),
            "127.0.0.1:2121".parse().unwrap()
        );
    }

    #[test]
    fn test_upload_goes_to_unit_directory() {
        let dir = tempfile::tempdir().unwrap();
        let uploader = uploader(dir.path());
        let file = uploader.current_file().unwrap();
        assert_eq!(file.as_str(), "station1_log_2026-10.txt");

        // The directory already exists on the server
        let mut session = RecordingSession {
            failing: vec!["MKD"],
            ..RecordingSession::default()
        };
        let mut local = Cursor::new(b"Time, CPM, Activity (uSv/h)\n".to_vec());

        let bytes = uploader.upload_with(&mut session, &file, &mut local).unwrap();

        assert_eq!(bytes, 28);
        assert_eq!(
            session.commands,
            [
                "MKD station1",
                "CWD station1",
                "STOR station1_log_2026-10.txt",
                "QUIT"
            ]
        );
    }

    #[test]
    fn test_unreachable_directory_skips_store() {
        let dir = tempfile::tempdir().unwrap();
        let uploader = uploader(dir.path());
        let file = uploader.current_file().unwrap();
        let mut session = RecordingSession {
            failing: vec!["CWD"],
            ..RecordingSession::default()
        };

        let err = uploader
            .upload_with(&mut session, &file, &mut Cursor::new(Vec::new()))
            .unwrap_err();

        assert!(matches!(err, UploadError::ChangeDir { .. }));
        assert_eq!(session.commands, ["MKD station1", "CWD station1"]);
    }

    #[test]
    fn test_missing_log_file_is_skipped_before_connecting() {
        let dir = tempfile::tempdir().unwrap();
        let err = uploader(dir.path()).upload_once().unwrap_err();
        assert!(matches!(err, UploadError::OpenLog { .. }));
    }
}
