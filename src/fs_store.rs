//! Log files on the local filesystem

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use radmon_core::LogStore;

/// Log files stored in one directory.
///
/// Every operation opens the file, writes, and closes it again; no handle is
/// kept between samples.
#[derive(Debug, Clone)]
pub struct FsLogStore {
    dir: PathBuf,
}

impl FsLogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn write_header(path: &Path, mut file: File, header: &str) -> io::Result<()> {
        if let Err(e) = file
            .write_all(format!("{header}\n").as_bytes())
            .and_then(|()| file.sync_data())
        {
            // A file without its header would pass the next check as
            // existing; remove it so the check starts over.
            drop(file);
            let _ = fs::remove_file(path);
            return Err(e);
        }
        Ok(())
    }
}

impl LogStore for FsLogStore {
    type Error = io::Error;

    fn ensure_file(&mut self, name: &str, header: &str) -> Result<bool, Self::Error> {
        let path = self.path_of(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => {
                debug!("Creating log file {}", path.display());
                Self::write_header(&path, file, header)?;
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                if fs::metadata(&path)?.len() > 0 {
                    return Ok(false);
                }
                // Present but empty, e.g. touched by hand
                let file = OpenOptions::new().append(true).open(&path)?;
                Self::write_header(&path, file, header)?;
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    fn append_line(&mut self, name: &str, line: &str) -> Result<(), Self::Error> {
        // No `create`: a missing file means the header is missing too.
        let mut file = OpenOptions::new().append(true).open(self.path_of(name))?;
        file.write_all(format!("{line}\n").as_bytes())
    }
}
