//! Storage abstraction for log files

use core::fmt::Debug;

/// Append-only storage for text log files.
///
/// Implementations must not hold a file open between calls: every call opens,
/// writes and closes, so a crash can tear at most one line.
pub trait LogStore {
    type Error: Debug;

    /// Make sure `name` exists and starts with `header`.
    ///
    /// Creates the file with the header line when it is missing (or empty).
    /// Returns `true` when the header was written by this call.
    fn ensure_file(&mut self, name: &str, header: &str) -> Result<bool, Self::Error>;

    /// Append `line` plus a newline to an existing file.
    ///
    /// Must fail rather than create the file, so a sample can never precede
    /// the header.
    fn append_line(&mut self, name: &str, line: &str) -> Result<(), Self::Error>;
}

impl<S: LogStore + ?Sized> LogStore for &mut S {
    type Error = S::Error;

    fn ensure_file(&mut self, name: &str, header: &str) -> Result<bool, Self::Error> {
        (**self).ensure_file(name, header)
    }

    fn append_line(&mut self, name: &str, line: &str) -> Result<(), Self::Error> {
        (**self).append_line(name, line)
    }
}
