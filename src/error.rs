//! Unified error type.

use std::fmt;

/// The error type returned by the server's fallible operations.
///
/// Writer failures are not wrapped here: they travel as plain
/// [`std::io::Error`]s from [`ResponseWriter::write`](crate::ResponseWriter::write)
/// so a wrapping writer can hand them back untouched. This type surfaces
/// infrastructure failures only: binding to a port or accepting a connection.
#[derive(Debug)]
pub struct Error(std::io::Error);

impl Error {
    /// The underlying I/O error.
    pub fn io(&self) -> &std::io::Error {
        &self.0
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "io: {}", self.0)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self(e)
    }
}
