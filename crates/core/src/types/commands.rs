//! The wrapped command line

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::ops::Deref;

/// Type-safe wrapper for the wrapped command and its arguments.
///
/// Element 0 is the executable name exactly as the user typed it; it is
/// looked up on the search path when the command is run. Arguments are
/// kept as raw OS strings so they reach the command byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine(Vec<OsString>);

impl CommandLine {
    /// Create from a vector of OS strings
    #[must_use]
    pub fn from_vec(argv: Vec<OsString>) -> Self {
        Self(argv)
    }

    /// The executable name, if any
    #[must_use]
    pub fn program(&self) -> Option<&OsStr> {
        self.0.first().map(OsString::as_os_str)
    }

    /// Arguments after the executable name
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        self.0.get(1..).unwrap_or(&[])
    }

    /// Arguments after the executable name, lossily converted for messages
    #[must_use]
    pub fn display_args(&self) -> Vec<String> {
        self.args()
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    /// Get the number of elements, executable included
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there is no command at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get a slice of the full argument vector
    #[must_use]
    pub fn as_slice(&self) -> &[OsString] {
        &self.0
    }
}

impl Deref for CommandLine {
    type Target = [OsString];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<OsString>> for CommandLine {
    fn from(argv: Vec<OsString>) -> Self {
        Self(argv)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<_> = self.0.iter().map(|arg| arg.to_string_lossy()).collect();
        write!(f, "{}", parts.join(" "))
    }
}
