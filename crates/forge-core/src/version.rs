//! Nuke release version handling

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Pattern for raw release tokens such as `15.0v2`. The `v` patch marker
/// is mandatory; tokens without it are rejected, never truncated.
static RELEASE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?<major>\d+)\.(?<minor>\d+)v\d+$").unwrap());

/// A Nuke version at major.minor granularity (e.g. 15.1).
///
/// Ordering is numeric on (major, minor), so 15.10 sorts above 15.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NukeVersion {
    pub major: u32,
    pub minor: u32,
}

impl NukeVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse a raw release token of the shape `<major>.<minor>v<patch>`.
    ///
    /// The patch component is validated but discarded; the engine works
    /// at major.minor granularity. `"15.0v2"` parses to 15.0, while
    /// `"15.0b1"` is a [`Error::MalformedVersion`].
    pub fn from_release_token(token: &str) -> Result<Self> {
        let captures = RELEASE_TOKEN
            .captures(token)
            .ok_or_else(|| Error::MalformedVersion {
                token: token.to_string(),
            })?;
        // The regex only admits digit runs, so these parses cannot fail
        // unless the numerals overflow u32.
        let major = captures["major"]
            .parse()
            .map_err(|_| Error::MalformedVersion {
                token: token.to_string(),
            })?;
        let minor = captures["minor"]
            .parse()
            .map_err(|_| Error::MalformedVersion {
                token: token.to_string(),
            })?;
        Ok(Self { major, minor })
    }
}

impl fmt::Display for NukeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Parses the plain `<major>.<minor>` form used in image labels and
/// artifact paths (no patch marker).
impl FromStr for NukeVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::MalformedVersion {
            token: s.to_string(),
        };
        let (major, minor) = s.split_once('.').ok_or_else(malformed)?;
        Ok(Self {
            major: major.parse().map_err(|_| malformed())?,
            minor: minor.parse().map_err(|_| malformed())?,
        })
    }
}
