//! Strong types for principals and command paths.

use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// A decentralized identifier: `did:<method>:<method-specific-id>`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Did(String);

impl Did {
    /// Parse and validate a DID string.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let scheme = parts.next();
        let method = parts.next();
        let id = parts.next();

        match (scheme, method, id) {
            (Some("did"), Some(method), Some(id))
                if !method.is_empty()
                    && method
                        .bytes()
                        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
                    && !id.is_empty() =>
            {
                Ok(Self(s.to_string()))
            }
            _ => Err(CoreError::InvalidDid(s.to_string())),
        }
    }

    /// The DID method, e.g. `key` or `web`.
    pub fn method(&self) -> &str {
        self.0.split(':').nth(1).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Did({})", self.0)
    }
}

impl FromStr for Did {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A command path such as `/fruits/purchase`.
///
/// Always begins with `/`, has no empty segments, and has no trailing slash
/// unless it is the root command `/`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Command(String);

impl Command {
    /// Parse and validate a command path.
    pub fn parse(s: &str) -> Result<Self> {
        if s == "/" {
            return Ok(Self(s.to_string()));
        }

        let Some(rest) = s.strip_prefix('/') else {
            return Err(CoreError::InvalidCommand(s.to_string()));
        };
        if rest.split('/').any(str::is_empty) {
            return Err(CoreError::InvalidCommand(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }

    /// Path segments, excluding the leading root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Command({})", self.0)
    }
}

impl FromStr for Command {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
