use std::fmt;
use std::str::FromStr;

use clasp_util::errors::ClaspError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A symbolic library name: a group and a local name, written `group/name`.
///
/// Equality and hashing are structural. A name may carry a `$`-separated
/// suffix for sub-libraries (`com.example/lib$tests`); exclusion matching
/// operates on the pre-`$` base name only, see [`Lib::base`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lib {
    group: String,
    name: String,
}

impl Lib {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }

    /// Parse `"group/name"`. Returns `None` unless both parts are non-empty
    /// and the name contains no further `/`.
    pub fn parse(s: &str) -> Option<Self> {
        let (group, name) = s.split_once('/')?;
        if group.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(group, name))
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The same lib with any `$`-suffix stripped from the name.
    ///
    /// `com.example/lib$tests` and `com.example/lib` share the base
    /// `com.example/lib`, and an exclusion of the base suppresses both.
    pub fn base(&self) -> Lib {
        match self.name.split_once('$') {
            Some((base, _)) => Lib::new(self.group.clone(), base),
            None => self.clone(),
        }
    }
}

impl fmt::Display for Lib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group, self.name)
    }
}

impl FromStr for Lib {
    type Err = ClaspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lib::parse(s).ok_or_else(|| ClaspError::Config {
            message: format!("invalid lib name {s:?}, expected group/name"),
        })
    }
}

impl Serialize for Lib {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Lib {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
