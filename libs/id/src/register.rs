//! Register numbers: the institution-issued student code (e.g. `CEC24CS111`).

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::IdError;

/// A student's register number.
///
/// Keeps the spelling it was entered with for display, but compares,
/// orders, and hashes case-insensitively so `cec24cs111` finds the
/// student registered as `CEC24CS111`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegisterNumber {
    raw: String,
    key: String,
}

impl RegisterNumber {
    /// Parses a register number, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(IdError::Empty);
        }
        if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(IdError::InvalidRegisterNumber(raw.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            key: raw.to_lowercase(),
        })
    }

    /// The register number as originally entered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true if `candidate` names this register number, ignoring case.
    ///
    /// Input that is not a valid register number never matches.
    pub fn matches(&self, candidate: &str) -> bool {
        Self::parse(candidate).is_ok_and(|other| other == *self)
    }
}

impl PartialEq for RegisterNumber {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for RegisterNumber {}

impl Hash for RegisterNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for RegisterNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RegisterNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl std::fmt::Display for RegisterNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for RegisterNumber {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RegisterNumber {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RegisterNumber> for String {
    fn from(value: RegisterNumber) -> Self {
        value.raw
    }
}
