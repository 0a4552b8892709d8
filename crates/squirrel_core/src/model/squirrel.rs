//! Squirrel record model.
//!
//! # Responsibility
//! - Define the canonical `(id, name, size)` record and its write payload.
//! - Parse path-segment ids into validated identifiers.
//!
//! # Invariants
//! - `SquirrelId` wraps a strictly positive integer.
//! - `id` is assigned by storage and never changes across updates.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage-assigned identifier of a squirrel record.
///
/// Serialized transparently as a JSON integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct SquirrelId(i64);

impl SquirrelId {
    /// Wraps a raw row id, rejecting zero and negative values.
    pub fn new(raw: i64) -> Result<Self, InvalidSquirrelId> {
        if raw > 0 {
            Ok(Self(raw))
        } else {
            Err(InvalidSquirrelId(raw.to_string()))
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for SquirrelId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SquirrelId {
    type Err = InvalidSquirrelId;

    /// Parses a decimal path segment. Signs, whitespace and non-digits are rejected.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(InvalidSquirrelId(value.to_string()));
        }
        let raw = value
            .parse::<i64>()
            .map_err(|_| InvalidSquirrelId(value.to_string()))?;
        Self::new(raw)
    }
}

impl TryFrom<i64> for SquirrelId {
    type Error = InvalidSquirrelId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SquirrelId> for i64 {
    fn from(value: SquirrelId) -> Self {
        value.0
    }
}

/// Rejected id text (non-numeric, zero, negative or out of range).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSquirrelId(pub String);

impl Display for InvalidSquirrelId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid squirrel id `{}`", self.0)
    }
}

impl Error for InvalidSquirrelId {}

/// A live squirrel record as stored in the `squirrels` table.
///
/// Serializes to exactly `{"id": .., "name": .., "size": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Squirrel {
    pub id: SquirrelId,
    pub name: String,
    pub size: String,
}

/// Write payload for create and full-replace update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSquirrel {
    pub name: String,
    pub size: String,
}

impl NewSquirrel {
    pub fn new(name: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: size.into(),
        }
    }

    /// Attaches a storage-assigned id, producing the persisted record shape.
    pub fn with_id(self, id: SquirrelId) -> Squirrel {
        Squirrel {
            id,
            name: self.name,
            size: self.size,
        }
    }
}
