use serde::{Deserialize, Serialize};
use std::fmt;

/// Row identifier of a stored record.
///
/// Wraps i32 to match the database SERIAL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i32);

impl RecordId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for RecordId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<RecordId> for i32 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}
