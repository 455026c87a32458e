use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::animal::Animal;

/// One value produced by a full-range scan.
///
/// A value that decodes as an [`Animal`] is `Decoded`; anything else is kept
/// verbatim as `Raw` so malformed entries stay visible to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordEntry {
    Decoded(Animal),
    Raw(Vec<u8>),
}

impl RecordEntry {
    pub fn as_animal(&self) -> Option<&Animal> {
        match self {
            Self::Decoded(animal) => Some(animal),
            Self::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// JSON form: the canonical record object, or the raw bytes as a string.
    /// Raw bytes that parse as JSON are still emitted as a string.
    pub fn to_json_value(&self) -> Value {
        match self {
            Self::Decoded(animal) => animal.to_canonical_value(),
            Self::Raw(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// Render a scan result as a JSON array.
    pub fn list_to_json(entries: &[RecordEntry]) -> String {
        Value::Array(entries.iter().map(Self::to_json_value).collect()).to_string()
    }
}

/// `Decoded` serializes as the record object, `Raw` as a (lossy UTF-8)
/// JSON string.
impl Serialize for RecordEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Decoded(animal) => animal.serialize(serializer),
            Self::Raw(bytes) => serializer.serialize_str(&String::from_utf8_lossy(bytes)),
        }
    }
}
