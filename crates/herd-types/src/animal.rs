use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::digest::RecordDigest;
use crate::error::TypeError;

/// The non-key attributes of an animal record.
///
/// Every field is required. Create and full-update both take a complete
/// `AnimalFields`, so no partial record can ever reach the world state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimalFields {
    pub name: String,
    /// Species or kind of animal (`type` on the wire).
    #[serde(rename = "type")]
    pub kind: String,
    pub breed: String,
    /// Free-form date string. Not validated.
    #[serde(rename = "birthDate")]
    pub birth_date: String,
    pub description: String,
    #[serde(rename = "imgUrl")]
    pub img_url: String,
    pub pedigree: bool,
}

/// An animal record as stored in the world state, keyed by `id`.
///
/// Field declaration order matches the canonical key order so that the
/// derived `Serialize` output agrees with [`Animal::encode`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Animal {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "birthDate")]
    pub birth_date: String,
    pub breed: String,
    pub description: String,
    #[serde(rename = "imgUrl")]
    pub img_url: String,
    pub name: String,
    pub pedigree: bool,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Animal {
    /// Build a record for `id` from a complete set of fields.
    pub fn new(id: impl Into<String>, fields: AnimalFields) -> Self {
        Self {
            id: id.into(),
            birth_date: fields.birth_date,
            breed: fields.breed,
            description: fields.description,
            img_url: fields.img_url,
            name: fields.name,
            pedigree: fields.pedigree,
            kind: fields.kind,
        }
    }

    /// Copy of this record with only `name` replaced.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// The non-key attributes of this record.
    pub fn fields(&self) -> AnimalFields {
        AnimalFields {
            name: self.name.clone(),
            kind: self.kind.clone(),
            breed: self.breed.clone(),
            birth_date: self.birth_date.clone(),
            description: self.description.clone(),
            img_url: self.img_url.clone(),
            pedigree: self.pedigree,
        }
    }

    /// The record as a JSON object with keys in ascending byte order.
    pub fn to_canonical_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("ID".into(), Value::String(self.id.clone()));
        map.insert("birthDate".into(), Value::String(self.birth_date.clone()));
        map.insert("breed".into(), Value::String(self.breed.clone()));
        map.insert("description".into(), Value::String(self.description.clone()));
        map.insert("imgUrl".into(), Value::String(self.img_url.clone()));
        map.insert("name".into(), Value::String(self.name.clone()));
        map.insert("pedigree".into(), Value::Bool(self.pedigree));
        map.insert("type".into(), Value::String(self.kind.clone()));
        Value::Object(map)
    }

    /// Canonical encoding: compact JSON, keys sorted, no whitespace.
    ///
    /// Semantically identical records always produce identical bytes.
    pub fn encode(&self) -> Vec<u8> {
        self.to_canonical_value().to_string().into_bytes()
    }

    /// Decode a stored value. All eight keys must be present; unknown keys
    /// are skipped here but kept in storage by [`Animal::rename_encoded`].
    pub fn decode(data: &[u8]) -> Result<Self, TypeError> {
        serde_json::from_slice(data).map_err(|e| TypeError::Decode(e.to_string()))
    }

    /// Replace only `name` in a stored value, keeping every other key.
    ///
    /// The value must decode as an `Animal`. Keys the record type does not
    /// know about are carried through; the map is sorted, so the output keeps
    /// canonical key order.
    pub fn rename_encoded(data: &[u8], name: &str) -> Result<Vec<u8>, TypeError> {
        Self::decode(data)?;
        let mut map: Map<String, Value> =
            serde_json::from_slice(data).map_err(|e| TypeError::Decode(e.to_string()))?;
        map.insert("name".into(), Value::String(name.to_string()));
        Ok(Value::Object(map).to_string().into_bytes())
    }

    /// Digest of the canonical encoding.
    pub fn digest(&self) -> RecordDigest {
        RecordDigest::of(&self.encode())
    }
}
