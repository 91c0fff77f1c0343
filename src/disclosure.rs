use base64::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::digest::{hash_encoded_disclosure, SdAlg};
use crate::DecodeError;

/// A single disclosure: the wire form it travels as, its decoded contents,
/// and the digest committing to it somewhere in a claim tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Disclosure {
    /// Base 64 of the disclosure array, passed through untouched
    pub encoded: String,

    /// Salt bound into the digest
    pub salt: String,

    /// Decoded claim contents
    pub kind: DisclosureKind,

    /// Base 64 of the hash of the encoded form
    pub digest: String,
}

/// Decoded contents of a disclosure
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DisclosureKind {
    /// Object property disclosure, decoded from `[salt, name, value]`
    Property {
        name: String,
        value: serde_json::Value,
    },

    /// Array element disclosure, decoded from `[salt, value]`
    ArrayItem(serde_json::Value),
}

impl Disclosure {
    /// Decode a disclosure from its wire form, digesting it with `sd_alg`.
    pub fn from_encoded(sd_alg: SdAlg, encoded: &str) -> Result<Self, DecodeError> {
        let digest = hash_encoded_disclosure(sd_alg, encoded);
        Self::from_encoded_with_digest(encoded, digest)
    }

    /// Decode a disclosure whose digest was computed externally.
    pub fn from_encoded_with_digest(encoded: &str, digest: String) -> Result<Self, DecodeError> {
        let bytes = base64::decode_config(encoded, URL_SAFE_NO_PAD)
            .map_err(|_| DecodeError::DisclosureMalformed)?;
        let json: serde_json::Value = serde_json::from_slice(&bytes)?;

        let (salt, kind) = match json {
            serde_json::Value::Array(values) => match values.as_slice() {
                [salt, name, value] => (
                    string_element(salt)?,
                    DisclosureKind::Property {
                        name: string_element(name)?,
                        value: value.clone(),
                    },
                ),
                [salt, value] => (
                    string_element(salt)?,
                    DisclosureKind::ArrayItem(value.clone()),
                ),
                _ => return Err(DecodeError::DisclosureMalformed),
            },
            _ => return Err(DecodeError::DisclosureMalformed),
        };

        Ok(Disclosure {
            encoded: encoded.to_owned(),
            salt,
            kind,
            digest,
        })
    }

    /// Assemble a disclosure from parts decoded and digested elsewhere.
    pub fn from_parts(encoded: &str, salt: &str, kind: DisclosureKind, digest: &str) -> Self {
        Disclosure {
            encoded: encoded.to_owned(),
            salt: salt.to_owned(),
            kind,
            digest: digest.to_owned(),
        }
    }

    /// Disclosed property name, for object property disclosures
    pub fn claim_name(&self) -> Option<&str> {
        match &self.kind {
            DisclosureKind::Property { name, .. } => Some(name),
            DisclosureKind::ArrayItem(_) => None,
        }
    }

    /// The revealed claim value
    pub fn claim_value(&self) -> &serde_json::Value {
        match &self.kind {
            DisclosureKind::Property { value, .. } => value,
            DisclosureKind::ArrayItem(value) => value,
        }
    }
}

fn string_element(value: &serde_json::Value) -> Result<String, DecodeError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or(DecodeError::DisclosureMalformed)
}
