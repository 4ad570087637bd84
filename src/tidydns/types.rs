// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Wire types of the TidyDNS HTTP API.

use crate::errors::TidyError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A JSON number as TidyDNS sends it.
///
/// TidyDNS is inconsistent about quoting numbers, so both `1` and `"1"` are
/// accepted, and `null` reads as empty text. The textual form is kept
/// verbatim; a value like `300.2` only fails once something asks for it as an
/// integer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonNumber(String);

impl JsonNumber {
    /// Wrap a textual number.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The number as sent by the server.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the number as a 64-bit integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JsonNumber {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<i64> for JsonNumber {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for JsonNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Number(n)) => Self(n.to_string()),
            Some(Raw::Text(s)) => Self(s),
            None => Self::default(),
        })
    }
}

impl Serialize for JsonNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Identifier of a zone or record in TidyDNS.
pub type TidyId = JsonNumber;

/// A zone known to TidyDNS.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Zone ID
    pub id: TidyId,
    /// Zone name, e.g. `example.com`
    pub name: String,
}

/// A single-target record as stored in TidyDNS.
///
/// Missing or `null` fields decode to empty values so that one malformed
/// record does not fail a whole listing; translation skips it later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record ID
    #[serde(default)]
    pub id: TidyId,

    /// Record type name, e.g. `A`
    #[serde(rename = "type_name", default, deserialize_with = "null_as_default")]
    pub record_type: String,

    /// Zone relative name, `.` for the apex
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Free text description
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// The one value of this record
    #[serde(default, deserialize_with = "null_as_default")]
    pub destination: String,

    /// TTL in seconds, `0` meaning the zone default
    #[serde(default)]
    pub ttl: JsonNumber,

    /// Name of the zone the record belongs to
    #[serde(default, deserialize_with = "null_as_default")]
    pub zone_name: String,

    /// ID of the zone the record belongs to
    #[serde(default)]
    pub zone_id: TidyId,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// TidyDNS numeric record type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordType {
    A = 0,
    Aptr = 1,
    Cname = 2,
    Mx = 3,
    Ns = 4,
    Txt = 5,
    Srv = 6,
    Ds = 7,
    Sshfp = 8,
    Tlsa = 9,
    Caa = 10,
}

impl RecordType {
    /// Numeric code used in TidyDNS forms.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Map a DNS type name to the code TidyDNS expects when creating records.
    ///
    /// TidyDNS files both address families under the `A` code.
    ///
    /// # Errors
    ///
    /// Returns [`TidyError::UnmappedRecordType`] for types this provider does
    /// not manage.
    pub fn encode(record_type: &str) -> Result<Self, TidyError> {
        match record_type {
            "A" | "AAAA" => Ok(Self::A),
            "CNAME" => Ok(Self::Cname),
            "TXT" => Ok(Self::Txt),
            other => Err(TidyError::UnmappedRecordType(other.to_string())),
        }
    }
}
