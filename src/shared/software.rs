//! Software Record Types
//!
//! Wire types for the software collection endpoint. The same structs are
//! decoded from list/create responses and encoded into create/update bodies.
//!
//! Timestamps are RFC 3339, keys are snake_case. Optional strings may arrive
//! missing, `null` or empty; all three decode to `None`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::error::SharedError;

/// Kind of software a record describes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SoftwareType {
    Api,
    #[default]
    Web,
    Mobile,
    Desktop,
    Embedded,
    Middleware,
    Library,
}

impl SoftwareType {
    /// Every accepted type, in the order the type selector lists them
    pub const ALL: [SoftwareType; 7] = [
        SoftwareType::Api,
        SoftwareType::Web,
        SoftwareType::Mobile,
        SoftwareType::Desktop,
        SoftwareType::Embedded,
        SoftwareType::Middleware,
        SoftwareType::Library,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoftwareType::Api => "api",
            SoftwareType::Web => "web",
            SoftwareType::Mobile => "mobile",
            SoftwareType::Desktop => "desktop",
            SoftwareType::Embedded => "embedded",
            SoftwareType::Middleware => "middleware",
            SoftwareType::Library => "library",
        }
    }
}

impl fmt::Display for SoftwareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoftwareType {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                SharedError::validation(
                    "software_type",
                    format!("'{}' is not one of api, web, mobile, desktop, embedded, middleware, library", wanted),
                )
            })
    }
}

/// A software record as held by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Software {
    /// Server-assigned id, never changes
    pub id: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    pub display_name: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub software_type: SoftwareType,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub software_subtype: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub install_type: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub lifecycle_status: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub implementation_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Software {
    /// Merge an accepted update into this record.
    ///
    /// The server answers updates with `204 No Content`, so `updated_at` is
    /// synthesized from `now`. It never moves backwards.
    pub fn merge(&mut self, fields: &SoftwareFields, now: DateTime<Utc>) {
        self.display_name = fields.display_name.clone();
        self.description = fields.description.clone();
        self.software_type = fields.software_type;
        self.vendor = fields.vendor.clone();
        self.manufacturer = fields.manufacturer.clone();
        self.updated_at = now.max(self.updated_at);
    }

    /// The editable subset of this record
    pub fn fields(&self) -> SoftwareFields {
        SoftwareFields {
            display_name: self.display_name.clone(),
            description: self.description.clone(),
            software_type: self.software_type,
            vendor: self.vendor.clone(),
            manufacturer: self.manufacturer.clone(),
        }
    }
}

/// Validated editable fields, sent as the body of create and update requests
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SoftwareFields {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub software_type: SoftwareType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

impl SoftwareFields {
    pub fn new(display_name: impl Into<String>, software_type: SoftwareType) -> Self {
        Self {
            display_name: display_name.into(),
            description: None,
            software_type,
            vendor: None,
            manufacturer: None,
        }
    }
}

/// Response body of `GET /software`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSoftwareResponse {
    pub data: Vec<Software>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub count: Option<u32>,
}

/// Error body returned by the API on non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<u16>,
}

impl ErrorResponse {
    /// Message to show the user, preferring `error` over `message`
    pub fn best_message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.message.as_deref().filter(|s| !s.trim().is_empty()))
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
