//! NetBox IPAM models
//!
//! These models follow the NetBox REST API serializers, but only the `id`
//! and the natural key of each record are required. Every other field is
//! optional and falls back to `None` when its shape differs between NetBox
//! versions (2.x sends `"family": 4`, 3.x sends `{"value": 4, ...}`).
//! Fields without a typed counterpart are kept in `extra`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Decode an optional field, yielding `None` when the value has an unexpected shape
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// NetBox API response wrapper (for paginated responses)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of records on the server
    #[serde(default)]
    pub count: u64,
    /// URL of the next page
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page
    #[serde(default)]
    pub previous: Option<String>,
    /// Records on this page, in server order
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self { count: 0, next: None, previous: None, results: Vec::new() }
    }
}

/// IP Address model matching NetBox IPAddressSerializer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpAddress {
    pub id: u64,
    pub address: String, // e.g., "192.168.1.1/24"
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub family: Option<Family>,
    #[serde(default, deserialize_with = "lenient")]
    pub vrf: Option<NestedVrf>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<Choice>,
    #[serde(default, deserialize_with = "lenient")]
    pub dns_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Server fields without a typed counterpart
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Prefix model matching NetBox PrefixSerializer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prefix {
    pub id: u64,
    pub prefix: String, // e.g., "192.168.1.0/24"
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub family: Option<Family>,
    #[serde(default, deserialize_with = "lenient")]
    pub vrf: Option<NestedVrf>,
    #[serde(default, deserialize_with = "lenient")]
    pub vlan: Option<NestedVlan>,
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<NestedRole>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<Choice>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_pool: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Server fields without a typed counterpart
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// VRF model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vrf {
    pub id: u64,
    pub name: String,
    /// Route distinguisher
    #[serde(default, deserialize_with = "lenient")]
    pub rd: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub enforce_unique: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    /// Server fields without a typed counterpart
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Aggregate model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aggregate {
    pub id: u64,
    pub prefix: String,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub family: Option<Family>,
    #[serde(default, deserialize_with = "lenient")]
    pub rir: Option<NestedRir>,
    #[serde(default, deserialize_with = "lenient")]
    pub date_added: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    /// Server fields without a typed counterpart
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// RIR model (Regional Internet Registry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rir {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_private: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    /// Server fields without a typed counterpart
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Prefix/VLAN role model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub weight: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    /// Server fields without a typed counterpart
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// VLAN model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vlan {
    pub id: u64,
    pub vid: u16,
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<Choice>,
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<NestedRole>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    /// Server fields without a typed counterpart
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Nested serializers (simplified versions for references)

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedVrf {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub rd: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedVlan {
    pub id: u64,
    pub vid: u16,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedRole {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedRir {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub slug: Option<String>,
}

/// Address family, sent as `4` by NetBox 2.x and `{"value": 4, "label": "IPv4"}` later
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "FamilyRepr")]
pub struct Family {
    pub value: u8,
    pub label: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FamilyRepr {
    Plain(u8),
    Labelled {
        value: u8,
        #[serde(default)]
        label: Option<String>,
    },
}

impl From<FamilyRepr> for Family {
    fn from(repr: FamilyRepr) -> Self {
        match repr {
            FamilyRepr::Plain(value) => Self { value, label: None },
            FamilyRepr::Labelled { value, label } => Self { value, label },
        }
    }
}

/// NetBox choice field, e.g. `{"value": "active", "label": "Active"}`
///
/// NetBox 2.x used integer values (`{"value": 1, "label": "Active"}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Choice {
    pub value: Value,
    #[serde(default)]
    pub label: Option<String>,
}
