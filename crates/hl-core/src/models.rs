//! Wire models for the HighLevel contacts API
//!
//! Only the fields this layer touches are modelled strictly. Everything else
//! lands in the flattened `extra` maps and is sent back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lower-case an optional email in place
fn normalize(email: &mut Option<String>) {
    if let Some(email) = email.as_mut() {
        *email = email.to_lowercase();
    }
}

/// Custom field value attached to a contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, alias = "field_value", skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// A contact as stored by HighLevel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Identifier assigned by HighLevel
    pub id: String,
    /// Location (sub-account) owning the contact
    pub location_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub contact_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnd: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_updated: Option<String>,
    /// Attributes not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /contacts/upsert`
///
/// HighLevel matches on email and/or phone inside `location_id` and decides
/// whether to create or update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertContactRequest {
    pub location_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomField>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UpsertContactRequest {
    /// Create an upsert request scoped to a location
    pub fn new(location_id: impl Into<String>) -> Self {
        Self {
            location_id: location_id.into(),
            ..Default::default()
        }
    }

    /// Set email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set phone number
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set first and last name
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Lower-case the email in place. No-op without an email.
    pub fn normalize_email(&mut self) {
        normalize(&mut self.email);
    }
}

/// Response of `POST /contacts/upsert`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertContactResponse {
    /// True when HighLevel created a new contact
    #[serde(default)]
    pub new: bool,
    pub contact: Contact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// Body of `PUT /contacts/{id}`; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Vec<CustomField>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UpdateContactRequest {
    /// Lower-case the email in place. No-op without an email.
    pub fn normalize_email(&mut self) {
        normalize(&mut self.email);
    }
}

/// Response of `PUT /contacts/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateContactResponse {
    /// HighLevel spells this field `succeded`
    #[serde(rename = "succeded", alias = "succeeded", default)]
    pub succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
}

/// Response of `DELETE /contacts/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteContactResponse {
    #[serde(rename = "succeded", alias = "succeeded", default)]
    pub succeeded: bool,
}

/// Response of `GET /contacts/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub contact: Contact,
}

/// Body of `POST /contacts/search`
///
/// The three well-known filters are typed; anything else the search endpoint
/// understands (`page`, `filters`, `sort`, ...) goes into `extra` verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchContactsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchContactsRequest {
    /// Filters used to resolve a single contact by email: location scope,
    /// the lower-cased email as free-text query and a limit of one.
    pub fn for_email(email: &str, location_id: impl Into<String>) -> Self {
        Self {
            location_id: Some(location_id.into()),
            query: Some(email.to_lowercase()),
            limit: Some(1),
            extra: Map::new(),
        }
    }

    /// Add a filter entry. `locationId`, `query` and `limit` land on the typed
    /// fields so a key is never sent twice; a value of the wrong type clears
    /// the field.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            "locationId" => self.location_id = value.as_str().map(str::to_string),
            "query" => self.query = value.as_str().map(str::to_string),
            "limit" => self.limit = value.as_u64().and_then(|n| u32::try_from(n).ok()),
            _ => {
                self.extra.insert(key, value);
            }
        }
        self
    }
}

/// Response of `POST /contacts/search`
///
/// `contacts` and `total` are kept as raw values: a missing key, a non-array
/// value and an array of unexpected objects are all representable and
/// resolved later. Any JSON object decodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchContactsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchContactsResponse {
    /// Reported match count, when the remote sent a non-negative integer
    pub fn total(&self) -> Option<u64> {
        self.total.as_ref().and_then(Value::as_u64)
    }
}
