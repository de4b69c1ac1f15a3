use serde_json::Value;

use crate::config::ResponseKeys;

/// The final struct that becomes one row of the output sheet
#[derive(Debug, Clone, PartialEq)]
pub struct AddressRecord {
    pub province: String,
    pub city: String,
    pub county: String,
    pub address: String,
    /// Unseparated concatenation of the four fields above.
    pub full_address: String,
    /// The raw API response the row was extracted from.
    pub full_json: Value,
}

impl AddressRecord {
    /// Extract a record from a raw API response.
    ///
    /// Returns `None` when the configured root key is missing or its
    /// value is not an object. Missing sub-fields default to `""` and
    /// do not discard the row.
    pub fn from_response(response: Value, keys: &ResponseKeys) -> Option<Self> {
        let root = response.get(&keys.root)?.as_object()?;

        let province = field_string(root.get(&keys.province));
        let city = field_string(root.get(&keys.city));
        let county = field_string(root.get(&keys.county));
        let address = field_string(root.get(&keys.address));
        let full_address = format!("{province}{city}{county}{address}");

        Some(Self {
            province,
            city,
            county,
            address,
            full_address,
            full_json: response,
        })
    }
}

/// Render one sub-field: absent and null become `""`, strings are taken
/// as-is, any other value keeps its JSON rendering.
fn field_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
