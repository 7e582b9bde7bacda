use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// JSON metadata attached to a ticket category.
///
/// Well-known keys are typed, anything else is carried through untouched so
/// that a read-modify-write cycle never drops data written by other clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMetadata {
    /// Connection details for online categories (opaque to this service)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online_configuration: Option<serde_json::Value>,

    /// Localized description of the requirements, keyed by language
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub requirements_descriptions: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions_to_be_accepted: Vec<serde_json::Value>,

    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl CategoryMetadata {
    pub fn empty() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.online_configuration.is_none()
            && self.requirements_descriptions.is_empty()
            && self.conditions_to_be_accepted.is_empty()
            && self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_keys_survive_roundtrip() {
        let raw = json!({
            "requirementsDescriptions": { "en": "Bring your ID" },
            "customField": { "nested": true }
        });

        let metadata: CategoryMetadata = serde_json::from_value(raw.clone()).unwrap();
        let descriptions = &metadata.requirements_descriptions;
        assert_eq!(
            descriptions.get("en").map(String::as_str),
            Some("Bring your ID")
        );
        assert!(metadata.attributes.contains_key("customField"));
        assert_eq!(serde_json::to_value(&metadata).unwrap(), raw);
    }

    #[test]
    fn test_empty_object_is_empty() {
        let metadata: CategoryMetadata = serde_json::from_value(json!({})).unwrap();
        assert!(metadata.is_empty());
        assert_eq!(serde_json::to_value(&metadata).unwrap(), json!({}));
    }
}
