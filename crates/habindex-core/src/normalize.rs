//! Raw listing records -> canonical [`Item`]s.
//!
//! Normalization is purely local: it defaults absent collections, derives
//! `rest_url`, and drops volatile state. Semantic role flags stay unset
//! here — classification needs the whole membership graph and happens in
//! [`crate::semantics`].

use std::collections::BTreeMap;

use thiserror::Error;

use habindex_api::RawItem;

use crate::model::{Item, SemanticFlags};

/// A raw record that cannot become an [`Item`]. The offending record is
/// skipped with a warning; it never fails the run.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct InvalidItem {
    pub reason: String,
}

/// Convert one raw listing record into a canonical [`Item`].
pub fn normalize(raw: RawItem) -> Result<Item, InvalidItem> {
    if raw.name.trim().is_empty() {
        return Err(InvalidItem {
            reason: "missing or empty `name`".into(),
        });
    }

    let rest_url = format!("/rest/items/{}", raw.name);
    let metadata: BTreeMap<_, _> = raw.metadata.into_iter().collect();

    Ok(Item {
        rest_url,
        name: raw.name,
        label: raw.label,
        item_type: raw.item_type,
        category: raw.category,
        tags: raw.tags,
        group_names: raw.group_names,
        metadata,
        semantic: SemanticFlags::default(),
    })
}

#[cfg(test)]
mod tests {
    use habindex_api::RawItem;
    use serde_json::json;

    use super::normalize;

    fn raw(name: &str) -> RawItem {
        RawItem {
            name: name.into(),
            item_type: Some("Switch".into()),
            ..RawItem::default()
        }
    }

    #[test]
    fn derives_rest_url_and_defaults_collections() {
        let item = normalize(raw("Kitchen_Light")).expect("valid item");

        assert_eq!(item.name, "Kitchen_Light");
        assert_eq!(item.rest_url, "/rest/items/Kitchen_Light");
        assert!(item.tags.is_empty());
        assert!(item.group_names.is_empty());
        assert!(item.metadata.is_empty());
        assert!(!item.semantic.is_location);
        assert!(!item.semantic.is_equipment);
        assert!(!item.semantic.is_point);
    }

    #[test]
    fn keeps_metadata_namespaces() {
        let mut record = raw("Sensor_Temp");
        record
            .metadata
            .insert("semantics".into(), json!({"pointType": "Measurement"}));
        record
            .metadata
            .insert("alexa".into(), json!({"value": "TemperatureSensor"}));

        let item = normalize(record).expect("valid item");

        assert_eq!(item.metadata.len(), 2);
        assert_eq!(item.metadata["semantics"]["pointType"], json!("Measurement"));
    }

    #[test]
    fn rejects_missing_name() {
        let record = RawItem {
            item_type: Some("Switch".into()),
            ..RawItem::default()
        };

        let err = normalize(record).expect_err("empty name must be rejected");
        assert!(err.reason.contains("name"));
    }

    #[test]
    fn rejects_whitespace_name() {
        let record = RawItem {
            name: "   ".into(),
            ..RawItem::default()
        };

        assert!(normalize(record).is_err());
    }

    #[test]
    fn drops_volatile_state() {
        let record = RawItem {
            name: "Door_Contact".into(),
            state: Some("OPEN".into()),
            ..RawItem::default()
        };

        let item = normalize(record).expect("valid item");
        let json = serde_json::to_value(&item).expect("serializable");
        assert!(json.get("state").is_none());
    }
}
