// ── Root info artifact ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use habindex_api::RootResponse;

/// Persisted view of the server's root/discovery document.
///
/// `endpoint_map` maps each advertised resource name (`items`, `things`,
/// ...) to its URL; `runtime_info` carries version/locale/runtime fields.
/// Rebuilt alongside the index on every run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootInfo {
    #[serde(default)]
    pub runtime_info: BTreeMap<String, Value>,
    #[serde(default)]
    pub endpoint_map: BTreeMap<String, String>,
}

impl RootInfo {
    /// Extract endpoint map and runtime fields from a raw root document.
    pub fn from_response(resp: &RootResponse) -> Self {
        let mut runtime_info = BTreeMap::new();
        if let Some(ref version) = resp.version {
            runtime_info.insert("version".to_owned(), version.clone());
        }
        if let Some(ref locale) = resp.locale {
            runtime_info.insert("locale".to_owned(), Value::from(locale.clone()));
        }
        if let Some(ref system) = resp.measurement_system {
            runtime_info.insert("measurementSystem".to_owned(), Value::from(system.clone()));
        }
        if let Some(ref tz) = resp.timezone {
            runtime_info.insert("timezone".to_owned(), Value::from(tz.clone()));
        }
        if let Some(ref info) = resp.runtime_info {
            runtime_info.insert("runtimeInfo".to_owned(), info.clone());
        }

        let endpoint_map = resp
            .links
            .iter()
            .map(|l| (l.link_type.clone(), l.url.clone()))
            .collect();

        Self {
            runtime_info,
            endpoint_map,
        }
    }

    /// Resolve an endpoint URL by resource name.
    pub fn endpoint(&self, name: &str) -> Option<&str> {
        self.endpoint_map.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use habindex_api::{RootLink, RootResponse};
    use serde_json::json;

    use super::RootInfo;

    #[test]
    fn extracts_endpoint_map_and_runtime_fields() {
        let resp = RootResponse {
            version: Some(json!("8")),
            locale: Some("en_US".into()),
            runtime_info: Some(json!({"version": "4.1.0"})),
            links: vec![
                RootLink {
                    link_type: "items".into(),
                    url: "http://server/rest/items".into(),
                },
                RootLink {
                    link_type: "things".into(),
                    url: "http://server/rest/things".into(),
                },
            ],
            ..RootResponse::default()
        };

        let info = RootInfo::from_response(&resp);

        assert_eq!(info.endpoint("items"), Some("http://server/rest/items"));
        assert_eq!(info.endpoint_map.len(), 2);
        assert_eq!(info.runtime_info["locale"], json!("en_US"));
        assert_eq!(info.runtime_info["runtimeInfo"]["version"], json!("4.1.0"));
    }
}
