// Server info records -- from `GET /rest/info`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Ticketer plugin configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketerConfig {
    pub enabled: bool,
    #[serde(default)]
    pub plugin: Option<String>,
}

/// Server-side date/time formatting configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateFormat {
    #[serde(default, rename = "zoneId")]
    pub zone_id: Option<String>,
    #[serde(default)]
    pub datetimeformat: Option<String>,
}

/// Daemon name plus its reported status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub name: String,
    pub status: String,
}

/// The wire sends `services` as a `{name: status}` map; a list of typed
/// entries is easier to work with.
fn service_statuses<'de, D>(deserializer: D) -> Result<Vec<ServiceStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = BTreeMap::<String, String>::deserialize(deserializer)?;
    Ok(map
        .into_iter()
        .map(|(name, status)| ServiceStatus { name, status })
        .collect())
}

/// Server version and capability information, fetched once at connect time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    #[serde(default)]
    pub display_version: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default)]
    pub package_description: Option<String>,
    #[serde(default)]
    pub ticketer_config: Option<TicketerConfig>,
    #[serde(default, rename = "datetimeformatConfig")]
    pub datetimeformat_config: Option<DateFormat>,
    #[serde(default, deserialize_with = "service_statuses")]
    pub services: Vec<ServiceStatus>,
}

impl Info {
    /// Daemons reported as running, lowercased for case-insensitive lookup.
    pub fn enabled_services(&self) -> Vec<String> {
        self.services
            .iter()
            .filter(|s| s.status == "running")
            .map(|s| s.name.to_lowercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn services_map_becomes_typed_list() {
        let raw = json!({
            "displayVersion": "33.0.8",
            "version": "33.0.8",
            "packageName": "opennms",
            "packageDescription": "OpenNMS",
            "ticketerConfig": {"enabled": false},
            "datetimeformatConfig": {"zoneId": "UTC"},
            "services": {"Eventd": "running", "Pollerd": "running", "Bsmd": "stopped"}
        });
        let info: Info = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(info.services.len(), 3);
        let enabled = info.enabled_services();
        assert!(enabled.contains(&"eventd".to_owned()));
        assert!(!enabled.contains(&"bsmd".to_owned()));
    }
}
