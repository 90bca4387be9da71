// Event records -- from `GET /api/v2/events` and embedded inside alarms.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event and alarm severity, ordered least to most severe.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Severity {
    /// Aliases cover the business-service API, which spells severities in
    /// title case ("Indeterminate") where alarms and events use uppercase.
    #[default]
    #[serde(alias = "Indeterminate")]
    Indeterminate,
    #[serde(alias = "Cleared")]
    Cleared,
    #[serde(alias = "Normal")]
    Normal,
    #[serde(alias = "Warning")]
    Warning,
    #[serde(alias = "Minor")]
    Minor,
    #[serde(alias = "Major")]
    Major,
    #[serde(alias = "Critical")]
    Critical,
}

impl Severity {
    /// Title-case spelling, as the business-service endpoints expect.
    pub fn title(self) -> &'static str {
        match self {
            Self::Indeterminate => "Indeterminate",
            Self::Cleared => "Cleared",
            Self::Normal => "Normal",
            Self::Warning => "Warning",
            Self::Minor => "Minor",
            Self::Major => "Major",
            Self::Critical => "Critical",
        }
    }
}

/// Key/value parameter attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventParameter {
    pub name: String,
    pub value: String,
    /// Parameter type hint, usually `"string"`.
    #[serde(rename = "type", default = "EventParameter::default_type")]
    pub param_type: String,
}

impl EventParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            param_type: Self::default_type(),
        }
    }

    fn default_type() -> String {
        "string".to_owned()
    }
}

/// Event record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, deserialize_with = "crate::model::flex_id::deserialize_opt")]
    pub id: Option<i64>,
    pub uei: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub log_message: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "crate::model::flex_id::deserialize_opt")]
    pub node_id: Option<i64>,
    #[serde(default)]
    pub node_label: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub parameters: Vec<EventParameter>,
    /// Catch-all for fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Outbound event for `POST /api/v2/events`.
///
/// Only the fields a client originates; the server fills in the rest when
/// it processes the event.
#[derive(Debug, Clone, Serialize)]
pub struct EventSubmission {
    pub uei: String,
    pub source: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<EventParameter>,
}

impl EventSubmission {
    pub fn new(uei: impl Into<String>) -> Self {
        Self {
            uei: uei.into(),
            source: "opennms-api".to_owned(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(EventParameter::new(name, value));
        self
    }

    /// The internal event that triggers a daemon configuration reload.
    pub fn reload_daemon(daemon: &str) -> Self {
        Self::new("uei.opennms.org/internal/reloadDaemonConfig")
            .with_parameter("daemonName", daemon)
    }
}
