// Alarm records -- from `GET /api/v2/alarms`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::event::{Event, EventParameter, Severity};
use crate::model::node::ServiceType;

/// Alarm record. Timestamps are epoch milliseconds on the wire; the
/// `lastEvent`/`firstEvent` payloads are full embedded event records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    #[serde(deserialize_with = "crate::model::flex_id::deserialize")]
    pub id: i64,
    pub reduction_key: String,
    #[serde(default, rename = "type")]
    pub alarm_type: Option<i32>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub uei: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub log_message: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub first_event_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_event_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub first_automation_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_automation_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub suppressed_until: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub suppressed_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ack_user: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub ack_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::model::flex_id::deserialize_opt")]
    pub node_id: Option<i64>,
    #[serde(default)]
    pub node_label: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub if_index: Option<i32>,
    #[serde(default)]
    pub clear_key: Option<String>,
    #[serde(default)]
    pub x733_probable_cause: Option<i32>,
    #[serde(default)]
    pub affected_node_count: Option<i32>,
    /// Sticky memo payload; shape varies by release, kept opaque.
    #[serde(default)]
    pub sticky_memo: Option<Value>,
    #[serde(default)]
    pub reduction_key_memo: Option<Value>,
    #[serde(default)]
    pub trouble_ticket: Option<String>,
    #[serde(default)]
    pub trouble_ticket_link: Option<String>,
    #[serde(default)]
    pub trouble_ticket_state: Option<i32>,
    #[serde(default)]
    pub qos_alarm_state: Option<String>,
    #[serde(default)]
    pub managed_object_instance: Option<String>,
    #[serde(default)]
    pub managed_object_type: Option<String>,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub first_event: Option<Event>,
    #[serde(default)]
    pub last_event: Option<Event>,
    #[serde(default)]
    pub parameters: Vec<EventParameter>,
    #[serde(default)]
    pub related_alarms: Vec<Alarm>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Alarm {
    /// `true` if the alarm has been acknowledged.
    pub fn is_acknowledged(&self) -> bool {
        self.ack_user.is_some()
    }
}
