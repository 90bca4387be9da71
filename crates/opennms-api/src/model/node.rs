// Node records and their nested resources -- from `GET /api/v2/nodes` and
// the per-node sub-endpoints (snmpinterfaces, ipinterfaces, services,
// metadata).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// How a node's label was assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelSource {
    #[serde(rename = "U")]
    User,
    #[serde(rename = "H")]
    Hostname,
    #[serde(rename = "S")]
    SysName,
    #[serde(rename = "A")]
    Address,
    #[serde(rename = "N")]
    NetBios,
    #[serde(other)]
    Unknown,
}

/// Provisioning state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "A")]
    Active,
    #[serde(rename = "D")]
    Deleted,
    #[serde(other)]
    Unknown,
}

/// SNMP-primary flag of an IP interface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum PrimaryType {
    #[serde(rename = "P")]
    #[strum(serialize = "P")]
    Primary,
    #[serde(rename = "S")]
    #[strum(serialize = "S")]
    Secondary,
    #[serde(rename = "N")]
    #[strum(serialize = "N")]
    NotEligible,
}

impl PrimaryType {
    /// Valid wire values, for validation error messages.
    pub fn wire_values() -> Vec<String> {
        ["P", "S", "N"].iter().map(|s| (*s).to_owned()).collect()
    }
}

/// Metadata entry attached to a node, interface, or service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub context: String,
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl Metadata {
    pub fn new(
        context: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            context: context.into(),
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

/// Monitored service kind (ICMP, SNMP, HTTP, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceType {
    #[serde(deserialize_with = "crate::model::flex_id::deserialize")]
    pub id: i64,
    pub name: String,
}

/// Asset record of a node. The server tracks several dozen free-form
/// fields; the commonly used ones are modeled, the rest land in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    #[serde(default, deserialize_with = "crate::model::flex_id::deserialize_opt")]
    pub id: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub model_number: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub operating_system: Option<String>,
    #[serde(default)]
    pub rack: Option<String>,
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub maint_contract_expiration: Option<String>,
    #[serde(default)]
    pub maintcontract: Option<String>,
    #[serde(default)]
    pub display_category: Option<String>,
    #[serde(default)]
    pub notify_category: Option<String>,
    #[serde(default)]
    pub poller_category: Option<String>,
    #[serde(default)]
    pub threshold_category: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub last_modified_by: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_modified_date: Option<DateTime<Utc>>,
    /// Catch-all for the remaining asset fields.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// SNMP interface record -- from `GET /api/v2/nodes/{id}/snmpinterfaces`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnmpInterface {
    #[serde(default, deserialize_with = "crate::model::flex_id::deserialize_opt")]
    pub id: Option<i64>,
    #[serde(default)]
    pub if_index: Option<i32>,
    #[serde(default)]
    pub if_type: Option<i32>,
    #[serde(default)]
    pub if_descr: Option<String>,
    #[serde(default)]
    pub if_name: Option<String>,
    #[serde(default)]
    pub if_alias: Option<String>,
    #[serde(default)]
    pub if_speed: Option<i64>,
    #[serde(default)]
    pub if_admin_status: Option<i32>,
    #[serde(default)]
    pub if_oper_status: Option<i32>,
    #[serde(default)]
    pub phys_addr: Option<String>,
    #[serde(default)]
    pub netmask: Option<String>,
    #[serde(default)]
    pub collect: Option<bool>,
    #[serde(default)]
    pub poll: Option<bool>,
    #[serde(default)]
    pub collection_user_specified: Option<bool>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_capsd_poll: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_snmp_poll: Option<DateTime<Utc>>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Monitored service on one IP interface -- from
/// `GET /api/v2/nodes/{id}/ipinterfaces/{ip}/services`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredService {
    #[serde(default, deserialize_with = "crate::model::flex_id::deserialize_opt")]
    pub id: Option<i64>,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_long: Option<String>,
    #[serde(default)]
    pub down: Option<bool>,
    #[serde(default)]
    pub notify: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_good: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_fail: Option<DateTime<Utc>>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl MonitoredService {
    /// Service-type name, when present.
    pub fn name(&self) -> Option<&str> {
        self.service_type.as_ref().map(|t| t.name.as_str())
    }
}

/// IP interface record -- from `GET /api/v2/nodes/{id}/ipinterfaces` or the
/// top-level `GET /api/v2/ipinterfaces` search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpInterface {
    #[serde(default, deserialize_with = "crate::model::flex_id::deserialize_opt")]
    pub id: Option<i64>,
    pub ip_address: String,
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub is_managed: Option<String>,
    #[serde(default)]
    pub snmp_primary: Option<PrimaryType>,
    #[serde(default)]
    pub if_index: Option<i32>,
    #[serde(default, deserialize_with = "crate::model::flex_id::deserialize_opt")]
    pub node_id: Option<i64>,
    #[serde(default)]
    pub monitored_service_count: Option<i32>,
    #[serde(default)]
    pub snmp_interface: Option<SnmpInterface>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_capsd_poll: Option<DateTime<Utc>>,
    /// Monitored services, attached during hydration.
    #[serde(skip)]
    pub services: Vec<MonitoredService>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// The `categories` list arrives as objects; only the names matter here.
fn category_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Category {
        name: String,
    }
    let categories = Vec::<Category>::deserialize(deserializer)?;
    Ok(categories.into_iter().map(|c| c.name).collect())
}

/// Node record -- from `GET /api/v2/nodes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(deserialize_with = "crate::model::flex_id::deserialize")]
    pub id: i64,
    pub label: String,
    #[serde(default)]
    pub label_source: Option<LabelSource>,
    #[serde(default, rename = "type")]
    pub node_type: Option<NodeType>,
    #[serde(default)]
    pub foreign_source: Option<String>,
    #[serde(default)]
    pub foreign_id: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub sys_object_id: Option<String>,
    #[serde(default)]
    pub sys_name: Option<String>,
    #[serde(default)]
    pub sys_description: Option<String>,
    #[serde(default)]
    pub sys_location: Option<String>,
    #[serde(default)]
    pub sys_contact: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_capsd_poll: Option<DateTime<Utc>>,
    #[serde(default)]
    pub asset_record: Option<AssetRecord>,
    #[serde(default, deserialize_with = "category_names")]
    pub categories: Vec<String>,
    /// SNMP interfaces, attached during hydration.
    #[serde(skip)]
    pub snmp_interfaces: Vec<SnmpInterface>,
    /// IP interfaces, attached during hydration.
    #[serde(skip)]
    pub ip_interfaces: Vec<IpInterface>,
    /// Metadata entries, attached during hydration.
    #[serde(skip)]
    pub meta_data: Vec<Metadata>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}
