// Requisition models -- the provisioning documents under
// `GET/POST /rest/requisitions`.
//
// The wire format is the v1 API's hyphenated one. Payloads are run through
// the normalizer before deserialization, so these types deserialize from
// underscore keys and serialize back to the hyphenated originals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::node::{Metadata, PrimaryType};
use crate::model::vec_or_one;

/// Asset fields the server accepts in a requisition. Mirrors the columns of
/// the node asset record.
pub const ASSET_FIELD_NAMES: &[&str] = &[
    "category",
    "manufacturer",
    "vendor",
    "modelNumber",
    "serialNumber",
    "description",
    "circuitId",
    "assetNumber",
    "operatingSystem",
    "rack",
    "slot",
    "port",
    "region",
    "division",
    "department",
    "building",
    "floor",
    "room",
    "address1",
    "address2",
    "city",
    "state",
    "zip",
    "country",
    "longitude",
    "latitude",
    "vendorPhone",
    "vendorFax",
    "vendorAssetNumber",
    "dateInstalled",
    "lease",
    "leaseExpires",
    "supportPhone",
    "maintcontract",
    "maintContractExpiration",
    "displayCategory",
    "notifyCategory",
    "pollerCategory",
    "thresholdCategory",
    "comment",
];

/// Surveillance category assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One asset field on a requisition node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetField {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl AssetField {
    /// Create a field, validating the name against the server's asset
    /// schema before anything goes on the wire.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if !ASSET_FIELD_NAMES.contains(&name.as_str()) {
            return Err(Error::InvalidValue {
                name: "asset field",
                value: name,
                valid: ASSET_FIELD_NAMES.iter().map(|s| (*s).to_owned()).collect(),
            });
        }
        Ok(Self {
            name,
            value: Some(value.into()),
        })
    }
}

/// Monitored service on a requisition interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequisitionService {
    #[serde(rename(serialize = "service-name", deserialize = "service_name"))]
    pub service_name: String,
    #[serde(default, deserialize_with = "vec_or_one")]
    pub category: Vec<Category>,
    #[serde(
        default,
        deserialize_with = "vec_or_one",
        rename(serialize = "meta-data", deserialize = "meta_data")
    )]
    pub meta_data: Vec<Metadata>,
}

impl RequisitionService {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Self::default()
        }
    }

    /// Add or replace a `requisition`-context metadata entry. A `None`
    /// value removes the key.
    pub fn set_metadata(&mut self, key: &str, value: Option<String>) {
        set_metadata(&mut self.meta_data, key, value);
    }
}

/// IP interface on a requisition node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequisitionInterface {
    #[serde(rename(serialize = "ip-addr", deserialize = "ip_addr"))]
    pub ip_addr: String,
    #[serde(
        default = "default_snmp_primary",
        rename(serialize = "snmp-primary", deserialize = "snmp_primary")
    )]
    pub snmp_primary: PrimaryType,
    #[serde(
        default = "default_status",
        deserialize_with = "crate::model::flex_i32"
    )]
    pub status: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed: Option<String>,
    #[serde(
        default,
        deserialize_with = "vec_or_one",
        rename(serialize = "monitored-service", deserialize = "monitored_service")
    )]
    pub monitored_service: Vec<RequisitionService>,
    #[serde(default, deserialize_with = "vec_or_one")]
    pub category: Vec<Category>,
    #[serde(
        default,
        deserialize_with = "vec_or_one",
        rename(serialize = "meta-data", deserialize = "meta_data")
    )]
    pub meta_data: Vec<Metadata>,
}

fn default_snmp_primary() -> PrimaryType {
    PrimaryType::NotEligible
}

fn default_status() -> i32 {
    1
}

impl RequisitionInterface {
    /// Create an interface, rejecting anything that does not parse as an
    /// IP address before it can reach the server.
    pub fn new(ip_addr: impl Into<String>) -> Result<Self, Error> {
        let ip_addr = ip_addr.into();
        if ip_addr.parse::<std::net::IpAddr>().is_err() {
            return Err(Error::InvalidValue {
                name: "ip_addr",
                value: ip_addr,
                valid: vec!["a valid IPv4 or IPv6 address".to_owned()],
            });
        }
        Ok(Self {
            ip_addr,
            snmp_primary: default_snmp_primary(),
            status: default_status(),
            descr: None,
            managed: None,
            monitored_service: Vec::new(),
            category: Vec::new(),
            meta_data: Vec::new(),
        })
    }

    pub fn set_metadata(&mut self, key: &str, value: Option<String>) {
        set_metadata(&mut self.meta_data, key, value);
    }
}

/// Node entry inside a requisition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequisitionNode {
    #[serde(rename(serialize = "foreign-id", deserialize = "foreign_id"))]
    pub foreign_id: String,
    #[serde(rename(serialize = "node-label", deserialize = "node_label"))]
    pub node_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename(serialize = "parent-foreign-source", deserialize = "parent_foreign_source")
    )]
    pub parent_foreign_source: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename(serialize = "parent-foreign-id", deserialize = "parent_foreign_id")
    )]
    pub parent_foreign_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename(serialize = "parent-node-label", deserialize = "parent_node_label")
    )]
    pub parent_node_label: Option<String>,
    #[serde(default, deserialize_with = "vec_or_one")]
    pub asset: Vec<AssetField>,
    #[serde(default, deserialize_with = "vec_or_one")]
    pub category: Vec<Category>,
    #[serde(default, deserialize_with = "vec_or_one")]
    pub interface: Vec<RequisitionInterface>,
    #[serde(
        default,
        deserialize_with = "vec_or_one",
        rename(serialize = "meta-data", deserialize = "meta_data")
    )]
    pub meta_data: Vec<Metadata>,
}

impl RequisitionNode {
    pub fn new(foreign_id: impl Into<String>, node_label: impl Into<String>) -> Self {
        Self {
            foreign_id: foreign_id.into(),
            node_label: node_label.into(),
            ..Self::default()
        }
    }

    /// The interface with the given address, if present.
    pub fn interface(&self, ip_addr: &str) -> Option<&RequisitionInterface> {
        self.interface.iter().find(|i| i.ip_addr == ip_addr)
    }

    /// Add an interface. Refuses to clobber an existing address; use
    /// [`Self::change_ip`] or remove it first.
    pub fn add_interface(&mut self, interface: RequisitionInterface) -> Result<(), Error> {
        if self.interface(&interface.ip_addr).is_some() {
            return Err(Error::DuplicateEntity {
                name: interface.ip_addr,
                kind: "interface",
            });
        }
        self.interface.push(interface);
        Ok(())
    }

    /// Re-address an existing interface.
    pub fn change_ip(&mut self, old_ip: &str, new_ip: &str) -> Result<(), Error> {
        if self.interface(new_ip).is_some() {
            return Err(Error::DuplicateEntity {
                name: new_ip.to_owned(),
                kind: "interface",
            });
        }
        let Some(interface) = self.interface.iter_mut().find(|i| i.ip_addr == old_ip) else {
            return Err(Error::InvalidValue {
                name: "old_ip",
                value: old_ip.to_owned(),
                valid: self.interface.iter().map(|i| i.ip_addr.clone()).collect(),
            });
        };
        interface.ip_addr = new_ip.to_owned();
        Ok(())
    }

    /// Add or replace a `requisition`-context metadata entry. A `None`
    /// value removes the key.
    pub fn set_metadata(&mut self, key: &str, value: Option<String>) {
        set_metadata(&mut self.meta_data, key, value);
    }

    /// Add or replace an asset field. A `None` value removes the entry.
    pub fn set_asset(&mut self, name: &str, value: Option<String>) -> Result<(), Error> {
        match value {
            None => {
                self.asset.retain(|a| !a.name.eq_ignore_ascii_case(name));
                Ok(())
            }
            Some(value) => {
                if let Some(existing) = self
                    .asset
                    .iter_mut()
                    .find(|a| a.name.eq_ignore_ascii_case(name))
                {
                    existing.value = Some(value);
                    return Ok(());
                }
                self.asset.push(AssetField::new(name, value)?);
                Ok(())
            }
        }
    }

    /// Add a category, if not already assigned.
    pub fn add_category(&mut self, category: &str) {
        if !self.category.iter().any(|c| c.name == category) {
            self.category.push(Category::new(category));
        }
    }

    pub fn remove_category(&mut self, category: &str) {
        self.category.retain(|c| c.name != category);
    }
}

/// A full requisition document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Requisition {
    #[serde(rename(serialize = "foreign-source", deserialize = "foreign_source"))]
    pub foreign_source: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::ts_millis_flex",
        rename(serialize = "date-stamp", deserialize = "date_stamp")
    )]
    pub date_stamp: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::ts_millis_flex",
        rename(serialize = "last-import", deserialize = "last_import")
    )]
    pub last_import: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "vec_or_one")]
    pub node: Vec<RequisitionNode>,
}

impl Requisition {
    pub fn new(foreign_source: impl Into<String>) -> Self {
        Self {
            foreign_source: foreign_source.into(),
            ..Self::default()
        }
    }

    /// The node with the given foreign id, if present.
    pub fn node(&self, foreign_id: &str) -> Option<&RequisitionNode> {
        self.node.iter().find(|n| n.foreign_id == foreign_id)
    }

    /// Add a node. Refuses to clobber an existing foreign id.
    pub fn add_node(&mut self, node: RequisitionNode) -> Result<(), Error> {
        if self.node(&node.foreign_id).is_some() {
            return Err(Error::DuplicateEntity {
                name: node.foreign_id,
                kind: "requisition node",
            });
        }
        self.node.push(node);
        Ok(())
    }

    pub fn remove_node(&mut self, foreign_id: &str) {
        self.node.retain(|n| n.foreign_id != foreign_id);
    }
}

/// Shared replace-or-append-or-remove for `requisition`-context metadata.
fn set_metadata(entries: &mut Vec<Metadata>, key: &str, value: Option<String>) {
    match value {
        None => entries.retain(|m| m.key != key),
        Some(value) => {
            if let Some(existing) = entries.iter_mut().find(|m| m.key == key) {
                existing.value = Some(value);
                return;
            }
            entries.push(Metadata::new("requisition", key, value));
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::normalize::normalize_value;

    #[test]
    fn deserializes_normalized_payload() {
        let raw = json!({
            "foreign-source": "servers",
            "date-stamp": 1_704_904_715_000_i64,
            "node": [{
                "foreign-id": "web01",
                "node-label": "web01.example.org",
                "interface": {
                    "ip-addr": "10.0.0.1",
                    "snmp-primary": "P",
                    "status": 1,
                    "monitored-service": [{"service-name": "ICMP"}]
                },
                "category": [{"name": "Production"}]
            }]
        });
        let req: Requisition =
            serde_json::from_value(normalize_value(raw)).expect("deserialize requisition");
        assert_eq!(req.foreign_source, "servers");
        assert_eq!(req.node.len(), 1);
        let node = &req.node[0];
        assert_eq!(node.foreign_id, "web01");
        // Collapsed single-element interface list expands to one entry.
        assert_eq!(node.interface.len(), 1);
        assert_eq!(node.interface[0].snmp_primary, PrimaryType::Primary);
        assert_eq!(node.interface[0].monitored_service[0].service_name, "ICMP");
    }

    #[test]
    fn serializes_back_to_hyphenated_wire_keys() {
        let mut req = Requisition::new("servers");
        let mut node = RequisitionNode::new("web01", "web01.example.org");
        let mut iface = RequisitionInterface::new("10.0.0.1").expect("valid ip");
        iface.monitored_service.push(RequisitionService::new("ICMP"));
        node.add_interface(iface).expect("first interface");
        req.add_node(node).expect("first node");

        let wire = serde_json::to_value(&req).expect("serialize");
        assert_eq!(wire["foreign-source"], "servers");
        assert_eq!(wire["node"][0]["foreign-id"], "web01");
        assert_eq!(wire["node"][0]["interface"][0]["ip-addr"], "10.0.0.1");
        assert_eq!(wire["node"][0]["interface"][0]["snmp-primary"], "N");
        assert_eq!(
            wire["node"][0]["interface"][0]["monitored-service"][0]["service-name"],
            "ICMP"
        );
    }

    #[test]
    fn invalid_interface_address_is_rejected_locally() {
        let err = RequisitionInterface::new("not-an-ip").expect_err("must fail");
        assert!(matches!(err, Error::InvalidValue { .. }));
    }

    #[test]
    fn change_ip_enforces_uniqueness() {
        let mut node = RequisitionNode::new("a", "a");
        node.add_interface(RequisitionInterface::new("10.0.0.1").expect("ip"))
            .expect("add");
        node.add_interface(RequisitionInterface::new("10.0.0.2").expect("ip"))
            .expect("add");

        let err = node.change_ip("10.0.0.1", "10.0.0.2").expect_err("dup");
        assert!(matches!(err, Error::DuplicateEntity { .. }));
        node.change_ip("10.0.0.1", "10.0.0.3").expect("re-address");
        assert!(node.interface("10.0.0.3").is_some());
    }

    #[test]
    fn set_asset_validates_field_name() {
        let mut node = RequisitionNode::new("a", "a");
        assert!(node.set_asset("serialNumber", Some("SN-1".into())).is_ok());
        let err = node
            .set_asset("notAnAssetField", Some("x".into()))
            .expect_err("must fail");
        assert!(matches!(err, Error::InvalidValue { .. }));
    }
}
