// Topology link records -- from `GET /api/v2/enlinkd/{nodeId}`.
//
// One endpoint, five discovery protocols. Each protocol contributes link
// records (edges seen from this node) and element records (this node's own
// protocol identity). Timestamps use the UI's `01/31/24, 11:59:59 pm`
// format rather than epoch millis.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::vec_or_one;

/// Serde adapter for the enlinkd timestamp format.
mod link_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%m/%d/%y, %I:%M:%S %p";

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(text) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        // The meridiem arrives lowercase; chrono's %p wants it uppercase.
        NaiveDateTime::parse_from_str(&text.to_uppercase(), FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            None => serializer.serialize_none(),
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
        }
    }
}

/// Remote endpoint of a bridge link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeLinkRemoteNode {
    #[serde(default)]
    pub bridge_remote: Option<String>,
    #[serde(default)]
    pub bridge_remote_url: Option<String>,
    #[serde(default)]
    pub bridge_remote_port: Option<String>,
    #[serde(default)]
    pub bridge_remote_port_url: Option<String>,
}

/// Bridge (forwarding table) link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeLink {
    #[serde(default)]
    pub bridge_local_port: Option<String>,
    #[serde(default)]
    pub bridge_local_port_url: Option<String>,
    #[serde(default)]
    pub bridge_info: Option<String>,
    #[serde(default, with = "link_time")]
    pub bridge_link_create_time: Option<NaiveDateTime>,
    #[serde(default, with = "link_time")]
    pub bridge_link_last_poll_time: Option<NaiveDateTime>,
    #[serde(default, rename = "BridgeLinkRemoteNodes")]
    pub bridge_link_remote_nodes: Vec<BridgeLinkRemoteNode>,
}

/// CDP neighbor link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpLink {
    #[serde(default)]
    pub cdp_local_port: Option<String>,
    #[serde(default)]
    pub cdp_local_port_url: Option<String>,
    #[serde(default)]
    pub cdp_cache_device: Option<String>,
    #[serde(default)]
    pub cdp_cache_device_url: Option<String>,
    #[serde(default)]
    pub cdp_cache_device_port: Option<String>,
    #[serde(default)]
    pub cdp_cache_device_port_url: Option<String>,
    #[serde(default)]
    pub cdp_cache_platform: Option<String>,
    #[serde(default, with = "link_time")]
    pub cdp_create_time: Option<NaiveDateTime>,
    #[serde(default, with = "link_time")]
    pub cdp_last_poll_time: Option<NaiveDateTime>,
}

/// IS-IS adjacency link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IsIsLink {
    #[serde(default, rename = "isisCircIfIndex")]
    pub isis_circ_if_index: Option<i32>,
    #[serde(default, rename = "isisCircAdminState")]
    pub isis_circ_admin_state: Option<String>,
    #[serde(default, rename = "isisISAdjNeighSysID")]
    pub isis_is_adj_neigh_sys_id: Option<String>,
    #[serde(default, rename = "isisISAdjNeighSysType")]
    pub isis_is_adj_neigh_sys_type: Option<String>,
    #[serde(default, rename = "isisISAdjNeighSysUrl")]
    pub isis_is_adj_neigh_sys_url: Option<String>,
    #[serde(default, rename = "isisISAdjNeighSNPAAddress")]
    pub isis_is_adj_neigh_snpa_address: Option<String>,
    #[serde(default, rename = "isisISAdjNeighPort")]
    pub isis_is_adj_neigh_port: Option<String>,
    #[serde(default, rename = "isisISAdjState")]
    pub isis_is_adj_state: Option<String>,
    #[serde(default, rename = "isisISAdjNbrExtendedCircID")]
    pub isis_is_adj_nbr_extended_circ_id: Option<i64>,
    #[serde(default, rename = "isisISAdjUrl")]
    pub isis_is_adj_url: Option<String>,
    #[serde(default, rename = "isisLinkCreateTime", with = "link_time")]
    pub isis_link_create_time: Option<NaiveDateTime>,
    #[serde(default, rename = "isisLinkLastPollTime", with = "link_time")]
    pub isis_link_last_poll_time: Option<NaiveDateTime>,
}

/// LLDP neighbor link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LldpLink {
    #[serde(default)]
    pub lldp_local_port: Option<String>,
    #[serde(default)]
    pub lldp_local_port_url: Option<String>,
    #[serde(default)]
    pub lldp_rem_chassis_id: Option<String>,
    #[serde(default)]
    pub lldp_rem_chassis_id_url: Option<String>,
    #[serde(default)]
    pub lldp_rem_info: Option<String>,
    /// The server emits this key without the doubled `l`.
    #[serde(default, rename = "ldpRemPort", alias = "lldpRemPort")]
    pub lldp_rem_port: Option<String>,
    #[serde(default, with = "link_time")]
    pub lldp_create_time: Option<NaiveDateTime>,
    #[serde(default, with = "link_time")]
    pub lldp_last_poll_time: Option<NaiveDateTime>,
}

/// OSPF neighbor link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OspfLink {
    #[serde(default)]
    pub ospf_local_port: Option<String>,
    #[serde(default)]
    pub ospf_local_port_url: Option<String>,
    #[serde(default)]
    pub ospf_rem_router_id: Option<String>,
    #[serde(default)]
    pub ospf_rem_router_url: Option<String>,
    #[serde(default)]
    pub ospf_rem_port: Option<String>,
    #[serde(default)]
    pub ospf_rem_port_url: Option<String>,
    #[serde(default)]
    pub ospf_link_info: Option<String>,
    #[serde(default, with = "link_time")]
    pub ospf_link_create_time: Option<NaiveDateTime>,
    #[serde(default, with = "link_time")]
    pub ospf_link_last_poll_time: Option<NaiveDateTime>,
}

/// Bridge identity of the node itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeElement {
    #[serde(default)]
    pub base_bridge_address: Option<String>,
    #[serde(default)]
    pub base_num_ports: Option<i32>,
    #[serde(default)]
    pub base_type: Option<String>,
    #[serde(default)]
    pub stp_protocol_specification: Option<String>,
    #[serde(default)]
    pub stp_priority: Option<String>,
    #[serde(default)]
    pub stp_designated_root: Option<String>,
    #[serde(default)]
    pub stp_root_cost: Option<i32>,
    #[serde(default)]
    pub stp_root_port: Option<i32>,
    #[serde(default)]
    pub vlan: Option<String>,
    #[serde(default)]
    pub vlanname: Option<String>,
    #[serde(default, with = "link_time")]
    pub bridge_node_create_time: Option<NaiveDateTime>,
    #[serde(default, with = "link_time")]
    pub bridge_node_last_poll_time: Option<NaiveDateTime>,
}

/// CDP identity of the node itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpElement {
    #[serde(default)]
    pub cdp_global_run: Option<String>,
    #[serde(default)]
    pub cdp_global_device_id: Option<String>,
    #[serde(default)]
    pub cdp_global_device_id_format: Option<String>,
    #[serde(default, with = "link_time")]
    pub cdp_create_time: Option<NaiveDateTime>,
    #[serde(default, with = "link_time")]
    pub cdp_last_poll_time: Option<NaiveDateTime>,
}

/// IS-IS identity of the node itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IsisElement {
    #[serde(default, rename = "isisSysID")]
    pub isis_sys_id: Option<String>,
    #[serde(default, rename = "isisSysAdminState")]
    pub isis_sys_admin_state: Option<String>,
    #[serde(default, rename = "isisCreateTime", with = "link_time")]
    pub isis_create_time: Option<NaiveDateTime>,
    #[serde(default, rename = "isisLastPollTime", with = "link_time")]
    pub isis_last_poll_time: Option<NaiveDateTime>,
}

/// LLDP identity of the node itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LldpElement {
    #[serde(default)]
    pub lldp_chassis_id: Option<String>,
    #[serde(default)]
    pub lldp_sys_name: Option<String>,
    #[serde(default, with = "link_time")]
    pub lldp_create_time: Option<NaiveDateTime>,
    #[serde(default, with = "link_time")]
    pub lldp_last_poll_time: Option<NaiveDateTime>,
}

/// OSPF identity of the node itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OspfElement {
    #[serde(default)]
    pub ospf_router_id: Option<String>,
    #[serde(default)]
    pub ospf_version_number: Option<i32>,
    #[serde(default)]
    pub ospf_admin_stat: Option<String>,
    #[serde(default, with = "link_time")]
    pub ospf_create_time: Option<NaiveDateTime>,
    #[serde(default, with = "link_time")]
    pub ospf_last_poll_time: Option<NaiveDateTime>,
}

/// Everything enlinkd knows about one node's links.
///
/// The link collections arrive as lists; the per-protocol element keys hold
/// a single object, expanded to a vec here so callers iterate uniformly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default, rename = "bridgeLinkNodes")]
    pub bridge_links: Vec<BridgeLink>,
    #[serde(default, rename = "cdpLinkNodes")]
    pub cdp_links: Vec<CdpLink>,
    #[serde(default, rename = "isisLinkNodes")]
    pub isis_links: Vec<IsIsLink>,
    #[serde(default, rename = "lldpLinkNodes")]
    pub lldp_links: Vec<LldpLink>,
    #[serde(default, rename = "ospfLinkNodes")]
    pub ospf_links: Vec<OspfLink>,
    #[serde(default, rename = "bridgeElementNodes")]
    pub bridge_elements: Vec<BridgeElement>,
    #[serde(
        default,
        rename = "cdpElementNode",
        deserialize_with = "vec_or_one"
    )]
    pub cdp_elements: Vec<CdpElement>,
    #[serde(
        default,
        rename = "isisElementNode",
        deserialize_with = "vec_or_one"
    )]
    pub isis_elements: Vec<IsisElement>,
    #[serde(
        default,
        rename = "lldpElementNode",
        deserialize_with = "vec_or_one"
    )]
    pub lldp_elements: Vec<LldpElement>,
    #[serde(
        default,
        rename = "ospfElementNode",
        deserialize_with = "vec_or_one"
    )]
    pub ospf_elements: Vec<OspfElement>,
}

impl Topology {
    /// `true` when no protocol reported anything for the node.
    pub fn is_empty(&self) -> bool {
        self.bridge_links.is_empty()
            && self.cdp_links.is_empty()
            && self.isis_links.is_empty()
            && self.lldp_links.is_empty()
            && self.ospf_links.is_empty()
            && self.bridge_elements.is_empty()
            && self.cdp_elements.is_empty()
            && self.isis_elements.is_empty()
            && self.lldp_elements.is_empty()
            && self.ospf_elements.is_empty()
    }
}
