// Business-service monitoring models -- from `GET /api/v2/business-services`.
//
// Reads go through the normalizer (the edge payloads are hyphenated), so
// deserialization uses underscore keys and serialization emits the wire
// shape. The request types are write-only payloads for create/update.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::model::event::Severity;

/// Friendly names are capped server-side.
const MAX_FRIENDLY_NAME: usize = 30;

/// Key/value attribute on a business service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// The wire nests attributes one level deep: `{"attribute": [...]}`.
mod attributes_wire {
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Attribute;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Wrapped { attribute: Vec<Attribute> },
        Bare(Vec<Attribute>),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Attribute>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(Raw::Wrapped { attribute }) => attribute,
            Some(Raw::Bare(attribute)) => attribute,
        })
    }

    pub fn serialize<S>(attributes: &[Attribute], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("attribute", attributes)?;
        map.end()
    }
}

/// How a child edge's severity maps onto the parent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum MapFunctionKind {
    #[default]
    Identity,
    Increase,
    Decrease,
    Ignore,
    SetTo,
}

/// Map function attached to an edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapFunction {
    #[serde(rename = "type")]
    pub kind: MapFunctionKind,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl MapFunction {
    pub fn identity() -> Self {
        Self::default()
    }

    /// `SetTo` requires a target status property.
    pub fn set_to(status: Severity) -> Self {
        let mut properties = Map::new();
        properties.insert("status".to_owned(), Value::String(status.title().to_owned()));
        Self {
            kind: MapFunctionKind::SetTo,
            properties,
        }
    }
}

/// How child severities reduce into the service's own status.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum ReduceFunctionKind {
    #[default]
    HighestSeverity,
    HighestSeverityAbove,
    Threshold,
    ExponentialPropagation,
}

/// Reduce function of a business service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReduceFunction {
    #[serde(rename = "type")]
    pub kind: ReduceFunctionKind,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl ReduceFunction {
    pub fn highest_severity() -> Self {
        Self::default()
    }

    pub fn highest_severity_above(severity: Severity) -> Self {
        let mut properties = Map::new();
        properties.insert(
            "threshold".to_owned(),
            Value::String(severity.title().to_owned()),
        );
        Self {
            kind: ReduceFunctionKind::HighestSeverityAbove,
            properties,
        }
    }

    /// `Threshold` takes a ratio in `(0, 1]`.
    pub fn threshold(threshold: f64) -> Result<Self, Error> {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(Error::InvalidValue {
                name: "threshold",
                value: threshold.to_string(),
                valid: vec!["a decimal between 0 and 1".to_owned()],
            });
        }
        let mut properties = Map::new();
        properties.insert("threshold".to_owned(), threshold.into());
        Ok(Self {
            kind: ReduceFunctionKind::Threshold,
            properties,
        })
    }

    pub fn exponential_propagation(base: f64) -> Self {
        let mut properties = Map::new();
        properties.insert("base".to_owned(), base.into());
        Self {
            kind: ReduceFunctionKind::ExponentialPropagation,
            properties,
        }
    }
}

/// The monitored service an IP-service edge points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpService {
    #[serde(default, deserialize_with = "crate::model::flex_id::deserialize_opt")]
    pub id: Option<i64>,
    #[serde(rename(serialize = "service-name", deserialize = "service_name"))]
    pub service_name: String,
    #[serde(rename(serialize = "node-label", deserialize = "node_label"))]
    pub node_label: String,
    #[serde(rename(serialize = "ip-address", deserialize = "ip_address"))]
    pub ip_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Edge onto a monitored IP service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpServiceEdge {
    pub id: i64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename(serialize = "operational-status", deserialize = "operational_status"))]
    pub operational_status: Severity,
    #[serde(
        default,
        rename(serialize = "friendly-name", deserialize = "friendly_name")
    )]
    pub friendly_name: Option<String>,
    #[serde(default = "default_weight")]
    pub weight: i32,
    #[serde(
        default,
        rename(serialize = "map-function", deserialize = "map_function")
    )]
    pub map_function: MapFunction,
    #[serde(
        default,
        rename(serialize = "reduction-keys", deserialize = "reduction_keys")
    )]
    pub reduction_keys: Vec<String>,
    #[serde(
        default,
        rename(serialize = "ip-service", deserialize = "ip_service")
    )]
    pub ip_service: Option<IpService>,
}

impl IpServiceEdge {
    /// Convert to the payload shape used on create/update.
    pub fn request(&self) -> Result<IpServiceEdgeRequest, Error> {
        let mut request = IpServiceEdgeRequest::new(
            self.friendly_name.clone().unwrap_or_default(),
            self.ip_service.as_ref().and_then(|s| s.id),
        )?;
        request.weight = self.weight;
        request.map_function = self.map_function.clone();
        Ok(request)
    }
}

/// Edge onto another business service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildEdge {
    pub id: i64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename(serialize = "operational-status", deserialize = "operational_status"))]
    pub operational_status: Severity,
    #[serde(default, rename(serialize = "child-id", deserialize = "child_id"))]
    pub child_id: Option<i64>,
    #[serde(default = "default_weight")]
    pub weight: i32,
    #[serde(
        default,
        rename(serialize = "map-function", deserialize = "map_function")
    )]
    pub map_function: MapFunction,
    #[serde(
        default,
        rename(serialize = "reduction-keys", deserialize = "reduction_keys")
    )]
    pub reduction_keys: Vec<String>,
}

impl ChildEdge {
    pub fn request(&self) -> ChildEdgeRequest {
        ChildEdgeRequest {
            child_id: self.child_id,
            weight: self.weight,
            map_function: self.map_function.clone(),
        }
    }
}

/// Application referenced by an application edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    #[serde(rename(serialize = "application-name", deserialize = "application_name"))]
    pub application_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Edge onto an application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationEdge {
    pub id: i64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename(serialize = "operational-status", deserialize = "operational_status"))]
    pub operational_status: Severity,
    #[serde(default = "default_weight")]
    pub weight: i32,
    #[serde(
        default,
        rename(serialize = "map-function", deserialize = "map_function")
    )]
    pub map_function: MapFunction,
    #[serde(
        default,
        rename(serialize = "reduction-keys", deserialize = "reduction_keys")
    )]
    pub reduction_keys: Vec<String>,
    #[serde(default)]
    pub application: Option<Application>,
}

impl ApplicationEdge {
    pub fn request(&self) -> Option<ApplicationEdgeRequest> {
        self.application.as_ref().map(|app| ApplicationEdgeRequest {
            application_id: app.id,
            weight: self.weight,
            map_function: self.map_function.clone(),
        })
    }
}

/// Edge onto a raw reduction key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReductionKeyEdge {
    pub id: i64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename(serialize = "operational-status", deserialize = "operational_status"))]
    pub operational_status: Severity,
    #[serde(
        default,
        rename(serialize = "friendly-name", deserialize = "friendly_name")
    )]
    pub friendly_name: Option<String>,
    #[serde(rename(serialize = "reduction-keys", deserialize = "reduction_keys"))]
    pub reduction_keys: Vec<String>,
    #[serde(default = "default_weight")]
    pub weight: i32,
    #[serde(
        default,
        rename(serialize = "map-function", deserialize = "map_function")
    )]
    pub map_function: MapFunction,
}

impl ReductionKeyEdge {
    pub fn request(&self) -> Option<ReductionKeyEdgeRequest> {
        let key = self.reduction_keys.first()?;
        Some(ReductionKeyEdgeRequest {
            reduction_key: key.clone(),
            weight: self.weight,
            map_function: self.map_function.clone(),
        })
    }
}

fn default_weight() -> i32 {
    1
}

// ── Request payloads ─────────────────────────────────────────────────

/// IP-service edge for create/update calls.
#[derive(Debug, Clone, Serialize)]
pub struct IpServiceEdgeRequest {
    #[serde(rename = "friendly-name")]
    pub friendly_name: String,
    #[serde(rename = "ip-service-id")]
    pub ip_service_id: Option<i64>,
    pub weight: i32,
    #[serde(rename = "map-function")]
    pub map_function: MapFunction,
}

impl IpServiceEdgeRequest {
    /// Validates the friendly-name length limit locally.
    pub fn new(friendly_name: impl Into<String>, ip_service_id: Option<i64>) -> Result<Self, Error> {
        let friendly_name = friendly_name.into();
        if friendly_name.len() > MAX_FRIENDLY_NAME {
            return Err(Error::InvalidValue {
                name: "friendly_name",
                value: friendly_name,
                valid: vec![format!("at most {MAX_FRIENDLY_NAME} characters")],
            });
        }
        Ok(Self {
            friendly_name,
            ip_service_id,
            weight: default_weight(),
            map_function: MapFunction::identity(),
        })
    }
}

/// Child edge for create/update calls.
#[derive(Debug, Clone, Serialize)]
pub struct ChildEdgeRequest {
    #[serde(rename = "child-id")]
    pub child_id: Option<i64>,
    pub weight: i32,
    #[serde(rename = "map-function")]
    pub map_function: MapFunction,
}

impl ChildEdgeRequest {
    pub fn new(child_id: i64) -> Self {
        Self {
            child_id: Some(child_id),
            weight: default_weight(),
            map_function: MapFunction::identity(),
        }
    }
}

/// Application edge for create/update calls.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationEdgeRequest {
    #[serde(rename = "application-id")]
    pub application_id: i64,
    pub weight: i32,
    #[serde(rename = "map-function")]
    pub map_function: MapFunction,
}

/// Reduction-key edge for create/update calls.
#[derive(Debug, Clone, Serialize)]
pub struct ReductionKeyEdgeRequest {
    #[serde(rename = "reduction-key")]
    pub reduction_key: String,
    pub weight: i32,
    #[serde(rename = "map-function")]
    pub map_function: MapFunction,
}

impl ReductionKeyEdgeRequest {
    pub fn new(reduction_key: impl Into<String>) -> Self {
        Self {
            reduction_key: reduction_key.into(),
            weight: default_weight(),
            map_function: MapFunction::identity(),
        }
    }
}

/// Create/update payload for a business service.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessServiceRequest {
    pub name: String,
    #[serde(with = "attributes_wire")]
    pub attributes: Vec<Attribute>,
    #[serde(rename = "reduce-function")]
    pub reduce_function: ReduceFunction,
    #[serde(rename = "ip-service-edges", skip_serializing_if = "Vec::is_empty")]
    pub ip_service_edges: Vec<IpServiceEdgeRequest>,
    #[serde(rename = "reduction-key-edges", skip_serializing_if = "Vec::is_empty")]
    pub reduction_key_edges: Vec<ReductionKeyEdgeRequest>,
    #[serde(rename = "child-edges", skip_serializing_if = "Vec::is_empty")]
    pub child_edges: Vec<ChildEdgeRequest>,
    #[serde(rename = "application-edges", skip_serializing_if = "Vec::is_empty")]
    pub application_edges: Vec<ApplicationEdgeRequest>,
    #[serde(rename = "parent-services", skip_serializing_if = "Vec::is_empty")]
    pub parent_services: Vec<String>,
}

impl BusinessServiceRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            reduce_function: ReduceFunction::highest_severity(),
            ip_service_edges: Vec::new(),
            reduction_key_edges: Vec::new(),
            child_edges: Vec::new(),
            application_edges: Vec::new(),
            parent_services: Vec::new(),
        }
    }

    /// Add or replace an attribute by key.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.attributes.retain(|a| a.key != key);
        self.attributes.push(Attribute {
            key,
            value: value.into(),
        });
    }

    /// Add an IP-service edge, replacing any existing edge onto the same
    /// monitored service.
    pub fn set_ip_service_edge(&mut self, edge: IpServiceEdgeRequest) {
        self.ip_service_edges
            .retain(|e| e.ip_service_id != edge.ip_service_id);
        self.ip_service_edges.push(edge);
    }

    /// Add a child edge, replacing any existing edge onto the same child.
    pub fn set_child_edge(&mut self, edge: ChildEdgeRequest) {
        self.child_edges.retain(|e| e.child_id != edge.child_id);
        self.child_edges.push(edge);
    }

    /// Add an application edge, replacing any existing edge onto the same
    /// application.
    pub fn set_application_edge(&mut self, edge: ApplicationEdgeRequest) {
        self.application_edges
            .retain(|e| e.application_id != edge.application_id);
        self.application_edges.push(edge);
    }

    /// Add a reduction-key edge, replacing any existing edge with the same
    /// key.
    pub fn set_reduction_key_edge(&mut self, edge: ReductionKeyEdgeRequest) {
        self.reduction_key_edges
            .retain(|e| e.reduction_key != edge.reduction_key);
        self.reduction_key_edges.push(edge);
    }
}

/// Business service record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessService {
    pub id: i64,
    #[serde(default)]
    pub location: Option<String>,
    pub name: String,
    #[serde(rename(serialize = "operational-status", deserialize = "operational_status"))]
    pub operational_status: Severity,
    #[serde(default, with = "attributes_wire")]
    pub attributes: Vec<Attribute>,
    #[serde(
        default,
        rename(serialize = "reduce-function", deserialize = "reduce_function")
    )]
    pub reduce_function: ReduceFunction,
    #[serde(
        default,
        rename(serialize = "ip-service-edges", deserialize = "ip_service_edges")
    )]
    pub ip_service_edges: Vec<IpServiceEdge>,
    #[serde(
        default,
        rename(serialize = "reduction-key-edges", deserialize = "reduction_key_edges")
    )]
    pub reduction_key_edges: Vec<ReductionKeyEdge>,
    #[serde(
        default,
        rename(serialize = "child-edges", deserialize = "child_edges")
    )]
    pub child_edges: Vec<ChildEdge>,
    #[serde(
        default,
        rename(serialize = "application-edges", deserialize = "application_edges")
    )]
    pub application_edges: Vec<ApplicationEdge>,
    #[serde(
        default,
        rename(serialize = "parent-services", deserialize = "parent_services")
    )]
    pub parent_services: Vec<Value>,
}

impl BusinessService {
    /// Convert into a create/update request carrying every edge across.
    pub fn request(&self) -> Result<BusinessServiceRequest, Error> {
        let mut request = BusinessServiceRequest::new(&self.name);
        request.attributes = self.attributes.clone();
        request.reduce_function = self.reduce_function.clone();
        for edge in &self.ip_service_edges {
            request.ip_service_edges.push(edge.request()?);
        }
        request.child_edges = self.child_edges.iter().map(ChildEdge::request).collect();
        request.application_edges = self
            .application_edges
            .iter()
            .filter_map(ApplicationEdge::request)
            .collect();
        request.reduction_key_edges = self
            .reduction_key_edges
            .iter()
            .filter_map(ReductionKeyEdge::request)
            .collect();
        Ok(request)
    }

    /// Merge a partial update onto this service's current state: scalar
    /// fields come from `update`, edge lists merge with `update` winning on
    /// conflicts. The result is ready for a PUT.
    pub fn merged_request(
        &self,
        update: &BusinessServiceRequest,
    ) -> Result<BusinessServiceRequest, Error> {
        let mut merged = self.request()?;
        merged.name = update.name.clone();
        merged.reduce_function = update.reduce_function.clone();
        merged.attributes = update.attributes.clone();
        for edge in &update.ip_service_edges {
            merged.set_ip_service_edge(edge.clone());
        }
        for edge in &update.child_edges {
            merged.set_child_edge(edge.clone());
        }
        for edge in &update.application_edges {
            merged.set_application_edge(edge.clone());
        }
        for edge in &update.reduction_key_edges {
            merged.set_reduction_key_edge(edge.clone());
        }
        for parent in &update.parent_services {
            merged.parent_services.push(parent.clone());
        }
        Ok(merged)
    }
}
