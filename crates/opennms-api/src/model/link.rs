// User-defined link records -- from `GET /api/v2/userdefinedlinks`.

use serde::{Deserialize, Serialize};

/// Operator-declared topology link between two nodes.
///
/// Wire keys are hyphenated; payloads deserialize post-normalization and
/// serialize back to the wire shape for create calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDefinedLink {
    #[serde(rename(serialize = "node-id-a", deserialize = "node_id_a"))]
    pub node_id_a: i64,
    #[serde(rename(serialize = "node-id-z", deserialize = "node_id_z"))]
    pub node_id_z: i64,
    #[serde(rename(serialize = "component-label-a", deserialize = "component_label_a"))]
    pub component_label_a: String,
    #[serde(rename(serialize = "component-label-z", deserialize = "component_label_z"))]
    pub component_label_z: String,
    #[serde(default, rename(serialize = "link-id", deserialize = "link_id"))]
    pub link_id: Option<String>,
    #[serde(default, rename(serialize = "db-id", deserialize = "db_id"))]
    pub db_id: Option<i64>,
    #[serde(default)]
    pub owner: Option<String>,
}

impl UserDefinedLink {
    /// Create a link between two node endpoints. The link id defaults to
    /// `n{a}:{labelA}->n{z}:{labelZ}`.
    pub fn new(
        node_id_a: i64,
        component_label_a: impl Into<String>,
        node_id_z: i64,
        component_label_z: impl Into<String>,
    ) -> Self {
        let component_label_a = component_label_a.into();
        let component_label_z = component_label_z.into();
        let link_id =
            format!("n{node_id_a}:{component_label_a}->n{node_id_z}:{component_label_z}");
        Self {
            node_id_a,
            node_id_z,
            component_label_a,
            component_label_z,
            link_id: Some(link_id),
            db_id: None,
            owner: None,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }
}
