// Topology endpoints -- `/api/v2/enlinkd`.

use std::sync::Arc;

use crate::endpoints::decode;
use crate::error::Error;
use crate::model::Topology;
use crate::rest::RestClient;

/// Enhanced link daemon (enlinkd) API facade.
pub struct TopologyApi {
    rest: Arc<RestClient>,
}

impl TopologyApi {
    pub fn new(rest: Arc<RestClient>) -> Self {
        Self { rest }
    }

    /// Every discovered link and protocol element for one node. `None`
    /// when the daemon has nothing for the node.
    ///
    /// `GET /api/v2/enlinkd/{nodeId}`
    pub async fn node_links(&self, node_id: i64) -> Result<Option<Topology>, Error> {
        let url = self.rest.v2_url(&format!("enlinkd/{node_id}"))?;
        let Some(record) = self.rest.get_json(url, &[]).await? else {
            return Ok(None);
        };
        let topology: Topology = decode(record)?;
        if topology.is_empty() {
            return Ok(None);
        }
        Ok(Some(topology))
    }
}
