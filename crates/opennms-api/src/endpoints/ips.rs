// IP interface search -- `/api/v2/ipinterfaces`.
//
// A thin FIQL composer over the batch fetcher. Multiple filters AND
// together, matching the server's `_s` semantics.

use std::str::FromStr;
use std::sync::Arc;

use crate::endpoints::decode;
use crate::error::Error;
use crate::model::{IpInterface, PrimaryType};
use crate::paging::{BatchQuery, Progress};
use crate::rest::RestClient;

/// Search filters for IP interfaces. Filters combine as a logical AND.
#[derive(Debug, Clone, Default)]
pub struct IpQuery {
    pub ip: Option<String>,
    pub node_id: Option<i64>,
    pub node_label: Option<String>,
    pub primary: Option<PrimaryType>,
    /// Cap on returned interfaces; `0` fetches everything.
    pub limit: u32,
    /// Page size per HTTP call.
    pub batch_size: u32,
    pub progress: Option<Progress>,
}

impl IpQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_node_id(mut self, node_id: i64) -> Self {
        self.node_id = Some(node_id);
        self
    }

    pub fn with_node_label(mut self, node_label: impl Into<String>) -> Self {
        self.node_label = Some(node_label.into());
        self
    }

    pub fn with_primary(mut self, primary: PrimaryType) -> Self {
        self.primary = Some(primary);
        self
    }

    /// Set the SNMP-primary filter from its wire form (`P`, `S`, or `N`).
    /// Anything else fails locally, before a request is made.
    pub fn with_primary_str(mut self, primary: &str) -> Result<Self, Error> {
        let parsed = PrimaryType::from_str(primary).map_err(|_| Error::InvalidValue {
            name: "primary",
            value: primary.to_owned(),
            valid: PrimaryType::wire_values(),
        })?;
        self.primary = Some(parsed);
        Ok(self)
    }

    fn fiql(&self) -> Option<String> {
        let mut search = Vec::new();
        if let Some(ip) = &self.ip {
            search.push(format!("ipAddress=={ip}"));
        }
        if let Some(node_id) = self.node_id {
            search.push(format!("node.id=={node_id}"));
        }
        if let Some(node_label) = &self.node_label {
            search.push(format!("node.label=={node_label}"));
        }
        if let Some(primary) = self.primary {
            search.push(format!("snmpPrimary=={primary}"));
        }
        if search.is_empty() {
            None
        } else {
            Some(search.join(";"))
        }
    }

    fn batch(&self) -> BatchQuery {
        let mut batch = BatchQuery::all().with_limit(self.limit);
        if self.batch_size != 0 {
            batch = batch.with_batch_size(self.batch_size);
        }
        if let Some(fiql) = self.fiql() {
            batch = batch.with_param("_s", fiql);
        }
        batch.progress = self.progress.clone();
        batch
    }
}

/// IP interface API facade.
pub struct IpApi {
    rest: Arc<RestClient>,
}

impl IpApi {
    pub fn new(rest: Arc<RestClient>) -> Self {
        Self { rest }
    }

    /// Search IP interfaces.
    ///
    /// `GET /api/v2/ipinterfaces`
    pub async fn list(&self, query: &IpQuery) -> Result<Vec<IpInterface>, Error> {
        let url = self.rest.v2_url("ipinterfaces")?;
        let records = self
            .rest
            .get_batch(url, "ipInterface", &query.batch())
            .await?;
        records.into_iter().map(decode).collect()
    }
}
