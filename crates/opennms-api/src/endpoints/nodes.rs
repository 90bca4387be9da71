// Node endpoints -- `/api/v2/nodes` and its nested sub-resources.
//
// A node record from the list endpoint is flat; the interesting parts
// (SNMP interfaces, IP interfaces, their services, metadata) each live one
// HTTP call away. Hydration is opt-in per component because every nested
// collection costs a request per node. The dependency chain runs
// node -> ip-interface -> service: services hang off an IP address, so
// requesting services implies fetching the parent IP interfaces first.

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use crate::endpoints::decode;
use crate::error::Error;
use crate::model::{IpInterface, Metadata, MonitoredService, Node, SnmpInterface};
use crate::paging::{BatchQuery, Progress};
use crate::rest::RestClient;

/// Workers used for list hydration unless the caller picks another bound.
const DEFAULT_WORKERS: usize = 10;

/// Selects which nested collections to fetch when hydrating a node.
///
/// Defaults to nothing: a bare node record costs one request, every
/// component adds more. `services` implies the IP-interface fetch, since a
/// service is keyed by its parent interface's address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)] // a selector set, not state flags
pub struct Hydration {
    pub snmp_interfaces: bool,
    pub ip_interfaces: bool,
    pub services: bool,
    pub metadata: bool,
}

impl Hydration {
    /// Fetch no nested collections.
    pub fn none() -> Self {
        Self::default()
    }

    /// Fetch every known nested collection.
    pub fn all() -> Self {
        Self {
            snmp_interfaces: true,
            ip_interfaces: true,
            services: true,
            metadata: true,
        }
    }

    pub fn with_snmp_interfaces(mut self) -> Self {
        self.snmp_interfaces = true;
        self
    }

    pub fn with_ip_interfaces(mut self) -> Self {
        self.ip_interfaces = true;
        self
    }

    pub fn with_services(mut self) -> Self {
        self.services = true;
        self
    }

    pub fn with_metadata(mut self) -> Self {
        self.metadata = true;
        self
    }
}

/// Filters and hydration options for a node search.
#[derive(Debug, Clone)]
pub struct NodeQuery {
    /// FIQL search expression, passed as the `_s` parameter.
    pub fiql: Option<String>,
    /// Cap on returned nodes; `0` fetches everything.
    pub limit: u32,
    /// Page size per HTTP call.
    pub batch_size: u32,
    pub hydrate: Hydration,
    /// Upper bound on concurrent hydration workers; the effective pool is
    /// `min(concurrency, node_count)`.
    pub concurrency: usize,
    /// Ticked once per hydrated node.
    pub progress: Option<Progress>,
}

impl Default for NodeQuery {
    fn default() -> Self {
        Self {
            fiql: None,
            limit: 0,
            batch_size: 0,
            hydrate: Hydration::none(),
            concurrency: DEFAULT_WORKERS,
            progress: None,
        }
    }
}

impl NodeQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_fiql(mut self, fiql: impl Into<String>) -> Self {
        self.fiql = Some(fiql.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_hydration(mut self, hydrate: Hydration) -> Self {
        self.hydrate = hydrate;
        self
    }

    fn batch(&self) -> BatchQuery {
        let mut batch = BatchQuery::all().with_limit(self.limit);
        if self.batch_size != 0 {
            batch = batch.with_batch_size(self.batch_size);
        }
        if let Some(fiql) = &self.fiql {
            batch = batch.with_param("_s", fiql.clone());
        }
        batch
    }
}

/// Nodes API facade, including hydration of nested resources.
pub struct NodeApi {
    rest: Arc<RestClient>,
}

impl NodeApi {
    pub fn new(rest: Arc<RestClient>) -> Self {
        Self { rest }
    }

    /// Get one node by id, hydrating the requested components.
    ///
    /// `GET /api/v2/nodes/{id}`
    pub async fn get(&self, id: i64, hydrate: &Hydration) -> Result<Option<Node>, Error> {
        let url = self.rest.v2_url(&format!("nodes/{id}"))?;
        match self.rest.get_json(url, &[]).await? {
            None => Ok(None),
            Some(record) => self.hydrate(record, hydrate).await.map(Some),
        }
    }

    /// Get all matching nodes, hydrating each one through a bounded worker
    /// pool. Output order matches the server's list order regardless of
    /// which worker finishes first.
    ///
    /// `GET /api/v2/nodes`
    pub async fn list(&self, query: &NodeQuery) -> Result<Vec<Node>, Error> {
        let url = self.rest.v2_url("nodes")?;
        let records = self.rest.get_batch(url, "node", &query.batch()).await?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let workers = query.concurrency.max(1).min(records.len());
        if let Some(progress) = &query.progress {
            progress.set_total(records.len() as u64);
        }
        debug!(
            count = records.len(),
            workers,
            "hydrating {} nodes",
            self.rest.name()
        );

        // `buffered` runs up to `workers` hydrations concurrently but
        // yields results in submission order.
        stream::iter(records.into_iter().map(|record| {
            let progress = query.progress.clone();
            let hydrate = query.hydrate;
            async move {
                let node = self.hydrate(record, &hydrate).await?;
                if let Some(progress) = &progress {
                    progress.tick();
                }
                Ok::<_, Error>(node)
            }
        }))
        .buffered(workers)
        .try_collect()
        .await
    }

    /// SNMP interfaces of a node.
    ///
    /// `GET /api/v2/nodes/{id}/snmpinterfaces`
    pub async fn snmp_interfaces(&self, node_id: i64) -> Result<Vec<SnmpInterface>, Error> {
        let url = self.rest.v2_url(&format!("nodes/{node_id}/snmpinterfaces"))?;
        let records = self
            .rest
            .get_batch(url, "snmpInterface", &BatchQuery::all())
            .await?;
        records.into_iter().map(decode).collect()
    }

    /// IP interfaces of a node, optionally with each interface's monitored
    /// services attached.
    ///
    /// `GET /api/v2/nodes/{id}/ipinterfaces`
    pub async fn ip_interfaces(
        &self,
        node_id: i64,
        with_services: bool,
    ) -> Result<Vec<IpInterface>, Error> {
        let url = self.rest.v2_url(&format!("nodes/{node_id}/ipinterfaces"))?;
        let records = self
            .rest
            .get_batch(url, "ipInterface", &BatchQuery::all())
            .await?;
        let mut interfaces = Vec::with_capacity(records.len());
        for record in records {
            let mut interface: IpInterface = decode(record)?;
            if with_services {
                interface.services = self.services(node_id, &interface.ip_address).await?;
            }
            interfaces.push(interface);
        }
        Ok(interfaces)
    }

    /// Monitored services on one IP interface. The server occasionally
    /// repeats a service record across pages; repeats are discarded by
    /// record id.
    ///
    /// `GET /api/v2/nodes/{id}/ipinterfaces/{ip}/services`
    pub async fn services(
        &self,
        node_id: i64,
        ip_address: &str,
    ) -> Result<Vec<MonitoredService>, Error> {
        let url = self
            .rest
            .v2_url(&format!("nodes/{node_id}/ipinterfaces/{ip_address}/services"))?;
        let records = self
            .rest
            .get_batch(url, "service", &BatchQuery::all())
            .await?;
        let mut seen = HashSet::new();
        let mut services = Vec::new();
        for record in records {
            let service: MonitoredService = decode(record)?;
            if let Some(id) = service.id {
                if !seen.insert(id) {
                    continue;
                }
            }
            services.push(service);
        }
        Ok(services)
    }

    /// Metadata entries of a node.
    ///
    /// `GET /api/v2/nodes/{id}/metadata`
    pub async fn metadata(&self, node_id: i64) -> Result<Vec<Metadata>, Error> {
        let url = self.rest.v2_url(&format!("nodes/{node_id}/metadata"))?;
        let records = self
            .rest
            .get_batch(url, "metaData", &BatchQuery::all())
            .await?;
        records.into_iter().map(decode).collect()
    }

    /// Attach the requested components to a freshly decoded node record.
    /// Parents are fetched before children: services need the IP interface
    /// list even when it was not requested on its own.
    async fn hydrate(&self, record: serde_json::Value, hydrate: &Hydration) -> Result<Node, Error> {
        let mut node: Node = decode(record)?;
        if hydrate.snmp_interfaces {
            node.snmp_interfaces = self.snmp_interfaces(node.id).await?;
        }
        if hydrate.ip_interfaces || hydrate.services {
            node.ip_interfaces = self.ip_interfaces(node.id, hydrate.services).await?;
        }
        if hydrate.metadata {
            node.meta_data = self.metadata(node.id).await?;
        }
        Ok(node)
    }
}
