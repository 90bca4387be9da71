// Top-level client: one authenticated connection, all endpoint facades.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::endpoints::{
    AlarmApi, BsmApi, EventApi, ForeignSourceApi, HealthApi, InfoApi, IpApi, LinkApi, NodeApi,
    RequisitionApi, TopologyApi,
};
use crate::error::Error;
use crate::model::{EventSubmission, Health, Info};
use crate::rest::RestClient;

/// Client for one OpenNMS server instance.
///
/// `connect` authenticates implicitly (basic auth rides on every request),
/// probes the server's health, and discovers its version and running
/// daemons. All facades share a single transport; credentials are read-only
/// after construction.
pub struct OpenNms {
    rest: Arc<RestClient>,
    /// Server version and daemon inventory, discovered at connect time.
    pub server_info: Info,
    /// Health snapshot taken at connect time, when the endpoint exists.
    pub health_status: Option<Health>,
    pub alarms: AlarmApi,
    pub events: EventApi,
    pub nodes: NodeApi,
    pub ips: IpApi,
    pub business_services: BsmApi,
    pub requisitions: RequisitionApi,
    pub foreign_sources: ForeignSourceApi,
    pub links: LinkApi,
    pub topology: TopologyApi,
    pub health: HealthApi,
    pub info: InfoApi,
}

impl OpenNms {
    /// Connect to a server and discover its capabilities.
    pub async fn connect(config: &ClientConfig) -> Result<Self, Error> {
        let rest = Arc::new(RestClient::new(config)?);

        let health = HealthApi::new(Arc::clone(&rest));
        let health_status = health.get_health().await?;

        let info = InfoApi::new(Arc::clone(&rest));
        let server_info = info.get_info().await?.unwrap_or_default();
        info!(
            instance = rest.name(),
            version = server_info.display_version.as_deref().unwrap_or("unknown"),
            "connected"
        );

        Ok(Self {
            alarms: AlarmApi::new(Arc::clone(&rest)),
            events: EventApi::new(Arc::clone(&rest)),
            nodes: NodeApi::new(Arc::clone(&rest)),
            ips: IpApi::new(Arc::clone(&rest)),
            business_services: BsmApi::new(Arc::clone(&rest)),
            requisitions: RequisitionApi::new(Arc::clone(&rest)),
            foreign_sources: ForeignSourceApi::new(Arc::clone(&rest)),
            links: LinkApi::new(Arc::clone(&rest)),
            topology: TopologyApi::new(Arc::clone(&rest)),
            health,
            info,
            server_info,
            health_status,
            rest,
        })
    }

    /// Instance display name.
    pub fn name(&self) -> &str {
        self.rest.name()
    }

    /// Send the event that reloads a daemon's configuration. The daemon
    /// name is validated against the inventory discovered at connect time
    /// before anything goes on the wire.
    pub async fn reload_daemon(&self, name: &str) -> Result<(), Error> {
        let enabled = self.server_info.enabled_services();
        if !enabled.contains(&name.to_lowercase()) {
            return Err(Error::InvalidValue {
                name: "daemon",
                value: name.to_owned(),
                valid: enabled,
            });
        }
        debug!(daemon = name, "requesting daemon reload");
        self.events
            .send(&EventSubmission::reload_daemon(name))
            .await?;
        Ok(())
    }
}
