// Health endpoints -- `/rest/health`.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::endpoints::decode;
use crate::error::Error;
use crate::model::Health;
use crate::rest::RestClient;

/// Health API facade.
pub struct HealthApi {
    rest: Arc<RestClient>,
}

impl HealthApi {
    pub fn new(rest: Arc<RestClient>) -> Self {
        Self { rest }
    }

    /// Aggregate health of the server instance.
    ///
    /// `GET /rest/health`
    pub async fn get_health(&self) -> Result<Option<Health>, Error> {
        let url = self.rest.v1_url("health")?;
        let Some(record) = self.rest.get_json(url, &[]).await? else {
            return Ok(None);
        };
        let health: Health = decode(record)?;
        match health.healthy {
            Some(true) => debug!("connected to {}", self.rest.name()),
            Some(false) => warn!("{} is not healthy", self.rest.name()),
            None => warn!("{} health status unknown", self.rest.name()),
        }
        Ok(Some(health))
    }

    /// Lightweight liveness probe; the body is plain text.
    ///
    /// `GET /rest/health/probe`
    pub async fn probe(&self) -> Result<Option<String>, Error> {
        let url = self.rest.v1_url("health/probe")?;
        self.rest.get_text(url).await
    }
}
