// Event endpoints -- `/api/v2/events`.

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::debug;

use crate::endpoints::decode;
use crate::error::Error;
use crate::model::{Event, EventSubmission};
use crate::paging::{BatchQuery, Progress};
use crate::rest::RestClient;

/// Filters for an event search.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    /// FIQL search expression, passed as the `_s` parameter.
    pub fiql: Option<String>,
    /// Cap on returned events; `0` fetches everything.
    pub limit: u32,
    /// Page size per HTTP call.
    pub batch_size: u32,
    pub progress: Option<Progress>,
}

impl EventQuery {
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

    fn batch(&self) -> BatchQuery {
        let mut batch = BatchQuery::all().with_limit(self.limit);
        if self.batch_size != 0 {
            batch = batch.with_batch_size(self.batch_size);
        }
        if let Some(fiql) = &self.fiql {
            batch = batch.with_param("_s", fiql.clone());
        }
        batch.progress = self.progress.clone();
        batch
    }
}

/// Events API facade.
pub struct EventApi {
    rest: Arc<RestClient>,
}

impl EventApi {
    pub fn new(rest: Arc<RestClient>) -> Self {
        Self { rest }
    }

    /// Get one event by id.
    ///
    /// `GET /api/v2/events/{id}`
    pub async fn get(&self, id: i64) -> Result<Option<Event>, Error> {
        let url = self.rest.v2_url(&format!("events/{id}"))?;
        match self.rest.get_json(url, &[]).await? {
            None => Ok(None),
            Some(record) => decode(record).map(Some),
        }
    }

    /// Get all matching events.
    ///
    /// `GET /api/v2/events`
    pub async fn list(&self, query: &EventQuery) -> Result<Vec<Event>, Error> {
        let url = self.rest.v2_url("events")?;
        let records = self.rest.get_batch(url, "event", &query.batch()).await?;
        records.into_iter().map(decode).collect()
    }

    /// Publish an event into the event bus. Returns `true` when the server
    /// accepted it (204).
    ///
    /// `POST /api/v2/events`
    pub async fn send(&self, event: &EventSubmission) -> Result<bool, Error> {
        debug!(uei = %event.uei, "sending event");
        let url = self.rest.v2_url("events")?;
        let reply = self.rest.post_json(url, event).await?;
        Ok(reply.status == StatusCode::NO_CONTENT)
    }
}
