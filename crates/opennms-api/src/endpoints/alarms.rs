// Alarm endpoints -- `/api/v2/alarms`.
//
// Reads go through the batch fetcher; the ack/clear/escalate verbs are
// parameterized PUTs against a single alarm.

use std::sync::Arc;

use tracing::debug;

use crate::endpoints::decode;
use crate::error::Error;
use crate::model::Alarm;
use crate::paging::{BatchQuery, Progress};
use crate::rest::RestClient;

/// Filters for an alarm search.
#[derive(Debug, Clone, Default)]
pub struct AlarmQuery {
    /// FIQL search expression, passed as the `_s` parameter.
    pub fiql: Option<String>,
    /// Cap on returned alarms; `0` fetches everything.
    pub limit: u32,
    /// Page size per HTTP call.
    pub batch_size: u32,
    pub progress: Option<Progress>,
}

impl AlarmQuery {
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

/// Alarms API facade.
pub struct AlarmApi {
    rest: Arc<RestClient>,
}

impl AlarmApi {
    pub fn new(rest: Arc<RestClient>) -> Self {
        Self { rest }
    }

    /// Get one alarm by id.
    ///
    /// `GET /api/v2/alarms/{id}`
    pub async fn get(&self, id: i64) -> Result<Option<Alarm>, Error> {
        let url = self.rest.v2_url(&format!("alarms/{id}"))?;
        match self.rest.get_json(url, &[]).await? {
            None => Ok(None),
            Some(record) => decode(record).map(Some),
        }
    }

    /// Get all matching alarms.
    ///
    /// `GET /api/v2/alarms`
    pub async fn list(&self, query: &AlarmQuery) -> Result<Vec<Alarm>, Error> {
        let url = self.rest.v2_url("alarms")?;
        let records = self.rest.get_batch(url, "alarm", &query.batch()).await?;
        records.into_iter().map(decode).collect()
    }

    /// Acknowledge or un-acknowledge an alarm.
    ///
    /// `PUT /api/v2/alarms/{id}?ack={ack}`
    pub async fn ack(&self, id: i64, ack: bool) -> Result<(), Error> {
        debug!(id, ack, "acknowledging alarm");
        let url = self.rest.v2_url(&format!("alarms/{id}"))?;
        self.rest
            .put_params(url, &[("ack", ack.to_string())])
            .await?;
        Ok(())
    }

    /// Clear an alarm.
    ///
    /// `PUT /api/v2/alarms/{id}?clear=true`
    pub async fn clear(&self, id: i64) -> Result<(), Error> {
        debug!(id, "clearing alarm");
        let url = self.rest.v2_url(&format!("alarms/{id}"))?;
        self.rest
            .put_params(url, &[("clear", "true".to_owned())])
            .await?;
        Ok(())
    }

    /// Escalate an alarm's severity.
    ///
    /// `PUT /api/v2/alarms/{id}?escalate=true`
    pub async fn escalate(&self, id: i64) -> Result<(), Error> {
        debug!(id, "escalating alarm");
        let url = self.rest.v2_url(&format!("alarms/{id}"))?;
        self.rest
            .put_params(url, &[("escalate", "true".to_owned())])
            .await?;
        Ok(())
    }
}
