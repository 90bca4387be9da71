// User-defined link endpoints -- `/api/v2/userdefinedlinks`.

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::debug;

use crate::endpoints::decode;
use crate::error::Error;
use crate::model::UserDefinedLink;
use crate::normalize::normalize_value;
use crate::paging::{BatchQuery, Progress};
use crate::rest::RestClient;

/// Paging options for the link list.
#[derive(Debug, Clone, Default)]
pub struct LinkQuery {
    /// Cap on returned links; `0` fetches everything.
    pub limit: u32,
    /// Page size per HTTP call.
    pub batch_size: u32,
    pub progress: Option<Progress>,
}

impl LinkQuery {
    pub fn all() -> Self {
        Self::default()
    }

    fn batch(&self) -> BatchQuery {
        let mut batch = BatchQuery::all().with_limit(self.limit);
        if self.batch_size != 0 {
            batch = batch.with_batch_size(self.batch_size);
        }
        batch.progress = self.progress.clone();
        batch
    }
}

/// User-defined links API facade.
pub struct LinkApi {
    rest: Arc<RestClient>,
}

impl LinkApi {
    pub fn new(rest: Arc<RestClient>) -> Self {
        Self { rest }
    }

    /// One link by database id.
    ///
    /// `GET /api/v2/userdefinedlinks/{id}`
    pub async fn get(&self, id: i64) -> Result<Option<UserDefinedLink>, Error> {
        let url = self.rest.v2_url(&format!("userdefinedlinks/{id}"))?;
        match self.rest.get_json(url, &[]).await? {
            None => Ok(None),
            Some(record) => decode(normalize_value(record)).map(Some),
        }
    }

    /// All user-defined links.
    ///
    /// `GET /api/v2/userdefinedlinks`
    pub async fn list(&self, query: &LinkQuery) -> Result<Vec<UserDefinedLink>, Error> {
        let url = self.rest.v2_url("userdefinedlinks")?;
        let records = self
            .rest
            .get_batch(url, "user_defined_link", &query.batch())
            .await?;
        records
            .into_iter()
            .map(|r| decode(normalize_value(r)))
            .collect()
    }

    /// Create a link. Returns `true` when the server created it (201).
    ///
    /// `POST /api/v2/userdefinedlinks`
    pub async fn create(&self, link: &UserDefinedLink) -> Result<bool, Error> {
        debug!(link_id = ?link.link_id, "creating user-defined link");
        let url = self.rest.v2_url("userdefinedlinks")?;
        let reply = self.rest.post_json(url, link).await?;
        Ok(reply.status == StatusCode::CREATED)
    }

    /// Delete a link by database id.
    ///
    /// `DELETE /api/v2/userdefinedlinks/{id}`
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting user-defined link");
        let url = self.rest.v2_url(&format!("userdefinedlinks/{id}"))?;
        self.rest.delete(url).await
    }
}
