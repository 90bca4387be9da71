// Foreign-source definition endpoints -- `/rest/foreignSources`.

use std::sync::Arc;

use tracing::debug;

use crate::endpoints::decode;
use crate::error::Error;
use crate::model::ForeignSource;
use crate::normalize::{normalize_value, one_or_many};
use crate::rest::RestClient;

/// Foreign sources API facade.
pub struct ForeignSourceApi {
    rest: Arc<RestClient>,
}

impl ForeignSourceApi {
    pub fn new(rest: Arc<RestClient>) -> Self {
        Self { rest }
    }

    /// One foreign-source definition by name.
    ///
    /// `GET /rest/foreignSources/{name}`
    pub async fn get(&self, name: &str) -> Result<Option<ForeignSource>, Error> {
        let url = self.rest.v1_url(&format!("foreignSources/{name}"))?;
        match self.rest.get_json(url, &[]).await? {
            None => Ok(None),
            Some(record) => decode(normalize_value(record)).map(Some),
        }
    }

    /// All foreign-source definitions.
    ///
    /// `GET /rest/foreignSources`
    pub async fn list(&self) -> Result<Vec<ForeignSource>, Error> {
        let url = self.rest.v1_url("foreignSources")?;
        let Some(record) = self.rest.get_json(url, &[]).await? else {
            return Ok(Vec::new());
        };
        let record = normalize_value(record);
        one_or_many(record.get("foreignSources").cloned().unwrap_or_default())
            .into_iter()
            .filter(|r| !r.is_null())
            .map(decode)
            .collect()
    }

    /// Create or overwrite a foreign-source definition.
    ///
    /// `POST /rest/foreignSources`
    pub async fn update(&self, foreign_source: &ForeignSource) -> Result<(), Error> {
        debug!(name = %foreign_source.name, "posting foreign source");
        let url = self.rest.v1_url("foreignSources")?;
        self.rest.post_json(url, foreign_source).await?;
        Ok(())
    }
}
