// Requisition endpoints -- `/rest/requisitions`.
//
// This is v1 territory: hyphenated keys, `model-import` envelopes, and
// plain-text count bodies. Everything read here goes through the
// normalizer before hitting the typed models; writes serialize back to the
// hyphenated wire shape.

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::debug;

use crate::endpoints::decode;
use crate::error::Error;
use crate::model::{Requisition, RequisitionNode};
use crate::normalize::{normalize_value, one_or_many, v1_envelope_to_v2};
use crate::rest::RestClient;

/// Requisitions API facade.
pub struct RequisitionApi {
    rest: Arc<RestClient>,
}

impl RequisitionApi {
    pub fn new(rest: Arc<RestClient>) -> Self {
        Self { rest }
    }

    /// Names of all requisitions.
    ///
    /// `GET /rest/requisitionNames`
    pub async fn names(&self) -> Result<Vec<String>, Error> {
        let url = self.rest.v1_url("requisitionNames")?;
        let Some(record) = self.rest.get_json(url, &[]).await? else {
            return Ok(Vec::new());
        };
        let record = normalize_value(record);
        Ok(
            one_or_many(record.get("foreign_source").cloned().unwrap_or_default())
                .into_iter()
                .filter_map(|v| v.as_str().map(ToOwned::to_owned))
                .collect(),
        )
    }

    /// The full contents of one requisition.
    ///
    /// `GET /rest/requisitions/{name}`
    pub async fn get(&self, name: &str) -> Result<Option<Requisition>, Error> {
        let url = self.rest.v1_url(&format!("requisitions/{name}"))?;
        let Some(record) = self.rest.get_json(url, &[]).await? else {
            return Ok(None);
        };
        // Old servers answer XML wrapped in a model-import envelope; the
        // envelope conversion is a no-op for the plain JSON form.
        let record = v1_envelope_to_v2("requisitions", &normalize_value(record));
        decode(record).map(Some)
    }

    /// The full contents of every requisition.
    ///
    /// `GET /rest/requisitions`
    pub async fn list(&self) -> Result<Vec<Requisition>, Error> {
        let url = self.rest.v1_url("requisitions")?;
        let Some(record) = self.rest.get_json(url, &[]).await? else {
            return Ok(Vec::new());
        };
        let record = v1_envelope_to_v2("requisitions", &normalize_value(record));
        let records = match record.get("requisitions") {
            Some(list) => one_or_many(list.clone()),
            None => one_or_many(record.get("model_import").cloned().unwrap_or_default()),
        };
        records
            .into_iter()
            .filter(|r| !r.is_null())
            .map(decode)
            .collect()
    }

    /// Number of requisitions pending import.
    ///
    /// `GET /rest/requisitions/count`
    pub async fn active_count(&self) -> Result<i64, Error> {
        self.count("requisitions/count").await
    }

    /// Number of requisitions already imported.
    ///
    /// `GET /rest/requisitions/deployed/count`
    pub async fn deployed_count(&self) -> Result<i64, Error> {
        self.count("requisitions/deployed/count").await
    }

    async fn count(&self, path: &str) -> Result<i64, Error> {
        let url = self.rest.v1_url(path)?;
        let body = self.rest.get_text(url).await?.unwrap_or_default();
        body.trim().parse().map_err(|_| Error::Deserialization {
            message: "expected an integer count".to_owned(),
            body,
        })
    }

    /// Trigger an import of an existing requisition. Returns `true` when
    /// the server accepted the request (202/204).
    ///
    /// `PUT /rest/requisitions/{name}/import`
    pub async fn import(&self, name: &str, rescan_existing: bool) -> Result<bool, Error> {
        debug!(name, rescan_existing, "importing requisition");
        let url = self.rest.v1_url(&format!("requisitions/{name}/import"))?;
        let reply = self
            .rest
            .put_params(url, &[("rescanExisting", rescan_existing.to_string())])
            .await?;
        Ok(matches!(
            reply.status,
            StatusCode::ACCEPTED | StatusCode::NO_CONTENT
        ))
    }

    /// Create or overwrite a whole requisition.
    ///
    /// `POST /rest/requisitions`
    pub async fn update(&self, requisition: &Requisition) -> Result<(), Error> {
        debug!(name = %requisition.foreign_source, "posting requisition");
        let url = self.rest.v1_url("requisitions")?;
        self.rest.post_json(url, requisition).await?;
        Ok(())
    }

    /// Create or overwrite a single node within a requisition.
    ///
    /// `POST /rest/requisitions/{name}/nodes`
    pub async fn update_node(
        &self,
        foreign_source: &str,
        node: &RequisitionNode,
    ) -> Result<(), Error> {
        debug!(
            foreign_source,
            foreign_id = %node.foreign_id,
            "posting requisition node"
        );
        let url = self
            .rest
            .v1_url(&format!("requisitions/{foreign_source}/nodes"))?;
        self.rest.post_json(url, node).await?;
        Ok(())
    }
}
