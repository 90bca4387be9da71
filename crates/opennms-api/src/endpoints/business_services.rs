// Business-service endpoints -- `/api/v2/business-services`.
//
// The list endpoint only returns resource URLs, so assembling full records
// means one GET per service; `list` fans those out through a bounded,
// order-preserving worker pool. Fetched services are cached by id and name
// because the BSM topology is self-referential (child edges point at other
// services) and callers tend to resolve the same ids repeatedly.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use tokio::sync::RwLock;
use tracing::debug;

use crate::endpoints::decode;
use crate::error::Error;
use crate::model::business_service::BusinessServiceRequest;
use crate::model::BusinessService;
use crate::normalize::{normalize_value, one_or_many};
use crate::paging::Progress;
use crate::rest::RestClient;

/// Server response text that identifies a name-uniqueness violation.
const DUPLICATE_NAME_MARKER: &str = "constraint [bsm_service_name_key]";

const DEFAULT_WORKERS: usize = 10;

/// Business Service Monitoring API facade.
pub struct BsmApi {
    rest: Arc<RestClient>,
    cache: RwLock<HashMap<i64, BusinessService>>,
    cache_name: RwLock<HashMap<String, i64>>,
}

impl BsmApi {
    pub fn new(rest: Arc<RestClient>) -> Self {
        Self {
            rest,
            cache: RwLock::new(HashMap::new()),
            cache_name: RwLock::new(HashMap::new()),
        }
    }

    /// Get one business service by id.
    ///
    /// `GET /api/v2/business-services/{id}`
    pub async fn get(&self, id: i64) -> Result<Option<BusinessService>, Error> {
        let url = self.rest.v2_url(&format!("business-services/{id}"))?;
        let Some(record) = self.rest.get_json(url, &[]).await? else {
            return Ok(None);
        };
        let service: BusinessService = decode(normalize_value(record))?;
        self.remember(&service).await;
        Ok(Some(service))
    }

    /// The ids of every business service, in server order.
    async fn ids(&self) -> Result<Vec<i64>, Error> {
        let url = self.rest.v2_url("business-services")?;
        let Some(record) = self.rest.get_json(url, &[]).await? else {
            return Ok(Vec::new());
        };
        let urls = one_or_many(record.get("business-services").cloned().unwrap_or_default());
        Ok(urls
            .into_iter()
            .filter_map(|v| {
                v.as_str()
                    .and_then(|u| u.rsplit('/').next())
                    .and_then(|id| id.parse().ok())
            })
            .collect())
    }

    /// Get every business service, fetching full records through a bounded
    /// worker pool. Output order matches the server's id list.
    ///
    /// `GET /api/v2/business-services` plus one GET per service
    pub async fn list(&self, progress: Option<&Progress>) -> Result<Vec<BusinessService>, Error> {
        let ids = self.ids().await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let workers = DEFAULT_WORKERS.min(ids.len());
        if let Some(progress) = progress {
            progress.set_total(ids.len() as u64);
        }
        debug!(count = ids.len(), workers, "pulling business services");

        let services: Vec<Option<BusinessService>> = stream::iter(ids.into_iter().map(|id| {
            async move {
                let service = self.get(id).await?;
                if let Some(progress) = progress {
                    progress.tick();
                }
                Ok::<_, Error>(service)
            }
        }))
        .buffered(workers)
        .try_collect()
        .await?;

        Ok(services.into_iter().flatten().collect())
    }

    /// Find a business service by name. With `cache_only` the lookup never
    /// touches the network; otherwise a miss walks the full service list.
    pub async fn find_by_name(
        &self,
        name: &str,
        cache_only: bool,
    ) -> Result<Option<BusinessService>, Error> {
        let cached_id = self.cache_name.read().await.get(name).copied();
        if let Some(id) = cached_id {
            if let Some(service) = self.cache.read().await.get(&id) {
                return Ok(Some(service.clone()));
            }
        }
        if cache_only {
            return Ok(None);
        }
        for id in self.ids().await? {
            if let Some(service) = self.get(id).await? {
                if service.name == name {
                    return Ok(Some(service));
                }
            }
        }
        Ok(None)
    }

    /// Create a new business service. A name collision surfaces as
    /// [`Error::DuplicateEntity`], derived from the server's constraint
    /// violation text.
    ///
    /// `POST /api/v2/business-services`
    pub async fn create(&self, request: &BusinessServiceRequest) -> Result<(), Error> {
        let url = self.rest.v2_url("business-services")?;
        match self.rest.post_json(url, request).await {
            Ok(reply) if reply.body.contains(DUPLICATE_NAME_MARKER) => {
                Err(Error::DuplicateEntity {
                    name: request.name.clone(),
                    kind: "business service",
                })
            }
            Ok(_) => Ok(()),
            Err(Error::Api { body, .. }) if body.contains(DUPLICATE_NAME_MARKER) => {
                Err(Error::DuplicateEntity {
                    name: request.name.clone(),
                    kind: "business service",
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Overwrite an existing business service.
    ///
    /// `PUT /api/v2/business-services/{id}`
    pub async fn update(&self, id: i64, request: &BusinessServiceRequest) -> Result<(), Error> {
        let url = self.rest.v2_url(&format!("business-services/{id}"))?;
        self.rest.put_json(url, request).await?;
        self.cache.write().await.remove(&id);
        Ok(())
    }

    /// Delete a business service and drop it from the cache.
    ///
    /// `DELETE /api/v2/business-services/{id}`
    pub async fn delete(&self, service: &BusinessService) -> Result<(), Error> {
        let url = self.rest.v2_url(&format!("business-services/{}", service.id))?;
        self.rest.delete(url).await?;
        self.cache.write().await.remove(&service.id);
        self.cache_name.write().await.remove(&service.name);
        Ok(())
    }

    /// Trigger a reload of the `bsmd` daemon.
    ///
    /// `POST /api/v2/business-services/daemon/reload`
    pub async fn reload_daemon(&self) -> Result<(), Error> {
        let url = self.rest.v2_url("business-services/daemon/reload")?;
        self.rest.post_json(url, &serde_json::json!({})).await?;
        Ok(())
    }

    async fn remember(&self, service: &BusinessService) {
        self.cache
            .write()
            .await
            .insert(service.id, service.clone());
        self.cache_name
            .write()
            .await
            .insert(service.name.clone(), service.id);
    }
}
