// Paginated batch fetching.
//
// Every list endpoint on the v2 API answers a fixed-size page inside an
// envelope: `{ "count": n, "offset": o, "totalCount": N, "<key>": [...] }`.
// `get_batch` hides that from callers: it walks pages until the requested
// number of records (or the server's total) has been accumulated, advancing
// the offset record-by-record so a cap can cut a page short. Filter
// parameters are carried unchanged onto every sub-page request.
//
// A fetch is all-or-nothing: any transport or server error aborts the loop
// and the partial accumulation is dropped. An empty result set is an empty
// vec -- there is no sentinel element.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::rest::RestClient;

/// Page size requested per HTTP call unless the caller picks another.
pub const DEFAULT_BATCH_SIZE: u32 = 100;

/// Record-level progress of a batch fetch or hydration fan-out.
///
/// Cloneable handle over atomic counters: pass a clone into a query, poll
/// `done()`/`total()` from anywhere. `total` is 0 until the first page
/// reveals how many records the fetch will yield.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    done: Arc<AtomicU64>,
    total: Arc<AtomicU64>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records processed so far.
    pub fn done(&self) -> u64 {
        self.done.load(Ordering::Relaxed)
    }

    /// Expected record count, once known.
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub(crate) fn set_total(&self, total: u64) {
        self.total.store(total, Ordering::Relaxed);
    }

    pub(crate) fn tick(&self) {
        self.done.fetch_add(1, Ordering::Relaxed);
    }
}

/// Options for one batch fetch. Constructed fresh per call; the fetch loop
/// never mutates it.
#[derive(Debug, Clone)]
pub struct BatchQuery {
    /// Cap on the total records returned. `0` fetches everything.
    pub limit: u32,
    /// Page size requested per HTTP call.
    pub batch_size: u32,
    /// Extra query parameters (filters), preserved across every sub-page.
    pub params: Vec<(String, String)>,
    /// Optional progress handle, ticked once per record.
    pub progress: Option<Progress>,
}

impl Default for BatchQuery {
    fn default() -> Self {
        Self {
            limit: 0,
            batch_size: DEFAULT_BATCH_SIZE,
            params: Vec::new(),
            progress: None,
        }
    }
}

impl BatchQuery {
    /// Fetch everything, default page size.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn with_progress(mut self, progress: &Progress) -> Self {
        self.progress = Some(progress.clone());
        self
    }
}

/// `totalCount` arrives as a JSON number on v2 and as a string on payloads
/// that started life as XML.
fn count_of(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

/// The collection key maps to `null`, `[null]`, or `[]` when the server has
/// no matches; all three mean "legitimately empty".
fn page_records(envelope: &Value, endpoint_key: &str) -> Vec<Value> {
    match envelope.get(endpoint_key) {
        Some(Value::Array(items)) => items.iter().filter(|r| !r.is_null()).cloned().collect(),
        _ => Vec::new(),
    }
}

impl RestClient {
    /// Fetch up to `query.limit` raw records from a paged list endpoint
    /// (`0` = all), hiding the server's page size from the caller.
    pub(crate) async fn get_batch(
        &self,
        url: Url,
        endpoint_key: &str,
        query: &BatchQuery,
    ) -> Result<Vec<Value>, Error> {
        let batch_size = if query.batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            query.batch_size
        };
        // Page size is fixed for the whole fetch: the requested cap when it
        // fits inside one page, the batch size otherwise.
        let page_limit = if query.limit != 0 && query.limit < batch_size {
            query.limit
        } else {
            batch_size
        };

        let page_params = |offset: u64| -> Vec<(String, String)> {
            let mut params = query.params.clone();
            params.push(("offset".to_owned(), offset.to_string()));
            params.push(("limit".to_owned(), page_limit.to_string()));
            params
        };

        let mut offset: u64 = 0;
        let Some(envelope) = self.get_json(url.clone(), &page_params(offset)).await? else {
            return Ok(Vec::new());
        };

        let total = count_of(envelope.get("totalCount"));
        let mut page = page_records(&envelope, endpoint_key);
        if total == 0 || page.is_empty() {
            return Ok(Vec::new());
        }

        // Never chase the cap past what the server actually has.
        let target = if query.limit != 0 && u64::from(query.limit) < total {
            u64::from(query.limit)
        } else {
            total
        };
        if let Some(progress) = &query.progress {
            progress.set_total(target);
        }
        debug!(endpoint_key, total, target, "pulling {} records", self.name());

        let mut result = Vec::with_capacity(usize::try_from(target).unwrap_or(0));
        loop {
            for record in page {
                result.push(record);
                offset += 1;
                if let Some(progress) = &query.progress {
                    progress.tick();
                }
                if offset >= target {
                    // Cap reached mid-page: the rest of this page is dropped.
                    return Ok(result);
                }
            }
            let Some(envelope) = self.get_json(url.clone(), &page_params(offset)).await? else {
                break;
            };
            page = page_records(&envelope, endpoint_key);
            if page.is_empty() {
                // Server shrank under us; return what it still had.
                break;
            }
        }
        Ok(result)
    }
}
