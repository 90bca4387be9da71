// Server info endpoints -- `/rest/info`.

use std::sync::Arc;

use crate::endpoints::decode;
use crate::error::Error;
use crate::model::Info;
use crate::rest::RestClient;

/// Info API facade.
pub struct InfoApi {
    rest: Arc<RestClient>,
}

impl InfoApi {
    pub fn new(rest: Arc<RestClient>) -> Self {
        Self { rest }
    }

    /// Version and capability information for the server instance.
    ///
    /// `GET /rest/info`
    pub async fn get_info(&self) -> Result<Option<Info>, Error> {
        let url = self.rest.v1_url("info")?;
        match self.rest.get_json(url, &[]).await? {
            None => Ok(None),
            Some(record) => decode(record).map(Some),
        }
    }
}
