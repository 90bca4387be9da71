// HTTP client for the OpenNMS REST surfaces.
//
// Wraps `reqwest::Client` with base-URL construction for the v1 (`/rest/`)
// and v2 (`/api/v2/`) APIs, basic-auth injection, and status mapping. All
// endpoint facades hold one shared `RestClient` -- transport mechanics live
// here, resource logic lives in `endpoints/`.

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::normalize::xml_to_value;

/// Marker the server embeds in the body of an item-level GET for a record
/// that does not exist. Mapped to `Ok(None)`, never to an error.
const NOT_FOUND_MARKER: &str = "was not found";

/// Marker for an unauthenticated request that got redirected to the web
/// login page instead of a clean 401.
const LOGIN_PAGE_MARKER: &str = "Sign in to your account";

/// Status and body of a mutating call, for callers that inspect the
/// response (created vs. accepted, duplicate-constraint text, ...).
#[derive(Debug)]
pub(crate) struct HttpReply {
    pub status: StatusCode,
    pub body: String,
}

/// Shared transport for one OpenNMS server instance.
pub struct RestClient {
    http: reqwest::Client,
    base_v1: Url,
    base_v2: Url,
    username: String,
    password: SecretString,
    name: String,
}

impl RestClient {
    /// Build a client from connection settings. No network traffic happens
    /// here; the first request authenticates implicitly via basic auth.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        let base = config.base_url.as_str().trim_end_matches('/');
        Ok(Self {
            http,
            base_v1: Url::parse(&format!("{base}/rest/"))?,
            base_v2: Url::parse(&format!("{base}/api/v2/"))?,
            username: config.username.clone(),
            password: config.password.clone(),
            name: config.instance_name(),
        })
    }

    /// Instance display name (for logs and progress output).
    pub fn name(&self) -> &str {
        &self.name
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// URL under the v1 API root: `{base}/rest/{path}`.
    pub fn v1_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_v1.join(path)?)
    }

    /// URL under the v2 API root: `{base}/api/v2/{path}`.
    pub fn v2_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_v2.join(path)?)
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET a payload and decode it.
    ///
    /// Returns `Ok(None)` for a missing record (the server answers with a
    /// textual "was not found" body rather than a JSON 404). Legacy
    /// endpoints that answer XML are parsed into the same `Value` shape the
    /// normalizer expects.
    pub(crate) async fn get_json(
        &self,
        url: Url,
        params: &[(String, String)],
    ) -> Result<Option<Value>, Error> {
        debug!("GET {url}");

        let mut request = self.request(Method::GET, url);
        if !params.is_empty() {
            request = request.query(params);
        }
        let resp = request.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        // The not-found marker can ride on a 200 or a textual 404; either
        // way it means "no such record", not a failure.
        if body.contains(NOT_FOUND_MARKER) {
            return Ok(None);
        }
        check_status(status, &body)?;

        if body.is_empty() {
            return Ok(None);
        }
        if body.contains(LOGIN_PAGE_MARKER) {
            return Err(Error::Authentication {
                message: "redirected to login page -- verify credentials".into(),
            });
        }
        if body.trim_start().starts_with('<') {
            return xml_to_value(&body).map(Some);
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })
    }

    /// GET a plain-text payload (health probe, requisition counts).
    pub(crate) async fn get_text(&self, url: Url) -> Result<Option<String>, Error> {
        debug!("GET {url}");

        let resp = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(Error::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        if body.contains(NOT_FOUND_MARKER) {
            return Ok(None);
        }
        check_status(status, &body)?;
        Ok(Some(body))
    }

    /// POST a JSON body, returning status and response text.
    pub(crate) async fn post_json(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<HttpReply, Error> {
        debug!("POST {url}");

        let resp = self
            .request(Method::POST, url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        reply(resp).await
    }

    /// PUT a JSON body, returning status and response text.
    pub(crate) async fn put_json(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<HttpReply, Error> {
        debug!("PUT {url}");

        let resp = self
            .request(Method::PUT, url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        reply(resp).await
    }

    /// PUT key/value parameters as both query string and form body.
    ///
    /// The alarm verb endpoints (`?ack=true` etc.) read the query string on
    /// some releases and the form body on others; sending both matches
    /// every server this client targets.
    pub(crate) async fn put_params(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<HttpReply, Error> {
        debug!("PUT {url} params={params:?}");

        let resp = self
            .request(Method::PUT, url)
            .query(params)
            .form(params)
            .send()
            .await
            .map_err(Error::Transport)?;
        reply(resp).await
    }

    /// DELETE a resource.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");

        let resp = self
            .request(Method::DELETE, url)
            .send()
            .await
            .map_err(Error::Transport)?;
        reply(resp).await.map(|_| ())
    }
}

async fn reply(resp: reqwest::Response) -> Result<HttpReply, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Transport)?;
    check_status(status, &body)?;
    Ok(HttpReply { status, body })
}

/// Map non-2xx statuses onto the error taxonomy: 401 is its own variant
/// and is never retried; everything else >= 400 carries the server text.
fn check_status(status: StatusCode, body: &str) -> Result<(), Error> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication {
            message: "verify login credentials are correct".into(),
        });
    }
    if status.as_u16() >= 400 {
        return Err(Error::Api {
            status: status.as_u16(),
            body: body.to_owned(),
        });
    }
    Ok(())
}
