// Client configuration.
//
// One immutable struct per client instance. Per-call options (batch sizes,
// filters, hydration selectors) live in their own structs next to the
// methods that take them.

use secrecy::SecretString;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Connection settings for one OpenNMS server instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root, e.g. `https://opennms.example.org:8980/opennms`.
    pub base_url: Url,
    pub username: String,
    pub password: SecretString,
    /// Display name used in progress output and logs. Defaults to the
    /// host portion of `base_url`.
    pub name: Option<String>,
    pub transport: TransportConfig,
}

impl ClientConfig {
    /// Create a config for the given server root and basic-auth credentials.
    ///
    /// A trailing slash on `base_url` is stripped so URL building stays
    /// uniform.
    pub fn new(
        base_url: &str,
        username: impl Into<String>,
        password: SecretString,
    ) -> Result<Self, Error> {
        let url = Url::parse(base_url.trim_end_matches('/'))?;
        Ok(Self {
            base_url: url,
            username: username.into(),
            password,
            name: None,
            transport: TransportConfig::default(),
        })
    }

    /// Override the instance display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override transport (TLS / timeout) settings.
    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    /// The effective instance name: the configured one, or the URL host.
    pub fn instance_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.base_url
                .host_str()
                .unwrap_or("opennms")
                .to_owned()
        })
    }
}
