// Health records -- from `GET /rest/health`.

use serde::{Deserialize, Serialize};

/// One subsystem's health check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub description: String,
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthResponse {
    /// `true` when the check reported `Success`.
    pub fn success(&self) -> bool {
        self.status == "Success"
    }
}

/// Aggregate health of a server instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Health {
    #[serde(default)]
    pub healthy: Option<bool>,
    #[serde(default)]
    pub responses: Vec<HealthResponse>,
}

impl Health {
    /// The checks that did not report success.
    pub fn failing(&self) -> impl Iterator<Item = &HealthResponse> {
        self.responses.iter().filter(|r| !r.success())
    }
}
