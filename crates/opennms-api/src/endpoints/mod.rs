//! Endpoint facades, one per REST resource family.
//!
//! Each facade holds a shared [`RestClient`](crate::rest::RestClient) by
//! composition and exposes the resource's verbs over typed models. URL
//! construction happens per call; nothing here keeps per-request state.

pub mod alarms;
pub mod business_services;
pub mod events;
pub mod foreign_sources;
pub mod health;
pub mod info;
pub mod ips;
pub mod links;
pub mod nodes;
pub mod requisitions;
pub mod topology;

pub use alarms::{AlarmApi, AlarmQuery};
pub use business_services::BsmApi;
pub use events::{EventApi, EventQuery};
pub use foreign_sources::ForeignSourceApi;
pub use health::HealthApi;
pub use info::InfoApi;
pub use ips::{IpApi, IpQuery};
pub use links::{LinkApi, LinkQuery};
pub use nodes::{Hydration, NodeApi, NodeQuery};
pub use requisitions::RequisitionApi;
pub use topology::TopologyApi;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;

/// Decode one raw record into a typed model, keeping the payload in the
/// error for debugging.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    let body = value.to_string();
    serde_json::from_value(value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}
