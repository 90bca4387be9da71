// opennms-api: Async Rust client for the OpenNMS Horizon REST API (v1 + v2)

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod model;
pub mod normalize;
pub mod paging;
pub mod rest;
pub mod transport;

pub use client::OpenNms;
pub use config::ClientConfig;
pub use error::Error;
pub use paging::{BatchQuery, Progress};
pub use rest::RestClient;
pub use transport::{TlsMode, TransportConfig};
