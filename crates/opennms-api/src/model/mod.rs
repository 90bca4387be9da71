//! Typed records for the OpenNMS REST resources.
//!
//! Every server field the client understands is an explicit struct field;
//! the large record types carry a `#[serde(flatten)] extra` map so fields
//! this client does not model yet survive a round trip instead of being
//! attached dynamically. Epoch-millisecond timestamps deserialize into
//! `chrono::DateTime<Utc>`.

pub mod alarm;
pub mod business_service;
pub mod event;
pub mod foreign_source;
pub mod health;
pub mod info;
pub mod link;
pub mod node;
pub mod requisition;
pub mod topology;

pub use alarm::Alarm;
pub use business_service::{BusinessService, BusinessServiceRequest, MapFunction, ReduceFunction};
pub use event::{Event, EventParameter, EventSubmission, Severity};
pub use foreign_source::{Detector, ForeignSource, Policy};
pub use health::Health;
pub use info::Info;
pub use link::UserDefinedLink;
pub use node::{
    AssetRecord, IpInterface, Metadata, MonitoredService, Node, PrimaryType, ServiceType,
    SnmpInterface,
};
pub use requisition::{Requisition, RequisitionInterface, RequisitionNode};
pub use topology::Topology;

/// The legacy format collapses single-element lists into a bare object.
/// Fields with that ambiguity deserialize through here; `null`/missing
/// become an empty vec.
pub(crate) fn vec_or_one<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
    })
}

/// Epoch-millisecond timestamps on v1 resources arrive as numbers from
/// JSON and as digit strings from XML-derived payloads. Serializes back to
/// a plain millisecond number.
pub(crate) mod ts_millis_flex {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Str(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<Raw>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let millis = match raw {
            Raw::Num(n) => n,
            Raw::Str(s) => s.parse().map_err(serde::de::Error::custom)?,
        };
        Ok(Utc.timestamp_millis_opt(millis).single())
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            None => serializer.serialize_none(),
            Some(dt) => serializer.serialize_i64(dt.timestamp_millis()),
        }
    }
}

/// Small integers that may arrive as digit strings from XML payloads.
pub(crate) fn flex_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i32),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Identifiers arrive as JSON numbers on some endpoints and as quoted
/// strings on others (a leftover of the XML heritage). These helpers accept
/// both.
pub(crate) mod flex_id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Str(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(n),
            Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }

    pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Num(n)) => Ok(Some(n)),
            Some(Raw::Str(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}
