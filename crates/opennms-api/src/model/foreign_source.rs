// Foreign-source definition models -- from `GET /rest/foreignSources`.
//
// Same v1 wire discipline as requisitions: normalize first, deserialize
// from underscore keys, serialize back to the hyphenated wire shape. The
// one oddity is `class`, which the server uses for the detector/policy
// implementation class; it maps to `class_type` here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::vec_or_one;

/// Key/value parameter of a detector or policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub key: String,
    pub value: String,
}

impl Parameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Service detector definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detector {
    pub name: String,
    #[serde(rename(serialize = "class", deserialize = "class_type"), alias = "class")]
    pub class_type: String,
    #[serde(default, deserialize_with = "vec_or_one")]
    pub parameter: Vec<Parameter>,
}

impl Detector {
    pub fn new(name: impl Into<String>, class_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_type: class_type.into(),
            parameter: Vec::new(),
        }
    }
}

/// Provisioning policy definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub name: String,
    #[serde(rename(serialize = "class", deserialize = "class_type"), alias = "class")]
    pub class_type: String,
    #[serde(default, deserialize_with = "vec_or_one")]
    pub parameter: Vec<Parameter>,
}

impl Policy {
    pub fn new(name: impl Into<String>, class_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_type: class_type.into(),
            parameter: Vec::new(),
        }
    }
}

/// A foreign-source definition: the detectors and policies applied when a
/// requisition with the same name is imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignSource {
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::ts_millis_flex",
        rename(serialize = "date-stamp", deserialize = "date_stamp")
    )]
    pub date_stamp: Option<DateTime<Utc>>,
    #[serde(
        default = "default_scan_interval",
        rename(serialize = "scan-interval", deserialize = "scan_interval")
    )]
    pub scan_interval: String,
    #[serde(default, deserialize_with = "vec_or_one")]
    pub detectors: Vec<Detector>,
    #[serde(default, deserialize_with = "vec_or_one")]
    pub policies: Vec<Policy>,
}

fn default_scan_interval() -> String {
    "1d".to_owned()
}

impl ForeignSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date_stamp: None,
            scan_interval: default_scan_interval(),
            detectors: Vec::new(),
            policies: Vec::new(),
        }
    }

    pub fn detector(&self, name: &str) -> Option<&Detector> {
        self.detectors.iter().find(|d| d.name == name)
    }

    /// Add or replace a detector by name.
    pub fn set_detector(&mut self, detector: Detector) {
        self.detectors.retain(|d| d.name != detector.name);
        self.detectors.push(detector);
    }

    pub fn remove_detector(&mut self, name: &str) {
        self.detectors.retain(|d| d.name != name);
    }

    pub fn policy(&self, name: &str) -> Option<&Policy> {
        self.policies.iter().find(|p| p.name == name)
    }

    /// Add or replace a policy by name.
    pub fn set_policy(&mut self, policy: Policy) {
        self.policies.retain(|p| p.name != policy.name);
        self.policies.push(policy);
    }

    pub fn remove_policy(&mut self, name: &str) {
        self.policies.retain(|p| p.name != name);
    }
}
