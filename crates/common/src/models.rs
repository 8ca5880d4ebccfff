//! Common data models for the Athena control plane
//!
//! This module defines the model records tracked by the control plane and the
//! ephemeral values exchanged with the inference core.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of records returned by a listing
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Last-known status of a model in the inference core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    /// Model is not resident in the core
    NotLoaded,
    /// Model was loaded by the core
    Loaded,
    /// Model failed to load
    Failed,
}

impl ModelStatus {
    /// Returns the wire representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelStatus::NotLoaded => "not_loaded",
            ModelStatus::Loaded => "loaded",
            ModelStatus::Failed => "failed",
        }
    }
}

impl Default for ModelStatus {
    fn default() -> Self {
        ModelStatus::NotLoaded
    }
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "not_loaded" => Ok(ModelStatus::NotLoaded),
            "loaded" => Ok(ModelStatus::Loaded),
            "failed" => Ok(ModelStatus::Failed),
            other => Err(Error::InvalidArgument(format!("Unknown model status: {}", other))),
        }
    }
}

/// Identifies a model artifact by name and version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelRef {
    /// Model name
    pub name: String,
    /// Model version
    pub version: String,
}

impl ModelRef {
    /// Creates a model reference from trimmed parts, rejecting blank ones
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        let name = name.into().trim().to_string();
        let version = version.into().trim().to_string();

        if name.is_empty() {
            return Err(Error::InvalidArgument("model name must not be empty".to_string()));
        }
        if version.is_empty() {
            return Err(Error::InvalidArgument("model version must not be empty".to_string()));
        }

        Ok(Self { name, version })
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

/// A persisted (name, version) pair and its last-known status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Surrogate identifier assigned by the store
    pub id: i64,
    /// Model name
    pub name: String,
    /// Model version
    pub version: String,
    /// Last-known status
    pub status: ModelStatus,
    /// Creation timestamp, never changes
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

impl ModelRecord {
    /// Returns the (name, version) pair of this record
    pub fn model_ref(&self) -> ModelRef {
        ModelRef {
            name: self.name.clone(),
            version: self.version.clone(),
        }
    }
}

/// Result of a status query by model name
///
/// `Unknown` means the store has never seen the name. It is not the same as a
/// record whose status is `not_loaded`.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelLookup {
    /// A record exists for the name
    Found(ModelRecord),
    /// No record exists for the name
    Unknown(String),
}

impl ModelLookup {
    /// Returns the record if one was found
    pub fn record(&self) -> Option<&ModelRecord> {
        match self {
            ModelLookup::Found(record) => Some(record),
            ModelLookup::Unknown(_) => None,
        }
    }

    /// Returns true if a record was found
    pub fn is_found(&self) -> bool {
        matches!(self, ModelLookup::Found(_))
    }
}

/// Inference request forwarded to the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// Caller supplied request identifier
    pub request_id: String,
    /// Input vector
    pub inputs: Vec<f32>,
    /// Target model name, empty for the core's default
    #[serde(default)]
    pub model_name: String,
    /// Target model version, empty for the core's default
    #[serde(default)]
    pub model_version: String,
}

/// Inference result returned by the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Request identifier echoed by the core
    pub request_id: String,
    /// Output vector
    pub outputs: Vec<f32>,
    /// Wall-clock latency of the remote call in milliseconds
    pub latency_ms: f64,
    /// Status string reported by the core
    pub status: String,
}
