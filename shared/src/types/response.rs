//! API response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Health status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,

    /// Service name
    pub service: String,

    /// Server version
    pub version: String,

    /// Component-level details (e.g. keyring counts)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, serde_json::Value>,

    /// Server timestamp
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    /// Create a health response for the named service
    pub fn new(status: HealthStatus, service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status,
            service: service.into(),
            version: version.into(),
            details: HashMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Attach a component detail
    pub fn with_detail(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    /// Whether the service can serve traffic
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}
