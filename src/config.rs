//! Tap configuration
//!
//! Read once at run start from a JSON or YAML file and/or inline JSON. Every
//! field has a default, so an empty document is a valid configuration.

use crate::engine::{RelationshipMode, SyncConfig};
use crate::error::{Error, Result, ResultExt};
use crate::filter::{FilterConfig, StreamFilter};
use crate::http::HttpClientConfig;
use crate::report::{ReportConfig, DEFAULT_VIOLATION_REPORT_CAP};
use crate::stream::EntityKind;
use crate::validation::{RecordValidator, Rule};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Default API root
pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete tap configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TapConfig {
    /// Base URL of the API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Drop invalid records instead of flagging them
    #[serde(default)]
    pub strict: bool,

    /// Maximum violation entries kept in the report
    #[serde(default = "default_violation_report_cap")]
    pub violation_report_cap: usize,

    /// Record filter
    #[serde(default)]
    pub filter: FilterConfig,

    /// Where known post IDs come from when checking comments
    #[serde(default)]
    pub relationship_check: RelationshipMode,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Per-kind rule set overrides (replace the defaults for that kind)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<EntityKind, Vec<Rule>>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_violation_report_cap() -> usize {
    DEFAULT_VIOLATION_REPORT_CAP
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            strict: false,
            violation_report_cap: default_violation_report_cap(),
            filter: FilterConfig::default(),
            relationship_check: RelationshipMode::default(),
            http: HttpConfig::default(),
            rules: BTreeMap::new(),
        }
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Records per page; unset fetches each collection in one request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// User agent override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            page_size: None,
            user_agent: None,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl TapConfig {
    /// Parse a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a config file; `.yaml`/`.yml` are YAML, anything else JSON
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
        .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Load from an optional file and optional inline JSON, then validate
    ///
    /// Inline JSON takes precedence over the file. Neither means defaults.
    pub fn load(file: Option<&Path>, inline_json: Option<&str>) -> Result<Self> {
        let config = match (inline_json, file) {
            (Some(json), _) => Self::from_json_str(json).context("Invalid --config-json")?,
            (None, Some(path)) => Self::from_file(path)?,
            (None, None) => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "api_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if self.http.timeout_seconds == 0 {
            return Err(Error::invalid_value(
                "http.timeout_seconds",
                "must be positive",
            ));
        }
        if self.http.page_size == Some(0) {
            return Err(Error::invalid_value("http.page_size", "must be positive"));
        }
        Ok(())
    }

    // ========================================================================
    // Derived component configuration
    // ========================================================================

    /// Reporter configuration
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig::new()
            .with_strict(self.strict)
            .with_cap(self.violation_report_cap)
    }

    /// Engine configuration
    pub fn sync_config(&self, max_records: usize) -> SyncConfig {
        SyncConfig::new()
            .with_report(self.report_config())
            .with_relationship_mode(self.relationship_check)
            .with_max_records(max_records)
    }

    /// Validator with any rule overrides applied
    pub fn validator(&self) -> RecordValidator {
        RecordValidator::new().with_overrides(&self.rules)
    }

    /// Stream filter
    pub fn stream_filter(&self) -> StreamFilter {
        StreamFilter::from_config(&self.filter)
    }

    /// HTTP client configuration
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.api_url)
            .timeout(Duration::from_secs(self.http.timeout_seconds));
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }

    /// JSON schema of the configuration, printed by `spec`
    pub fn spec_json() -> Value {
        let rule = json!({
            "type": "object",
            "required": ["rule", "field"],
            "properties": {
                "rule": {
                    "type": "string",
                    "enum": [
                        "positive_integer", "email_format", "min_length",
                        "not_all_uppercase", "non_empty_mapping", "references_post"
                    ]
                },
                "field": {"type": "string"},
                "min": {"type": "integer", "minimum": 0}
            },
            "allOf": [{
                "if": {"properties": {"rule": {"const": "min_length"}}},
                "then": {"required": ["min"]}
            }]
        });

        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "tap-jsonplaceholder configuration",
            "type": "object",
            "properties": {
                "api_url": {"type": "string", "format": "uri", "default": DEFAULT_API_URL},
                "strict": {"type": "boolean", "default": false},
                "violation_report_cap": {
                    "type": "integer",
                    "minimum": 0,
                    "default": DEFAULT_VIOLATION_REPORT_CAP
                },
                "filter": {
                    "type": "object",
                    "properties": {
                        "post_id_parity": {"type": "string", "enum": ["even", "odd", "any"], "default": "even"}
                    }
                },
                "relationship_check": {
                    "type": "string",
                    "enum": ["prefetch", "in_run"],
                    "default": "prefetch"
                },
                "http": {
                    "type": "object",
                    "properties": {
                        "timeout_seconds": {"type": "integer", "minimum": 1, "default": 30},
                        "page_size": {"type": "integer", "minimum": 1},
                        "user_agent": {"type": "string"}
                    }
                },
                "rules": {
                    "type": "object",
                    "properties": {
                        "user": {"type": "array", "items": rule.clone()},
                        "post": {"type": "array", "items": rule.clone()},
                        "comment": {"type": "array", "items": rule}
                    }
                }
            }
        })
    }
}
