//! Configuration types for the HTTP tool DSL.
//!
//! A tool source is one base URL plus a set of named tools. Each tool maps to exactly one HTTP
//! request (method + path template) and declares where each of its arguments goes.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A set of HTTP tools sharing one base URL, auth, and default headers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpServerConfig {
    pub base_url: String,
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub defaults: EndpointDefaults,
    #[serde(default)]
    pub tools: BTreeMap<String, HttpToolConfig>,
}

/// Static credentials applied to every request of a tool source.
#[derive(Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthConfig {
    None,
    Bearer { token: String },
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDefaults {
    /// Headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Request timeout in seconds. `0` disables the timeout.
    #[serde(default)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpToolConfig {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub params: BTreeMap<String, HttpParamConfig>,
    #[serde(default)]
    pub response: HttpResponseConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpParamConfig {
    #[serde(rename = "in")]
    pub location: HttpParamLocation,
    /// HTTP-side name, when it differs from the tool argument name.
    #[serde(default)]
    pub name: Option<String>,
    /// Defaults to `true` for path params and `false` otherwise.
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub default: Option<Value>,
    /// JSON Schema for the argument. Defaults to `{"type": "string"}`.
    #[serde(default)]
    pub schema: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpParamLocation {
    Path,
    Query,
    Body,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpResponseConfig {
    #[serde(default)]
    pub mode: HttpResponseMode,
}

/// How a successful response body is turned into tool text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpResponseMode {
    /// Parse as JSON when possible and re-serialize compactly; otherwise pass through.
    #[default]
    Json,
    /// Pass the body through untouched.
    Text,
}
