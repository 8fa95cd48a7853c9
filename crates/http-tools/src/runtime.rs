//! Runtime for executing declaratively configured HTTP tools.
//!
//! Every tool call becomes exactly one HTTP request: path placeholders are filled from the
//! arguments, query params are appended, body params are collected into a single JSON object.

use crate::config::{AuthConfig, HttpParamLocation, HttpResponseMode, HttpServerConfig};
use crate::redact::{redact_url, sanitize_reqwest_error, truncate_error_body};
use reqwest::{Client, Method};
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum HttpToolsError {
    #[error("config error: {0}")]
    Config(String),
    #[error("runtime error: {0}")]
    Runtime(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("http transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, HttpToolsError>;

impl From<reqwest::Error> for HttpToolsError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(sanitize_reqwest_error(&value))
    }
}

#[derive(Debug, Clone)]
struct GeneratedTool {
    name: String,
    title: Option<String>,
    description: Option<String>,
    method: Method,
    path: Vec<PathSegment>,
    parameters: Vec<ToolParameter>,
    input_schema: Value,
    response_mode: HttpResponseMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone)]
struct ToolParameter {
    tool_name: String,
    http_name: String,
    location: HttpParamLocation,
    required: bool,
    default: Option<Value>,
    schema: Value,
}

#[derive(Debug, Default)]
struct RequestParts {
    path: Vec<String>,
    query_params: Vec<(String, String)>,
    body_fields: Map<String, Value>,
}

#[derive(Clone)]
pub struct HttpToolSource {
    inner: Arc<HttpToolSourceInner>,
}

struct HttpToolSourceInner {
    name: String,
    config: HttpServerConfig,
    base_url: Url,
    tools: Vec<GeneratedTool>,
    client: Client,
    default_timeout: Option<Duration>,
}

impl HttpToolSource {
    /// Build a tool source from a static config.
    ///
    /// The resulting instance is immutable and safe to share across tasks.
    /// `default_timeout` applies when the config does not set `defaults.timeout`; `None` leaves
    /// the transport default in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid (e.g. invalid base URL, invalid HTTP
    /// method, a path placeholder without a matching path param, or duplicate parameter names).
    pub fn new(
        name: impl Into<String>,
        config: HttpServerConfig,
        default_timeout: Option<Duration>,
    ) -> Result<Self> {
        let name = name.into();
        let base_url = parse_base_url(&name, &config.base_url)?;
        let tools = generate_tools(&name, &config)?;
        let client = Client::builder().build().map_err(HttpToolsError::from)?;

        Ok(Self {
            inner: Arc::new(HttpToolSourceInner {
                name,
                config,
                base_url,
                tools,
                client,
                default_timeout,
            }),
        })
    }

    /// List the MCP `Tool`s exposed by this source, sorted by name.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.inner
            .tools
            .iter()
            .map(|t| {
                let schema_obj = t
                    .input_schema
                    .as_object()
                    .cloned()
                    .unwrap_or_else(JsonObject::new);
                let mut tool = Tool::new(
                    t.name.clone(),
                    t.description.clone().unwrap_or_default(),
                    Arc::new(schema_obj),
                );
                let mut annotations = crate::semantics::annotations_for_method(&t.method);
                annotations.title.clone_from(&t.title);
                tool.annotations = Some(annotations);
                tool
            })
            .collect()
    }

    /// Execute a tool call against this source.
    ///
    /// A successful response body is returned as a single text block. JSON bodies are
    /// re-serialized compactly unless the tool is in `text` response mode.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the tool name is unknown
    /// - required parameters are missing
    /// - the HTTP request fails (transport or non-2xx response)
    pub async fn call_tool(&self, tool_name: &str, arguments: Value) -> Result<CallToolResult> {
        let tool = self
            .inner
            .tools
            .iter()
            .find(|t| t.name == tool_name)
            .ok_or_else(|| HttpToolsError::Runtime(format!("Tool not found: {tool_name}")))?;

        let body = execute_request(&self.inner, tool, &arguments).await?;
        let text = match tool.response_mode {
            HttpResponseMode::Text => body,
            HttpResponseMode::Json => match serde_json::from_str::<Value>(&body) {
                Ok(v) => serde_json::to_string(&v).unwrap_or(body),
                Err(_) => body,
            },
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

fn parse_base_url(source_name: &str, base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url).map_err(|e| {
        HttpToolsError::Config(format!(
            "Invalid baseUrl '{base_url}' for HTTP tool source '{source_name}': {e}"
        ))
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(HttpToolsError::Config(format!(
            "Invalid baseUrl '{base_url}' for HTTP tool source '{source_name}': unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.cannot_be_a_base() {
        return Err(HttpToolsError::Config(format!(
            "Invalid baseUrl '{base_url}' for HTTP tool source '{source_name}': cannot be a base"
        )));
    }
    Ok(url)
}

fn generate_tools(source_name: &str, config: &HttpServerConfig) -> Result<Vec<GeneratedTool>> {
    let mut out = Vec::with_capacity(config.tools.len());

    for (tool_name, tool_cfg) in &config.tools {
        let method = parse_http_method(source_name, tool_name, &tool_cfg.method)?;
        let parameters = collect_tool_parameters(source_name, tool_name, tool_cfg)?;
        let path = parse_path_template(source_name, tool_name, &tool_cfg.path, &parameters)?;
        let input_schema = build_input_schema(&parameters);

        out.push(GeneratedTool {
            name: tool_name.clone(),
            title: tool_cfg.title.clone(),
            description: tool_cfg.description.clone(),
            method,
            path,
            parameters,
            input_schema,
            response_mode: tool_cfg.response.mode,
        });
    }

    Ok(out)
}

fn parse_http_method(source_name: &str, tool_name: &str, method: &str) -> Result<Method> {
    let method_str = method.trim();
    method_str.to_uppercase().parse().map_err(|_| {
        HttpToolsError::Config(format!(
            "Invalid HTTP method '{method_str}' in tool '{tool_name}' (source '{source_name}')"
        ))
    })
}

fn parse_path_template(
    source_name: &str,
    tool_name: &str,
    path: &str,
    parameters: &[ToolParameter],
) -> Result<Vec<PathSegment>> {
    let path_params: HashSet<&str> = parameters
        .iter()
        .filter(|p| p.location == HttpParamLocation::Path)
        .map(|p| p.http_name.as_str())
        .collect();

    let mut segments = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for raw in path.trim_matches('/').split('/').filter(|s| !s.is_empty()) {
        if let Some(name) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            if !path_params.contains(name) {
                return Err(HttpToolsError::Config(format!(
                    "Path placeholder '{{{name}}}' has no matching path param in tool '{tool_name}' (source '{source_name}')"
                )));
            }
            seen.insert(name);
            segments.push(PathSegment::Param(name.to_string()));
        } else if raw.contains('{') || raw.contains('}') {
            return Err(HttpToolsError::Config(format!(
                "Path segment '{raw}' must be a literal or a whole placeholder in tool '{tool_name}' (source '{source_name}')"
            )));
        } else {
            segments.push(PathSegment::Literal(raw.to_string()));
        }
    }

    if let Some(unused) = path_params.iter().find(|p| !seen.contains(*p)) {
        return Err(HttpToolsError::Config(format!(
            "Path param '{unused}' does not appear in path '{path}' of tool '{tool_name}' (source '{source_name}')"
        )));
    }

    Ok(segments)
}

fn collect_tool_parameters(
    source_name: &str,
    tool_name: &str,
    tool_cfg: &crate::config::HttpToolConfig,
) -> Result<Vec<ToolParameter>> {
    let mut parameters = Vec::with_capacity(tool_cfg.params.len());
    let mut http_names: HashSet<(HttpParamLocation, String)> = HashSet::new();

    for (arg_name, p) in &tool_cfg.params {
        let http_name = p.name.clone().unwrap_or_else(|| arg_name.clone());
        if !http_names.insert((p.location, http_name.clone())) {
            return Err(HttpToolsError::Config(format!(
                "Duplicate {:?} param '{http_name}' in tool '{tool_name}' (source '{source_name}')",
                p.location
            )));
        }

        let required_default = matches!(p.location, HttpParamLocation::Path);
        let required = p.required.unwrap_or(required_default);

        let mut schema = p
            .schema
            .clone()
            .unwrap_or_else(|| json!({"type": "string"}));
        if let (Some(desc), Some(obj)) = (&p.description, schema.as_object_mut()) {
            obj.entry("description")
                .or_insert_with(|| Value::String(desc.clone()));
        }

        parameters.push(ToolParameter {
            tool_name: arg_name.clone(),
            http_name,
            location: p.location,
            required,
            default: p.default.clone(),
            schema,
        });
    }

    Ok(parameters)
}

async fn execute_request(
    inner: &HttpToolSourceInner,
    tool: &GeneratedTool,
    arguments: &Value,
) -> Result<String> {
    let parts = build_request_parts(tool, arguments)?;
    let url = build_url(&inner.base_url, &parts.path, &parts.query_params);
    let redacted = redact_url(&url);

    let mut request = inner.client.request(tool.method.clone(), url);
    request = apply_auth(inner.config.auth.as_ref(), request);
    request = apply_headers(&inner.config, request);
    if !parts.body_fields.is_empty() {
        request = request.json(&parts.body_fields);
    }
    request = apply_timeout(inner, request);

    debug!(
        source = %inner.name,
        tool = %tool.name,
        method = %tool.method,
        url = %redacted,
        "sending request"
    );
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await.map_err(HttpToolsError::from)?;
    debug!(tool = %tool.name, status = status.as_u16(), "received response");

    if status.is_success() {
        return Ok(body);
    }

    let status_code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown");
    let error_body = match serde_json::from_str::<Value>(&body) {
        Ok(v) => v.to_string(),
        Err(_) => body,
    };
    Err(HttpToolsError::Http(format!(
        "API returned {status_code} {reason}: {}",
        truncate_error_body(&error_body)
    )))
}

fn build_request_parts(tool: &GeneratedTool, arguments: &Value) -> Result<RequestParts> {
    let mut parts = RequestParts::default();
    let mut path_values: Vec<(&str, String)> = Vec::new();

    for param in &tool.parameters {
        let value = arguments
            .get(&param.tool_name)
            .cloned()
            .or_else(|| param.default.clone());

        let Some(value) = value else {
            if param.required {
                return Err(HttpToolsError::Runtime(format!(
                    "Missing required parameter: {}",
                    param.tool_name
                )));
            }
            continue;
        };

        match param.location {
            // A null path value is sent as the literal segment so the remote side decides.
            HttpParamLocation::Path => {
                path_values.push((param.http_name.as_str(), value_to_string(&value)));
            }
            // Null means "not given"; empty strings still go out as `key=`.
            HttpParamLocation::Query => {
                if value.is_null() && !param.required {
                    continue;
                }
                parts
                    .query_params
                    .push((param.http_name.clone(), value_to_string(&value)));
            }
            HttpParamLocation::Body => {
                if !value.is_null() {
                    parts.body_fields.insert(param.http_name.clone(), value);
                }
            }
        }
    }

    for segment in &tool.path {
        let rendered = match segment {
            PathSegment::Literal(s) => s.clone(),
            PathSegment::Param(name) => path_values
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| {
                    HttpToolsError::Runtime(format!("Missing required parameter: {name}"))
                })?,
        };
        parts.path.push(rendered);
    }

    Ok(parts)
}

fn build_url(base_url: &Url, segments: &[String], query_params: &[(String, String)]) -> Url {
    let mut url = base_url.clone();
    url.set_query(None);
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty();
        path.extend(segments);
    }
    if !query_params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query_params {
            pairs.append_pair(key, value);
        }
    }
    url
}

fn apply_headers(
    cfg: &HttpServerConfig,
    mut request: reqwest::RequestBuilder,
) -> reqwest::RequestBuilder {
    for (key, value) in &cfg.defaults.headers {
        request = request.header(key, value);
    }
    request
}

fn apply_timeout(
    inner: &HttpToolSourceInner,
    mut request: reqwest::RequestBuilder,
) -> reqwest::RequestBuilder {
    let effective_timeout = match inner.config.defaults.timeout {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None => inner.default_timeout,
    };
    if let Some(t) = effective_timeout {
        request = request.timeout(t);
    }
    request
}

fn apply_auth(
    auth: Option<&AuthConfig>,
    request: reqwest::RequestBuilder,
) -> reqwest::RequestBuilder {
    match auth {
        Some(AuthConfig::Bearer { token }) => request.bearer_auth(token),
        Some(AuthConfig::None) | None => request,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_to_string(n),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => value.to_string(),
    }
}

/// Integral floats (`10.0`) are rendered without the fraction; schema `integer` accepts them.
fn number_to_string(n: &serde_json::Number) -> String {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_EXACT => {
            #[allow(clippy::cast_possible_truncation)]
            let i = f as i64;
            i.to_string()
        }
        _ => n.to_string(),
    }
}

fn build_input_schema(parameters: &[ToolParameter]) -> Value {
    let mut properties = Map::new();
    let mut required: Vec<String> = Vec::new();

    for param in parameters {
        let mut prop_schema = param.schema.clone();
        if let Some(default) = &param.default {
            prop_schema["default"] = default.clone();
        }
        properties.insert(param.tool_name.clone(), prop_schema);

        if param.required && param.default.is_none() {
            required.push(param.tool_name.clone());
        }
    }

    let mut schema = json!({
        "type": "object",
        "properties": properties,
    });

    if !required.is_empty() {
        schema["required"] = json!(required);
    }

    schema
}
