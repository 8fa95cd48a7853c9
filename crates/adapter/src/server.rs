//! MCP server handler: the tool registry exposed over stdio.
//!
//! Tool listing comes straight from the HTTP tool source. Tool calls are validated against the
//! advertised schema, then forwarded as exactly one HTTP request. Remote failures are folded
//! into an error *result* so the client always gets a structured reply.

use crate::error::Result;
use crate::validate::ArgumentValidator;
use restcsv_http_tools::runtime::{HttpToolSource, HttpToolsError};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

const INSTRUCTIONS: &str = "Tools for the RestCSV API: manage CSVs and their rows, search a \
CSV, define and execute natural-language actions, and configure webhooks. Identifiers are UUIDs.";

#[derive(Clone)]
pub struct RestCsvServer {
    source: HttpToolSource,
    tools: Arc<Vec<Tool>>,
    validators: Arc<HashMap<String, ArgumentValidator>>,
}

impl RestCsvServer {
    /// Build the registry from a tool source, compiling one validator per tool.
    ///
    /// # Errors
    ///
    /// Returns an error if a tool's input schema cannot be compiled.
    pub fn new(source: HttpToolSource) -> Result<Self> {
        let tools = source.list_tools();
        let validators = tools
            .iter()
            .map(|t| Ok((t.name.to_string(), ArgumentValidator::for_tool(t)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            source,
            tools: Arc::new(tools),
            validators: Arc::new(validators),
        })
    }

    #[must_use]
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Run one tool invocation end to end.
    ///
    /// # Errors
    ///
    /// Returns `invalid_params` for an unknown tool or arguments that violate the tool's schema.
    /// Failures of the remote call are *not* errors here; they come back as a result with
    /// `isError: true` and an `Error: ...` text block.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        let Some(validator) = self.validators.get(name) else {
            return Err(ErrorData::invalid_params(
                format!("unknown tool: {name}"),
                None,
            ));
        };

        let args = Value::Object(arguments.unwrap_or_default());
        if let Err(violations) = validator.check(&args) {
            warn!(tool = %name, violations = violations.len(), "rejected tool arguments");
            return Err(ErrorData::invalid_params(
                format!("invalid arguments for tool '{name}'"),
                Some(json!({ "violations": violations })),
            ));
        }

        match self.source.call_tool(name, args).await {
            Ok(result) => {
                debug!(tool = %name, "tool call succeeded");
                Ok(result)
            }
            Err(e) => {
                warn!(tool = %name, error = %e, "tool call failed");
                Ok(error_result(&e))
            }
        }
    }
}

fn error_result(e: &HttpToolsError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {e}"))])
}

impl ServerHandler for RestCsvServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "RestCSV".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.tools.as_ref().clone(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        self.invoke(&request.name, request.arguments).await
    }
}
