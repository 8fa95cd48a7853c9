//! Argument validation against a tool's advertised input schema.
//!
//! Runs before any request is built, so a malformed invocation never reaches the remote API.

use crate::error::{AdapterError, Result};
use rmcp::model::Tool;
use serde_json::{Value, json};

pub struct ArgumentValidator {
    required: Vec<String>,
    schema: jsonschema::Validator,
}

impl ArgumentValidator {
    /// Compile the input schema of `tool`, with `format` keywords (e.g. `uuid`) enforced.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is not a valid JSON Schema.
    pub fn for_tool(tool: &Tool) -> Result<Self> {
        let schema = Value::Object((*tool.input_schema).clone());
        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();

        let compiled = jsonschema::options()
            .should_validate_formats(true)
            .build(&schema)
            .map_err(|e| {
                AdapterError::Config(format!("invalid input schema for tool '{}': {e}", tool.name))
            })?;

        Ok(Self {
            required,
            schema: compiled,
        })
    }

    /// Check `args` and return every violation found.
    ///
    /// # Errors
    ///
    /// Returns the list of violations as JSON objects (`type`, `parameter`/`path`, `message`).
    pub fn check(&self, args: &Value) -> std::result::Result<(), Vec<Value>> {
        let mut violations: Vec<Value> = Vec::new();

        let args_obj = args.as_object();
        for r in &self.required {
            if !args_obj.is_some_and(|o| o.contains_key(r)) {
                violations.push(json!({
                    "type": "missing-required-parameter",
                    "parameter": r,
                }));
            }
        }

        for e in self.schema.iter_errors(args) {
            // Reported above with a nicer shape.
            if matches!(
                e.kind(),
                jsonschema::error::ValidationErrorKind::Required { .. }
            ) {
                continue;
            }
            violations.push(json!({
                "type": "constraint-violation",
                "path": e.instance_path().to_string(),
                "message": e.to_string(),
            }));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}
