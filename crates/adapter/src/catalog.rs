//! The RestCSV tool catalog.
//!
//! Tools are declared in `catalog.yaml` (embedded at build time) using the HTTP tool DSL from
//! `restcsv-http-tools`, then bound to the configured base URL and credential.

use crate::config::AdapterConfig;
use crate::error::Result;
use restcsv_http_tools::config::{
    AuthConfig, EndpointDefaults, HttpServerConfig, HttpToolConfig,
};
use serde::Deserialize;
use std::collections::BTreeMap;

const CATALOG_YAML: &str = include_str!("catalog.yaml");

/// Name of the single tool source served by this adapter.
pub const SOURCE_NAME: &str = "restcsv";

#[derive(Debug, Deserialize)]
struct Catalog {
    tools: BTreeMap<String, HttpToolConfig>,
}

/// Parse the embedded tool definitions.
///
/// # Errors
///
/// Returns an error if the embedded YAML is malformed.
pub fn tools() -> Result<BTreeMap<String, HttpToolConfig>> {
    let catalog: Catalog = serde_yaml::from_str(CATALOG_YAML)?;
    Ok(catalog.tools)
}

/// Bind the catalog to the runtime configuration.
///
/// # Errors
///
/// Returns an error if the embedded catalog cannot be parsed.
pub fn server_config(config: &AdapterConfig) -> Result<HttpServerConfig> {
    // Content-Type is set per request, only when a JSON body is sent.
    let headers = BTreeMap::from([("Accept".to_string(), "application/json".to_string())]);

    Ok(HttpServerConfig {
        base_url: config.base_url.clone(),
        auth: Some(AuthConfig::Bearer {
            token: config.api_key.clone(),
        }),
        defaults: EndpointDefaults {
            headers,
            timeout: None,
        },
        tools: tools()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use restcsv_http_tools::config::HttpParamLocation;

    #[test]
    fn catalog_declares_every_operation() {
        let tools = tools().expect("catalog parses");
        let expected: &[(&str, &str, &str)] = &[
            ("list_actions", "GET", "/actions"),
            ("create_action", "POST", "/actions"),
            ("show_action", "GET", "/actions/{action}"),
            ("update_action", "PUT", "/actions/{action}"),
            ("delete_action", "DELETE", "/actions/{action}"),
            ("execute_action", "POST", "/actions/{action}/execute"),
            ("list_csvs", "GET", "/csvs"),
            ("store_csv", "POST", "/csvs"),
            ("show_csv", "GET", "/csvs/{csv}"),
            ("delete_csv", "DELETE", "/csvs/{csv}"),
            ("list_csv_rows", "GET", "/csvs/{csv}/rows"),
            ("store_csv_row", "POST", "/csvs/{csv}/rows"),
            ("show_csv_row", "GET", "/csvs/{csv}/rows/{row}"),
            ("update_csv_row", "PUT", "/csvs/{csv}/rows/{row}"),
            ("remove_csv_row", "DELETE", "/csvs/{csv}/rows/{row}"),
            ("bulk_store_csv_row", "POST", "/csvs/{csv}/rows/bulk"),
            ("search_single_csv", "GET", "/csvs/{csv}/search"),
            ("list_webhooks", "GET", "/webhooks"),
            ("store_webhook", "POST", "/webhooks"),
            ("show_webhook", "GET", "/webhooks/{webhook}"),
            ("update_webhook", "PUT", "/webhooks/{webhook}"),
            ("delete_webhook", "DELETE", "/webhooks/{webhook}"),
            ("test_webhook", "POST", "/webhooks/{webhook}/test"),
            ("csv_row_webhook_log", "GET", "/webhooks/{webhook}/logs"),
        ];

        assert_eq!(tools.len(), expected.len());
        for (name, method, path) in expected {
            let tool = tools.get(*name).unwrap_or_else(|| panic!("missing tool {name}"));
            assert_eq!(tool.method, *method, "{name}");
            assert_eq!(tool.path, *path, "{name}");
            assert!(tool.title.is_some(), "{name} has no title");
            assert!(tool.description.is_some(), "{name} has no description");
        }
    }

    #[test]
    fn search_renames_per_page_to_camel_case() {
        let tools = tools().expect("catalog parses");
        let per_page = &tools["search_single_csv"].params["per_page"];
        assert_eq!(per_page.location, HttpParamLocation::Query);
        assert_eq!(per_page.name.as_deref(), Some("perPage"));
    }

    #[test]
    fn server_config_carries_bearer_token_and_accept_header() {
        let cfg = AdapterConfig {
            api_key: "k".to_string(),
            base_url: "https://example.test/api".to_string(),
            timeout: None,
        };
        let server = server_config(&cfg).expect("config");
        assert!(matches!(server.auth, Some(AuthConfig::Bearer { ref token }) if token == "k"));
        assert_eq!(
            server.defaults.headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
        assert!(!server.defaults.headers.contains_key("Content-Type"));
        assert_eq!(server.base_url, "https://example.test/api");
    }
}
