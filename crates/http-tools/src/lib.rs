//! Declarative HTTP tool DSL + runtime.
//!
//! A tool source turns a static [`config::HttpServerConfig`] into MCP `Tool`s and executes each
//! tool call as exactly one HTTP request. It carries no MCP transport logic of its own.

pub mod config;
pub mod redact;
pub mod runtime;
pub mod semantics;
