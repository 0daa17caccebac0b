//! Adapters Layer - External integrations
//!
//! - `agent_http`: reqwest client for the agent service
//! - `cli`: gpbridge command-line interface

pub mod agent_http;
pub mod cli;

pub use agent_http::{AgentHttpClient, AgentHttpConfig};
pub use cli::CliApp;
