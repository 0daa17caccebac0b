//! Ports Layer - Trait definitions for external dependencies
//!
//! Following hexagonal architecture, the bridge only talks to the agent
//! through `AgentPort`. `mocks` provides a scripted implementation for tests
//! and local experiments.

pub mod agent;
pub mod mocks;

pub use agent::{AgentError, AgentPort, StatusReport};
pub use mocks::ScriptedAgent;
