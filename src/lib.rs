//! GlobalPay Bridge - request/poll bridge for the GlobalPay chat agent
//!
//! Turns the agent's asynchronous job protocol (start a job, then poll for
//! its result) into a single awaitable call with a bounded wait and a
//! friendly fallback answer.
//!
//! # Modules
//!
//! - `domain`: Core types (JobId, Job lifecycle, PollPolicy, AskResponse, rates)
//! - `ports`: Trait abstractions (AgentPort) and test doubles
//! - `adapters`: External implementations (agent HTTP client, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Request/poll bridge, chat and rate services

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
