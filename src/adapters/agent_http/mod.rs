//! Agent HTTP Adapter
//!
//! Talks to the GlobalPay agent service over HTTP: starts jobs with
//! `POST /api/send-request`, checks them with `GET /api/get-response/{id}`,
//! and exposes the health probe and live exchange rates.

mod client;
mod config;
mod error;
mod types;

pub use client::AgentHttpClient;
pub use config::{endpoints, AgentHttpConfig};
pub use types::{ExchangeRateBody, GetResponseBody, SendRequestBody};
