//! The environment: agent registry, routing and the dispatch loop.

pub mod environment;
pub mod errors;
pub mod router;
pub mod services;

pub use environment::{Environment, DEFAULT_MESSAGE_BATCH};
pub use errors::SystemError;
pub use router::Router;
pub use services::{
    ERROR_REPORTER_ID, METRICS_COLLECTOR_ID, SERVICE_AGENT_COUNT, WATCHDOG_ID,
};
