//! Ontolock Engine - Orchestration layer
//!
//! Coordinates the pure core with the lock store:
//! - configuration from the environment
//! - definition loading (YAML/JSON)
//! - the process-start gate
//! - explicit approval and print-only checks
//! - handler resolution

pub mod approval;
pub mod config;
pub mod gate;
pub mod handlers;
pub mod loader;

pub use approval::{approve, check, ApprovalOutcome};
pub use config::GateConfig;
pub use gate::{run_startup_gate, GateReport};
pub use handlers::{Handler, HandlerLoader, HandlerRegistry};
pub use loader::load_definition;
