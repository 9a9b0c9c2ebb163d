//! gatecheck-core - Ordered fail-fast quality-gate execution
//!
//! Provides the gate pipeline used by the `gatecheck` binary:
//! - A validated, ordered registry of external verification commands
//! - A runner that executes one gate as a child process
//! - A pipeline that short-circuits at the first failing gate

pub mod error;
pub mod gate;
pub mod pipeline;
pub mod registry;
pub mod runner;
pub mod telemetry;

// Re-export key types
pub use error::{GatecheckError, Result};
pub use gate::{BuiltinGate, Gate, GateResult, GateStatus, LAUNCH_FAILURE_CODE};
pub use pipeline::{Pipeline, PipelineOutcome};
pub use registry::GateRegistry;
pub use runner::{GateExecutor, ProcessExecutor};
pub use telemetry::init_tracing;

/// gatecheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
