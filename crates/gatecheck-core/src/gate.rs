//! Gate definitions and execution results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Exit code reported when a gate's executable could not be started at
/// all (missing binary, permission denied). Distinct from any ordinary
/// tool failure so operators can tell "broken check" from "tool missing".
pub const LAUNCH_FAILURE_CODE: i32 = 127;

/// One named external verification step in the pipeline.
///
/// Gates are immutable once the registry is built; the pipeline only
/// ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Gate {
    /// Human-readable label, unique within a run.
    pub name: String,

    /// Executable to invoke.
    pub command: String,

    /// Arguments passed to the executable, in order.
    #[serde(default)]
    pub args: Vec<String>,

    /// Optional path scope the command should operate over.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

impl Gate {
    /// Create a gate with no working-directory scope.
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: None,
        }
    }

    /// Scope the gate's command to a working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Builtin cargo gates, in the order they are run by default.
///
/// Cheap checks come before expensive ones by convention; the registry
/// preserves whatever order is configured and never re-sorts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinGate {
    /// cargo fmt --all -- --check
    CargoFmt,

    /// cargo check --workspace
    CargoCheck,

    /// cargo clippy --workspace --all-targets -- -D warnings
    CargoClippy,

    /// cargo test --workspace
    CargoTest,

    /// cargo doc --workspace --no-deps
    CargoDoc,
}

impl BuiltinGate {
    /// Get the gate name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinGate::CargoFmt => "cargo_fmt",
            BuiltinGate::CargoCheck => "cargo_check",
            BuiltinGate::CargoClippy => "cargo_clippy",
            BuiltinGate::CargoTest => "cargo_test",
            BuiltinGate::CargoDoc => "cargo_doc",
        }
    }

    /// Build the gate definition for this builtin.
    pub fn gate(&self) -> Gate {
        match self {
            BuiltinGate::CargoFmt => {
                Gate::new(self.name(), "cargo", ["fmt", "--all", "--", "--check"])
            }
            BuiltinGate::CargoCheck => Gate::new(self.name(), "cargo", ["check", "--workspace"]),
            BuiltinGate::CargoClippy => Gate::new(
                self.name(),
                "cargo",
                ["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
            ),
            BuiltinGate::CargoTest => Gate::new(self.name(), "cargo", ["test", "--workspace"]),
            BuiltinGate::CargoDoc => {
                Gate::new(self.name(), "cargo", ["doc", "--workspace", "--no-deps"])
            }
        }
    }
}

/// How one gate execution ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GateStatus {
    /// The tool ran and exited 0.
    Passed,

    /// The tool ran and exited non-zero.
    Failed { exit_code: i32 },

    /// The tool could not be started at all. Halts the pipeline the
    /// same way an ordinary failure does, but is reported separately.
    LaunchFailed { error: String },
}

impl GateStatus {
    pub fn passed(&self) -> bool {
        matches!(self, GateStatus::Passed)
    }
}

/// Result of executing a single gate. Consumed by the pipeline; never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateResult {
    /// Name of the gate that produced this result.
    pub gate_name: String,

    /// How the execution ended.
    pub status: GateStatus,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

impl GateResult {
    /// Whether this gate passed (tool ran and exited 0).
    pub fn passed(&self) -> bool {
        self.status.passed()
    }

    /// Exit code to surface for this result: 0 on pass, the tool's own
    /// code on failure, [`LAUNCH_FAILURE_CODE`] when the tool never
    /// started.
    pub fn exit_code(&self) -> i32 {
        match &self.status {
            GateStatus::Passed => 0,
            GateStatus::Failed { exit_code } => *exit_code,
            GateStatus::LaunchFailed { .. } => LAUNCH_FAILURE_CODE,
        }
    }
}
