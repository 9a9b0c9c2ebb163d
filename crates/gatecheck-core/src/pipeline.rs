//! Fail-fast pipeline orchestration.
//!
//! Executes registry gates strictly in order, one child process at a
//! time, and halts at the first gate that does not pass. Sequencing is
//! the concurrency-control mechanism: gates share the working tree, so
//! no two ever run at once and no locking is needed.

use crate::gate::GateResult;
use crate::registry::GateRegistry;
use crate::runner::{GateExecutor, ProcessExecutor};
use tracing::{info, warn};
use uuid::Uuid;

/// Terminal result of one full pipeline run.
///
/// Either every gate passed, or the run stopped at the first failing
/// gate. If `FailedAt { index, .. }` holds, no gate with a higher index
/// was ever launched.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// Every gate ran and exited 0; one result per gate, in order.
    AllPassed { results: Vec<GateResult> },

    /// The gate at `index` failed (or could not be started).
    /// `completed` holds the results of gates `0..index`, all passed.
    FailedAt {
        index: usize,
        failed: GateResult,
        completed: Vec<GateResult>,
    },
}

impl PipelineOutcome {
    /// Whether the whole run passed.
    pub fn passed(&self) -> bool {
        matches!(self, PipelineOutcome::AllPassed { .. })
    }

    /// Process exit code for this outcome: 0 on success, otherwise the
    /// failing gate's own code (or the reserved launch-failure code).
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineOutcome::AllPassed { .. } => 0,
            PipelineOutcome::FailedAt { failed, .. } => failed.exit_code(),
        }
    }

    /// Every result produced by the run, in execution order, including
    /// the failing one.
    pub fn results(&self) -> Vec<&GateResult> {
        match self {
            PipelineOutcome::AllPassed { results } => results.iter().collect(),
            PipelineOutcome::FailedAt {
                failed, completed, ..
            } => completed.iter().chain(std::iter::once(failed)).collect(),
        }
    }

    /// Number of gates that were actually launched.
    pub fn gates_run(&self) -> usize {
        self.results().len()
    }
}

/// Runs registry gates in order with fail-fast short-circuiting.
///
/// Generic over the executor so tests can substitute fake gates; the
/// default runs real child processes.
pub struct Pipeline<E = ProcessExecutor> {
    executor: E,
}

impl Pipeline<ProcessExecutor> {
    pub fn new() -> Self {
        Self {
            executor: ProcessExecutor,
        }
    }
}

impl Default for Pipeline<ProcessExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: GateExecutor> Pipeline<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// Execute every gate in registry order, stopping at the first one
    /// that does not pass.
    ///
    /// An empty registry is vacuous success. Gate failure is never an
    /// `Err`: the outcome is an explicit, inspectable value.
    pub async fn run(&self, registry: &GateRegistry) -> PipelineOutcome {
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, gates = registry.len(), "starting gate pipeline");

        let mut completed = Vec::with_capacity(registry.len());

        for (index, gate) in registry.gates().iter().enumerate() {
            info!(gate = %gate.name, index, "executing gate");

            let result = self.executor.execute(gate).await;

            if result.passed() {
                info!(gate = %gate.name, duration_ms = result.duration_ms, "gate passed");
                completed.push(result);
            } else {
                warn!(
                    gate = %gate.name,
                    index,
                    exit_code = result.exit_code(),
                    "gate failed, halting pipeline"
                );
                return PipelineOutcome::FailedAt {
                    index,
                    failed: result,
                    completed,
                };
            }
        }

        info!(run_id = %run_id, gates = completed.len(), "all gates passed");
        PipelineOutcome::AllPassed { results: completed }
    }
}
