//! Child-process gate execution.

use crate::gate::{Gate, GateResult, GateStatus};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

/// Execution seam between the pipeline and the outside world.
///
/// Infallible by signature: a spawn failure becomes
/// [`GateStatus::LaunchFailed`] inside the result, so "tool missing"
/// and "tool ran and failed" take the same short-circuit path through
/// the pipeline. Tests substitute scripted executors here.
#[async_trait]
pub trait GateExecutor: Send + Sync {
    async fn execute(&self, gate: &Gate) -> GateResult;
}

/// Executes gates as real child processes, one at a time.
///
/// Blocks (awaits) until the child terminates; no timeout is imposed.
/// Gates are trusted to terminate on their own, the way test runners
/// and linters define their own completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

#[async_trait]
impl GateExecutor for ProcessExecutor {
    async fn execute(&self, gate: &Gate) -> GateResult {
        let start = Instant::now();

        let mut command = Command::new(&gate.command);
        command
            .args(&gate.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &gate.working_dir {
            command.current_dir(dir);
        }

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => return launch_failure(gate, e, start),
        };

        // The child did start; an I/O error while waiting is not a
        // launch failure. Reported like death by signal, with the
        // error text on stderr.
        let output = match child.wait_with_output().await {
            Ok(output) => output,
            Err(e) => return wait_failure(gate, e, start),
        };

        let status = if output.status.success() {
            GateStatus::Passed
        } else {
            // Death by signal has no code; -1 stands in for it.
            GateStatus::Failed {
                exit_code: output.status.code().unwrap_or(-1),
            }
        };

        GateResult {
            gate_name: gate.name.clone(),
            status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

fn launch_failure(gate: &Gate, error: std::io::Error, start: Instant) -> GateResult {
    GateResult {
        gate_name: gate.name.clone(),
        status: GateStatus::LaunchFailed {
            error: error.to_string(),
        },
        stdout: String::new(),
        stderr: String::new(),
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

fn wait_failure(gate: &Gate, error: std::io::Error, start: Instant) -> GateResult {
    GateResult {
        gate_name: gate.name.clone(),
        status: GateStatus::Failed { exit_code: -1 },
        stdout: String::new(),
        stderr: error.to_string(),
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::LAUNCH_FAILURE_CODE;

    #[tokio::test]
    async fn test_execute_passing_command() {
        let gate = Gate::new("echo_test", "echo", ["hello"]);
        let result = ProcessExecutor.execute(&gate).await;

        assert!(result.passed());
        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.gate_name, "echo_test");
        assert!(result.stdout.contains("hello"));
    }

    #[tokio::test]
    async fn test_execute_failing_command() {
        let gate = Gate::new("false_test", "false", Vec::<String>::new());
        let result = ProcessExecutor.execute(&gate).await;

        assert!(!result.passed());
        assert_eq!(result.exit_code(), 1);
        assert!(matches!(result.status, GateStatus::Failed { exit_code: 1 }));
    }

    #[tokio::test]
    async fn test_execute_missing_binary_is_launch_failure() {
        let gate = Gate::new(
            "missing_tool",
            "/nonexistent-binary-that-does-not-exist",
            Vec::<String>::new(),
        );
        let result = ProcessExecutor.execute(&gate).await;

        assert!(!result.passed());
        assert_eq!(result.exit_code(), LAUNCH_FAILURE_CODE);
        assert!(matches!(result.status, GateStatus::LaunchFailed { .. }));
    }

    #[tokio::test]
    async fn test_execute_captures_stderr_and_exit_code() {
        let gate = Gate::new("sh_test", "sh", ["-c", "echo out; echo err 1>&2; exit 3"]);
        let result = ProcessExecutor.execute(&gate).await;

        assert!(matches!(result.status, GateStatus::Failed { exit_code: 3 }));
        assert_eq!(result.exit_code(), 3);
        assert!(result.stdout.contains("out"));
        assert!(result.stderr.contains("err"));
    }

    #[test]
    fn test_launch_failure_mapping() {
        let gate = Gate::new("types", "mypy", Vec::<String>::new());
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory");

        let result = launch_failure(&gate, err, Instant::now());

        assert!(matches!(result.status, GateStatus::LaunchFailed { .. }));
        assert_eq!(result.exit_code(), LAUNCH_FAILURE_CODE);
    }

    #[test]
    fn test_wait_failure_is_not_a_launch_failure() {
        let gate = Gate::new("test", "pytest", Vec::<String>::new());
        let err = std::io::Error::new(std::io::ErrorKind::Interrupted, "interrupted");

        let result = wait_failure(&gate, err, Instant::now());

        // The child started, so this must not carry the reserved
        // tool-missing exit code.
        assert!(matches!(result.status, GateStatus::Failed { exit_code: -1 }));
        assert_eq!(result.exit_code(), -1);
        assert_ne!(result.exit_code(), LAUNCH_FAILURE_CODE);
        assert!(result.stderr.contains("interrupted"));
    }

    #[tokio::test]
    async fn test_execute_honours_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = dir.path().canonicalize().unwrap();

        let gate = Gate::new("pwd_test", "pwd", Vec::<String>::new()).with_working_dir(&canonical);
        let result = ProcessExecutor.execute(&gate).await;

        assert!(result.passed());
        assert!(result.stdout.contains(canonical.to_str().unwrap()));
    }
}
