//! Optimizer invoker: runs an external image optimizer over a folder.
//!
//! The optimizer is opaque. Its output is kept as text and its exit code is
//! recorded but never treated as a failure.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

use crate::error::{PipelineError, PipelineResult};
use crate::preset::Preset;

/// Captured output of one optimizer run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerReport {
    /// stdout, followed by a newline and stderr when stderr is non-empty
    pub text: String,
    /// Exit code, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl OptimizerReport {
    /// True when the optimizer printed nothing worth reporting.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Join stdout and stderr the way reports are stored.
pub fn combine_output(stdout: &str, stderr: &str) -> String {
    if stderr.is_empty() {
        stdout.to_string()
    } else {
        format!("{stdout}\n{stderr}")
    }
}

/// Run `preset` with `dir` appended as the final argument.
///
/// Fails only when the process cannot be started; a non-zero exit still
/// yields a report.
pub fn run(dir: &Path, preset: &Preset) -> PipelineResult<OptimizerReport> {
    tracing::debug!("Running optimizer: {} {:?}", preset.command_line(), dir);

    let output = Command::new(preset.program())
        .args(preset.args())
        .arg(dir)
        .output()
        .map_err(|source| PipelineError::OptimizerSpawn {
            program: preset.program().to_string(),
            path: dir.to_path_buf(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let report = OptimizerReport {
        text: combine_output(&stdout, &stderr),
        exit_code: output.status.code(),
    };

    if !output.status.success() {
        tracing::warn!(
            "Optimizer preset '{}' exited with {} on {:?}",
            preset.name(),
            output.status,
            dir
        );
    }

    Ok(report)
}
