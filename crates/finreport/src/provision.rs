//! Infrastructure provisioning via the `terraform` CLI.
//!
//! Runs the fixed sequence init, plan, apply, output against a configured
//! working directory. Any nonzero exit aborts the sequence; stderr from the
//! failed step is carried in the error so operators see the tool's own
//! message.

use finreport_common::{ReportError, Result};
use finreport_config::ProvisionConfig;
use std::path::PathBuf;
use std::process::Command;
use tracing::info;

/// Runs the provisioning tool with a fixed argument sequence.
pub struct ProvisionRunner {
    program: String,
    working_dir: PathBuf,
    var_file: Option<PathBuf>,
    aws_profile: Option<String>,
}

impl ProvisionRunner {
    /// A runner over the configured terraform directory.
    pub fn new(config: &ProvisionConfig) -> Self {
        Self {
            program: "terraform".to_string(),
            working_dir: config.terraform_dir.clone(),
            var_file: config.var_file.clone(),
            aws_profile: config.aws_profile.clone(),
        }
    }

    /// Substitutes the executable, for exercising the runner without
    /// terraform installed.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Runs init, plan, apply, and output in order, stopping at the first
    /// failing step. Returns the parsed `output -json` document; a tool
    /// that prints nothing yields `Value::Null`.
    pub fn run_sequence(&self) -> Result<serde_json::Value> {
        self.run(&["init", "-input=false"])?;

        let mut plan: Vec<String> = vec!["plan".into(), "-input=false".into()];
        if let Some(var_file) = &self.var_file {
            plan.push(format!("-var-file={}", var_file.display()));
        }
        let plan_args: Vec<&str> = plan.iter().map(String::as_str).collect();
        self.run(&plan_args)?;

        let mut apply: Vec<String> =
            vec!["apply".into(), "-input=false".into(), "-auto-approve".into()];
        if let Some(var_file) = &self.var_file {
            apply.push(format!("-var-file={}", var_file.display()));
        }
        let apply_args: Vec<&str> = apply.iter().map(String::as_str).collect();
        self.run(&apply_args)?;

        let stdout = self.run(&["output", "-json"])?;
        if stdout.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&stdout).map_err(|e| ReportError::ExternalTool {
            command: format!("{} output -json", self.program),
            status: 0,
            stderr: format!("unparseable output: {e}"),
        })
    }

    /// Runs one tool invocation, returning its stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        let rendered = format!("{} {}", self.program, args.join(" "));
        info!("running {rendered}");

        let mut command = Command::new(&self.program);
        command.args(args).current_dir(&self.working_dir);
        if let Some(profile) = &self.aws_profile {
            command.env("AWS_PROFILE", profile);
        }

        let output = command.output().map_err(|e| ReportError::ExternalTool {
            command: rendered.clone(),
            status: -1,
            stderr: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(ReportError::ExternalTool {
                command: rendered,
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn runner(program: &str) -> ProvisionRunner {
        ProvisionRunner::new(&ProvisionConfig {
            terraform_dir: std::env::temp_dir(),
            var_file: None,
            aws_profile: None,
        })
        .with_program(program)
    }

    fn fake_tool(dir: &Path, body: &str) -> String {
        let path = dir.join("fake-terraform");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh\n{body}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_quiet_tool_yields_null_outputs() {
        assert_eq!(
            runner("true").run_sequence().unwrap(),
            serde_json::Value::Null
        );
    }

    #[test]
    fn test_sequence_aborts_on_nonzero_exit() {
        let err = runner("false").run_sequence().unwrap_err();
        match err {
            ReportError::ExternalTool { command, status, .. } => {
                assert!(command.starts_with("false init"));
                assert_ne!(status, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let err = runner("/nonexistent/terraform").run_sequence().unwrap_err();
        assert!(matches!(err, ReportError::ExternalTool { .. }));
    }

    #[test]
    fn test_json_outputs_are_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(
            dir.path(),
            r#"[ "$1" = "output" ] && printf '{"bucket":{"value":"b"}}'; exit 0"#,
        );
        let outputs = runner(&tool).run_sequence().unwrap();
        assert_eq!(outputs["bucket"]["value"], "b");
    }

    #[test]
    fn test_non_json_output_is_an_error() {
        // `echo` exits zero for every step and echoes "output -json" back.
        assert!(runner("echo").run_sequence().is_err());
    }
}
