//! cqlsh 기반 실행기
//!
//! 각 DDL 문을 `cqlsh <host> <port> -e <statement>`로 하나씩 실행합니다.

use std::process::Command;

use thiserror::Error;

use cqlkit_cql::SchemaApplier;

use crate::config::CqlshTarget;

/// cqlsh 실행 에러
#[derive(Debug, Error)]
pub enum CqlshError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cqlsh exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// cqlsh 실행기
pub struct CqlshApplier {
    target: CqlshTarget,
}

impl CqlshApplier {
    pub fn new(target: CqlshTarget) -> Self {
        Self { target }
    }

    fn command(&self, statement: &str) -> Command {
        let mut command = Command::new(&self.target.program);
        command
            .arg(&self.target.host)
            .arg(self.target.port.to_string())
            .arg("-e")
            .arg(statement);
        command
    }
}

impl SchemaApplier for CqlshApplier {
    type Error = CqlshError;

    fn execute(&mut self, statement: &str) -> Result<(), Self::Error> {
        let output = self
            .command(statement)
            .output()
            .map_err(|source| CqlshError::Spawn {
                program: self.target.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(CqlshError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(program: &str) -> CqlshTarget {
        CqlshTarget {
            program: program.to_string(),
            host: "10.0.0.5".to_string(),
            port: 9142,
        }
    }

    #[test]
    fn test_command_arguments() {
        let applier = CqlshApplier::new(target("cqlsh"));
        let command = applier.command("CREATE TABLE IF NOT EXISTS ks.t(id int) PRIMARY KEY (id);");

        let args: Vec<_> = command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(command.get_program(), "cqlsh");
        assert_eq!(
            args,
            vec![
                "10.0.0.5",
                "9142",
                "-e",
                "CREATE TABLE IF NOT EXISTS ks.t(id int) PRIMARY KEY (id);"
            ]
        );
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let mut applier = CqlshApplier::new(target("cqlkit-test-no-such-cqlsh"));
        let err = applier.execute("SELECT 1;").unwrap_err();
        assert!(matches!(err, CqlshError::Spawn { .. }));
    }
}
