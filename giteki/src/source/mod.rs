// Row source boundary - turns one listing file into untyped rows

use crate::error::{GitekiError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One extracted row: the cell texts in column order.
pub type RawRow = Vec<String>;

/// Produces the ordered rows of a single source file.
pub trait RowSource {
    fn extract_rows(&self, path: &Path) -> Result<Vec<RawRow>>;
}

/// Runs an external reader script and decodes its JSON output.
///
/// The script is invoked as `<interpreter> <script> --src <path>` and must
/// print `{"Result": [[cell, ...], ...]}` on stdout.
#[derive(Debug, Clone)]
pub struct ScriptRowSource {
    interpreter: String,
    script: PathBuf,
}

#[derive(Deserialize)]
struct ScriptOutput {
    #[serde(rename = "Result")]
    result: Vec<Vec<serde_json::Value>>,
}

impl ScriptRowSource {
    pub fn new(interpreter: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        ScriptRowSource {
            interpreter: interpreter.into(),
            script: script.into(),
        }
    }
}

impl RowSource for ScriptRowSource {
    fn extract_rows(&self, path: &Path) -> Result<Vec<RawRow>> {
        let file = path.display().to_string();
        let output = Command::new(&self.interpreter)
            .arg(&self.script)
            .arg("--src")
            .arg(path)
            .output()
            .map_err(|e| {
                GitekiError::extraction(
                    file.as_str(),
                    format!(
                        "failed to run {} {}: {e}",
                        self.interpreter,
                        self.script.display()
                    ),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitekiError::extraction(
                file.as_str(),
                format!("reader exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let decoded: ScriptOutput = serde_json::from_slice(&output.stdout).map_err(|e| {
            GitekiError::extraction(file.as_str(), format!("invalid reader output: {e}"))
        })?;

        Ok(decoded
            .result
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_script(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("read.sh");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_decodes_script_output() {
        let tmp = TempDir::new().unwrap();
        let script = write_script(
            &tmp,
            "cat <<'JSON'\n\
             {\"Result\": [[\"Example Corp\", \"第2条第1項第19号\", \"EX-100\", 12, null, true, \"2015-01-20\", \"\"]]}\n\
             JSON\n",
        );

        let source = ScriptRowSource::new("sh", script);
        let rows = source.extract_rows(&tmp.path().join("jan.xls")).unwrap();
        assert_eq!(
            rows,
            vec![vec![
                "Example Corp".to_string(),
                "第2条第1項第19号".to_string(),
                "EX-100".to_string(),
                "12".to_string(),
                "".to_string(),
                "true".to_string(),
                "2015-01-20".to_string(),
                "".to_string(),
            ]]
        );
    }

    #[test]
    fn test_script_receives_source_path() {
        let tmp = TempDir::new().unwrap();
        let script = write_script(
            &tmp,
            "printf '{\"Result\": [[\"%s\", \"%s\"]]}' \"$1\" \"$2\"\n",
        );

        let target = tmp.path().join("jan.xls");
        let rows = ScriptRowSource::new("sh", script)
            .extract_rows(&target)
            .unwrap();
        assert_eq!(rows[0][0], "--src");
        assert_eq!(rows[0][1], target.display().to_string());
    }

    #[test]
    fn test_non_zero_exit_is_extraction_error() {
        let tmp = TempDir::new().unwrap();
        let script = write_script(&tmp, "echo 'no such file' >&2\nexit 3\n");

        let err = ScriptRowSource::new("sh", script)
            .extract_rows(Path::new("missing.xls"))
            .unwrap_err();
        match err {
            GitekiError::Extraction { file, message } => {
                assert_eq!(file, "missing.xls");
                assert!(message.contains("no such file"), "{message}");
            }
            other => panic!("expected extraction error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json_is_extraction_error() {
        let tmp = TempDir::new().unwrap();
        let script = write_script(&tmp, "echo 'not json'\n");

        let err = ScriptRowSource::new("sh", script)
            .extract_rows(Path::new("jan.xls"))
            .unwrap_err();
        assert!(matches!(err, GitekiError::Extraction { .. }));
    }

    #[test]
    fn test_missing_interpreter_is_extraction_error() {
        let source = ScriptRowSource::new("definitely-not-an-interpreter", "read.py");
        let err = source.extract_rows(Path::new("jan.xls")).unwrap_err();
        assert!(matches!(err, GitekiError::Extraction { .. }));
    }
}
