// Runs the external fetch script and relays its progress through the logger

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};

pub fn run(
    interpreter: &str,
    script: &Path,
    dst: &Path,
    all: bool,
    update: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(interpreter);
    cmd.arg(script).arg("--dst").arg(dst);
    if all {
        cmd.arg("--all");
    }
    if update {
        cmd.arg("--update");
    }

    let mut child = cmd
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to run download script '{}': {e}", script.display()))?;

    let mut read_error = None;
    if let Some(stderr) = child.stderr.take() {
        for line in BufReader::new(stderr).lines() {
            match line {
                Ok(line) => log::info!("{line}"),
                Err(e) => {
                    read_error = Some(e);
                    break;
                }
            }
        }
    }

    // The pipe closes when the reader is dropped; reap the child before
    // surfacing a read failure
    let status = child.wait()?;
    if let Some(e) = read_error {
        return Err(format!("Failed to read download script output: {e}").into());
    }
    if !status.success() {
        return Err(format!("Download script exited with {status}").into());
    }
    Ok(())
}
