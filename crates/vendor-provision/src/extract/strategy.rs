use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::errors::StrategyError;

use super::locate::ToolHandle;

/// One way of unpacking an archive into a directory.
pub trait ExtractStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn extract(&self, archive: &Path, destination: &Path) -> Result<(), StrategyError>;
}

/// 7-Zip compatible tool found by the locator.
pub struct SevenZip {
    tool: ToolHandle,
}

impl SevenZip {
    pub fn new(tool: ToolHandle) -> Self {
        Self { tool }
    }

    fn command(&self, archive: &Path, destination: &Path) -> Command {
        let mut output_flag = OsString::from("-o");
        output_flag.push(destination.as_os_str());

        let mut command = Command::new(self.tool.program());
        command.arg("x").arg("-y").arg(archive).arg(output_flag);
        command
    }
}

impl ExtractStrategy for SevenZip {
    fn name(&self) -> &str {
        "7-Zip"
    }

    fn extract(&self, archive: &Path, destination: &Path) -> Result<(), StrategyError> {
        run(self.command(archive, destination))
    }
}

/// Archive expansion that ships with the host environment.
pub struct NativeExpand;

impl NativeExpand {
    #[cfg(windows)]
    fn command(&self, archive: &Path, destination: &Path) -> Command {
        let script = format!(
            "Expand-Archive -Force -LiteralPath '{}' -DestinationPath '{}'",
            powershell_quote(archive),
            powershell_quote(destination)
        );
        let mut command = Command::new("powershell");
        command
            .args(["-NoProfile", "-ExecutionPolicy", "Bypass", "-Command"])
            .arg(script);
        command
    }

    #[cfg(not(windows))]
    fn command(&self, archive: &Path, destination: &Path) -> Command {
        let mut command = Command::new("unzip");
        command
            .arg("-o")
            .arg("-q")
            .arg(archive)
            .arg("-d")
            .arg(destination);
        command
    }
}

impl ExtractStrategy for NativeExpand {
    fn name(&self) -> &str {
        if cfg!(windows) {
            "Expand-Archive"
        } else {
            "unzip"
        }
    }

    fn extract(&self, archive: &Path, destination: &Path) -> Result<(), StrategyError> {
        run(self.command(archive, destination))
    }
}

#[cfg(windows)]
fn powershell_quote(path: &Path) -> String {
    path.to_string_lossy().replace('\'', "''")
}

/// Runs a tool with inherited output so the operator sees its progress.
fn run(mut command: Command) -> Result<(), StrategyError> {
    let program = command.get_program().to_string_lossy().into_owned();
    let status = command
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| StrategyError::Spawn {
            program: program.clone(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(StrategyError::Exit { program, status })
    }
}
