use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::layout::VendorLayout;

#[cfg(windows)]
const BUNDLED_TOOL: &str = "7za.exe";
#[cfg(not(windows))]
const BUNDLED_TOOL: &str = "7za";

/// Archive tool that answered the availability probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolHandle {
    program: PathBuf,
}

impl ToolHandle {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

/// Candidates in priority order: bundled copies first, then `PATH` lookups.
pub fn default_candidates(layout: &VendorLayout) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(dir.join(BUNDLED_TOOL));
    }
    candidates.push(layout.bin_dir().join(BUNDLED_TOOL));
    candidates.push(PathBuf::from("7z"));
    candidates.push(PathBuf::from("7za"));
    candidates
}

pub fn locate(layout: &VendorLayout) -> Option<ToolHandle> {
    locate_from(&default_candidates(layout))
}

/// Returns the first candidate that responds to `-h`, or `None`.
pub fn locate_from(candidates: &[PathBuf]) -> Option<ToolHandle> {
    let found = candidates
        .iter()
        .find(|candidate| responds(candidate))
        .map(|program| ToolHandle::new(program.clone()));

    match &found {
        Some(tool) => debug!(program = %tool.program.display(), "archive tool located"),
        None => debug!("no archive tool responded"),
    }
    found
}

fn responds(candidate: &Path) -> bool {
    let output = match Command::new(candidate)
        .arg("-h")
        .stdin(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(err) => {
            debug!(candidate = %candidate.display(), "archive tool probe failed: {err}");
            return false;
        }
    };

    // Some builds print usage and still exit nonzero.
    output.status.success() || !output.stdout.is_empty()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod script");
        path
    }

    #[test]
    fn first_responding_candidate_wins() {
        let temp = TempDir::new().expect("temp dir");
        let first = script(temp.path(), "first", "exit 0");
        let second = script(temp.path(), "second", "exit 0");

        let tool = locate_from(&[first.clone(), second]).expect("tool located");
        assert_eq!(tool.program(), first.as_path());
    }

    #[test]
    fn usage_on_stdout_counts_despite_nonzero_exit() {
        let temp = TempDir::new().expect("temp dir");
        let noisy = script(temp.path(), "noisy", "echo 'Usage: 7za <command>'\nexit 7");

        let tool = locate_from(&[noisy.clone()]).expect("tool located");
        assert_eq!(tool.program(), noisy.as_path());
    }

    #[test]
    fn silent_failures_and_missing_programs_are_skipped() {
        let temp = TempDir::new().expect("temp dir");
        let missing = temp.path().join("not-installed");
        let silent = script(temp.path(), "silent", "echo oops >&2\nexit 2");
        let working = script(temp.path(), "working", "exit 0");

        let tool = locate_from(&[missing, silent, working.clone()]).expect("tool located");
        assert_eq!(tool.program(), working.as_path());
    }

    #[test]
    fn no_candidate_yields_none() {
        let temp = TempDir::new().expect("temp dir");
        let silent = script(temp.path(), "silent", "exit 1");

        assert_eq!(locate_from(&[temp.path().join("absent"), silent]), None);
        assert_eq!(locate_from(&[]), None);
    }

    #[test]
    fn default_candidates_prefer_bundled_tools() {
        let layout = VendorLayout::new("vendor");
        let candidates = default_candidates(&layout);

        let names: Vec<_> = candidates.iter().rev().take(2).collect();
        assert_eq!(names, [&PathBuf::from("7za"), &PathBuf::from("7z")]);
        assert!(candidates.contains(&layout.bin_dir().join(BUNDLED_TOOL)));
    }
}
