use std::process::ExitCode;

use anyhow::Result;
use vendor_provision::provision::{TargetStatus, inspect};
use vendor_provision::{VendorLayout, default_targets};

use crate::config::Settings;

pub fn exec(settings: &Settings) -> Result<ExitCode> {
    let layout = VendorLayout::new(&settings.root);
    let statuses = inspect(&layout, &default_targets(&settings.mingit_url));

    for status in &statuses {
        println!("{}", describe(status));
    }

    if statuses.iter().all(TargetStatus::ready) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn describe(status: &TargetStatus) -> String {
    let cache = if status.cached {
        format!("cached at {}", status.cache_path.display())
    } else {
        format!("missing {}", status.cache_path.display())
    };
    let dest = match (status.requires_extraction, status.populated) {
        (_, true) => format!("{} populated", status.dest_dir.display()),
        (true, false) => format!("{} not extracted", status.dest_dir.display()),
        (false, false) => "no extraction needed".to_string(),
    };
    let state = if status.ready() { "ready" } else { "pending" };
    format!("{}: {state} ({cache}; {dest})", status.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn status(cached: bool, populated: bool, requires_extraction: bool) -> TargetStatus {
        TargetStatus {
            name: "MinGit".into(),
            cache_path: PathBuf::from("vendor/cache/mingit.zip"),
            cached,
            dest_dir: PathBuf::from("vendor/git"),
            populated,
            requires_extraction,
        }
    }

    #[test]
    fn describes_ready_and_pending_targets() {
        assert_eq!(
            describe(&status(true, true, true)),
            "MinGit: ready (cached at vendor/cache/mingit.zip; vendor/git populated)"
        );
        assert_eq!(
            describe(&status(false, false, true)),
            "MinGit: pending (missing vendor/cache/mingit.zip; vendor/git not extracted)"
        );
        assert_eq!(
            describe(&status(true, false, false)),
            "MinGit: ready (cached at vendor/cache/mingit.zip; no extraction needed)"
        );
    }
}
