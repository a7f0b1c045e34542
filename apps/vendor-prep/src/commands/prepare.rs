use std::fmt::Write as _;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use vendor_provision::{
    ArtifactSource, Extractor, HttpFetcher, ProvisionEvent, Provisioner, RunReport, Target,
    VendorLayout, default_targets, locate,
};

use crate::config::Settings;

pub async fn exec(settings: &Settings) -> Result<ExitCode> {
    let layout = VendorLayout::new(&settings.root);
    let targets = default_targets(&settings.mingit_url);

    let fetcher = HttpFetcher::new(settings.timeout).context("Failed to create HTTP client")?;
    let extractor = Arc::new(Extractor::for_host(locate(&layout)));
    tracing::debug!(strategies = ?extractor.strategy_names(), "extraction strategies");

    let report = Provisioner::new(&layout, &fetcher, extractor)
        .run(&targets, print_event)
        .await;

    if !report.succeeded() {
        eprint!("{}", failure_summary(&layout, &targets, &report));
    }

    Ok(ExitCode::from(report.exit_code()))
}

fn print_event(event: &ProvisionEvent) {
    if event.is_warning() {
        eprintln!("{event}");
    } else {
        println!("{event}");
    }
}

/// Names each failed stage and where the operator can place artifacts by hand.
fn failure_summary(layout: &VendorLayout, targets: &[Target], report: &RunReport) -> String {
    let mut out = String::new();
    let heading = if report.aborted() {
        "Vendor prep failed"
    } else {
        "Vendor prep incomplete"
    };

    if let Some(err) = report.setup_error() {
        let _ = writeln!(out, "{heading}: {err}");
    }
    for outcome in report.failures() {
        if let Some(err) = &outcome.error {
            let _ = writeln!(out, "{heading}: {} ({}): {err}", outcome.name, err.stage());
        }
    }

    let _ = writeln!(
        out,
        "Ensure these artifacts are present in {}:",
        layout.cache_dir().display()
    );
    for target in targets {
        let source = match &target.source {
            ArtifactSource::Remote { url } => format!("from {url}"),
            ArtifactSource::Manual { hint } => hint.clone(),
        };
        let _ = writeln!(
            out,
            "  - {} for {} ({source})",
            layout.cache_path(target).display(),
            target.name
        );
    }
    out
}
