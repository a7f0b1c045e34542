mod event;
mod report;
mod status;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::ProvisionError;
use crate::extract::Extract;
use crate::fetch::Fetch;
use crate::layout::{VendorLayout, dir_is_empty};
use crate::targets::{ArtifactSource, Target};

pub use event::ProvisionEvent;
pub use report::{RunReport, TargetOutcome, TargetState};
pub use status::{TargetStatus, inspect};

/// Runs cache-check, fetch and extract for each target, one at a time.
pub struct Provisioner<'a, F: ?Sized, E: ?Sized> {
    layout: &'a VendorLayout,
    fetcher: &'a F,
    extractor: Arc<E>,
}

impl<'a, F, E> Provisioner<'a, F, E>
where
    F: Fetch + ?Sized,
    E: Extract + ?Sized + 'static,
{
    pub fn new(layout: &'a VendorLayout, fetcher: &'a F, extractor: Arc<E>) -> Self {
        Self {
            layout,
            fetcher,
            extractor,
        }
    }

    /// Hard failures stop the run; a missing manual artifact is reported and the
    /// remaining targets still run.
    pub async fn run<C>(&self, targets: &[Target], mut on_event: C) -> RunReport
    where
        C: FnMut(&ProvisionEvent),
    {
        let mut report = RunReport::new(targets);

        if let Err(err) = self.layout.ensure(targets) {
            warn!("vendor layout could not be created: {err}");
            report.fail_setup(err);
            return report;
        }

        for (index, target) in targets.iter().enumerate() {
            let result = self
                .provision_target(target, report.state_mut(index), &mut on_event)
                .await;

            match result {
                Ok(()) => debug!(target = %target.name, "target provisioned"),
                Err(err) if err.is_soft() => {
                    if let ProvisionError::MissingManualArtifact {
                        target,
                        expected,
                        hint,
                    } = &err
                    {
                        on_event(&ProvisionEvent::MissingManualArtifact {
                            target: target.clone(),
                            expected: expected.clone(),
                            hint: hint.clone(),
                        });
                    }
                    report.fail(index, err);
                }
                Err(err) => {
                    warn!(target = %target.name, stage = err.stage(), "provisioning aborted: {err}");
                    report.fail(index, err);
                    report.abort();
                    break;
                }
            }
        }

        if report.succeeded() {
            on_event(&ProvisionEvent::Finished);
        }
        report
    }

    async fn provision_target<C>(
        &self,
        target: &Target,
        state: &mut TargetState,
        on_event: &mut C,
    ) -> Result<(), ProvisionError>
    where
        C: FnMut(&ProvisionEvent),
    {
        let cache_path = self.layout.cache_path(target);
        let cached = cache_path.is_file();

        match &target.source {
            ArtifactSource::Remote { url } if !cached => {
                *state = TargetState::Fetching;
                on_event(&ProvisionEvent::Downloading {
                    target: target.name.clone(),
                    url: url.clone(),
                });
                self.fetcher.fetch(url, &cache_path).await?;
            }
            ArtifactSource::Manual { hint } if !cached => {
                return Err(ProvisionError::MissingManualArtifact {
                    target: target.name.clone(),
                    expected: cache_path,
                    hint: hint.clone(),
                });
            }
            _ => {
                *state = TargetState::Cached;
                if target.url().is_some() {
                    on_event(&ProvisionEvent::UsingCached {
                        target: target.name.clone(),
                        path: cache_path.clone(),
                    });
                }
            }
        }
        *state = TargetState::Fetched;
        if !target.requires_extraction {
            on_event(&ProvisionEvent::Preparing {
                target: target.name.clone(),
            });
        }

        let dest = self.layout.dest_dir(target);
        let empty = dir_is_empty(&dest).map_err(|source| ProvisionError::Inspect {
            path: dest.clone(),
            source,
        })?;

        let event = match (target.requires_extraction, empty) {
            (true, true) => {
                *state = TargetState::Extracting;
                on_event(&ProvisionEvent::Extracting {
                    target: target.name.clone(),
                });
                self.extract_off_runtime(target, &cache_path, &dest).await?;
                None
            }
            (true, false) => Some(ProvisionEvent::AlreadyExtracted {
                target: target.name.clone(),
            }),
            (false, true) => Some(ProvisionEvent::ExtractionNotNeeded {
                target: target.name.clone(),
            }),
            (false, false) => Some(ProvisionEvent::AlreadyPrepared {
                target: target.name.clone(),
            }),
        };
        if let Some(event) = event {
            on_event(&event);
        }

        *state = TargetState::Done;
        Ok(())
    }

    /// Extraction waits on external tools, so it runs on the blocking pool.
    async fn extract_off_runtime(
        &self,
        target: &Target,
        archive: &Path,
        dest: &Path,
    ) -> Result<(), ProvisionError> {
        let extractor = Arc::clone(&self.extractor);
        let archive = archive.to_path_buf();
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || extractor.extract(&archive, &dest))
            .await
            .map_err(|source| ProvisionError::ExtractTask {
                target: target.name.clone(),
                source,
            })??;
        Ok(())
    }
}
