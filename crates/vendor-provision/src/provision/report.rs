use crate::errors::ProvisionError;
use crate::targets::Target;

/// Per-target progress. `Failed` can follow any other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    NotStarted,
    Cached,
    Fetching,
    Fetched,
    Extracting,
    Done,
    Failed,
}

#[derive(Debug)]
pub struct TargetOutcome {
    pub name: String,
    pub state: TargetState,
    pub error: Option<ProvisionError>,
}

/// Aggregate result of one provisioning run.
#[derive(Debug)]
pub struct RunReport {
    outcomes: Vec<TargetOutcome>,
    setup_error: Option<ProvisionError>,
    aborted: bool,
}

impl RunReport {
    pub(crate) fn new(targets: &[Target]) -> Self {
        Self {
            outcomes: targets
                .iter()
                .map(|target| TargetOutcome {
                    name: target.name.clone(),
                    state: TargetState::NotStarted,
                    error: None,
                })
                .collect(),
            setup_error: None,
            aborted: false,
        }
    }

    pub(crate) fn state_mut(&mut self, index: usize) -> &mut TargetState {
        &mut self.outcomes[index].state
    }

    pub(crate) fn fail(&mut self, index: usize, error: ProvisionError) {
        let outcome = &mut self.outcomes[index];
        outcome.state = TargetState::Failed;
        outcome.error = Some(error);
    }

    pub(crate) fn abort(&mut self) {
        self.aborted = true;
    }

    pub(crate) fn fail_setup(&mut self, error: ProvisionError) {
        self.setup_error = Some(error);
        self.aborted = true;
    }

    pub fn outcomes(&self) -> &[TargetOutcome] {
        &self.outcomes
    }

    pub fn outcome(&self, name: &str) -> Option<&TargetOutcome> {
        self.outcomes.iter().find(|outcome| outcome.name == name)
    }

    pub fn setup_error(&self) -> Option<&ProvisionError> {
        self.setup_error.as_ref()
    }

    /// True when a hard failure stopped the run before every target was attempted.
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    pub fn failures(&self) -> impl Iterator<Item = &TargetOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.state == TargetState::Failed)
    }

    pub fn succeeded(&self) -> bool {
        self.setup_error.is_none()
            && self
                .outcomes
                .iter()
                .all(|outcome| outcome.state == TargetState::Done)
    }

    pub fn exit_code(&self) -> u8 {
        if self.succeeded() { 0 } else { 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::default_targets;
    use std::path::PathBuf;

    #[test]
    fn fresh_report_is_not_successful() {
        let report = RunReport::new(&default_targets("https://example.invalid/mingit.zip"));
        assert!(!report.succeeded());
        assert_eq!(report.exit_code(), 1);
        assert!(report
            .outcomes()
            .iter()
            .all(|outcome| outcome.state == TargetState::NotStarted));
    }

    #[test]
    fn all_done_exits_zero() {
        let mut report = RunReport::new(&default_targets("https://example.invalid/mingit.zip"));
        for index in 0..report.outcomes().len() {
            *report.state_mut(index) = TargetState::Done;
        }
        assert!(report.succeeded());
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.failures().count(), 0);
    }

    #[test]
    fn soft_failure_still_fails_the_run() {
        let mut report = RunReport::new(&default_targets("https://example.invalid/mingit.zip"));
        *report.state_mut(0) = TargetState::Done;
        report.fail(
            1,
            ProvisionError::MissingManualArtifact {
                target: "GnuPG".into(),
                expected: PathBuf::from("vendor/cache/gnupg.exe"),
                hint: String::new(),
            },
        );

        assert!(!report.aborted());
        assert_eq!(report.exit_code(), 1);
        let failed = report.outcome("GnuPG").expect("gnupg outcome");
        assert_eq!(failed.state, TargetState::Failed);
        assert_eq!(failed.error.as_ref().map(ProvisionError::stage), Some("manual artifact"));
    }
}
