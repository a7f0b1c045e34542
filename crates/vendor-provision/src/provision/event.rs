use std::fmt;
use std::path::PathBuf;

/// Status line emitted while provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionEvent {
    Downloading { target: String, url: String },
    UsingCached { target: String, path: PathBuf },
    Extracting { target: String },
    AlreadyExtracted { target: String },
    /// Cached artifact that is used as-is, without extraction.
    Preparing { target: String },
    ExtractionNotNeeded { target: String },
    AlreadyPrepared { target: String },
    MissingManualArtifact {
        target: String,
        expected: PathBuf,
        hint: String,
    },
    Finished,
}

impl ProvisionEvent {
    /// Warnings go to stderr.
    pub fn is_warning(&self) -> bool {
        matches!(self, ProvisionEvent::MissingManualArtifact { .. })
    }
}

impl fmt::Display for ProvisionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionEvent::Downloading { target, .. } => write!(f, "Downloading {target}..."),
            ProvisionEvent::UsingCached { path, .. } => write!(f, "Using cached {}", path.display()),
            ProvisionEvent::Extracting { target } => write!(f, "Extracting {target}..."),
            ProvisionEvent::AlreadyExtracted { target } => write!(f, "{target} already extracted"),
            ProvisionEvent::Preparing { target } => write!(f, "Preparing {target}..."),
            ProvisionEvent::ExtractionNotNeeded { target } => write!(
                f,
                "{target} executable detected, skipping extraction. \
                 Make sure {target} is installed or its binaries are on PATH."
            ),
            ProvisionEvent::AlreadyPrepared { target } => write!(f, "{target} already prepared"),
            ProvisionEvent::MissingManualArtifact {
                target,
                expected,
                hint,
            } => write!(
                f,
                "{target} not found in the vendor cache! {hint} and place it as {}",
                expected.display()
            ),
            ProvisionEvent::Finished => write!(f, "Vendor preparation done."),
        }
    }
}
