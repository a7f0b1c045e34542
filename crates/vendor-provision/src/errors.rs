use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {code} fetching {url}")]
    HttpStatus { url: String, code: u16 },

    #[error("redirect from {url} has no usable location")]
    MalformedRedirect { url: String },

    #[error("too many redirects fetching {url} (limit {limit})")]
    TooManyRedirects { url: String, limit: u32 },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a single extraction strategy.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Exit { program: String, status: ExitStatus },
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to create {}: {source}", path.display())]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{strategy} could not extract {}: {source}", archive.display())]
    PrimaryToolFailed {
        strategy: String,
        archive: PathBuf,
        #[source]
        source: StrategyError,
    },

    #[error("extraction of {} failed ({strategy}): {source}", archive.display())]
    ExtractionFailed {
        strategy: String,
        archive: PathBuf,
        #[source]
        source: StrategyError,
    },

    #[error("no extraction strategy available for {}", archive.display())]
    NoStrategy { archive: PathBuf },
}

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("failed to prepare {}: {source}", path.display())]
    Layout {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("extraction task for {target} did not complete: {source}")]
    ExtractTask {
        target: String,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("{target} artifact not found at {}", expected.display())]
    MissingManualArtifact {
        target: String,
        expected: PathBuf,
        hint: String,
    },

    #[error("failed to inspect {}: {source}", path.display())]
    Inspect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProvisionError {
    /// Soft failures are reported but do not stop the remaining targets.
    pub fn is_soft(&self) -> bool {
        matches!(self, ProvisionError::MissingManualArtifact { .. })
    }

    pub fn stage(&self) -> &'static str {
        match self {
            ProvisionError::Layout { .. } => "layout",
            ProvisionError::Fetch(_) => "fetch",
            ProvisionError::Extract(_) | ProvisionError::ExtractTask { .. } => "extract",
            ProvisionError::MissingManualArtifact { .. } => "manual artifact",
            ProvisionError::Inspect { .. } => "inspect",
        }
    }
}
