pub mod locate;
pub mod strategy;

use std::path::Path;

use tracing::{debug, info, warn};

use crate::errors::ExtractError;

pub use locate::{ToolHandle, default_candidates, locate, locate_from};
pub use strategy::{ExtractStrategy, NativeExpand, SevenZip};

pub trait Extract: Send + Sync {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<(), ExtractError>;
}

/// Tries its strategies in order until one succeeds; only the last failure is fatal.
pub struct Extractor {
    strategies: Vec<Box<dyn ExtractStrategy>>,
}

impl Extractor {
    pub fn new(strategies: Vec<Box<dyn ExtractStrategy>>) -> Self {
        Self { strategies }
    }

    /// Located tool first (if any), then `fallback`.
    pub fn from_located(tool: Option<ToolHandle>, fallback: Box<dyn ExtractStrategy>) -> Self {
        let mut strategies: Vec<Box<dyn ExtractStrategy>> = Vec::new();
        match tool {
            Some(tool) => strategies.push(Box::new(SevenZip::new(tool))),
            None => debug!("no archive tool located; extraction uses the fallback only"),
        }
        strategies.push(fallback);
        Self::new(strategies)
    }

    pub fn for_host(tool: Option<ToolHandle>) -> Self {
        Self::from_located(tool, Box::new(NativeExpand))
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|strategy| strategy.name()).collect()
    }
}

impl Extract for Extractor {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<(), ExtractError> {
        std::fs::create_dir_all(destination).map_err(|source| ExtractError::CreateDestination {
            path: destination.to_path_buf(),
            source,
        })?;

        let mut strategies = self.strategies.iter().peekable();
        while let Some(strategy) = strategies.next() {
            match strategy.extract(archive, destination) {
                Ok(()) => {
                    info!(
                        strategy = strategy.name(),
                        archive = %archive.display(),
                        destination = %destination.display(),
                        "archive extracted"
                    );
                    return Ok(());
                }
                Err(source) if strategies.peek().is_some() => {
                    let recovered = ExtractError::PrimaryToolFailed {
                        strategy: strategy.name().to_string(),
                        archive: archive.to_path_buf(),
                        source,
                    };
                    warn!("{recovered}; using fallback");
                }
                Err(source) => {
                    return Err(ExtractError::ExtractionFailed {
                        strategy: strategy.name().to_string(),
                        archive: archive.to_path_buf(),
                        source,
                    });
                }
            }
        }

        Err(ExtractError::NoStrategy {
            archive: archive.to_path_buf(),
        })
    }
}
