//! Provisions vendored build tools: fetch archives into a cache, then extract
//! them into the vendor tree.

pub mod errors;

pub mod extract;
pub mod fetch;
pub mod layout;
pub mod provision;
pub mod targets;

pub use errors::{ExtractError, FetchError, ProvisionError, StrategyError};
pub use extract::{Extract, Extractor, ToolHandle, locate};
pub use fetch::{Fetch, HttpFetcher, MAX_REDIRECTS};
pub use layout::VendorLayout;
pub use provision::{ProvisionEvent, Provisioner, RunReport, TargetOutcome, TargetState};
pub use targets::{ArtifactSource, Target, default_targets};
