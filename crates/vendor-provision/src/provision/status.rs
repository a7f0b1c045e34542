use std::path::PathBuf;

use crate::layout::{VendorLayout, dir_is_empty};
use crate::targets::Target;

/// Read-only view of a target on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetStatus {
    pub name: String,
    pub cache_path: PathBuf,
    pub cached: bool,
    pub dest_dir: PathBuf,
    pub populated: bool,
    pub requires_extraction: bool,
}

impl TargetStatus {
    /// Whether `prepare` would have nothing left to do for this target.
    pub fn ready(&self) -> bool {
        self.cached && (self.populated || !self.requires_extraction)
    }
}

/// Inspects the vendor tree without creating directories or touching the network.
pub fn inspect(layout: &VendorLayout, targets: &[Target]) -> Vec<TargetStatus> {
    targets
        .iter()
        .map(|target| {
            let cache_path = layout.cache_path(target);
            let dest_dir = layout.dest_dir(target);
            TargetStatus {
                name: target.name.clone(),
                cached: cache_path.is_file(),
                populated: dir_is_empty(&dest_dir).map(|empty| !empty).unwrap_or(false),
                requires_extraction: target.requires_extraction,
                cache_path,
                dest_dir,
            }
        })
        .collect()
}
