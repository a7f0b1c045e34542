pub const MINGIT_URL: &str = "https://github.com/git-for-windows/git/releases/download/v2.45.2.windows.1/MinGit-2.45.2-64-bit.zip";
const GNUPG_DOWNLOAD_PAGE: &str = "https://gnupg.org/download/index.html";

/// Where a target's cached artifact comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    Remote { url: String },
    /// The operator places the artifact by hand; `hint` says where to get it.
    Manual { hint: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub source: ArtifactSource,
    /// File name inside the vendor cache directory.
    pub cache_file: String,
    /// Directory name under the vendor root that receives the contents.
    pub dest_dir: String,
    pub requires_extraction: bool,
}

impl Target {
    pub fn remote(name: &str, url: &str, cache_file: &str, dest_dir: &str) -> Self {
        Self {
            name: name.to_string(),
            source: ArtifactSource::Remote {
                url: url.to_string(),
            },
            cache_file: cache_file.to_string(),
            dest_dir: dest_dir.to_string(),
            requires_extraction: true,
        }
    }

    /// Manual artifacts are already executable, so they skip extraction.
    pub fn manual(name: &str, hint: &str, cache_file: &str, dest_dir: &str) -> Self {
        Self {
            name: name.to_string(),
            source: ArtifactSource::Manual {
                hint: hint.to_string(),
            },
            cache_file: cache_file.to_string(),
            dest_dir: dest_dir.to_string(),
            requires_extraction: false,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match &self.source {
            ArtifactSource::Remote { url } => Some(url),
            ArtifactSource::Manual { .. } => None,
        }
    }
}

/// Targets provisioned for the build, in run order.
pub fn default_targets(mingit_url: &str) -> Vec<Target> {
    vec![
        Target::remote("MinGit", mingit_url, "mingit.zip", "git"),
        Target::manual(
            "GnuPG",
            &format!("Download gnupg-w32-*.exe from {GNUPG_DOWNLOAD_PAGE}"),
            "gnupg.exe",
            "gnupg",
        ),
    ]
}
