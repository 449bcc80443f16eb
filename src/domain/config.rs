use std::{num::NonZeroUsize, path::Path};

use serde::{Deserialize, Serialize};

/// Configuration for browsing a data source.
///
/// Stored as TOML next to the data, see [`Config::FILE_NAME`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The number of asset records requested per page.
    page_size: NonZeroUsize,

    /// Whether nodes parked at the root because their parent had not been
    /// fetched yet are moved under that parent when it arrives.
    pub adopt_orphans: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            adopt_orphans: false,
        }
    }
}

impl Config {
    /// Name of the configuration file inside the data root.
    pub const FILE_NAME: &'static str = "assets.toml";

    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration from the data root, falling back to the
    /// defaults if the file is missing or invalid.
    #[must_use]
    pub fn load_or_default(root: &Path) -> Self {
        let path = root.join(Self::FILE_NAME);
        Self::load(&path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the number of asset records requested per page.
    #[must_use]
    pub const fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Sets the number of asset records requested per page.
    pub const fn set_page_size(&mut self, page_size: NonZeroUsize) {
        self.page_size = page_size;
    }
}

const fn default_page_size() -> NonZeroUsize {
    match NonZeroUsize::new(50) {
        Some(size) => size,
        None => unreachable!(),
    }
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_page_size")]
        page_size: NonZeroUsize,

        #[serde(default)]
        adopt_orphans: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                page_size,
                adopt_orphans,
            } => Self {
                page_size,
                adopt_orphans,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            page_size: config.page_size,
            adopt_orphans: config.adopt_orphans,
        }
    }
}
