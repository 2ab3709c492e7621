//! Import configuration.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the standard layout of an upstream checkout. Relative paths resolve
//! against the upstream directory; absolute paths are used as-is.
//!
//! # Example YAML
//!
//! ```yaml
//! renderer: scripts/transclude-template
//! definitions_dir: interface-definitions
//! definition_suffix: .xml.in
//! allowed_roots:
//!   - system
//!   - interfaces
//!   - firewall
//! render_timeout_secs: 30
//! ```

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::discover::DiscoverError;
use crate::render::Renderer;
use crate::walker::{DEFAULT_ALLOWED_ROOTS, TreeWalker};

/// Settings for one import run.
///
/// # Examples
///
/// ```
/// use cmdtree_discovery::config::ImportConfig;
///
/// let config: ImportConfig = serde_yaml::from_str("render_timeout_secs: 5").unwrap();
/// assert_eq!(config.definition_suffix, ".xml.in");
/// assert_eq!(config.render_timeout().unwrap().as_secs(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Renderer program, relative to the upstream directory.
    pub renderer: PathBuf,
    /// Directory holding definition sources, relative to the upstream directory.
    pub definitions_dir: PathBuf,
    /// File name suffix selecting definition sources.
    pub definition_suffix: String,
    /// Root keywords walked during extraction.
    pub allowed_roots: Vec<String>,
    /// Per-file renderer timeout; `None` waits indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_timeout_secs: Option<u64>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            renderer: PathBuf::from("scripts/transclude-template"),
            definitions_dir: PathBuf::from("interface-definitions"),
            definition_suffix: ".xml.in".to_string(),
            allowed_roots: DEFAULT_ALLOWED_ROOTS.iter().map(|root| root.to_string()).collect(),
            render_timeout_secs: None,
        }
    }
}

impl ImportConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoverError::Io`] if the file cannot be read, or
    /// [`DiscoverError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DiscoverError> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|err| DiscoverError::io(path, err))?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DiscoverError> {
        let path = path.as_ref();
        let raw = serde_yaml::to_string(self)?;
        fs::write(path, raw).map_err(|err| DiscoverError::io(path, err))
    }

    /// Resolves the renderer path against `upstream_dir`.
    pub fn renderer_path(&self, upstream_dir: &Path) -> PathBuf {
        upstream_dir.join(&self.renderer)
    }

    /// Resolves the definitions directory against `upstream_dir`.
    pub fn definitions_path(&self, upstream_dir: &Path) -> PathBuf {
        upstream_dir.join(&self.definitions_dir)
    }

    pub fn render_timeout(&self) -> Option<Duration> {
        self.render_timeout_secs.map(Duration::from_secs)
    }

    /// Builds the renderer for a checkout.
    pub fn renderer(&self, upstream_dir: &Path) -> Renderer {
        Renderer::new(self.renderer_path(upstream_dir)).with_timeout(self.render_timeout())
    }

    /// Builds the tree walker for the configured allow-list.
    pub fn walker(&self) -> TreeWalker {
        TreeWalker::new(self.allowed_roots.iter().cloned())
    }
}
