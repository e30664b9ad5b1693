use crate::errors::Result;
use serde::Deserialize;
use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Identifies the language toggle control that gets removed wholesale.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ToggleMarker {
    /// Element name of the control, e.g. `button`.
    #[serde(default = "default_toggle_tag")]
    pub tag: String,
    /// Class attribute value that marks the element as the toggle.
    #[serde(default = "default_toggle_class")]
    pub class: String,
}

impl Default for ToggleMarker {
    fn default() -> Self {
        Self {
            tag: default_toggle_tag(),
            class: default_toggle_class(),
        }
    }
}

/// Configuration for a strip run.
///
/// Every field has a default matching the English/Spanish markup the tool was
/// written for, so an empty YAML document is a valid configuration.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StripConfig {
    /// The toggle control to remove.
    #[serde(default)]
    pub toggle: ToggleMarker,
    /// Attributes carrying the secondary language's text.
    #[serde(default = "default_secondary")]
    pub secondary_attributes: Vec<String>,
    /// Attributes carrying a shadow copy of the kept language's text.
    #[serde(default = "default_primary")]
    pub primary_attributes: Vec<String>,
    /// File extensions to process.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Directory names to skip during discovery.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            toggle: ToggleMarker::default(),
            secondary_attributes: default_secondary(),
            primary_attributes: default_primary(),
            extensions: default_extensions(),
            exclude: Vec::new(),
        }
    }
}

impl StripConfig {
    /// Lowercased extensions without a leading dot.
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Replaces the extension and exclude lists with command-line values when given.
    pub fn with_overrides(mut self, extensions: Vec<String>, exclude: Vec<String>) -> Self {
        if !extensions.is_empty() {
            self.extensions = extensions;
        }
        if !exclude.is_empty() {
            self.exclude = exclude;
        }
        self
    }
}

fn default_toggle_tag() -> String {
    "button".to_string()
}

fn default_toggle_class() -> String {
    "lang-toggle".to_string()
}

fn default_secondary() -> Vec<String> {
    vec!["data-es".to_string()]
}

fn default_primary() -> Vec<String> {
    vec!["data-en".to_string()]
}

fn default_extensions() -> Vec<String> {
    vec!["html".to_string()]
}

/// A utility for locating and loading marker configurations.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Finds the configuration file by searching in a prioritized list of locations.
    ///
    /// The search order is:
    /// 1. The path as given (absolute, or relative to the current directory).
    /// 2. A path relative to the site root being processed.
    /// 3. Inside the user's config directory, under `langstrip/`.
    /// 4. Next to the executable, then one directory above it.
    pub fn find_config(config_path: &Path, root: &Path) -> Result<PathBuf> {
        if config_path.exists() {
            return Ok(config_path.to_path_buf());
        }

        let mut candidates = vec![root.join(config_path)];

        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("langstrip").join(config_path));
        }

        if let Ok(exe_path) = env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                candidates.push(exe_dir.join(config_path));
                if let Some(parent) = exe_dir.parent() {
                    candidates.push(parent.join(config_path));
                }
            }
        }

        if let Some(found) = candidates.iter().find(|p| p.exists()) {
            return Ok(found.clone());
        }

        let tried: Vec<String> = std::iter::once(config_path.to_path_buf())
            .chain(candidates)
            .map(|p| p.display().to_string())
            .collect();

        Err(format!(
            "Config file '{}' not found. Searched in:\n  - {}",
            config_path.display(),
            tried.join("\n  - ")
        )
        .into())
    }

    /// Loads a `StripConfig` from a YAML file.
    pub fn load_strip_config(path: &Path) -> Result<StripConfig> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }

    /// Resolves the configuration for a run: the YAML file when one is given,
    /// the built-in defaults otherwise.
    pub fn resolve(config_path: Option<&Path>, root: &Path) -> Result<StripConfig> {
        match config_path {
            Some(path) => {
                let resolved = Self::find_config(path, root)?;
                tracing::debug!(config = %resolved.display(), "loading marker configuration");
                Self::load_strip_config(&resolved)
            }
            None => Ok(StripConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_yaml_yields_defaults() {
        let config: StripConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, StripConfig::default());
        assert_eq!(config.toggle.tag, "button");
        assert_eq!(config.toggle.class, "lang-toggle");
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = "toggle:\n  class: lang-switch\nsecondary_attributes: [data-fr]\n";
        let config: StripConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.toggle.tag, "button");
        assert_eq!(config.toggle.class, "lang-switch");
        assert_eq!(config.secondary_attributes, vec!["data-fr"]);
        assert_eq!(config.primary_attributes, vec!["data-en"]);
    }

    #[test]
    fn test_extensions_are_normalized() {
        let config = StripConfig::default()
            .with_overrides(vec![".HTML".into(), " htm ".into()], vec![]);
        assert_eq!(config.normalized_extensions(), vec!["html", "htm"]);
    }

    #[test]
    fn test_find_config_relative_to_root() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("langstrip.yaml"), "exclude: [vendor]\n").unwrap();

        let found = ConfigLoader::find_config(Path::new("langstrip.yaml"), dir.path()).unwrap();
        assert_eq!(found, dir.path().join("langstrip.yaml"));

        let config = ConfigLoader::resolve(Some(Path::new("langstrip.yaml")), dir.path()).unwrap();
        assert_eq!(config.exclude, vec!["vendor"]);
    }

    #[test]
    fn test_missing_config_lists_locations() {
        let dir = TempDir::new().unwrap();
        let err = ConfigLoader::find_config(Path::new("nope-langstrip.yaml"), dir.path())
            .unwrap_err()
            .to_string();
        assert!(err.contains("nope-langstrip.yaml"));
        assert!(err.contains("Searched in"));
    }
}
