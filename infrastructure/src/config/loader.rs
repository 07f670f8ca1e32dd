//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_CONFIG_NAMES: [&str; 2] = ["cafe.toml", ".cafe.toml"];
const APP_DIR: &str = "cafe-assistant";

/// A config file that takes part in loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Global(PathBuf),
    Project(PathBuf),
    Explicit(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Global(p) | ConfigSource::Project(p) | ConfigSource::Explicit(p) => p,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ConfigSource::Global(_) => "Global: ",
            ConfigSource::Project(_) => "Project:",
            ConfigSource::Explicit(_) => "File:   ",
        }
    }
}

/// Discovers config files and merges them over the built-in defaults
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration, later sources winning:
    /// defaults, then the global file
    /// (`$XDG_CONFIG_HOME/cafe-assistant/config.toml`), `./cafe.toml` or
    /// `./.cafe.toml`, the explicit `--config` file, and finally `CAFE_`
    /// environment variables with `__` separating sections.
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::sources(config_path)
            .iter()
            .fold(
                Figment::new().merge(Serialized::defaults(FileConfig::default())),
                |figment, source| figment.merge(Toml::file(source.path())),
            )
            .merge(Env::prefixed("CAFE_").split("__"))
            .extract()
            .map_err(Box::new)
    }

    /// Built-in defaults only (`--no-config`)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Files that exist (or were named explicitly), lowest priority first.
    pub fn sources(config_path: Option<&Path>) -> Vec<ConfigSource> {
        let mut sources = Vec::new();
        if let Some(path) = Self::global_config_path().filter(|p| p.exists()) {
            sources.push(ConfigSource::Global(path));
        }
        if let Some(path) = Self::project_config_path() {
            sources.push(ConfigSource::Project(path));
        }
        if let Some(path) = config_path {
            sources.push(ConfigSource::Explicit(path.to_path_buf()));
        }
        sources
    }

    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// First of `cafe.toml`, `.cafe.toml` in the working directory
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Default location of the REPL line history
    pub fn default_history_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join(APP_DIR).join("history.txt"))
    }

    /// `--show-config`: list the sources, highest priority first.
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (highest priority first):");
        println!("  Env:      CAFE_* (e.g. CAFE_BACKEND__KIND=ollama)");
        let sources = Self::sources(config_path);
        for source in sources.iter().rev() {
            println!("  {}  {}", source.label(), source.path().display());
        }
        if sources.is_empty()
            && let Some(path) = Self::global_config_path()
        {
            println!("  (no config files; global would be {})", path.display());
        }
        println!("  Defaults: built-in");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.agent.max_turns, 10);
        assert!(config.search.enabled);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("cafe-assistant"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ollama]\nmodel = \"phi3\"\n\n[database]\nmax_rows = 7").unwrap();

        let config = ConfigLoader::load(Some(file.path())).unwrap();
        assert_eq!(config.ollama.model, "phi3");
        assert_eq!(config.database.max_rows, 7);
        // Untouched sections keep defaults
        assert_eq!(config.ollama.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_explicit_file_is_last_source() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let sources = ConfigLoader::sources(Some(file.path()));
        assert_eq!(
            sources.last(),
            Some(&ConfigSource::Explicit(file.path().to_path_buf()))
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[agent]\nmax_turns = \"many\"").unwrap();
        assert!(ConfigLoader::load(Some(file.path())).is_err());
    }
}
