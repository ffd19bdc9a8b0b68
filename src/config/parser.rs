//! Specification parser for loading cluster specifications.
//!
//! This module handles loading specifications from YAML files and
//! environment variables, with proper precedence and error handling.

use crate::error::{ConfigError, ResourceSetError, Result};
use std::path::Path;
use tracing::{debug, info};

use super::spec::ClusterSpec;

/// Specification parser for loading cluster specifications.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving relative paths.
    base_path: Option<std::path::PathBuf>,
}

impl ConfigParser {
    /// Creates a new specification parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads a specification from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ClusterSpec> {
        let path = path.as_ref();
        info!("Loading specification from: {}", path.display());

        if !path.exists() {
            return Err(ResourceSetError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ResourceSetError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses a specification from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<ClusterSpec> {
        debug!("Parsing YAML specification");

        let spec: ClusterSpec = serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            ResourceSetError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })?;

        debug!("Successfully parsed specification for cluster: {}", spec.name);
        Ok(spec)
    }

    /// Loads a specification with environment variable overrides.
    ///
    /// Environment variables are checked in the format
    /// `RESOURCESET_CLUSTER_<KEY>` (e.g., `RESOURCESET_CLUSTER_NAME`).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<ClusterSpec> {
        let mut spec = self.load_file(path)?;

        Self::apply_env_overrides(&mut spec);

        Ok(spec)
    }

    /// Applies environment variable overrides to the specification.
    fn apply_env_overrides(spec: &mut ClusterSpec) {
        if let Ok(name) = std::env::var("RESOURCESET_CLUSTER_NAME") {
            debug!("Overriding name from environment");
            spec.name = name;
        }

        if let Ok(namespace) = std::env::var("RESOURCESET_CLUSTER_NAMESPACE") {
            debug!("Overriding namespace from environment");
            spec.namespace = namespace;
        }

        if let Ok(version) = std::env::var("RESOURCESET_CLUSTER_VERSION") {
            debug!("Overriding version from environment");
            spec.version = Some(version);
        }
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| std::path::PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                ResourceSetError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Default specification file names to search for.
pub const DEFAULT_SPEC_FILES: &[&str] = &[
    "temporal-cluster.yaml",
    "temporal-cluster.yml",
    "cluster.yaml",
    "cluster.yml",
];

/// Finds the specification file in the given directory or its parents.
///
/// # Errors
///
/// Returns an error if no specification file is found.
pub fn find_spec_file(start_dir: impl AsRef<Path>) -> Result<std::path::PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        for filename in DEFAULT_SPEC_FILES {
            let spec_path = current.join(filename);
            if spec_path.exists() {
                info!("Found specification file: {}", spec_path.display());
                return Ok(spec_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(ResourceSetError::Config(ConfigError::FileNotFound {
        path: start.join(DEFAULT_SPEC_FILES[0]),
    }))
}
