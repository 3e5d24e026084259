//! Loading resolver configs from files.
//!
//! Files ending in `.json` are parsed as JSON; everything else as YAML.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use fetchr_api::Transport;
use fetchr_types::{Config, ConfigBundle};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::resolver::{Resolver, create_resolver_with_transport};
use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some(extension) if extension.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }

    fn parse<T: DeserializeOwned>(self, text: &str) -> Result<T, ConfigError> {
        Ok(match self {
            Self::Json => serde_json::from_str(text)?,
            Self::Yaml => serde_yaml::from_str(text)?,
        })
    }
}

fn read_document(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a single resolver config.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let text = read_document(path)?;
    DocumentFormat::from_path(path).parse(&text)
}

/// Loads a document holding several configs under `resolvers`.
///
/// A document holding one config is accepted too and becomes a bundle of
/// one, named after the file stem.
///
/// ```rust
/// use fetchr_engine::load_bundle_file;
///
/// let temp_dir = tempfile::tempdir()?;
/// let bundle_path = temp_dir.path().join("users.yaml");
/// std::fs::write(&bundle_path, "type: rest\nurl: https://jsonplaceholder.typicode.com/users\n")?;
///
/// let bundle = load_bundle_file(&bundle_path)?;
/// assert!(bundle.resolvers.contains_key("users"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn load_bundle_file(path: impl AsRef<Path>) -> Result<ConfigBundle, ConfigError> {
    let path = path.as_ref();
    let text = read_document(path)?;
    let format = DocumentFormat::from_path(path);

    if let Ok(bundle) = format.parse::<ConfigBundle>(&text) {
        debug!(path = %path.display(), resolver_count = bundle.resolvers.len(), "loaded resolver bundle");
        return Ok(bundle);
    }

    match format.parse::<Config>(&text) {
        Ok(config) => {
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("default")
                .to_string();
            let mut resolvers = IndexMap::new();
            resolvers.insert(name, config);
            Ok(ConfigBundle { resolvers })
        }
        Err(error) => Err(ConfigError::Document {
            path: path.to_path_buf(),
            message: format!("expected a resolver config or a `resolvers` map ({error})"),
        }),
    }
}

/// Named resolvers sharing one transport.
#[derive(Debug, Clone, Default)]
pub struct ResolverBundle {
    pub resolvers: IndexMap<String, Resolver>,
}

impl ResolverBundle {
    /// Builds every config of `bundle`; the first invalid one fails the whole bundle.
    pub fn build(bundle: ConfigBundle, transport: Arc<dyn Transport>) -> Result<Self, ConfigError> {
        let mut resolvers = IndexMap::with_capacity(bundle.resolvers.len());
        for (name, config) in bundle.resolvers {
            let resolver = create_resolver_with_transport(config, Arc::clone(&transport))?;
            resolvers.insert(name, resolver);
        }
        Ok(Self { resolvers })
    }

    pub fn get(&self, name: &str) -> Option<&Resolver> {
        self.resolvers.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resolvers.keys().map(String::as_str)
    }
}
