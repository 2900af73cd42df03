//! Generator configuration
//!
//! Loaded from a JSON or YAML file (chosen by extension, JSON otherwise). Every key is
//! optional; unknown keys are rejected so typos do not silently fall back to defaults.
//!
//! ```yaml
//! useModule: true
//! lexerImportPath: ./lexer
//! extraNodeProperties:
//!   index: number
//! parserClassName: ExprParser
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CLASS_NAME: &str = "GeneratedParser";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Emit JavaScript instead of TypeScript
    pub use_js: bool,
    /// Emit `import`/`export` qualifiers
    pub use_module: bool,
    /// Import every referenced token kind from this module
    pub lexer_import_path: Option<String>,
    /// Extra optional fields appended to every node type, field name to type text, in
    /// file order
    pub extra_node_properties: IndexMap<String, String>,
    pub parser_class_name: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            use_js: false,
            use_module: false,
            lexer_import_path: None,
            extra_node_properties: IndexMap::new(),
            parser_class_name: DEFAULT_CLASS_NAME.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("`{0}` is not a valid class name")]
    InvalidClassName(String),
}

impl GeneratorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            _ => Self::from_json_str(&text),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validated()
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if !is_identifier(&self.parser_class_name) {
            return Err(ConfigError::InvalidClassName(self.parser_class_name));
        }
        Ok(self)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}
