//! File-based block configuration.
//!
//! Hosts without a native parameter surface describe a block in TOML:
//!
//! ```toml
//! model = "aero.toml"
//! inputs = ["alpha", "beta", "mach"]
//! outputs = ["cl", "cd"]
//! ```
//!
//! The identifier lists are encoded into the same column-major matrices a
//! native host would deliver, so both paths go through identical decoding.

use crate::errors::{BindError, BindResult};
use crate::host::BlockParameters;
use crate::matrix::{CharArray, IdentifierMatrix};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockConfig {
    /// Model description, relative paths resolve against the config file.
    pub model: PathBuf,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

impl BlockConfig {
    pub fn from_toml(text: &str) -> BindResult<Self> {
        toml::from_str(text).map_err(|e| BindError::Config(e.to_string()))
    }

    /// Read a configuration file.
    pub fn load(path: &Path) -> BindResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| BindError::Config(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::from_toml(&text)?;
        if config.model.is_relative() {
            if let Some(dir) = path.parent() {
                config.model = dir.join(&config.model);
            }
        }
        Ok(config)
    }

    /// The host parameters this configuration describes.
    pub fn to_parameters(&self) -> BlockParameters {
        BlockParameters {
            model_path: CharArray::from_text(&self.model.to_string_lossy()).into(),
            inputs: encode(&self.inputs).into(),
            outputs: encode(&self.outputs).into(),
        }
    }
}

fn encode(ids: &[String]) -> CharArray {
    let matrix = IdentifierMatrix::from_identifiers(ids);
    CharArray::new(matrix.rows(), matrix.cols(), matrix.to_column_major())
}
