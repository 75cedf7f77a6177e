use crate::compiler_messages::compiler_errors::CompilerError;
use crate::program::locations::TextLocation;
use crate::return_config_error;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "abi.toml";
pub const DEFAULT_LANGUAGE: &str = "AssemblyScript";
pub const DEFAULT_COMPILER: &str = "asc";
pub const DEFAULT_VERSION: &str = "0.1.0";
pub const DEFAULT_CONSTRUCTOR_NAME: &str = "default";

// Synthetic field names used when a map is written into the type table
pub const MAP_KEY_FIELD_NAME: &str = "key_index";
pub const MAP_VALUE_FIELD_NAME: &str = "value";

// Rough guesses to avoid reallocating the type table for small contracts
pub const TYPE_TABLE_CAPACITY: usize = 32;
pub const EXPORTED_TYPES_CAPACITY: usize = 16;

/// A composite whose array members always have a fixed capacity,
/// like a 32 byte account identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellKnownComposite {
    pub name: String,
    pub array_capacity: u32,

    // Emit the members without names
    #[serde(default)]
    pub positional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Recorded in the contract section of the generated ABI
    pub language: String,
    pub compiler: String,
    pub version: String,

    pub well_known: Vec<WellKnownComposite>,
}

impl Config {
    pub fn new(language: &str, compiler: &str, version: &str) -> Self {
        Config {
            language: language.to_owned(),
            compiler: compiler.to_owned(),
            version: version.to_owned(),
            well_known: default_well_known_composites(),
        }
    }

    pub fn well_known_composite(&self, name: &str) -> Option<&WellKnownComposite> {
        self.well_known.iter().find(|composite| composite.name == name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(DEFAULT_LANGUAGE, DEFAULT_COMPILER, DEFAULT_VERSION)
    }
}

pub fn default_well_known_composites() -> Vec<WellKnownComposite> {
    vec![WellKnownComposite {
        name: String::from("AccountId"),
        array_capacity: 32,
        positional: true,
    }]
}

/// Parses a generator config. Keys that are left out keep their defaults.
pub fn parse_config(source: &str, config_path: &Path) -> Result<Config, CompilerError> {
    let config: Config = match toml::from_str(source) {
        Ok(config) => config,
        Err(e) => {
            return_config_error!(
                format!("Could not parse {}: {e}", config_path.display()),
                TextLocation::from_path(config_path)
            )
        }
    };

    for composite in &config.well_known {
        if composite.array_capacity == 0 {
            return_config_error!(
                format!(
                    "Well known composite '{}' needs an array_capacity above 0",
                    composite.name
                ),
                TextLocation::from_path(config_path)
            )
        }
    }

    Ok(config)
}

pub fn load_config(config_path: &Path) -> Result<Config, CompilerError> {
    let source = match fs::read_to_string(config_path) {
        Ok(source) => source,
        Err(e) => {
            return Err(CompilerError::file_error(
                config_path,
                format!("Could not read the generator config: {e}"),
            ));
        }
    };

    parse_config(&source, config_path)
}
