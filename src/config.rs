//! Toolchain configuration resolved from the environment.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::EmitError;

/// Environment lookup abstraction used when resolving configuration.
pub trait EnvProvider {
    /// Returns the environment value for `key`, if available.
    fn get(&self, key: &str) -> Option<String>;
}

/// [`EnvProvider`] implementation backed by process environment variables.
pub struct ProcessEnvProvider;

impl EnvProvider for ProcessEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Debug, Clone)]
/// [`EnvProvider`] implementation backed by a caller-provided map.
pub struct MapEnvProvider {
    values: HashMap<String, String>,
}

impl MapEnvProvider {
    /// Creates a new map-backed provider.
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl EnvProvider for MapEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Root of the analysis engine checkout.
pub const BSQ_ROOT_ENV: &str = "BSQ_ROOT";
/// Interpreter used to launch the engine script.
pub const BSQ_NODE_ENV: &str = "BSQ_NODE";
/// Root under which the scratch directory lives.
pub const CADL_ROOT_ENV: &str = "CADL_ROOT";

const ENGINE_SCRIPT: [&str; 4] = ["impl", "bin", "cmd", "bosque.js"];
const SCRATCH_DIR: &str = "bsqit";
const API_FILE: &str = "spec.bsqapi";
const PACKAGE_FILE: &str = "package.json";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where generated programs are written and how the engine is launched.
pub struct ToolchainConfig {
    /// Interpreter program (`node` by default).
    pub interpreter: PathBuf,
    /// Engine entry script passed as the interpreter's first argument.
    pub engine_script: PathBuf,
    /// Directory holding the generated API file and package manifest.
    pub scratch_dir: PathBuf,
}

impl ToolchainConfig {
    /// Resolves configuration from `BSQ_ROOT`, `BSQ_NODE`, and `CADL_ROOT`.
    ///
    /// `BSQ_ROOT` is required; `CADL_ROOT` defaults to the current directory.
    pub fn from_env(env: &dyn EnvProvider) -> Result<Self, EmitError> {
        let bsq_root = non_empty(env, BSQ_ROOT_ENV).ok_or_else(|| {
            EmitError::Config(format!(
                "missing required environment variable '{BSQ_ROOT_ENV}'"
            ))
        })?;

        let interpreter = non_empty(env, BSQ_NODE_ENV).unwrap_or_else(|| "node".to_string());

        let cadl_root = match non_empty(env, CADL_ROOT_ENV) {
            Some(root) => PathBuf::from(root),
            None => std::env::current_dir()?,
        };

        let mut engine_script = PathBuf::from(bsq_root);
        engine_script.extend(ENGINE_SCRIPT);

        Ok(Self {
            interpreter: PathBuf::from(interpreter),
            engine_script,
            scratch_dir: cadl_root.join(SCRATCH_DIR),
        })
    }

    /// Generated program path inside the scratch directory.
    pub fn api_file(&self) -> PathBuf {
        self.scratch_dir.join(API_FILE)
    }

    /// Package manifest path inside the scratch directory.
    pub fn package_file(&self) -> PathBuf {
        self.scratch_dir.join(PACKAGE_FILE)
    }
}

fn non_empty(env: &dyn EnvProvider, key: &str) -> Option<String> {
    env.get(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
