//! Generator configuration
//!
//! Loaded from a `grpc-agent.toml` file that sits alongside the descriptor (or
//! an explicit path), then overridden by CLI flags.

use crate::descriptor::GoPackage;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name probed next to a descriptor when no config path is given.
pub const CONFIG_FILE_NAME: &str = "grpc-agent.toml";

/// Import path of the agent runtime package used by generated code.
pub const DEFAULT_AGENT_PACKAGE: &str = "github.com/grpc-agent/grpcagent";

/// Settings for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Reserved; carried to the trailer template but does not change output
    pub use_request_context: bool,
    /// Appended to the generated dispatch function names
    pub register_func_suffix: String,
    /// Carried to the binding analyzer; does not change output
    pub allow_patch_feature: bool,
    /// Import path of the agent runtime package
    pub agent_package: String,
    /// Imports emitted in the header, in order. Empty means the default set.
    pub imports: Vec<GoPackage>,
    /// Pipe generated source through `gofmt`
    pub format: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            use_request_context: false,
            register_func_suffix: String::new(),
            allow_patch_feature: false,
            agent_package: DEFAULT_AGENT_PACKAGE.to_string(),
            imports: Vec::new(),
            format: false,
        }
    }
}

impl GeneratorConfig {
    /// The import list the header renders: configured imports, or the default support set.
    pub fn effective_imports(&self) -> Vec<GoPackage> {
        if !self.imports.is_empty() {
            return self.imports.clone();
        }
        default_imports(&self.agent_package)
    }
}

/// Packages every generated file refers to.
pub fn default_imports(agent_package: &str) -> Vec<GoPackage> {
    let agent_name = agent_package
        .rsplit('/')
        .next()
        .unwrap_or(agent_package)
        .to_string();
    let mut agent = GoPackage::new(agent_package, agent_name.clone());
    if agent_name != "grpcagent" {
        agent = agent.with_alias("grpcagent");
    }
    vec![
        GoPackage::new("context", "context"),
        GoPackage::new("encoding/json", "json"),
        GoPackage::new("errors", "errors"),
        GoPackage::new("io", "io"),
        GoPackage::new("github.com/golang/protobuf/proto", "proto"),
        GoPackage::new("github.com/grpc-ecosystem/grpc-gateway/runtime", "runtime"),
        GoPackage::new("github.com/grpc-ecosystem/grpc-gateway/utilities", "utilities"),
        agent,
        GoPackage::new("google.golang.org/grpc", "grpc"),
        GoPackage::new("google.golang.org/grpc/codes", "codes"),
        GoPackage::new("google.golang.org/grpc/metadata", "metadata"),
        GoPackage::new("google.golang.org/grpc/status", "status"),
    ]
}

/// Load a generator config from a TOML file.
///
/// Returns `Ok(None)` if the file does not exist and an error if it exists but
/// cannot be read or parsed.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read generator config: {}", config_path.display()))?;
    let config: GeneratorConfig = toml::from_str(&contents).with_context(|| {
        format!(
            "Failed to parse generator config: {}",
            config_path.display()
        )
    })?;
    Ok(Some(config))
}

/// Resolve the config path
///
/// Priority:
/// 1. Explicitly provided path (via CLI), when it exists
/// 2. `grpc-agent.toml` in the descriptor's directory
/// 3. None
pub fn resolve_config_path(explicit_path: Option<&Path>, descriptor_path: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }
    let candidate = descriptor_path.parent()?.join(CONFIG_FILE_NAME);
    candidate.exists().then_some(candidate)
}
