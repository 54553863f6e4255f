//! # Generator Module
//!
//! Turns a loaded descriptor into Go source for a gRPC agent: per binding a
//! function that decodes a JSON payload into the request type and invokes the
//! method, and per service a dial helper plus a dispatch function keyed by
//! method name.
//!
//! ## Pipeline
//!
//! ```text
//! File → NameTable → (per binding) BindingContext → handler template
//!                                                 ↘
//!        header template ───────────────────────→ GeneratedUnit → trailer template → source
//! ```
//!
//! 1. **Naming** - service and method names are title-cased into a side table
//! 2. **Binding analysis** - query parameter, enum path parameter and field mask facts
//! 3. **Rendering** - askama templates for header, handlers and trailer
//! 4. **Driver** - selects target services and reports when there are none
//!
//! ## Output shape
//!
//! ```go
//! func request_Echo_Say_from_agent_0(ctx context.Context, client EchoClient, c []byte) (proto.Message, runtime.ServerMetadata, error)
//! func CreateEchoAgent(endpoint string, opts []grpc.DialOption) (*grpcagent.Agent, error)
//! func EchoClientAgent(client interface{}, method string, c interface{}, md metadata.MD) (proto.Message, error)
//! ```
//!
//! Streaming methods get a decode-only stub with the same signature; they are
//! never invoked.
//!
//! ## Templates
//!
//! Templates live in the `templates/` directory:
//!
//! - `header.go.txt` - banner, package clause, imports, unused-import guards
//! - `handler.go.txt` - decode/invoke function of one binding
//! - `trailer.go.txt` - dial helper and dispatch function of each target service

mod binding;
mod config;
mod format;
mod naming;
mod pipeline;
mod templates;

pub use binding::*;
pub use config::*;
pub use format::*;
pub use naming::*;
pub use pipeline::*;
pub use templates::*;

use crate::descriptor::LoadedDescriptor;
use anyhow::Context;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

/// Suffix replacing the descriptor file extension in output names.
pub const OUTPUT_SUFFIX: &str = ".pb.agent.go";

/// One generated source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Output path relative to the output directory
    pub name: PathBuf,
    pub content: String,
}

/// Output name for a descriptor source name: `echo/v1/echo.proto` → `echo/v1/echo.pb.agent.go`.
///
/// Fails when the source name is absolute or has `..` segments.
pub fn output_name(source: &str) -> anyhow::Result<PathBuf> {
    let path = Path::new(source);
    ensure_relative(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .with_context(|| format!("Source name has no file name: {source:?}"))?;
    let file_name = format!("{stem}{OUTPUT_SUFFIX}");
    Ok(match path.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    })
}

/// Reject paths that would leave the directory they are joined onto.
pub fn ensure_relative(path: &Path) -> anyhow::Result<()> {
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                anyhow::bail!(
                    "Output path escapes the output directory: {}",
                    path.display()
                )
            }
        }
    }
    Ok(())
}

/// Generate agent sources for every descriptor.
///
/// Descriptors with no target service are skipped; any other failure aborts the batch.
pub fn generate(
    descriptors: &[LoadedDescriptor],
    config: &GeneratorConfig,
) -> anyhow::Result<Vec<GeneratedFile>> {
    let mut files = Vec::new();
    for descriptor in descriptors {
        let file = &descriptor.file;
        let code = match apply_templates(file, &descriptor.registry, config) {
            Ok(code) => code,
            Err(err) if err.is_no_target_service() => {
                warn!(file = %file.name, "{err}");
                continue;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to generate {}", file.name))
            }
        };
        let content = if config.format {
            format_source(&code).with_context(|| format!("Failed to format {}", file.name))?
        } else {
            code
        };
        let name = output_name(&file.name)?;
        info!(source = %file.name, output = %name.display(), "Generated agent source");
        files.push(GeneratedFile { name, content });
    }
    Ok(files)
}
