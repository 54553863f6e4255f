//! # grpc-agent-gen
//!
//! **grpc-agent-gen** generates Go source for gRPC "agents": per HTTP binding of
//! a service method, a function that decodes a JSON payload into the request
//! message and invokes the method, plus per service a dial helper and a
//! dispatch function that routes calls by method name.
//!
//! ## Architecture
//!
//! - **[`descriptor`]** - Service descriptor model, YAML/JSON loading and the message registry
//! - **[`generator`]** - Binding analysis, askama templates and the multi-file driver
//! - **[`utilities`]** - Double-array trie used to serialize query parameter filters
//! - **[`casing`]** - Go identifier casing rules
//! - **[`linter`]** - Descriptor checks run before generation
//! - **[`cli`]** - The `protoc-gen-grpc-agent` command line
//! - **[`logging`]** - `tracing` subscriber setup
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(protoc-gen-grpc-agent)
//!     participant Load as descriptor::load_descriptor
//!     participant Lint as linter::lint_descriptor
//!     participant Gen as generator::generate
//!     participant FS as File System
//!
//!     User->>CLI: generate --descriptor echo.yaml
//!     CLI->>Load: load_descriptor("echo.yaml")
//!     Load-->>CLI: LoadedDescriptor { file, registry }
//!     CLI->>Lint: lint_descriptor(&file, &registry)
//!     Lint-->>CLI: Vec<LintIssue>
//!     CLI->>Gen: generate(&descriptors, &config)
//!     Gen->>Gen: header, handler per binding, trailer
//!     Gen-->>CLI: Vec<GeneratedFile>
//!     CLI->>FS: write echo.pb.agent.go
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use grpc_agent_gen::descriptor::load_descriptor;
//! use grpc_agent_gen::generator::{apply_templates, GeneratorConfig};
//!
//! let loaded = load_descriptor(Path::new("echo.yaml"))?;
//! let go = apply_templates(&loaded.file, &loaded.registry, &GeneratorConfig::default())?;
//! ```

pub mod casing;
pub mod cli;
pub mod descriptor;
pub mod error;
pub mod generator;
pub mod linter;
pub mod logging;
pub mod utilities;

pub use error::GenerateError;
