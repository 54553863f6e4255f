//! # CLI Module
//!
//! Command-line interface of the `protoc-gen-grpc-agent` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! ```bash
//! protoc-gen-grpc-agent generate --descriptor echo.yaml --out gen/
//! ```
//!
//! Options:
//! - `--descriptor <FILE>...` - Descriptor files, YAML or JSON (required)
//! - `--out <DIR>` - Output directory (default: `.`)
//! - `--config <FILE>` - Generator config (default: `grpc-agent.toml` next to the descriptor)
//! - `--register-func-suffix <S>` - Suffix for dispatch function names
//! - `--allow-patch-feature`, `--use-request-context` - Carried to the generator
//! - `--format` - Run output through `gofmt`
//! - `--dry-run` - Print output paths only
//! - `--skip-lint` - Generate even when the linter reports errors
//!
//! ### `lint`
//!
//! ```bash
//! protoc-gen-grpc-agent lint --descriptor echo.yaml --fail-on-error
//! ```
//!
//! ## Logging
//!
//! `-v`/`-vv` raise the default level; `GRPC_AGENT_LOG` and
//! `GRPC_AGENT_LOG_FORMAT` are read as described in [`crate::logging`].

mod commands;


pub use commands::{build_config, run, run_cli, Cli, Commands, ConfigOverrides};
