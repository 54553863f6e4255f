use crate::descriptor::{load_descriptor, LoadedDescriptor};
use crate::generator::{
    ensure_relative, generate, load_config, resolve_config_path, GeneratedFile, GeneratorConfig,
};
use crate::linter::{fail_if_errors, lint_descriptor, print_lint_issues, LintIssue, LintSeverity};
use crate::logging::{init_logging_with_config, LogConfig};
use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Command-line interface for the gRPC agent generator
#[derive(Parser)]
#[command(name = "protoc-gen-grpc-agent")]
#[command(about = "Generate Go gRPC agent sources from service descriptors", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate `<name>.pb.agent.go` for each descriptor
    Generate {
        /// Descriptor files (YAML or JSON)
        #[arg(short, long = "descriptor", required = true, num_args = 1..)]
        descriptors: Vec<PathBuf>,

        /// Output directory; generated names keep the descriptor's relative directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Generator config file (default: grpc-agent.toml next to the first descriptor)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Suffix appended to the dispatch function names
        #[arg(long)]
        register_func_suffix: Option<String>,

        /// Enable the PATCH field mask feature
        #[arg(long, default_value_t = false)]
        allow_patch_feature: bool,

        /// Use the request context in generated dispatch functions
        #[arg(long, default_value_t = false)]
        use_request_context: bool,

        /// Pipe generated sources through gofmt
        #[arg(long, default_value_t = false)]
        format: bool,

        /// Print the files that would be written without writing them
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Generate even when the linter reports errors
        #[arg(long, default_value_t = false)]
        skip_lint: bool,
    },
    /// Lint descriptor files
    ///
    /// Reports duplicate names after normalization, duplicate binding
    /// indexes, unknown message types, ambiguous field masks and methods
    /// the agent cannot dispatch.
    Lint {
        /// Descriptor files (YAML or JSON)
        #[arg(short, long = "descriptor", required = true, num_args = 1..)]
        descriptors: Vec<PathBuf>,

        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
}

/// Flag values that override the config file
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub register_func_suffix: Option<String>,
    pub allow_patch_feature: bool,
    pub use_request_context: bool,
    pub format: bool,
}

impl ConfigOverrides {
    /// Boolean flags only ever switch a setting on.
    pub fn apply(&self, mut config: GeneratorConfig) -> GeneratorConfig {
        if let Some(suffix) = &self.register_func_suffix {
            config.register_func_suffix = suffix.clone();
        }
        config.allow_patch_feature |= self.allow_patch_feature;
        config.use_request_context |= self.use_request_context;
        config.format |= self.format;
        config
    }
}

/// Parse arguments, install logging, and execute the command
///
/// # Errors
///
/// Returns an error if a descriptor or config cannot be loaded, the linter
/// reports errors, generation fails, or output cannot be written.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging_with_config(&LogConfig::from_env().with_verbosity(cli.verbose))?;
    run(cli.command)
}

/// Execute an already parsed command
pub fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Generate {
            descriptors,
            out,
            config,
            register_func_suffix,
            allow_patch_feature,
            use_request_context,
            format,
            dry_run,
            skip_lint,
        } => {
            let loaded = load_all(&descriptors)?;
            let overrides = ConfigOverrides {
                register_func_suffix,
                allow_patch_feature,
                use_request_context,
                format,
            };
            let first = descriptors
                .first()
                .ok_or_else(|| anyhow::anyhow!("At least one descriptor is required"))?;
            let config = build_config(config.as_deref(), first, &overrides)?;

            if !skip_lint {
                for (path, descriptor) in descriptors.iter().zip(&loaded) {
                    let issues = lint_descriptor(&descriptor.file, &descriptor.registry);
                    let errors = report_for_generate(path, &issues);
                    fail_if_errors(&errors)
                        .with_context(|| format!("Lint failed for {}", path.display()))?;
                }
            }

            let files = generate(&loaded, &config)?;
            if files.is_empty() {
                warn!("No agent sources generated");
            }
            write_outputs(&out, &files, dry_run)
        }
        Commands::Lint {
            descriptors,
            fail_on_error,
            errors_only,
        } => {
            let mut all_errors = Vec::new();
            for path in &descriptors {
                let descriptor = load_descriptor(path)?;
                let mut issues = lint_descriptor(&descriptor.file, &descriptor.registry);
                if errors_only {
                    issues.retain(|i| i.severity == LintSeverity::Error);
                }
                println!("🔍 {}", path.display());
                print_lint_issues(&issues);
                all_errors.extend(
                    issues
                        .into_iter()
                        .filter(|i| i.severity == LintSeverity::Error),
                );
            }
            if fail_on_error {
                fail_if_errors(&all_errors)?;
            }
            Ok(())
        }
    }
}

fn load_all(paths: &[PathBuf]) -> anyhow::Result<Vec<LoadedDescriptor>> {
    paths.iter().map(|p| load_descriptor(p)).collect()
}

/// Load the generator config for a run and apply flag overrides.
pub fn build_config(
    explicit: Option<&Path>,
    descriptor: &Path,
    overrides: &ConfigOverrides,
) -> anyhow::Result<GeneratorConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    }
    let config = match resolve_config_path(explicit, descriptor) {
        Some(path) => {
            debug!(config = %path.display(), "Using generator config");
            load_config(&path)?.unwrap_or_default()
        }
        None => GeneratorConfig::default(),
    };
    Ok(overrides.apply(config))
}

/// Log non-error issues and print errors; returns the errors.
fn report_for_generate(path: &Path, issues: &[LintIssue]) -> Vec<LintIssue> {
    let mut errors = Vec::new();
    for issue in issues {
        match issue.severity {
            LintSeverity::Error => errors.push(issue.clone()),
            LintSeverity::Warning => {
                warn!(descriptor = %path.display(), kind = %issue.kind, location = %issue.location, "{}", issue.message)
            }
            LintSeverity::Info => {
                debug!(descriptor = %path.display(), kind = %issue.kind, location = %issue.location, "{}", issue.message)
            }
        }
    }
    if !errors.is_empty() {
        print_lint_issues(&errors);
    }
    errors
}

fn write_outputs(out: &Path, files: &[GeneratedFile], dry_run: bool) -> anyhow::Result<()> {
    for file in files {
        ensure_relative(&file.name)?;
        let target = out.join(&file.name);
        if dry_run {
            println!("{}", target.display());
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&target, &file.content)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        info!(path = %target.display(), "Wrote agent source");
    }
    Ok(())
}
