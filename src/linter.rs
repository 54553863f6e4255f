//! # Descriptor Linter Module
//!
//! Checks a loaded descriptor for problems that would make the generated agent
//! invalid or surprising.
//!
//! ## Checks Performed
//!
//! 1. **Duplicate service names** - after title-casing (error)
//! 2. **Duplicate method names** - within a service, after title-casing (error)
//! 3. **Duplicate binding index** - within a method (error)
//! 4. **Unknown message types** - request/response not in the registry (error)
//! 5. **Services without bindings** - not emitted (warning)
//! 6. **Ambiguous field masks** - more than one in a request (warning)
//! 7. **Methods without bindings** - not dispatchable (info)
//! 8. **Streaming methods** - emitted as decode-only stubs (info)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use grpc_agent_gen::descriptor::load_descriptor;
//! use grpc_agent_gen::linter::{lint_descriptor, print_lint_issues};
//!
//! let loaded = load_descriptor(Path::new("echo.yaml"))?;
//! let issues = lint_descriptor(&loaded.file, &loaded.registry);
//! print_lint_issues(&issues);
//! ```

use crate::descriptor::{File, Registry};
use crate::generator::NameTable;
use std::collections::{HashMap, HashSet};
use std::fmt;


/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Error - Generated code would be invalid
    Error,
    /// Warning - Generation succeeds but output may be surprising
    Warning,
    /// Info - Worth knowing
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintSeverity::Error => write!(f, "error"),
            LintSeverity::Warning => write!(f, "warning"),
            LintSeverity::Info => write!(f, "info"),
        }
    }
}

/// A lint issue found in a descriptor
#[derive(Debug, Clone)]
pub struct LintIssue {
    /// Where the issue occurred (e.g., "echo.proto:Echo.Say")
    pub location: String,
    pub severity: LintSeverity,
    /// Type of lint issue (e.g., "duplicate_method_name")
    pub kind: String,
    pub message: String,
    /// Optional suggestion for how to fix it
    pub suggestion: Option<String>,
}

impl LintIssue {
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Lint a loaded descriptor file
pub fn lint_descriptor(file: &File, registry: &Registry) -> Vec<LintIssue> {
    let names = NameTable::build(file);
    let mut issues = Vec::new();
    let mut seen_services: HashMap<&str, &str> = HashMap::new();

    for (si, svc) in file.services.iter().enumerate() {
        let svc_name = names.service(si).unwrap_or(&svc.name);
        let svc_loc = format!("{}:{}", file.name, svc_name);
        if let Some(previous) = seen_services.insert(svc_name, &svc.name) {
            issues.push(
                LintIssue::new(
                    &svc_loc,
                    LintSeverity::Error,
                    "duplicate_service_name",
                    format!(
                        "Services '{}' and '{}' both normalize to '{}'",
                        previous, svc.name, svc_name
                    ),
                )
                .with_suggestion("Rename one of the services"),
            );
        }
        if !svc.has_bindings() {
            issues.push(LintIssue::new(
                &svc_loc,
                LintSeverity::Warning,
                "service_without_bindings",
                "No method has a binding; no agent is generated for this service",
            ));
        }

        let mut seen_methods: HashMap<&str, &str> = HashMap::new();
        for (mi, method) in svc.methods.iter().enumerate() {
            let method_name = names.method(si, mi).unwrap_or(&method.name);
            let loc = format!("{}.{}", svc_loc, method_name);
            if let Some(previous) = seen_methods.insert(method_name, &method.name) {
                issues.push(
                    LintIssue::new(
                        &loc,
                        LintSeverity::Error,
                        "duplicate_method_name",
                        format!(
                            "Methods '{}' and '{}' both normalize to '{}'",
                            previous, method.name, method_name
                        ),
                    )
                    .with_suggestion("Rename one of the methods"),
                );
            }
            lint_method(&mut issues, registry, &loc, method);
        }
    }

    issues
}

fn lint_method(
    issues: &mut Vec<LintIssue>,
    registry: &Registry,
    loc: &str,
    method: &crate::descriptor::Method,
) {
    for (role, type_name) in [
        ("request", &method.request_type),
        ("response", &method.response_type),
    ] {
        if registry.lookup_message(type_name).is_none() {
            issues.push(LintIssue::new(
                loc,
                LintSeverity::Error,
                "unknown_message_type",
                format!("{role} type '{type_name}' is not defined"),
            ));
        }
    }

    if method.bindings.is_empty() {
        issues.push(LintIssue::new(
            loc,
            LintSeverity::Info,
            "method_without_bindings",
            "Method has no binding and cannot be dispatched by name",
        ));
        return;
    }

    let mut indexes = HashSet::new();
    for binding in &method.bindings {
        if !indexes.insert(binding.index) {
            issues.push(LintIssue::new(
                loc,
                LintSeverity::Error,
                "duplicate_binding_index",
                format!("Binding index {} is used more than once", binding.index),
            ));
        }
    }

    if method.is_streaming() {
        issues.push(LintIssue::new(
            loc,
            LintSeverity::Info,
            "streaming_method",
            "Streaming methods are generated as decode-only stubs",
        ));
    }

    if let Some(request) = registry.lookup_message(&method.request_type) {
        let masks = request.fields.iter().filter(|f| f.is_field_mask()).count();
        if masks > 1 {
            issues.push(
                LintIssue::new(
                    loc,
                    LintSeverity::Warning,
                    "ambiguous_field_mask",
                    format!("Request has {masks} field masks; field mask handling is disabled"),
                )
                .with_suggestion("Keep a single google.protobuf.FieldMask field"),
            );
        }
    }
}

fn print_group(title: &str, issues: &[&LintIssue]) {
    if issues.is_empty() {
        return;
    }
    println!("{title}");
    for issue in issues {
        println!("   [{}] {}", issue.kind, issue.location);
        println!("      {}", issue.message);
        if let Some(suggestion) = &issue.suggestion {
            println!("      💡 Suggestion: {}", suggestion);
        }
    }
    println!();
}

/// Print lint issues grouped by severity
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        println!("✅ No lint issues found!");
        return;
    }

    let by = |severity| -> Vec<&LintIssue> {
        issues.iter().filter(|i| i.severity == severity).collect()
    };
    let errors = by(LintSeverity::Error);
    let warnings = by(LintSeverity::Warning);
    let infos = by(LintSeverity::Info);

    println!("\n📋 Lint Results:");
    println!(
        "   {} error(s), {} warning(s), {} info(s)\n",
        errors.len(),
        warnings.len(),
        infos.len()
    );
    print_group("❌ Errors (must fix):", &errors);
    print_group("⚠️  Warnings (should fix):", &warnings);
    print_group("ℹ️  Info:", &infos);
}

/// Fail if there are any error-level lint issues
pub fn fail_if_errors(issues: &[LintIssue]) -> anyhow::Result<()> {
    let errors = issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("descriptor has {errors} lint error(s)");
    }
    Ok(())
}
