use super::binding::{BindingContext, BindingFacts};
use super::config::GeneratorConfig;
use super::naming::NameTable;
use super::templates::{
    write_handler, write_header, write_trailer, HandlerTemplateData, HeaderTemplateData,
    MethodRoute, TargetService, TrailerTemplateData, GENERATOR_NAME,
};
use crate::descriptor::{File, GoPackage, Registry};
use crate::error::GenerateError;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Output buffer of a single run plus the services selected for the trailer
#[derive(Debug, Default)]
pub struct GeneratedUnit {
    buf: String,
    targets: Vec<TargetService>,
}

impl GeneratedUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn targets(&self) -> &[TargetService] {
        &self.targets
    }

    /// Final text, or [`GenerateError::NoTargetService`] when nothing qualified.
    pub fn finish(self, file: &str) -> Result<String, GenerateError> {
        if self.targets.is_empty() {
            return Err(GenerateError::NoTargetService {
                file: file.to_string(),
            });
        }
        Ok(self.buf)
    }
}

/// Configured imports followed by the Go packages of messages used by bound methods.
fn collect_imports(file: &File, registry: &Registry, config: &GeneratorConfig) -> Vec<GoPackage> {
    let mut imports = config.effective_imports();
    let message_names = file
        .services
        .iter()
        .flat_map(|s| &s.methods)
        .filter(|m| !m.bindings.is_empty())
        .flat_map(|m| [m.request_type.as_str(), m.response_type.as_str()]);
    let mut extra: BTreeMap<&str, &GoPackage> = BTreeMap::new();
    for pkg in registry.foreign_packages(message_names, &file.go_package.path) {
        extra.entry(pkg.path.as_str()).or_insert(pkg);
    }
    for (path, pkg) in extra {
        if !imports.iter().any(|p| p.path == path) {
            imports.push(pkg.clone());
        }
    }
    imports
}

fn header_data(file: &File, imports: &[GoPackage]) -> HeaderTemplateData {
    let (standard, external): (Vec<&GoPackage>, Vec<&GoPackage>) =
        imports.iter().partition(|p| p.is_standard());
    HeaderTemplateData {
        generator: GENERATOR_NAME.to_string(),
        source: file.name.clone(),
        package: file.go_package.name.clone(),
        standard_imports: standard.iter().map(ToString::to_string).collect(),
        external_imports: external.iter().map(ToString::to_string).collect(),
    }
}

/// Render the agent source for `file`.
///
/// Emits the header, then one handler per binding of every method (services and
/// methods in declaration order), then the dial helpers and dispatch functions of
/// every service that had at least one binding. Services whose methods have no
/// bindings are not targets. A method whose bindings share an index is rejected
/// before anything is rendered for it. The descriptor is not modified.
pub fn apply_templates(
    file: &File,
    registry: &Registry,
    config: &GeneratorConfig,
) -> Result<String, GenerateError> {
    let names = NameTable::build(file);
    let mut unit = GeneratedUnit::new();

    let imports = collect_imports(file, registry, config);
    write_header(&header_data(file, &imports), &mut unit.buf)?;

    for (si, svc) in file.services.iter().enumerate() {
        let service_name = names.service(si).unwrap_or(&svc.name).to_string();
        let mut routes = Vec::new();
        for (mi, method) in svc.methods.iter().enumerate() {
            let method_name = names.method(si, mi).unwrap_or(&method.name).to_string();
            debug!(service = %service_name, method = %method_name, "Processing method");
            let mut seen = HashSet::new();
            if let Some(dup) = method.bindings.iter().find(|b| !seen.insert(b.index)) {
                return Err(GenerateError::DuplicateBindingIndex {
                    service: service_name,
                    method: method_name,
                    index: dup.index,
                });
            }
            let request_type = registry
                .go_type(&method.request_type, &file.go_package.path)
                .unwrap_or_else(|| method.request_type.trim_start_matches('.').to_string());
            for binding in &method.bindings {
                let ctx =
                    BindingContext::new(binding, method, registry, config.allow_patch_feature);
                let data = HandlerTemplateData {
                    service: service_name.clone(),
                    method: method_name.clone(),
                    index: binding.index,
                    request_type: request_type.clone(),
                    streaming: method.is_streaming(),
                    facts: BindingFacts::from(&ctx),
                };
                write_handler(&data, &mut unit.buf)?;
            }
            if let Some(first) = method.bindings.first() {
                routes.push(MethodRoute {
                    method: method_name,
                    index: first.index,
                });
            }
        }
        if !routes.is_empty() {
            unit.targets.push(TargetService {
                name: service_name,
                routes,
            });
        }
    }

    if unit.targets.is_empty() {
        return unit.finish(&file.name);
    }

    let trailer = TrailerTemplateData {
        services: unit.targets.clone(),
        use_request_context: config.use_request_context,
        register_func_suffix: config.register_func_suffix.clone(),
    };
    write_trailer(&trailer, &mut unit.buf)?;
    unit.finish(&file.name)
}
