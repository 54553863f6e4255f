use super::binding::BindingFacts;
use crate::error::GenerateError;
use askama::Template;

/// Name written into the generated-code banner.
pub const GENERATOR_NAME: &str = "protoc-gen-grpc-agent";

/// Template data for the file header: banner, package clause, imports and unused-import guards
#[derive(Template)]
#[template(path = "header.go.txt", escape = "none")]
pub struct HeaderTemplateData {
    /// Generator name for the banner
    pub generator: String,
    /// Source descriptor file name
    pub source: String,
    /// Go package name of the generated file
    pub package: String,
    /// Rendered standard-library import specs
    pub standard_imports: Vec<String>,
    /// Rendered third-party import specs
    pub external_imports: Vec<String>,
}

/// Template data for one binding's decode/invoke function
#[derive(Template)]
#[template(path = "handler.go.txt", escape = "none")]
pub struct HandlerTemplateData {
    /// Normalized service name
    pub service: String,
    /// Normalized method name
    pub method: String,
    /// Binding index
    pub index: usize,
    /// Go type of the request message
    pub request_type: String,
    /// Client- or server-streaming; renders a decode-only stub
    pub streaming: bool,
    pub facts: BindingFacts,
}

/// A `method name → handler` entry in a service's dispatch function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRoute {
    /// Normalized method name matched against the dispatch argument
    pub method: String,
    /// Binding index of the handler the name routes to
    pub index: usize,
}

/// A service selected for emission and its dispatch routes in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetService {
    pub name: String,
    pub routes: Vec<MethodRoute>,
}

/// Template data for the per-service dial helpers and dispatch functions
#[derive(Template)]
#[template(path = "trailer.go.txt", escape = "none")]
pub struct TrailerTemplateData {
    pub services: Vec<TargetService>,
    /// Reserved; not read by the template
    pub use_request_context: bool,
    pub register_func_suffix: String,
}

fn render_into<T: Template>(
    template: &T,
    name: &'static str,
    out: &mut String,
) -> Result<(), GenerateError> {
    template
        .render_into(out)
        .map_err(|source| GenerateError::TemplateRender {
            template: name,
            source,
        })
}

/// Append the rendered header to `out`.
pub fn write_header(data: &HeaderTemplateData, out: &mut String) -> Result<(), GenerateError> {
    render_into(data, "header", out)
}

/// Append one rendered handler to `out`.
pub fn write_handler(data: &HandlerTemplateData, out: &mut String) -> Result<(), GenerateError> {
    render_into(data, "handler", out)
}

/// Append the rendered trailer to `out`.
pub fn write_trailer(data: &TrailerTemplateData, out: &mut String) -> Result<(), GenerateError> {
    render_into(data, "trailer", out)
}
