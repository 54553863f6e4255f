use std::fmt;

/// Failure of a single generation run
///
/// Every variant aborts the run; no partial output is returned.
#[derive(Debug)]
pub enum GenerateError {
    /// No service in the file has a method with at least one binding
    NoTargetService {
        /// Source file name of the descriptor
        file: String,
    },
    /// Two bindings of one method share an index, so their functions would collide
    DuplicateBindingIndex {
        service: String,
        method: String,
        index: usize,
    },
    /// A template failed to render
    TemplateRender {
        /// Name of the template that failed (`header`, `handler`, `trailer`)
        template: &'static str,
        source: askama::Error,
    },
}

impl GenerateError {
    pub fn is_no_target_service(&self) -> bool {
        matches!(self, GenerateError::NoTargetService { .. })
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::NoTargetService { file } => {
                write!(f, "no target service defined in the file: {file}")
            }
            GenerateError::DuplicateBindingIndex {
                service,
                method,
                index,
            } => write!(f, "duplicate binding index {index} in {service}.{method}"),
            GenerateError::TemplateRender { template, source } => {
                write!(f, "failed to render {template} template: {source}")
            }
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::NoTargetService { .. } | GenerateError::DuplicateBindingIndex { .. } => {
                None
            }
            GenerateError::TemplateRender { source, .. } => Some(source),
        }
    }
}
