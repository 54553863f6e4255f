use crate::casing::title_case;
use crate::descriptor::File;

/// Normalized service and method names, indexed by declaration position
///
/// Computed once per run so the descriptor itself is never rewritten; every
/// template reads names through this table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    services: Vec<ServiceNames>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ServiceNames {
    name: String,
    methods: Vec<String>,
}

impl NameTable {
    /// Title-case every service and method name of `file`, in declaration order.
    pub fn build(file: &File) -> Self {
        let services = file
            .services
            .iter()
            .map(|svc| ServiceNames {
                name: title_case(&svc.name),
                methods: svc.methods.iter().map(|m| title_case(&m.name)).collect(),
            })
            .collect();
        NameTable { services }
    }

    /// Normalized name of the service at `service` position.
    pub fn service(&self, service: usize) -> Option<&str> {
        self.services.get(service).map(|s| s.name.as_str())
    }

    /// Normalized name of the method at `method` position within `service`.
    pub fn method(&self, service: usize, method: usize) -> Option<&str> {
        self.services
            .get(service)
            .and_then(|s| s.methods.get(method))
            .map(String::as_str)
    }
}
