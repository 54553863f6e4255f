use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known fully-qualified type name of `google.protobuf.FieldMask`.
pub const FIELD_MASK_TYPE: &str = ".google.protobuf.FieldMask";

/// A Go package reference used for imports and type qualification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoPackage {
    /// Import path (e.g. `google.golang.org/grpc`)
    pub path: String,
    /// Package name as declared in its `package` clause
    #[serde(default)]
    pub name: String,
    /// Optional import alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Explicit standard-library tag; derived from the path when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<bool>,
}

impl GoPackage {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        GoPackage {
            path: path.into(),
            name: name.into(),
            alias: None,
            standard: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Whether this package belongs to the Go standard library.
    ///
    /// Standard packages have no dot in their import path (`context`, `encoding/json`).
    pub fn is_standard(&self) -> bool {
        self.standard.unwrap_or_else(|| !self.path.contains('.'))
    }

    /// The identifier other code uses to refer to this package.
    pub fn qualifier(&self) -> &str {
        match self.alias.as_deref() {
            Some(alias) if !alias.is_empty() => alias,
            _ => &self.name,
        }
    }
}

impl fmt::Display for GoPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alias.as_deref() {
            Some(alias) if !alias.is_empty() => write!(f, "{} \"{}\"", alias, self.path),
            _ => write!(f, "\"{}\"", self.path),
        }
    }
}

/// A dotted sequence of field names locating a (possibly nested) field
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(pub String);

impl FieldPath {
    pub fn new(path: impl Into<String>) -> Self {
        FieldPath(path.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments in order; an empty path has no segments.
    pub fn segments(&self) -> Vec<&str> {
        if self.0.is_empty() {
            Vec::new()
        } else {
            self.0.split('.').collect()
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Broad classification of a field's declared type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Scalar,
    Message,
    Enum,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// Scalar type (`string`, `int64`) or fully-qualified message/enum name
    pub type_name: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub repeated: bool,
}

impl Field {
    pub fn is_enum(&self) -> bool {
        self.kind == FieldKind::Enum
    }

    pub fn is_field_mask(&self) -> bool {
        self.type_name == FIELD_MASK_TYPE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Fully-qualified name with leading dot (e.g. `.echo.v1.SayRequest`)
    pub name: String,
    /// Go package of the generated message type when it lives outside the file's package
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_package: Option<GoPackage>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    /// Fully-qualified name with leading dot
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// A path parameter of a binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub field_path: FieldPath,
    /// The field the path resolves to; filled in at load time when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Field>,
}

impl Parameter {
    pub fn is_enum(&self) -> bool {
        self.target.as_ref().is_some_and(Field::is_enum)
    }

    pub fn is_repeated(&self) -> bool {
        self.target.as_ref().is_some_and(|t| t.repeated)
    }
}

/// The request body declaration of a binding. An empty path means the whole request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub field_path: FieldPath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Position among the method's bindings; names generated symbols
    pub index: usize,
    #[serde(default)]
    pub http_method: String,
    #[serde(default)]
    pub path_template: String,
    #[serde(default)]
    pub path_params: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub request_type: String,
    pub response_type: String,
    #[serde(default)]
    pub client_streaming: bool,
    #[serde(default)]
    pub server_streaming: bool,
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

impl Method {
    /// Client-, server- or bidirectional streaming.
    pub fn is_streaming(&self) -> bool {
        self.client_streaming || self.server_streaming
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl Service {
    pub fn has_bindings(&self) -> bool {
        self.methods.iter().any(|m| !m.bindings.is_empty())
    }
}

/// A single interface description file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// Source file name (e.g. `echo/v1/echo.proto`)
    pub name: String,
    /// Proto package (e.g. `echo.v1`)
    #[serde(default)]
    pub package: String,
    pub go_package: GoPackage,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub enums: Vec<Enum>,
    #[serde(default)]
    pub services: Vec<Service>,
}
