use crate::casing::camel_case;
use crate::descriptor::{Binding, Enum, Field, Method, Parameter, Registry};
use crate::utilities::DoubleArray;
use std::collections::HashSet;
use std::fmt;

/// Body path meaning "the whole request is the body".
pub const WHOLE_BODY: &str = "*";

/// Per-binding view used to derive the facts the handler template needs
///
/// Wraps a binding together with its method and the registry it was loaded with.
#[derive(Debug, Clone, Copy)]
pub struct BindingContext<'a> {
    pub binding: &'a Binding,
    pub method: &'a Method,
    pub registry: &'a Registry,
    pub allow_patch_feature: bool,
}

impl<'a> BindingContext<'a> {
    pub fn new(
        binding: &'a Binding,
        method: &'a Method,
        registry: &'a Registry,
        allow_patch_feature: bool,
    ) -> Self {
        BindingContext {
            binding,
            method,
            registry,
            allow_patch_feature,
        }
    }

    fn request_fields(&self) -> &'a [Field] {
        self.registry
            .lookup_message(&self.method.request_type)
            .map(|m| m.fields.as_slice())
            .unwrap_or_default()
    }

    /// Dotted path of the body field, or [`WHOLE_BODY`] when the body is absent or empty.
    pub fn body_field_path(&self) -> String {
        match &self.binding.body {
            Some(body) if !body.field_path.is_empty() => body.field_path.to_string(),
            _ => WHOLE_BODY.to_string(),
        }
    }

    /// Whether some request field is left for the query string.
    ///
    /// Only top-level field names are compared against whole body/path strings, so
    /// nested paths never remove anything. This may report `true` when every field is
    /// actually covered; the cost is an unused filter in the output.
    pub fn has_query_param(&self) -> bool {
        if matches!(&self.binding.body, Some(body) if body.field_path.is_empty()) {
            return false;
        }
        let mut fields: HashSet<&str> = self
            .request_fields()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        if let Some(body) = &self.binding.body {
            fields.remove(body.field_path.as_str());
        }
        for param in &self.binding.path_params {
            fields.remove(param.field_path.as_str());
        }
        !fields.is_empty()
    }

    /// A path parameter maps to a non-repeated enum field.
    pub fn has_enum_path_param(&self) -> bool {
        self.has_enum_path_param_with(false)
    }

    /// A path parameter maps to a repeated enum field.
    pub fn has_repeated_enum_path_param(&self) -> bool {
        self.has_enum_path_param_with(true)
    }

    fn has_enum_path_param_with(&self, repeated: bool) -> bool {
        self.binding
            .path_params
            .iter()
            .any(|p| p.is_enum() && p.is_repeated() == repeated)
    }

    /// The enum a path parameter targets, if the registry knows it.
    pub fn lookup_enum(&self, param: &Parameter) -> Option<&'a Enum> {
        let target = param.target.as_ref()?;
        self.registry.lookup_enum(&target.type_name)
    }

    /// Go field name of the request's field mask when there is exactly one.
    ///
    /// Returns an empty string when the request has none or more than one.
    pub fn field_mask_field(&self) -> String {
        let mut found: Option<&Field> = None;
        for field in self.request_fields() {
            if field.is_field_mask() {
                if found.is_some() {
                    return String::new();
                }
                found = Some(field);
            }
        }
        found.map(|f| camel_case(&f.name)).unwrap_or_default()
    }

    /// Filter over the field paths consumed by the body and path parameters.
    pub fn query_param_filter(&self) -> QueryParamFilter {
        let mut seqs: Vec<Vec<&str>> = Vec::new();
        if let Some(body) = &self.binding.body {
            seqs.push(body.field_path.as_str().split('.').collect());
        }
        for param in &self.binding.path_params {
            seqs.push(param.field_path.as_str().split('.').collect());
        }
        QueryParamFilter(DoubleArray::new(seqs))
    }
}

/// A [`DoubleArray`] rendered as a Go `utilities.DoubleArray` literal
///
/// The encoding table is written in code order, so equal filters always render
/// to identical text whatever order their map iterates in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParamFilter(pub DoubleArray);

/// Quote a string as a Go interpreted string literal.
pub(crate) fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn go_int_slice(values: &[usize]) -> String {
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[]int{{{}}}", items.join(", "))
}

impl fmt::Display for QueryParamFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let da = &self.0;
        let mut by_code: Vec<Option<&str>> = vec![None; da.encoding.len()];
        for (token, &code) in &da.encoding {
            if let Some(slot) = by_code.get_mut(code) {
                *slot = Some(token.as_str());
            }
        }
        let encodings: Vec<String> = by_code
            .iter()
            .enumerate()
            .filter_map(|(code, token)| token.map(|t| format!("{}: {}", go_quote(t), code)))
            .collect();
        write!(
            f,
            "&utilities.DoubleArray{{Encoding: map[string]int{{{}}}, Base: {}, Check: {}}}",
            encodings.join(", "),
            go_int_slice(&da.base),
            go_int_slice(&da.check)
        )
    }
}

/// Facts derived once per binding and handed to the handler template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingFacts {
    pub body_field_path: String,
    pub has_query_param: bool,
    pub has_enum_path_param: bool,
    pub has_repeated_enum_path_param: bool,
    pub field_mask_field: String,
    /// Serialized query parameter filter; empty when no query parameters are needed
    pub query_param_filter: String,
}

impl From<&BindingContext<'_>> for BindingFacts {
    fn from(ctx: &BindingContext<'_>) -> Self {
        let has_query_param = ctx.has_query_param();
        BindingFacts {
            body_field_path: ctx.body_field_path(),
            has_query_param,
            has_enum_path_param: ctx.has_enum_path_param(),
            has_repeated_enum_path_param: ctx.has_repeated_enum_path_param(),
            field_mask_field: ctx.field_mask_field(),
            query_param_filter: if has_query_param {
                ctx.query_param_filter().to_string()
            } else {
                String::new()
            },
        }
    }
}
