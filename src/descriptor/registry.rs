use super::types::{Enum, Field, FieldKind, FieldPath, File, GoPackage, Message};
use crate::casing::camel_case;
use std::collections::HashMap;

/// Lookup table of message and enum definitions keyed by fully-qualified name
#[derive(Debug, Clone, Default)]
pub struct Registry {
    messages: HashMap<String, Message>,
    enums: HashMap<String, Enum>,
    /// Proto package of each registered message, used to derive Go type names
    packages: HashMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry holding every definition of `file`.
    pub fn from_file(file: &File) -> Self {
        let mut registry = Registry::new();
        registry.register_file(file);
        registry
    }

    /// Add every message and enum declared by `file`. Later registrations win.
    ///
    /// Only messages in the file's own Go package are tied to its proto package;
    /// a message carrying a foreign `go_package` is named by its last segment.
    pub fn register_file(&mut self, file: &File) {
        for message in &file.messages {
            let local = message
                .go_package
                .as_ref()
                .map_or(true, |pkg| pkg.path == file.go_package.path);
            if local {
                self.packages
                    .insert(message.name.clone(), file.package.clone());
            } else {
                self.packages.remove(&message.name);
            }
            self.messages.insert(message.name.clone(), message.clone());
        }
        for e in &file.enums {
            self.enums.insert(e.name.clone(), e.clone());
        }
    }

    pub fn lookup_message(&self, name: &str) -> Option<&Message> {
        self.messages.get(name)
    }

    pub fn lookup_enum(&self, name: &str) -> Option<&Enum> {
        self.enums.get(name)
    }

    /// Walk `path` from the message `message_name`, descending into nested message fields.
    ///
    /// Returns the field the last segment names, or `None` if any segment is unknown
    /// or an intermediate field is not a message.
    pub fn resolve_field(&self, message_name: &str, path: &FieldPath) -> Option<&Field> {
        let segments = path.segments();
        let (last, parents) = segments.split_last()?;
        let mut message = self.lookup_message(message_name)?;
        for segment in parents {
            let field = message.fields.iter().find(|f| f.name == *segment)?;
            if field.kind != FieldKind::Message {
                return None;
            }
            message = self.lookup_message(&field.type_name)?;
        }
        message.fields.iter().find(|f| f.name == *last)
    }

    /// The Go type expression for `message_name` as seen from the package at `current_path`.
    ///
    /// Nested messages are joined with `_` the way protoc-gen-go names them. Types from
    /// another Go package are qualified with that package's alias or name.
    pub fn go_type(&self, message_name: &str, current_path: &str) -> Option<String> {
        let message = self.lookup_message(message_name)?;
        let local = self.local_name(message_name);
        let ty = match &message.go_package {
            Some(pkg) if pkg.path != current_path => format!("{}.{}", pkg.qualifier(), local),
            _ => local,
        };
        Some(ty)
    }

    /// Go packages of the given messages that differ from `current_path`.
    pub fn foreign_packages<'a>(
        &'a self,
        message_names: impl IntoIterator<Item = &'a str>,
        current_path: &str,
    ) -> Vec<&'a GoPackage> {
        message_names
            .into_iter()
            .filter_map(|name| self.lookup_message(name))
            .filter_map(|m| m.go_package.as_ref())
            .filter(|pkg| pkg.path != current_path)
            .collect()
    }

    fn local_name(&self, message_name: &str) -> String {
        let trimmed = message_name.trim_start_matches('.');
        // Messages outside the registering file's proto package keep only their last segment.
        let relative = self
            .packages
            .get(message_name)
            .filter(|pkg| !pkg.is_empty())
            .and_then(|pkg| trimmed.strip_prefix(pkg.as_str()))
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or_else(|| trimmed.rsplit('.').next().unwrap_or(trimmed));
        relative
            .split('.')
            .map(camel_case)
            .collect::<Vec<_>>()
            .join("_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::types::FieldKind;

    fn field(name: &str, type_name: &str, kind: FieldKind) -> Field {
        Field {
            name: name.into(),
            type_name: type_name.into(),
            kind,
            repeated: false,
        }
    }

    fn sample_file() -> File {
        File {
            name: "shop/v1/shop.proto".into(),
            package: "shop.v1".into(),
            go_package: GoPackage::new("github.com/acme/shop/shoppb", "shoppb"),
            messages: vec![
                Message {
                    name: ".shop.v1.Order".into(),
                    go_package: None,
                    fields: vec![
                        field("id", "string", FieldKind::Scalar),
                        field("item", ".shop.v1.Order.Item", FieldKind::Message),
                    ],
                },
                Message {
                    name: ".shop.v1.Order.Item".into(),
                    go_package: None,
                    fields: vec![field("state", ".shop.v1.State", FieldKind::Enum)],
                },
                Message {
                    name: ".google.protobuf.Empty".into(),
                    go_package: Some(
                        GoPackage::new("github.com/golang/protobuf/ptypes/empty", "empty")
                            .with_alias("empty_pb"),
                    ),
                    fields: vec![],
                },
            ],
            enums: vec![Enum {
                name: ".shop.v1.State".into(),
                values: vec!["OPEN".into(), "CLOSED".into()],
            }],
            services: vec![],
        }
    }

    #[test]
    fn test_resolve_nested_field() {
        let registry = Registry::from_file(&sample_file());
        let f = registry
            .resolve_field(".shop.v1.Order", &FieldPath::new("item.state"))
            .unwrap();
        assert_eq!(f.type_name, ".shop.v1.State");
        assert!(f.is_enum());
    }

    #[test]
    fn test_resolve_through_scalar_fails() {
        let registry = Registry::from_file(&sample_file());
        assert!(registry
            .resolve_field(".shop.v1.Order", &FieldPath::new("id.nope"))
            .is_none());
        assert!(registry
            .resolve_field(".shop.v1.Order", &FieldPath::new(""))
            .is_none());
    }

    #[test]
    fn test_go_type_nested_and_foreign() {
        let registry = Registry::from_file(&sample_file());
        let here = "github.com/acme/shop/shoppb";
        assert_eq!(registry.go_type(".shop.v1.Order", here).unwrap(), "Order");
        assert_eq!(
            registry.go_type(".shop.v1.Order.Item", here).unwrap(),
            "Order_Item"
        );
        assert_eq!(
            registry.go_type(".google.protobuf.Empty", here).unwrap(),
            "empty_pb.Empty"
        );
        assert!(registry.go_type(".shop.v1.Missing", here).is_none());
    }

    #[test]
    fn test_go_type_foreign_message_sharing_package_prefix() {
        let file = File {
            name: "g.proto".into(),
            package: "google".into(),
            go_package: GoPackage::new("example.com/g", "g"),
            messages: vec![
                Message {
                    name: ".google.protobuf.Empty".into(),
                    go_package: Some(GoPackage::new(
                        "github.com/golang/protobuf/ptypes/empty",
                        "empty",
                    )),
                    fields: vec![],
                },
                Message {
                    name: ".google.Outer.Inner".into(),
                    go_package: None,
                    fields: vec![],
                },
            ],
            enums: vec![],
            services: vec![],
        };
        let registry = Registry::from_file(&file);
        assert_eq!(
            registry.go_type(".google.protobuf.Empty", "example.com/g").unwrap(),
            "empty.Empty"
        );
        assert_eq!(
            registry.go_type(".google.Outer.Inner", "example.com/g").unwrap(),
            "Outer_Inner"
        );
    }

    #[test]
    fn test_package_prefix_matches_whole_segments() {
        let file = File {
            name: "goo.proto".into(),
            package: "goo".into(),
            go_package: GoPackage::new("example.com/goo", "goo"),
            messages: vec![Message {
                name: ".google.Thing".into(),
                go_package: None,
                fields: vec![],
            }],
            enums: vec![],
            services: vec![],
        };
        let registry = Registry::from_file(&file);
        assert_eq!(
            registry.go_type(".google.Thing", "example.com/goo").unwrap(),
            "Thing"
        );
    }

    #[test]
    fn test_lookup_enum() {
        let registry = Registry::from_file(&sample_file());
        assert_eq!(registry.lookup_enum(".shop.v1.State").unwrap().values.len(), 2);
        assert!(registry.lookup_enum(".shop.v1.Nope").is_none());
    }
}
