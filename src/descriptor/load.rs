use super::registry::Registry;
use super::types::File;
use anyhow::Context;
use serde_json::Value;
use std::path::Path;

/// A loaded descriptor file together with the registry built from it
#[derive(Debug, Clone)]
pub struct LoadedDescriptor {
    pub file: File,
    pub registry: Registry,
}

/// Give every binding without an explicit `index` its position in the method's list.
fn fill_binding_indexes(val: &mut Value) {
    let Some(Value::Array(services)) = val.get_mut("services") else {
        return;
    };
    for service in services {
        let Some(Value::Array(methods)) = service.get_mut("methods") else {
            continue;
        };
        for method in methods {
            let Some(Value::Array(bindings)) = method.get_mut("bindings") else {
                continue;
            };
            for (position, binding) in bindings.iter_mut().enumerate() {
                if let Value::Object(obj) = binding {
                    obj.entry("index").or_insert_with(|| Value::from(position));
                }
            }
        }
    }
}

/// Fill the `target` of every path parameter by resolving its field path.
fn resolve_path_params(file: &mut File, registry: &Registry) -> anyhow::Result<()> {
    for service in &mut file.services {
        for method in &mut service.methods {
            for binding in &mut method.bindings {
                for param in &mut binding.path_params {
                    if param.target.is_some() {
                        continue;
                    }
                    let target = registry
                        .resolve_field(&method.request_type, &param.field_path)
                        .with_context(|| {
                            format!(
                                "{}.{}: path parameter `{}` does not resolve to a field of {}",
                                service.name, method.name, param.field_path, method.request_type
                            )
                        })?;
                    param.target = Some(target.clone());
                }
            }
        }
    }
    Ok(())
}

/// Build a descriptor from an already parsed document value.
pub fn load_descriptor_from_value(mut value: Value) -> anyhow::Result<LoadedDescriptor> {
    fill_binding_indexes(&mut value);
    let mut file: File = serde_json::from_value(value)?;
    let registry = Registry::from_file(&file);
    resolve_path_params(&mut file, &registry)?;
    Ok(LoadedDescriptor { file, registry })
}

/// Load a descriptor document from disk. YAML for `.yaml`/`.yml`, JSON otherwise.
pub fn load_descriptor(path: &Path) -> anyhow::Result<LoadedDescriptor> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read descriptor: {}", path.display()))?;
    let is_yaml = path
        .extension()
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false);
    let value: Value = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse descriptor: {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse descriptor: {}", path.display()))?
    };
    load_descriptor_from_value(value)
        .with_context(|| format!("Invalid descriptor: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "name": "echo/v1/echo.proto",
            "package": "echo.v1",
            "go_package": {"path": "github.com/acme/echo/echopb", "name": "echopb"},
            "messages": [
                {"name": ".echo.v1.SayRequest", "fields": [
                    {"name": "text", "type_name": "string"},
                    {"name": "mood", "type_name": ".echo.v1.Mood", "kind": "enum"}
                ]},
                {"name": ".echo.v1.SayResponse", "fields": []}
            ],
            "enums": [{"name": ".echo.v1.Mood", "values": ["CALM"]}],
            "services": [{
                "name": "echo",
                "methods": [{
                    "name": "say",
                    "request_type": ".echo.v1.SayRequest",
                    "response_type": ".echo.v1.SayResponse",
                    "bindings": [
                        {"http_method": "GET", "path_template": "/v1/say/{mood}",
                         "path_params": [{"field_path": "mood"}]},
                        {"index": 7, "http_method": "POST", "path_template": "/v1/say",
                         "body": {"field_path": ""}},
                        {"http_method": "PUT", "path_template": "/v1/say"}
                    ]
                }]
            }]
        })
    }

    #[test]
    fn test_fill_binding_indexes_keeps_explicit() {
        let loaded = load_descriptor_from_value(doc()).unwrap();
        let idx: Vec<usize> = loaded.file.services[0].methods[0]
            .bindings
            .iter()
            .map(|b| b.index)
            .collect();
        assert_eq!(idx, vec![0, 7, 2]);
    }

    #[test]
    fn test_path_param_target_resolved() {
        let loaded = load_descriptor_from_value(doc()).unwrap();
        let param = &loaded.file.services[0].methods[0].bindings[0].path_params[0];
        assert!(param.is_enum());
        assert!(!param.is_repeated());
    }

    #[test]
    fn test_unresolvable_path_param_is_error() {
        let mut value = doc();
        value["services"][0]["methods"][0]["bindings"][0]["path_params"][0]["field_path"] =
            json!("missing");
        let err = load_descriptor_from_value(value).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }
}
