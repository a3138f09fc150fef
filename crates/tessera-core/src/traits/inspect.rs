use crate::types::Type;

/// Trait for type introspection
///
/// This trait provides methods for examining and querying canonical types
/// without modifying them.
pub trait TypeInspector {
    /// Get the total number of nested types (including self)
    fn field_count(&self) -> usize;

    /// Get a nested type by path (e.g., "address.city")
    ///
    /// Path steps are Struct field names; a List's child is addressed as
    /// `value`, a Map's children as `key` and `value`. The path must be
    /// non-empty.
    fn get_field_by_path(&self, path: &str) -> Option<&Type>;

    /// Check if the type contains a specific field
    fn has_field(&self, name: &str) -> bool;

    /// Get all nested field paths
    fn all_field_paths(&self) -> Vec<String>;
}

impl TypeInspector for Type {
    fn field_count(&self) -> usize {
        count_types(self)
    }

    fn get_field_by_path(&self, path: &str) -> Option<&Type> {
        let parts: Vec<&str> = path.split('.').collect();
        get_field_by_path_parts(self, &parts)
    }

    fn has_field(&self, name: &str) -> bool {
        self.get_field_by_path(name).is_some()
    }

    fn all_field_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_field_paths(self, "", &mut paths);
        paths
    }
}

// Helper functions for type inspection
fn count_types(ty: &Type) -> usize {
    match ty {
        Type::Struct { fields, .. } => 1 + fields.values().map(count_types).sum::<usize>(),
        Type::List { value_type, .. } => 1 + count_types(value_type),
        Type::Map {
            key_type,
            value_type,
        } => 1 + count_types(key_type) + count_types(value_type),
        Type::Enum { value_type, .. } => 1 + count_types(value_type),
        _ => 1,
    }
}

fn get_field_by_path_parts<'a>(ty: &'a Type, parts: &[&str]) -> Option<&'a Type> {
    if parts.is_empty() {
        return Some(ty);
    }

    let first = parts[0];
    let rest = &parts[1..];

    match ty {
        Type::Struct { fields, .. } => fields
            .get(first)
            .and_then(|field| get_field_by_path_parts(field, rest)),
        Type::List { value_type, .. } if first == "value" => {
            get_field_by_path_parts(value_type, rest)
        }
        Type::Map {
            key_type,
            value_type,
        } => match first {
            "key" => get_field_by_path_parts(key_type, rest),
            "value" => get_field_by_path_parts(value_type, rest),
            _ => None,
        },
        _ => None,
    }
}

fn collect_field_paths(ty: &Type, prefix: &str, paths: &mut Vec<String>) {
    let child_path = |name: &str| {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix, name)
        }
    };

    match ty {
        Type::Struct { fields, .. } => {
            for (name, field) in fields {
                let path = child_path(name);
                paths.push(path.clone());
                collect_field_paths(field, &path, paths);
            }
        }
        Type::List { value_type, .. } => {
            let path = child_path("value");
            paths.push(path.clone());
            collect_field_paths(value_type, &path, paths);
        }
        Type::Map {
            key_type,
            value_type,
        } => {
            for (name, child) in [("key", key_type), ("value", value_type)] {
                let path = child_path(name);
                paths.push(path.clone());
                collect_field_paths(child, &path, paths);
            }
        }
        _ => {}
    }
}
