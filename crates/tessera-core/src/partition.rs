//! Typed, string-parseable partition identifiers
//!
//! Each concrete key kind binds exactly one canonical type and derives a
//! fixed set of named string components from its value. Component tables are
//! static per kind; parsing via [`from_key_components`] only accepts the
//! exact component-name sets a kind declares.
//!
//! [`from_key_components`]: PartitionKeyClass::from_key_components

use std::collections::{BTreeMap, BTreeSet, HashMap};

use jiff::civil::Date;
use once_cell::sync::Lazy;

use crate::error::{Result, TesseraError};
use crate::types::{Type, TypeKind};

/// Collect components into a name -> value map, rejecting duplicate names
fn component_map<'a>(
    class_name: &str,
    components: &'a [(&'a str, &'a str)],
) -> Result<BTreeMap<&'a str, &'a str>> {
    let mut map = BTreeMap::new();
    for (name, value) in components {
        if map.insert(*name, *value).is_some() {
            return Err(TesseraError::malformed_components(format!(
                "{}: component '{}' was given more than once",
                class_name, name,
            )));
        }
    }
    Ok(map)
}

fn unrecognized_components(class_name: &str, names: &BTreeSet<&str>) -> TesseraError {
    TesseraError::malformed_components(format!(
        "{}: unrecognized component set {{{}}}",
        class_name,
        names
            .iter()
            .copied()
            .collect::<Vec<_>>()
            .join(", "),
    ))
}

fn names_of<'a>(map: &BTreeMap<&'a str, &'a str>) -> BTreeSet<&'a str> {
    map.keys().copied().collect()
}

fn is_exactly(names: &BTreeSet<&str>, expected: &[&str]) -> bool {
    names.len() == expected.len() && expected.iter().all(|n| names.contains(n))
}

/// A key derived from a date-typed partition field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateKey {
    pub key: Date,
}

impl DateKey {
    /// Fixed component table: name -> pure derivation of the key
    const COMPONENTS: &'static [(&'static str, fn(&DateKey) -> String)] = &[
        ("Y", DateKey::component_year),
        ("m", DateKey::component_month),
        ("d", DateKey::component_day),
        ("iso", DateKey::component_iso),
    ];

    pub fn new(key: Date) -> Self {
        Self { key }
    }

    fn component_year(&self) -> String {
        self.key.year().to_string()
    }

    fn component_month(&self) -> String {
        self.key.month().to_string()
    }

    fn component_day(&self) -> String {
        self.key.day().to_string()
    }

    fn component_iso(&self) -> String {
        self.key.to_string()
    }

    pub fn key_components() -> Vec<&'static str> {
        Self::COMPONENTS.iter().map(|(name, _)| *name).collect()
    }

    pub fn components(&self) -> Vec<(&'static str, String)> {
        Self::COMPONENTS
            .iter()
            .map(|(name, derive)| (*name, derive(self)))
            .collect()
    }

    pub fn component(&self, name: &str) -> Option<String> {
        Self::COMPONENTS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, derive)| derive(self))
    }

    /// Parse from an exact component set: `{key}` or `{iso}` (ISO-8601
    /// date strings) or `{Y, m, d}` (integer strings)
    pub fn from_key_components(components: &[(&str, &str)]) -> Result<Self> {
        let map = component_map("DateKey", components)?;
        let names = names_of(&map);
        if is_exactly(&names, &["key"]) {
            Ok(Self::new(parse_iso_date(map["key"])?))
        } else if is_exactly(&names, &["iso"]) {
            Ok(Self::new(parse_iso_date(map["iso"])?))
        } else if is_exactly(&names, &["Y", "m", "d"]) {
            let year: i16 = parse_component_int("DateKey", "Y", map["Y"])?;
            let month: i8 = parse_component_int("DateKey", "m", map["m"])?;
            let day: i8 = parse_component_int("DateKey", "d", map["d"])?;
            Date::new(year, month, day).map(Self::new).map_err(|e| {
                TesseraError::malformed_components(format!(
                    "DateKey: {}-{}-{} is not a valid date: {}",
                    year, month, day, e,
                ))
            })
        } else {
            Err(unrecognized_components("DateKey", &names))
        }
    }
}

fn parse_iso_date(raw: &str) -> Result<Date> {
    raw.parse::<Date>().map_err(|e| {
        TesseraError::malformed_components(format!(
            "DateKey: '{}' is not an ISO date: {}",
            raw, e,
        ))
    })
}

fn parse_component_int<T>(class_name: &str, component: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| {
        TesseraError::malformed_components(format!(
            "{}: component '{}' value '{}' is not an integer: {}",
            class_name, component, raw, e,
        ))
    })
}

/// Parse a hex component: optional sign, optional `0x`/`0X` prefix
fn parse_hex(class_name: &str, raw: &str) -> Result<i128> {
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    let value = i128::from_str_radix(digits, 16).map_err(|e| {
        TesseraError::malformed_components(format!(
            "{}: '{}' is not a base-16 integer: {}",
            class_name, raw, e,
        ))
    })?;
    Ok(if negative { -value } else { value })
}

macro_rules! int_key {
    ($(#[$meta:meta])* $name:ident, $ty:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            pub key: $ty,
        }

        impl $name {
            const COMPONENTS: &'static [(&'static str, fn(&$name) -> String)] =
                &[("hex", $name::component_hex)];

            pub fn new(key: $ty) -> Self {
                Self { key }
            }

            fn component_hex(&self) -> String {
                if self.key < 0 {
                    format!("-{:#x}", self.key.unsigned_abs())
                } else {
                    format!("{:#x}", self.key)
                }
            }

            pub fn key_components() -> Vec<&'static str> {
                Self::COMPONENTS.iter().map(|(name, _)| *name).collect()
            }

            pub fn components(&self) -> Vec<(&'static str, String)> {
                Self::COMPONENTS
                    .iter()
                    .map(|(name, derive)| (*name, derive(self)))
                    .collect()
            }

            pub fn component(&self, name: &str) -> Option<String> {
                Self::COMPONENTS
                    .iter()
                    .find(|(n, _)| *n == name)
                    .map(|(_, derive)| derive(self))
            }

            /// Parse from an exact component set: `{key}` (decimal) or
            /// `{hex}` (base-16)
            pub fn from_key_components(components: &[(&str, &str)]) -> Result<Self> {
                let map = component_map(stringify!($name), components)?;
                let names = names_of(&map);
                if is_exactly(&names, &["key"]) {
                    parse_component_int(stringify!($name), "key", map["key"]).map(Self::new)
                } else if is_exactly(&names, &["hex"]) {
                    let wide = parse_hex(stringify!($name), map["hex"])?;
                    <$ty>::try_from(wide).map(Self::new).map_err(|_| {
                        TesseraError::malformed_components(format!(
                            "{}: '{}' is out of range for {}",
                            stringify!($name),
                            map["hex"],
                            stringify!($ty),
                        ))
                    })
                } else {
                    Err(unrecognized_components(stringify!($name), &names))
                }
            }
        }
    };
}

int_key!(
    /// A key derived from an Int8-typed partition field
    Int8Key,
    i8
);
int_key!(
    /// A key derived from an Int16-typed partition field
    Int16Key,
    i16
);
int_key!(
    /// A key derived from an Int32-typed partition field
    Int32Key,
    i32
);
int_key!(
    /// A key derived from an Int64-typed partition field
    Int64Key,
    i64
);

/// A key for the Null type; carries no payload and derives no components
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NullKey;

impl NullKey {
    pub fn new() -> Self {
        Self
    }

    pub fn key_components() -> Vec<&'static str> {
        Vec::new()
    }

    pub fn components(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    pub fn component(&self, _name: &str) -> Option<String> {
        None
    }

    /// Only the exact set `{key}` with the literal value `"None"` parses
    pub fn from_key_components(components: &[(&str, &str)]) -> Result<Self> {
        let map = component_map("NullKey", components)?;
        let names = names_of(&map);
        if is_exactly(&names, &["key"]) {
            if map["key"] != "None" {
                return Err(TesseraError::malformed_components(format!(
                    "NullKey can only be parsed from the literal \"None\", got '{}'",
                    map["key"],
                )));
            }
            Ok(Self)
        } else {
            Err(unrecognized_components("NullKey", &names))
        }
    }
}

/// A concrete partition key instance, one variant per registered key kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionKey {
    Date(DateKey),
    Int8(Int8Key),
    Int16(Int16Key),
    Int32(Int32Key),
    Int64(Int64Key),
    Null(NullKey),
}

impl PartitionKey {
    /// The class object of this instance
    pub fn class(&self) -> PartitionKeyClass {
        match self {
            PartitionKey::Date(_) => PartitionKeyClass::Date,
            PartitionKey::Int8(_) => PartitionKeyClass::Int8,
            PartitionKey::Int16(_) => PartitionKeyClass::Int16,
            PartitionKey::Int32(_) => PartitionKeyClass::Int32,
            PartitionKey::Int64(_) => PartitionKeyClass::Int64,
            PartitionKey::Null(_) => PartitionKeyClass::Null,
        }
    }

    /// Render every declared component of this key
    pub fn components(&self) -> Vec<(&'static str, String)> {
        match self {
            PartitionKey::Date(k) => k.components(),
            PartitionKey::Int8(k) => k.components(),
            PartitionKey::Int16(k) => k.components(),
            PartitionKey::Int32(k) => k.components(),
            PartitionKey::Int64(k) => k.components(),
            PartitionKey::Null(k) => k.components(),
        }
    }

    /// Render one named component, if this key kind declares it
    pub fn component(&self, name: &str) -> Option<String> {
        match self {
            PartitionKey::Date(k) => k.component(name),
            PartitionKey::Int8(k) => k.component(name),
            PartitionKey::Int16(k) => k.component(name),
            PartitionKey::Int32(k) => k.component(name),
            PartitionKey::Int64(k) => k.component(name),
            PartitionKey::Null(k) => k.component(name),
        }
    }
}

impl From<DateKey> for PartitionKey {
    fn from(key: DateKey) -> Self {
        PartitionKey::Date(key)
    }
}

impl From<Int8Key> for PartitionKey {
    fn from(key: Int8Key) -> Self {
        PartitionKey::Int8(key)
    }
}

impl From<Int16Key> for PartitionKey {
    fn from(key: Int16Key) -> Self {
        PartitionKey::Int16(key)
    }
}

impl From<Int32Key> for PartitionKey {
    fn from(key: Int32Key) -> Self {
        PartitionKey::Int32(key)
    }
}

impl From<Int64Key> for PartitionKey {
    fn from(key: Int64Key) -> Self {
        PartitionKey::Int64(key)
    }
}

impl From<NullKey> for PartitionKey {
    fn from(key: NullKey) -> Self {
        PartitionKey::Null(key)
    }
}

/// The class object of a partition key kind
///
/// Used for schema-level composite keys (before any concrete value exists)
/// and as the registered binding target in [`PartitionKeyRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionKeyClass {
    Date,
    Int8,
    Int16,
    Int32,
    Int64,
    Null,
}

impl PartitionKeyClass {
    pub fn name(&self) -> &'static str {
        match self {
            PartitionKeyClass::Date => "DateKey",
            PartitionKeyClass::Int8 => "Int8Key",
            PartitionKeyClass::Int16 => "Int16Key",
            PartitionKeyClass::Int32 => "Int32Key",
            PartitionKeyClass::Int64 => "Int64Key",
            PartitionKeyClass::Null => "NullKey",
        }
    }

    /// The canonical type this key kind binds to
    pub fn matching_type(&self) -> TypeKind {
        match self {
            PartitionKeyClass::Date => TypeKind::Date,
            PartitionKeyClass::Int8 => TypeKind::Int8,
            PartitionKeyClass::Int16 => TypeKind::Int16,
            PartitionKeyClass::Int32 => TypeKind::Int32,
            PartitionKeyClass::Int64 => TypeKind::Int64,
            PartitionKeyClass::Null => TypeKind::Null,
        }
    }

    /// The fixed set of component names this key kind declares
    pub fn key_components(&self) -> Vec<&'static str> {
        match self {
            PartitionKeyClass::Date => DateKey::key_components(),
            PartitionKeyClass::Int8 => Int8Key::key_components(),
            PartitionKeyClass::Int16 => Int16Key::key_components(),
            PartitionKeyClass::Int32 => Int32Key::key_components(),
            PartitionKeyClass::Int64 => Int64Key::key_components(),
            PartitionKeyClass::Null => NullKey::key_components(),
        }
    }

    /// Parse a concrete instance from named string components
    pub fn from_key_components(&self, components: &[(&str, &str)]) -> Result<PartitionKey> {
        Ok(match self {
            PartitionKeyClass::Date => DateKey::from_key_components(components)?.into(),
            PartitionKeyClass::Int8 => Int8Key::from_key_components(components)?.into(),
            PartitionKeyClass::Int16 => Int16Key::from_key_components(components)?.into(),
            PartitionKeyClass::Int32 => Int32Key::from_key_components(components)?.into(),
            PartitionKeyClass::Int64 => Int64Key::from_key_components(components)?.into(),
            PartitionKeyClass::Null => NullKey::from_key_components(components)?.into(),
        })
    }
}

impl std::fmt::Display for PartitionKeyClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

const BUILTIN_CLASSES: [PartitionKeyClass; 6] = [
    PartitionKeyClass::Date,
    PartitionKeyClass::Int8,
    PartitionKeyClass::Int16,
    PartitionKeyClass::Int32,
    PartitionKeyClass::Int64,
    PartitionKeyClass::Null,
];

/// Registry binding canonical types to partition key classes
///
/// Populated once at startup; registration is append-only and
/// conflict-checked, reads are lock-free afterwards.
#[derive(Debug, Default)]
pub struct PartitionKeyRegistry {
    by_type: HashMap<TypeKind, PartitionKeyClass>,
}

impl PartitionKeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in key classes bound
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for class in BUILTIN_CLASSES {
            // distinct matching types, a conflict is unreachable
            registry.by_type.insert(class.matching_type(), class);
        }
        registry
    }

    /// Bind a key class to its matching type, erroring if already bound
    pub fn register(&mut self, class: PartitionKeyClass) -> Result<()> {
        let ty = class.matching_type();
        if let Some(existing) = self.by_type.get(&ty) {
            return Err(TesseraError::registration_conflict(format!(
                "partition key type {} is already bound to {}",
                ty,
                existing.name(),
            )));
        }
        tracing::debug!(
            key_class = class.name(),
            matching_type = %ty,
            "registered partition key class"
        );
        self.by_type.insert(ty, class);
        Ok(())
    }

    /// Exact-kind lookup of the key class bound to a canonical type
    pub fn get_class_for(&self, ty: &Type) -> Result<PartitionKeyClass> {
        self.by_type.get(&ty.kind()).copied().ok_or_else(|| {
            TesseraError::missing_registration(format!(
                "no partition key class is registered for type {}",
                ty.type_name(),
            ))
        })
    }
}

static DEFAULT_REGISTRY: Lazy<PartitionKeyRegistry> = Lazy::new(PartitionKeyRegistry::builtin);

/// The process-wide registry of built-in key classes
pub fn default_registry() -> &'static PartitionKeyRegistry {
    &DEFAULT_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_components() {
        let key = DateKey::new(Date::new(2024, 1, 2).unwrap());
        assert_eq!(key.component("Y").unwrap(), "2024");
        assert_eq!(key.component("m").unwrap(), "1");
        assert_eq!(key.component("d").unwrap(), "2");
        assert_eq!(key.component("iso").unwrap(), "2024-01-02");
        assert_eq!(key.component("hex"), None);
        assert_eq!(DateKey::key_components(), vec!["Y", "m", "d", "iso"]);
    }

    #[test]
    fn test_int_hex_component() {
        assert_eq!(Int64Key::new(10).component("hex").unwrap(), "0xa");
        assert_eq!(Int64Key::new(-10).component("hex").unwrap(), "-0xa");
        assert_eq!(Int8Key::new(i8::MIN).component("hex").unwrap(), "-0x80");
    }

    #[test]
    fn test_hex_parsing_variants() {
        for raw in ["0xa", "0XA", "a", "A"] {
            assert_eq!(
                Int32Key::from_key_components(&[("hex", raw)]).unwrap(),
                Int32Key::new(10),
            );
        }
        assert_eq!(
            Int8Key::from_key_components(&[("hex", "-0x80")]).unwrap(),
            Int8Key::new(i8::MIN),
        );
    }

    #[test]
    fn test_hex_out_of_range() {
        let err = Int8Key::from_key_components(&[("hex", "0x100")]).unwrap_err();
        assert!(matches!(err, TesseraError::MalformedComponents(_)));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_duplicate_component_names() {
        let err = Int64Key::from_key_components(&[("key", "1"), ("key", "2")]).unwrap_err();
        assert!(matches!(err, TesseraError::MalformedComponents(_)));
    }

    #[test]
    fn test_null_key() {
        assert_eq!(
            NullKey::from_key_components(&[("key", "None")]).unwrap(),
            NullKey,
        );
        assert!(NullKey::key_components().is_empty());
        assert!(NullKey.components().is_empty());

        let err = NullKey::from_key_components(&[("key", "null")]).unwrap_err();
        assert!(err.to_string().contains("'null'"));
    }

    #[test]
    fn test_class_dispatch() {
        let key = PartitionKeyClass::Date
            .from_key_components(&[("iso", "2024-01-02")])
            .unwrap();
        assert_eq!(key.class(), PartitionKeyClass::Date);
        assert_eq!(key.component("Y").unwrap(), "2024");
    }
}
