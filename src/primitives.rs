//! Source primitive name to target primitive name mapping.

const PRIMITIVES: &[(&str, &str)] = &[
    ("string", "String"),
    ("boolean", "Bool"),
    ("int8", "Int"),
    ("int16", "Int"),
    ("int32", "Int"),
    ("int64", "Int"),
    ("safeint", "Int"),
    ("uint8", "Nat"),
    ("uint16", "Nat"),
    ("uint32", "Nat"),
    ("uint64", "Nat"),
    ("integer", "BigInt"),
    ("float", "Float"),
    ("float32", "Float"),
    ("float64", "Float"),
    ("numeric", "Float"),
    ("decimal", "Decimal"),
    ("decimal128", "Decimal"),
    ("bytes", "ByteBuffer"),
    ("plainDate", "DateTime"),
    ("plainTime", "DateTime"),
    ("utcDateTime", "DateTime"),
    ("zonedDateTime", "DateTime"),
    ("null", "None"),
];

/// Target string type; the only type that accepts `@pattern` validators.
pub const TARGET_STRING: &str = "String";

/// Target top type used for `unknown`.
pub const TARGET_ANY: &str = "Any";

/// Returns the target primitive for a source primitive name.
pub fn lookup_primitive(name: &str) -> Option<&'static str> {
    PRIMITIVES
        .iter()
        .find(|(source, _)| *source == name)
        .map(|(_, target)| *target)
}

/// Maps a referenced name: primitives are translated, anything else passes through.
pub fn map_type_name(name: &str) -> String {
    lookup_primitive(name)
        .map(str::to_string)
        .unwrap_or_else(|| name.to_string())
}

/// All source primitive names, in table order.
pub fn primitive_names() -> impl Iterator<Item = &'static str> {
    PRIMITIVES.iter().map(|(source, _)| *source)
}
