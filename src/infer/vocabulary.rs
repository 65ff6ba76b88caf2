//! Nouns that name Python types in free-text descriptions

/// Canonical spelling of a type noun (`String` → `str`, `A boolean` → `bool`)
pub fn canonical_type(word: &str) -> Option<&'static str> {
    match word.to_ascii_lowercase().as_str() {
        "str" | "string" => Some("str"),
        "int" | "integer" => Some("int"),
        "bool" | "boolean" => Some("bool"),
        "float" | "double" => Some("float"),
        "dict" | "dictionary" | "mapping" => Some("dict"),
        "list" => Some("list"),
        "tuple" => Some("tuple"),
        "callable" | "function" => Some("Callable"),
        _ => None,
    }
}

/// Scalar nouns allowed next to an enumerated literal set
pub fn scalar_type(word: &str) -> Option<&'static str> {
    canonical_type(word).filter(|typ| matches!(*typ, "str" | "int" | "bool" | "float"))
}

/// numpy-ish dtype names (`int64`, `float32`, `uint8`)
pub fn dtype_type(dtype: &str) -> Option<&'static str> {
    let dtype = dtype.to_ascii_lowercase();
    if dtype.starts_with("int") || dtype.starts_with("uint") {
        Some("int")
    } else if dtype.starts_with("float") {
        Some("float")
    } else if dtype.starts_with("bool") {
        Some("bool")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_type() {
        assert_eq!(canonical_type("String"), Some("str"));
        assert_eq!(canonical_type("INTEGER"), Some("int"));
        assert_eq!(canonical_type("set"), None);
        assert_eq!(scalar_type("list"), None);
        assert_eq!(dtype_type("uint8"), Some("int"));
        assert_eq!(dtype_type("complex64"), None);
    }
}
