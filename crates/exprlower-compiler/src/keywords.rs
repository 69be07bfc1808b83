//! Reserved words of the host language.

const KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "null", "package", "private", "protected", "public", "return",
    "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

/// Whether `name` cannot be used as a host identifier.
pub fn is_host_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Escape a proposed identifier that collides with a reserved word by
/// appending `_`.
pub fn make_identifier(name: &str) -> String {
    if is_host_keyword(name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}
