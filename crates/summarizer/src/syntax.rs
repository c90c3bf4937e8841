use tree_sitter::Node;

/// Longest raw snippet (initializers, generic statements) kept in a digest
pub(crate) const MAX_SNIPPET_CHARS: usize = 160;

/// Deepest syntax nesting either pass descends into (fits a 2 MiB thread stack)
pub(crate) const MAX_NESTING_DEPTH: usize = 128;

/// Syntax categories the declaration pass knows how to encode.
///
/// Tree-sitter kinds from both the JavaScript and TypeScript grammars map onto
/// this closed set; everything else is `Other` and gets the recurse-or-prune
/// treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SyntaxCategory {
    Program,
    Namespace,
    Import,
    Export,
    Function,
    ArrowFunction,
    Method,
    MethodSignature,
    Class,
    Interface,
    Field,
    PropertySignature,
    TypeAlias,
    Enum,
    VariableGroup,
    SyntaxError,
    Trivia,
    Other,
}

impl SyntaxCategory {
    pub(crate) fn of(kind: &str) -> Self {
        match kind {
            "program" => Self::Program,
            "internal_module" | "module" => Self::Namespace,
            "import_statement" => Self::Import,
            "export_statement" => Self::Export,
            "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "function"
            | "generator_function"
            | "function_signature" => Self::Function,
            "arrow_function" => Self::ArrowFunction,
            "method_definition" => Self::Method,
            "method_signature" | "abstract_method_signature" => Self::MethodSignature,
            "class_declaration" | "abstract_class_declaration" | "class" => Self::Class,
            "interface_declaration" => Self::Interface,
            "public_field_definition" | "field_definition" => Self::Field,
            "property_signature" => Self::PropertySignature,
            "type_alias_declaration" => Self::TypeAlias,
            "enum_declaration" => Self::Enum,
            "lexical_declaration" | "variable_declaration" => Self::VariableGroup,
            "ERROR" => Self::SyntaxError,
            "comment" | "decorator" | "empty_statement" | "hash_bang_line" => Self::Trivia,
            _ => Self::Other,
        }
    }
}

/// Source text of a node
pub(crate) fn text<'a>(node: Node, src: &'a str) -> &'a str {
    src.get(node.byte_range()).unwrap_or("")
}

/// Source text of a field child, if present
pub(crate) fn field_text<'a>(node: Node, field: &str, src: &'a str) -> Option<&'a str> {
    node.child_by_field_name(field).map(|child| text(child, src))
}

/// Named children, comments excluded
pub(crate) fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Strip one layer of matching quotes from a string literal
pub(crate) fn unquote(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && matches!(first, b'"' | b'\'' | b'`') {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

/// Collapse whitespace runs and cap length
pub(crate) fn snippet(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_SNIPPET_CHARS {
        return collapsed;
    }
    let mut capped: String = collapsed.chars().take(MAX_SNIPPET_CHARS).collect();
    capped.push('…');
    capped
}

/// Text of the type inside a `type_annotation` (`: Foo` -> `Foo`)
pub(crate) fn type_text(annotation: Node, src: &str) -> String {
    if annotation.kind() == "type_annotation" {
        if let Some(inner) = named_children(annotation).first() {
            return text(*inner, src).to_string();
        }
    }
    text(annotation, src)
        .trim_start_matches(':')
        .trim()
        .to_string()
}

/// Name part of a heritage reference (`Base<T>` -> `Base`)
pub(crate) fn reference_name(node: Node, src: &str) -> String {
    match node.kind() {
        "generic_type" => field_text(node, "name", src)
            .unwrap_or_else(|| text(node, src))
            .to_string(),
        _ => text(node, src).to_string(),
    }
}

/// Literal initializers keep their value; the returned type is inferred from the literal
pub(crate) fn literal(node: Node, src: &str) -> Option<(String, &'static str)> {
    match node.kind() {
        "string" => Some((unquote(text(node, src)).to_string(), "string")),
        "number" => Some((text(node, src).to_string(), "number")),
        "true" | "false" => Some((text(node, src).to_string(), "boolean")),
        _ => None,
    }
}
