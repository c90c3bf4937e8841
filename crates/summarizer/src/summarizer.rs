use crate::error::{Result, SummarizerError};
use crate::language::Language;
use crate::logic_flow::logic_flow;
use crate::syntax::{
    field_text, literal, named_children, reference_name, snippet, text, type_text, unquote,
    SyntaxCategory, MAX_NESTING_DEPTH,
};
use crate::types::{
    ExportDetail, ExportElement, ImportDetail, ImportElement, NodeKind, Parameter, Signature,
    StructuralNode,
};
use std::cell::Cell;
use tree_sitter::{Node, Parser};

/// Anonymous tokens that become modifiers verbatim
const MODIFIER_TOKENS: &[&str] = &[
    "export", "default", "declare", "abstract", "static", "readonly", "async", "get", "set",
    "const", "let", "var", "accessor",
];

/// Builds structural digests for one language
pub struct Summarizer {
    parser: Parser,
    language: Language,
}

impl Summarizer {
    /// Create a summarizer for a language with a wired grammar
    pub fn new(language: Language) -> Result<Self> {
        if !language.supports_summary() {
            return Err(SummarizerError::unsupported_language(language.as_str()));
        }

        let ts_language = language.tree_sitter_language()?;
        let mut parser = Parser::new();
        parser
            .set_language(&ts_language)
            .map_err(|e| SummarizerError::tree_sitter(format!("Failed to set language: {e}")))?;

        Ok(Self { parser, language })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Summarize one file's source text into a `Module` node
    pub fn summarize(&mut self, source: &str) -> Result<StructuralNode> {
        if source.trim().is_empty() {
            return Err(SummarizerError::EmptyContent);
        }

        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| SummarizerError::parse("Failed to parse source code"))?;
        let root = tree.root_node();
        if root.has_error() {
            log::debug!(
                "{} source contains syntax errors; digest is best-effort",
                self.language.as_str()
            );
        }

        let extractor = Extractor::new(source);
        let module = extractor.module(root);
        if extractor.too_deep.get() {
            return Err(SummarizerError::parse(format!(
                "nesting too deep (more than {MAX_NESTING_DEPTH} levels)"
            )));
        }
        Ok(module)
    }
}

/// Summarize a file, picking the grammar from its path
pub fn summarize(path: &str, source: &str) -> Result<StructuralNode> {
    let mut summarizer = Summarizer::new(Language::from_path(path))?;
    let mut module = summarizer.summarize(source)?;
    module.name = Some(path.to_string());
    Ok(module)
}

/// One-pass, top-down declaration walk over a parsed file
struct Extractor<'a> {
    src: &'a str,
    depth: Cell<usize>,
    too_deep: Cell<bool>,
}

impl<'a> Extractor<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            depth: Cell::new(0),
            too_deep: Cell::new(false),
        }
    }

    fn text(&self, node: Node) -> &'a str {
        text(node, self.src)
    }

    fn module(&self, root: Node) -> StructuralNode {
        StructuralNode::new(NodeKind::Module).with_children(self.statements(root))
    }

    fn statements(&self, parent: Node) -> Vec<StructuralNode> {
        named_children(parent)
            .into_iter()
            .filter_map(|child| self.node(child))
            .collect()
    }

    /// Dispatch one syntax node; `None` prunes it
    fn node(&self, node: Node) -> Option<StructuralNode> {
        let depth = self.depth.get();
        if depth >= MAX_NESTING_DEPTH {
            self.too_deep.set(true);
            return None;
        }
        self.depth.set(depth + 1);
        let out = self.dispatch(node);
        self.depth.set(depth);
        out
    }

    fn dispatch(&self, node: Node) -> Option<StructuralNode> {
        match SyntaxCategory::of(node.kind()) {
            SyntaxCategory::Program => Some(self.module(node)),
            SyntaxCategory::Namespace => Some(self.namespace(node)),
            SyntaxCategory::Import => Some(self.import(node)),
            SyntaxCategory::Export => self.export(node),
            SyntaxCategory::Function => Some(self.function_like(
                node,
                NodeKind::Function,
                field_text(node, "name", self.src).map(str::to_string),
            )),
            SyntaxCategory::ArrowFunction => {
                Some(self.function_like(node, NodeKind::ArrowFunction, None))
            }
            SyntaxCategory::Method | SyntaxCategory::MethodSignature => Some(self.method(node)),
            SyntaxCategory::Class => Some(self.class(node)),
            SyntaxCategory::Interface => Some(self.interface(node)),
            SyntaxCategory::Field => Some(self.field(node)),
            SyntaxCategory::PropertySignature => Some(self.property_signature(node)),
            SyntaxCategory::TypeAlias => Some(self.type_alias(node)),
            SyntaxCategory::Enum => Some(self.enumeration(node)),
            SyntaxCategory::VariableGroup => Some(self.variable_group(node)),
            SyntaxCategory::SyntaxError => {
                self.recurse(node)
                    .map(|found| StructuralNode::new(NodeKind::Unknown).with_children(found))
            }
            SyntaxCategory::Trivia => None,
            SyntaxCategory::Other => self.recurse(node).map(|mut found| {
                if found.len() == 1 {
                    found.remove(0)
                } else {
                    StructuralNode::new(NodeKind::GenericContainer).with_children(found)
                }
            }),
        }
    }

    /// Meaningful results below an unrecognized node, if any
    fn recurse(&self, node: Node) -> Option<Vec<StructuralNode>> {
        let found = self.statements(node);
        (!found.is_empty()).then_some(found)
    }

    fn namespace(&self, node: Node) -> StructuralNode {
        let mut module = StructuralNode::new(NodeKind::Module);
        module.name = field_text(node, "name", self.src).map(str::to_string);
        module.js_doc = self.js_doc(node);
        let children = node
            .child_by_field_name("body")
            .map(|body| self.statements(body))
            .unwrap_or_default();
        module.with_children(children)
    }

    fn import(&self, node: Node) -> StructuralNode {
        let mut detail = ImportDetail::default();
        let mut source = node.child_by_field_name("source");

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "type" => detail.type_only = true,
                "import_clause" => self.import_clause(child, &mut detail),
                // `import x = require("y")`
                "import_require_clause" => {
                    detail.default_import = named_children(child)
                        .first()
                        .filter(|n| n.kind() == "identifier")
                        .map(|n| self.text(*n).to_string());
                    source = source.or_else(|| child.child_by_field_name("source"));
                }
                _ => {}
            }
        }
        detail.module_specifier = source
            .map(|s| unquote(self.text(s)).to_string())
            .unwrap_or_default();

        let mut out = StructuralNode::new(NodeKind::Import);
        out.import = Some(detail);
        out
    }

    fn import_clause(&self, clause: Node, detail: &mut ImportDetail) {
        for part in named_children(clause) {
            match part.kind() {
                "identifier" => detail.default_import = Some(self.text(part).to_string()),
                "namespace_import" => {
                    detail.namespace_import = named_children(part)
                        .last()
                        .map(|id| self.text(*id).to_string());
                }
                "named_imports" => {
                    for spec in named_children(part) {
                        if spec.kind() != "import_specifier" {
                            continue;
                        }
                        let original = field_text(spec, "name", self.src).unwrap_or_default();
                        let element = match field_text(spec, "alias", self.src) {
                            Some(local) => ImportElement {
                                name: local.to_string(),
                                alias: Some(original.to_string()),
                            },
                            None => ImportElement {
                                name: original.to_string(),
                                alias: None,
                            },
                        };
                        detail.elements.push(element);
                    }
                }
                _ => {}
            }
        }
    }

    fn export(&self, node: Node) -> Option<StructuralNode> {
        let mut detail = ExportDetail::default();
        let mut cursor = node.walk();
        let tokens: Vec<Node> = node.children(&mut cursor).collect();
        for token in &tokens {
            match token.kind() {
                "default" => detail.is_default = true,
                "type" => detail.type_only = true,
                "*" => detail.wildcard = true,
                "namespace_export" => {
                    detail.wildcard = true;
                    detail.namespace = named_children(*token)
                        .last()
                        .map(|id| unquote(self.text(*id)).to_string());
                }
                "export_clause" => {
                    for spec in named_children(*token) {
                        if spec.kind() != "export_specifier" {
                            continue;
                        }
                        let local = field_text(spec, "name", self.src).unwrap_or_default();
                        let element = match field_text(spec, "alias", self.src) {
                            Some(public) => ExportElement {
                                name: unquote(public).to_string(),
                                alias: Some(unquote(local).to_string()),
                            },
                            None => ExportElement {
                                name: unquote(local).to_string(),
                                alias: None,
                            },
                        };
                        detail.elements.push(element);
                    }
                }
                _ => {}
            }
        }

        // `export <declaration>` and `export default <function|class>` describe the
        // declaration itself.
        let exported = node.child_by_field_name("declaration").or_else(|| {
            node.child_by_field_name("value").filter(|value| {
                matches!(
                    SyntaxCategory::of(value.kind()),
                    SyntaxCategory::Function | SyntaxCategory::ArrowFunction | SyntaxCategory::Class
                )
            })
        });
        if let Some(declaration) = exported {
            let mut out = self.node(declaration)?;
            let mut modifiers = vec!["export".to_string()];
            if detail.is_default {
                modifiers.push("default".to_string());
            }
            for existing in out.modifiers.drain(..) {
                if !modifiers.contains(&existing) {
                    modifiers.push(existing);
                }
            }
            out.modifiers = modifiers;
            if out.js_doc.is_none() {
                out.js_doc = self.js_doc(node);
            }
            return Some(out);
        }

        if let Some(value) = node.child_by_field_name("value") {
            detail.elements.push(ExportElement {
                name: snippet(self.text(value)),
                alias: None,
            });
        }
        detail.source = node
            .child_by_field_name("source")
            .map(|s| unquote(self.text(s)).to_string());

        let mut out = StructuralNode::new(NodeKind::Export);
        out.js_doc = self.js_doc(node);
        out.export = Some(detail);
        Some(out)
    }

    fn function_like(&self, node: Node, kind: NodeKind, name: Option<String>) -> StructuralNode {
        let mut out = StructuralNode::new(kind);
        out.name = name;
        out.modifiers = self.modifiers(node);
        out.signature = Some(self.signature(node));
        out.js_doc = self.js_doc(node);
        let flow = node
            .child_by_field_name("body")
            .map(|body| logic_flow(body, self.src, self.depth.get()))
            .unwrap_or_default();
        out.with_logic_flow(flow)
    }

    fn method(&self, node: Node) -> StructuralNode {
        let name = field_text(node, "name", self.src).unwrap_or_default();
        let kind = if name == "constructor" {
            NodeKind::Constructor
        } else {
            NodeKind::Method
        };
        self.function_like(node, kind, Some(name.to_string()))
    }

    fn signature(&self, node: Node) -> Signature {
        let parameters = match node.child_by_field_name("parameters") {
            Some(params) => named_children(params)
                .into_iter()
                .filter(|p| p.kind() != "decorator")
                .map(|p| self.parameter(p))
                .collect(),
            // `x => ...`
            None => node
                .child_by_field_name("parameter")
                .map(|p| vec![self.parameter(p)])
                .unwrap_or_default(),
        };
        let return_type = node
            .child_by_field_name("return_type")
            .map(|rt| type_text(rt, self.src));
        Signature {
            parameters,
            return_type,
        }
    }

    fn parameter(&self, node: Node) -> Parameter {
        match node.kind() {
            "required_parameter" | "optional_parameter" => Parameter {
                name: field_text(node, "pattern", self.src)
                    .unwrap_or_default()
                    .to_string(),
                ty: node
                    .child_by_field_name("type")
                    .map(|t| type_text(t, self.src)),
                optional: node.kind() == "optional_parameter"
                    || node.child_by_field_name("value").is_some(),
            },
            "assignment_pattern" => Parameter {
                name: field_text(node, "left", self.src)
                    .unwrap_or_default()
                    .to_string(),
                ty: None,
                optional: true,
            },
            _ => Parameter {
                name: self.text(node).to_string(),
                ty: None,
                optional: false,
            },
        }
    }

    fn class(&self, node: Node) -> StructuralNode {
        let mut out = StructuralNode::new(NodeKind::Class);
        out.name = field_text(node, "name", self.src).map(str::to_string);
        out.modifiers = self.modifiers(node);
        out.js_doc = self.js_doc(node);

        let mut cursor = node.walk();
        let heritage = node
            .children(&mut cursor)
            .find(|child| child.kind() == "class_heritage");
        if let Some(heritage) = heritage {
            for clause in named_children(heritage) {
                match clause.kind() {
                    "extends_clause" => {
                        let mut cursor = clause.walk();
                        let values: Vec<Node> =
                            clause.children_by_field_name("value", &mut cursor).collect();
                        out.extends
                            .extend(values.into_iter().map(|v| reference_name(v, self.src)));
                    }
                    "implements_clause" => out.implements.extend(
                        named_children(clause)
                            .into_iter()
                            .map(|t| reference_name(t, self.src)),
                    ),
                    // JavaScript grammar: `extends <expression>` directly under the heritage
                    _ => out.extends.push(reference_name(clause, self.src)),
                }
            }
        }

        let members = node
            .child_by_field_name("body")
            .map(|body| self.statements(body))
            .unwrap_or_default();
        out.with_children(members)
    }

    fn interface(&self, node: Node) -> StructuralNode {
        let mut out = StructuralNode::new(NodeKind::Interface);
        out.name = field_text(node, "name", self.src).map(str::to_string);
        out.js_doc = self.js_doc(node);

        let mut cursor = node.walk();
        let extends = node
            .children(&mut cursor)
            .find(|child| child.kind() == "extends_type_clause");
        if let Some(extends) = extends {
            out.extends.extend(
                named_children(extends)
                    .into_iter()
                    .map(|t| reference_name(t, self.src)),
            );
        }

        let members = node
            .child_by_field_name("body")
            .map(|body| self.statements(body))
            .unwrap_or_default();
        out.with_children(members)
    }

    /// Class field; function-valued fields become named function nodes
    fn field(&self, node: Node) -> StructuralNode {
        let name = node
            .child_by_field_name("name")
            .or_else(|| node.child_by_field_name("property"))
            .map(|n| self.text(n).to_string());
        let value = node.child_by_field_name("value");

        if let Some(func) = value.filter(|v| {
            matches!(
                SyntaxCategory::of(v.kind()),
                SyntaxCategory::Function | SyntaxCategory::ArrowFunction
            )
        }) {
            let kind = if func.kind() == "arrow_function" {
                NodeKind::ArrowFunction
            } else {
                NodeKind::Function
            };
            let mut out = self.function_like(func, kind, name);
            let mut modifiers = self.modifiers(node);
            modifiers.append(&mut out.modifiers);
            for modifier in modifiers {
                out.add_modifier(modifier);
            }
            out.js_doc = self.js_doc(node);
            return out;
        }

        let mut out = StructuralNode::new(NodeKind::Property);
        out.name = name;
        out.modifiers = self.modifiers(node);
        out.js_doc = self.js_doc(node);
        out.type_annotation = node
            .child_by_field_name("type")
            .map(|t| type_text(t, self.src));
        if let Some(value) = value {
            self.set_initializer(&mut out, value);
        }
        out
    }

    fn property_signature(&self, node: Node) -> StructuralNode {
        let mut out = StructuralNode::new(NodeKind::PropertySignature);
        out.name = field_text(node, "name", self.src).map(str::to_string);
        out.modifiers = self.modifiers(node);
        out.js_doc = self.js_doc(node);
        out.type_annotation = node
            .child_by_field_name("type")
            .map(|t| type_text(t, self.src));
        out
    }

    fn type_alias(&self, node: Node) -> StructuralNode {
        let mut out = StructuralNode::new(NodeKind::TypeAlias);
        out.name = field_text(node, "name", self.src).map(str::to_string);
        out.js_doc = self.js_doc(node);
        out.type_annotation = field_text(node, "value", self.src).map(snippet);
        out
    }

    fn enumeration(&self, node: Node) -> StructuralNode {
        let mut out = StructuralNode::new(NodeKind::Enum);
        out.name = field_text(node, "name", self.src).map(str::to_string);
        out.modifiers = self.modifiers(node);
        out.js_doc = self.js_doc(node);

        let members = node
            .child_by_field_name("body")
            .map(named_children)
            .unwrap_or_default()
            .into_iter()
            .map(|member| {
                let mut property = StructuralNode::new(NodeKind::Property);
                if member.kind() == "enum_assignment" {
                    property.name = field_text(member, "name", self.src)
                        .map(|n| unquote(n).to_string());
                    if let Some(value) = member.child_by_field_name("value") {
                        property.value = Some(match literal(value, self.src) {
                            Some((literal, _)) => literal,
                            None => snippet(self.text(value)),
                        });
                    }
                } else {
                    property.name = Some(unquote(self.text(member)).to_string());
                }
                property
            })
            .collect();
        out.with_children(members)
    }

    fn variable_group(&self, node: Node) -> StructuralNode {
        let mut group = StructuralNode::new(NodeKind::VariableDeclarationGroup);
        group.modifiers = self.modifiers(node);
        group.js_doc = self.js_doc(node);

        let mut bindings: Vec<StructuralNode> = named_children(node)
            .into_iter()
            .filter(|d| d.kind() == "variable_declarator")
            .map(|declarator| self.binding(declarator))
            .collect();
        // The comment sits before the group, not the initializer
        if let [only] = bindings.as_mut_slice() {
            let reemitted = matches!(
                only.kind,
                NodeKind::ArrowFunction | NodeKind::Function | NodeKind::Class
            );
            if reemitted && only.js_doc.is_none() {
                only.js_doc = group.js_doc.clone();
            }
        }
        group.with_children(bindings)
    }

    /// One declarator; function initializers are re-emitted as named functions
    fn binding(&self, declarator: Node) -> StructuralNode {
        let name = field_text(declarator, "name", self.src).map(str::to_string);
        let value = declarator.child_by_field_name("value");

        if let Some(value) = value {
            match SyntaxCategory::of(value.kind()) {
                SyntaxCategory::ArrowFunction => {
                    return self.function_like(value, NodeKind::ArrowFunction, name);
                }
                SyntaxCategory::Function => {
                    return self.function_like(value, NodeKind::Function, name);
                }
                SyntaxCategory::Class => {
                    let mut class = self.class(value);
                    if class.name.is_none() {
                        class.name = name;
                    }
                    return class;
                }
                _ => {}
            }
        }

        let mut out = StructuralNode::new(NodeKind::Variable);
        out.name = name;
        out.type_annotation = declarator
            .child_by_field_name("type")
            .map(|t| type_text(t, self.src));
        if let Some(value) = value {
            self.set_initializer(&mut out, value);
        }
        out
    }

    /// Literal value (with inferred type when undeclared) or raw initializer text
    fn set_initializer(&self, out: &mut StructuralNode, value: Node) {
        match literal(value, self.src) {
            Some((literal, inferred)) => {
                out.value = Some(literal);
                if out.type_annotation.is_none() {
                    out.type_annotation = Some(inferred.to_string());
                }
            }
            None => out.value = Some(snippet(self.text(value))),
        }
    }

    /// Qualifier tokens placed before the declaration's name
    fn modifiers(&self, node: Node) -> Vec<String> {
        let mut modifiers: Vec<String> = Vec::new();
        let mut push = |m: String| {
            if !modifiers.contains(&m) {
                modifiers.push(m);
            }
        };

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "accessibility_modifier" | "override_modifier" => {
                    push(self.text(child).to_string());
                }
                "?" => push("optional".to_string()),
                "*" => push("generator".to_string()),
                kind if !child.is_named() && MODIFIER_TOKENS.contains(&kind) => {
                    push(kind.to_string());
                }
                _ => {}
            }
        }
        modifiers
    }

    /// `/** ... */` comment ending on the line right above the declaration
    fn js_doc(&self, node: Node) -> Option<String> {
        let anchor = match node.parent() {
            Some(parent) if parent.kind() == "export_statement" => parent,
            _ => node,
        };
        let comment = anchor.prev_sibling()?;
        if comment.kind() != "comment" {
            return None;
        }
        let body = self.text(comment);
        let adjacent = anchor.start_position().row <= comment.end_position().row + 1;
        (body.starts_with("/**") && adjacent).then(|| body.to_string())
    }
}
