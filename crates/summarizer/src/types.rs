use serde::{Deserialize, Serialize};

/// One node of a structural digest
///
/// `children` is only populated on container kinds and `logic_flow` only on
/// function-like kinds; the builder methods enforce this.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StructuralNode {
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Qualifiers such as export, default, static, async, readonly (source order, no duplicates)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,

    /// Declared (or literal-inferred) type, or the aliased type of a type alias
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<String>,

    /// Literal value for simple initializers, raw initializer text otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js_doc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import: Option<ImportDetail>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportDetail>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StructuralNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logic_flow: Vec<LogicNode>,
}

impl StructuralNode {
    /// Create an empty node of the given kind
    #[must_use]
    pub const fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            modifiers: Vec::new(),
            signature: None,
            type_annotation: None,
            value: None,
            extends: Vec::new(),
            implements: Vec::new(),
            js_doc: None,
            import: None,
            export: None,
            children: Vec::new(),
            logic_flow: Vec::new(),
        }
    }

    /// Builder: set name
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: set children (ignored unless the kind is a container)
    #[must_use]
    pub fn with_children(mut self, children: Vec<StructuralNode>) -> Self {
        debug_assert!(
            children.is_empty() || self.kind.is_container(),
            "{:?} cannot hold children",
            self.kind
        );
        if self.kind.is_container() {
            self.children = children;
        }
        self
    }

    /// Builder: set logic flow (ignored unless the kind is function-like)
    #[must_use]
    pub fn with_logic_flow(mut self, logic_flow: Vec<LogicNode>) -> Self {
        debug_assert!(
            logic_flow.is_empty() || self.kind.is_function_like(),
            "{:?} cannot hold logic flow",
            self.kind
        );
        if self.kind.is_function_like() {
            self.logic_flow = logic_flow;
        }
        self
    }

    /// Add a modifier, keeping the first occurrence only
    pub fn add_modifier(&mut self, modifier: impl Into<String>) {
        let modifier = modifier.into();
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
    }

    /// Check if a modifier is present
    #[must_use]
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    /// Find a direct child by name
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&StructuralNode> {
        self.children
            .iter()
            .find(|child| child.name.as_deref() == Some(name))
    }

    /// Compact JSON form embedded in prompts
    #[must_use]
    pub fn to_digest(&self) -> String {
        // Plain data with string keys only; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Indented JSON form for humans
    #[must_use]
    pub fn to_pretty_digest(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Total number of nodes in this subtree
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}

/// Kind tag of a [`StructuralNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Module,
    Import,
    Export,
    Function,
    Method,
    ArrowFunction,
    Class,
    Interface,
    Property,
    PropertySignature,
    Constructor,
    TypeAlias,
    Enum,
    Variable,
    VariableDeclarationGroup,
    /// Several meaningful results found under an unrecognized node
    GenericContainer,
    /// Meaningful results recovered from a syntax error region
    Unknown,
}

impl NodeKind {
    /// Kinds that carry a logic-flow skeleton
    #[must_use]
    pub const fn is_function_like(self) -> bool {
        matches!(
            self,
            Self::Function | Self::Method | Self::ArrowFunction | Self::Constructor
        )
    }

    /// Kinds that carry nested declarations
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::Module
                | Self::Class
                | Self::Interface
                | Self::Enum
                | Self::VariableDeclarationGroup
                | Self::GenericContainer
                | Self::Unknown
        )
    }
}

/// Parameter list and return type of a function-like node
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub parameters: Vec<Parameter>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,

    /// `?` marker or a default value
    #[serde(default)]
    pub optional: bool,
}

/// Module wiring of an import statement
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportDetail {
    pub module_specifier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_import: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_import: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<ImportElement>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub type_only: bool,
}

/// A named import. `name` is the locally bound name; `alias` holds the
/// original exported name when the import is renamed (`import { Bar as Baz }`
/// gives `name = "Baz"`, `alias = "Bar"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportElement {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// Module wiring of an export statement that is not a declaration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportDetail {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<ExportElement>,

    /// Re-export source (`export ... from "./x"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// `export * from "./x"`
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub wildcard: bool,

    /// `export * as ns from "./x"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub type_only: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_default: bool,
}

/// A named export. Same convention as [`ImportElement`]: `name` is the name the
/// statement introduces (the public one), `alias` the local name it refers to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportElement {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// Statement-level control-flow skeleton of a function body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum LogicNode {
    IfStatement {
        condition: String,
        #[serde(rename = "thenBlock")]
        then_block: Vec<LogicNode>,
        #[serde(
            default,
            rename = "elseBlock",
            skip_serializing_if = "Option::is_none"
        )]
        else_block: Option<Vec<LogicNode>>,
    },
    ReturnStatement {
        /// Returned expression text, or `"void"`
        value: String,
    },
    Call {
        callee: String,
        arguments: Vec<String>,
    },
    /// Loop, switch or try with its recursively processed body
    Construct {
        kind: ConstructKind,
        children: Vec<LogicNode>,
    },
    /// Unrecognized statement whose sub-expressions produced results
    Generic {
        kind: String,
        text: String,
        children: Vec<LogicNode>,
    },
}

impl LogicNode {
    /// Marker used when a `return` has no expression
    pub const VOID: &'static str = "void";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstructKind {
    ForStatement,
    ForInStatement,
    WhileStatement,
    DoStatement,
    SwitchStatement,
    TryStatement,
}
