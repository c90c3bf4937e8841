//! Coarse control-flow skeleton of a function body.
//!
//! Statements are visited one level at a time. Blocks flatten into their
//! statements, `if`/`return`/bare calls get dedicated nodes, loops, `switch` and
//! `try` keep their kind plus a recursively processed body, and any other
//! statement survives only if a call was found somewhere inside it. Anything
//! nested deeper than [`MAX_NESTING_DEPTH`] is pruned.

use crate::syntax::{named_children, snippet, text, MAX_NESTING_DEPTH};
use crate::types::{ConstructKind, LogicNode};
use tree_sitter::Node;

/// Build the skeleton for a function body (statement block or expression body)
///
/// `depth` is the nesting level of the function itself.
pub(crate) fn logic_flow(body: Node, src: &str, depth: usize) -> Vec<LogicNode> {
    if body.kind() == "statement_block" {
        return statements(body, src, depth + 1);
    }
    // Expression-bodied arrow function: the expression is the return value.
    vec![LogicNode::ReturnStatement {
        value: text(body, src).to_string(),
    }]
}

fn statements(block: Node, src: &str, depth: usize) -> Vec<LogicNode> {
    named_children(block)
        .into_iter()
        .flat_map(|stmt| statement(stmt, src, depth))
        .collect()
}

fn statement(node: Node, src: &str, depth: usize) -> Vec<LogicNode> {
    if depth >= MAX_NESTING_DEPTH {
        return Vec::new();
    }
    let inner = depth + 1;
    match node.kind() {
        "statement_block" => statements(node, src, inner),
        "if_statement" => vec![if_statement(node, src, inner)],
        "return_statement" => vec![return_statement(node, src)],
        "expression_statement" => expression_statement(node, src, inner),
        "for_statement" => construct(node, ConstructKind::ForStatement, src, inner),
        "for_in_statement" => construct(node, ConstructKind::ForInStatement, src, inner),
        "while_statement" => construct(node, ConstructKind::WhileStatement, src, inner),
        "do_statement" => construct(node, ConstructKind::DoStatement, src, inner),
        "switch_statement" => switch_statement(node, src, inner),
        "try_statement" => try_statement(node, src, inner),
        "empty_statement"
        | "function_declaration"
        | "generator_function_declaration"
        | "class_declaration" => Vec::new(),
        _ => generic(node, src, inner),
    }
}

fn if_statement(node: Node, src: &str, depth: usize) -> LogicNode {
    let condition = node
        .child_by_field_name("condition")
        .map(|cond| {
            // `(x)` -> `x`
            match (cond.kind(), named_children(cond).first()) {
                ("parenthesized_expression", Some(inner)) => text(*inner, src),
                _ => text(cond, src),
            }
        })
        .unwrap_or("")
        .to_string();

    let then_block = node
        .child_by_field_name("consequence")
        .map(|stmt| statement(stmt, src, depth))
        .unwrap_or_default();

    let else_block = node.child_by_field_name("alternative").map(|alt| {
        if alt.kind() == "else_clause" {
            named_children(alt)
                .into_iter()
                .flat_map(|stmt| statement(stmt, src, depth))
                .collect()
        } else {
            statement(alt, src, depth)
        }
    });

    LogicNode::IfStatement {
        condition,
        then_block,
        else_block,
    }
}

fn return_statement(node: Node, src: &str) -> LogicNode {
    let value = named_children(node)
        .first()
        .map(|expr| text(*expr, src).to_string())
        .unwrap_or_else(|| LogicNode::VOID.to_string());
    LogicNode::ReturnStatement { value }
}

fn expression_statement(node: Node, src: &str, depth: usize) -> Vec<LogicNode> {
    if let Some(expr) = named_children(node).first() {
        if let Some(call) = bare_call(*expr) {
            return vec![call_node(call, src)];
        }
    }
    generic(node, src, depth)
}

/// `foo(x)` or `await foo(x)` used as a statement
fn bare_call(expr: Node) -> Option<Node> {
    match expr.kind() {
        "call_expression" => Some(expr),
        "await_expression" => named_children(expr)
            .first()
            .copied()
            .filter(|inner| inner.kind() == "call_expression"),
        _ => None,
    }
}

fn call_node(call: Node, src: &str) -> LogicNode {
    let callee = call
        .child_by_field_name("function")
        .map(|f| text(f, src).to_string())
        .unwrap_or_default();
    let arguments = match call.child_by_field_name("arguments") {
        Some(args) if args.kind() == "arguments" => named_children(args)
            .into_iter()
            .map(|arg| text(arg, src).to_string())
            .collect(),
        // Tagged template: the template itself is the argument.
        Some(template) => vec![text(template, src).to_string()],
        None => Vec::new(),
    };
    LogicNode::Call { callee, arguments }
}

fn construct(node: Node, kind: ConstructKind, src: &str, depth: usize) -> Vec<LogicNode> {
    let children = node
        .child_by_field_name("body")
        .map(|body| statement(body, src, depth))
        .unwrap_or_default();
    vec![LogicNode::Construct { kind, children }]
}

fn switch_statement(node: Node, src: &str, depth: usize) -> Vec<LogicNode> {
    let mut children = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        for case in named_children(body) {
            let mut cursor = case.walk();
            let stmts: Vec<Node> = case.children_by_field_name("body", &mut cursor).collect();
            for stmt in stmts {
                children.extend(statement(stmt, src, depth));
            }
        }
    }
    vec![LogicNode::Construct {
        kind: ConstructKind::SwitchStatement,
        children,
    }]
}

fn try_statement(node: Node, src: &str, depth: usize) -> Vec<LogicNode> {
    let mut children = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        children.extend(statement(body, src, depth));
    }
    for clause in ["handler", "finalizer"] {
        if let Some(body) = node
            .child_by_field_name(clause)
            .and_then(|c| c.child_by_field_name("body"))
        {
            children.extend(statement(body, src, depth));
        }
    }
    vec![LogicNode::Construct {
        kind: ConstructKind::TryStatement,
        children,
    }]
}

fn generic(node: Node, src: &str, depth: usize) -> Vec<LogicNode> {
    let children = nested_results(node, src, depth);
    if children.is_empty() {
        return Vec::new();
    }
    vec![LogicNode::Generic {
        kind: node.kind().to_string(),
        text: snippet(text(node, src)),
        children,
    }]
}

/// Calls found below an unrecognized node, without entering nested functions
fn nested_results(node: Node, src: &str, depth: usize) -> Vec<LogicNode> {
    if depth >= MAX_NESTING_DEPTH {
        return Vec::new();
    }
    let mut results = Vec::new();
    for child in named_children(node) {
        match child.kind() {
            "call_expression" => results.push(call_node(child, src)),
            "statement_block" => results.extend(statements(child, src, depth + 1)),
            "arrow_function" | "function_expression" | "function" | "generator_function"
            | "class" => {}
            _ => results.extend(nested_results(child, src, depth + 1)),
        }
    }
    results
}
