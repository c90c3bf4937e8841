use pretty_assertions::assert_eq;
use repodoc_summarizer::{
    summarize, Language, LogicNode, NodeKind, StructuralNode, Summarizer, SummarizerError,
};

const SERVICE_TS: &str = r#"
import { Injectable } from "@nestjs/common";
import * as fs from "fs";

export interface UserRecord {
    id: number;
    email?: string;
}

/**
 * Loads and caches users.
 */
@Injectable()
export class UserService extends BaseService<UserRecord> {
    private readonly cache = new Map<number, UserRecord>();

    constructor(private readonly path: string) {
        super();
    }

    async find(id: number): Promise<UserRecord | undefined> {
        if (this.cache.has(id)) {
            return this.cache.get(id);
        }
        for (const line of fs.readFileSync(this.path, "utf8").split("\n")) {
            this.parse(line);
        }
        return undefined;
    }
}

export default function createService(path = "./users.txt"): UserService {
    return new UserService(path);
}
"#;

fn walk<'a>(node: &'a StructuralNode, out: &mut Vec<&'a StructuralNode>) {
    out.push(node);
    for child in &node.children {
        walk(child, out);
    }
}

#[test]
fn service_file_keeps_declarations_and_flow() {
    let module = summarize("src/user.service.ts", SERVICE_TS).expect("summarize failed");
    assert_eq!(module.kind, NodeKind::Module);

    let kinds: Vec<NodeKind> = module.children.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Import,
            NodeKind::Import,
            NodeKind::Interface,
            NodeKind::Class,
            NodeKind::Function,
        ]
    );

    let service = module.child("UserService").expect("class");
    assert_eq!(service.extends, vec!["BaseService"]);
    assert!(service
        .js_doc
        .as_deref()
        .is_some_and(|doc| doc.contains("Loads and caches users.")));

    let find = service.child("find").expect("method");
    assert!(find.has_modifier("async"));
    match find.logic_flow.as_slice() {
        [LogicNode::IfStatement {
            condition,
            then_block,
            else_block: None,
        }, LogicNode::Construct { .. }, LogicNode::ReturnStatement { value }] => {
            assert_eq!(condition, "this.cache.has(id)");
            assert_eq!(
                then_block,
                &vec![LogicNode::ReturnStatement {
                    value: "this.cache.get(id)".to_string()
                }]
            );
            assert_eq!(value, "undefined");
        }
        other => panic!("unexpected flow: {other:?}"),
    }

    let factory = module.child("createService").expect("default export");
    assert_eq!(factory.modifiers, vec!["export", "default"]);
    let params = &factory.signature.as_ref().unwrap().parameters;
    assert_eq!(params[0].name, "path");
    assert!(params[0].optional);
}

#[test]
fn structural_invariants_hold_for_every_node() {
    let module = summarize("src/user.service.ts", SERVICE_TS).unwrap();
    let mut nodes = Vec::new();
    walk(&module, &mut nodes);
    assert!(nodes.len() > 10, "got {} nodes", nodes.len());

    for node in nodes {
        if !node.logic_flow.is_empty() {
            assert!(node.kind.is_function_like(), "{:?} has flow", node.kind);
        }
        if !node.children.is_empty() {
            assert!(node.kind.is_container(), "{:?} has children", node.kind);
        }
    }
}

#[test]
fn digest_is_compact_and_byte_stable() {
    let first = summarize("a.ts", SERVICE_TS).unwrap().to_digest();
    let second = summarize("a.ts", SERVICE_TS).unwrap().to_digest();
    assert_eq!(first, second);
    assert!(!first.contains('\n'));
    assert!(first.contains("\"logicFlow\""));
    assert!(first.contains("\"jsDoc\""));
    assert!(first.contains("\"moduleSpecifier\":\"fs\""));
}

#[test]
fn tsx_and_jsx_components_parse() {
    let tsx = r#"
export const Button = ({ label }: { label: string }) => <button>{label}</button>;
"#;
    let mut summarizer = Summarizer::new(Language::Tsx).unwrap();
    let module = summarizer.summarize(tsx).unwrap();
    let group = &module.children[0];
    assert_eq!(group.kind, NodeKind::VariableDeclarationGroup);
    assert_eq!(group.children[0].kind, NodeKind::ArrowFunction);
    assert_eq!(group.children[0].name.as_deref(), Some("Button"));

    let jsx = "export function App() { return <div />; }";
    let module = summarize("App.jsx", jsx).unwrap();
    assert_eq!(module.children[0].name.as_deref(), Some("App"));
}

#[test]
fn commonjs_module_is_recovered_through_generic_recursion() {
    let js = r#"
const express = require("express");
module.exports = function mount(app) {
    app.get("/", handler);
};
"#;
    let module = summarize("server.js", js).unwrap();
    assert_eq!(module.children.len(), 2);
    let mount = &module.children[1];
    assert_eq!(mount.kind, NodeKind::Function);
    assert_eq!(mount.name.as_deref(), Some("mount"));
    assert_eq!(
        mount.logic_flow,
        vec![LogicNode::Call {
            callee: "app.get".to_string(),
            arguments: vec!["\"/\"".to_string(), "handler".to_string()],
        }]
    );
}

fn nested_arrays(depth: usize) -> String {
    format!("foo({}1{});\n", "[".repeat(depth), "]".repeat(depth))
}

#[test]
fn pathological_nesting_is_an_error_not_a_crash() {
    let err = summarize("deep.js", &nested_arrays(10_000)).unwrap_err();
    assert!(matches!(err, SummarizerError::ParseError(_)), "{err}");

    let shallow = summarize("shallow.js", &nested_arrays(20)).unwrap();
    assert!(shallow.children.is_empty());
}

#[test]
fn deep_function_bodies_keep_the_declaration() {
    let js = format!(
        "export function build() {{ const table = {}1{}; }}\n",
        "[".repeat(5_000),
        "]".repeat(5_000)
    );
    let module = summarize("table.js", &js).unwrap();
    assert_eq!(module.children[0].kind, NodeKind::Function);
    assert_eq!(module.children[0].name.as_deref(), Some("build"));
    assert!(module.children[0].logic_flow.is_empty());
}
