use repodoc_ingest::{DocumentationUnit, FileDigest};

/// Build the single prompt string for one file
///
/// The prompt carries the repository name, the full structure listing and the
/// file's digest (compact JSON) or fenced raw content.
pub fn build_prompt(repo_name: &str, structure: &str, unit: &DocumentationUnit) -> String {
    let (label, body) = match &unit.digest {
        FileDigest::Structural(node) => (
            "Structural digest (JSON; declarations, signatures and a control-flow skeleton)",
            node.to_digest(),
        ),
        FileDigest::Raw(fenced) => ("Source", fenced.clone()),
    };

    let mut prompt = String::with_capacity(structure.len() + body.len() + 512);
    prompt.push_str(&format!(
        "You are writing documentation for the repository \"{repo_name}\".\n\n"
    ));
    prompt.push_str("Repository structure:\n");
    prompt.push_str(structure.trim_end());
    prompt.push_str("\n\n");
    prompt.push_str(&format!(
        "File: {} ({})\n{label}:\n{body}\n\n",
        unit.path,
        unit.language.as_str()
    ));
    prompt.push_str(
        "Write Markdown documentation for this file. Describe its purpose and its public API, \
         then explain how it fits into the repository. Do not invent code that is not shown.\n",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use repodoc_summarizer::{Language, NodeKind, StructuralNode};

    #[test]
    fn raw_units_embed_the_fenced_source() {
        let unit = DocumentationUnit {
            path: "main.go".to_string(),
            language: Language::Go,
            digest: FileDigest::Raw("```go\npackage main\n```".to_string()),
        };
        let prompt = build_prompt("acme/tool", "main.go (file)\n", &unit);
        assert!(prompt.contains("\"acme/tool\""));
        assert!(prompt.contains("Repository structure:\nmain.go (file)\n\n"));
        assert!(prompt.contains("File: main.go (go)\nSource:\n```go\npackage main\n```"));
    }

    #[test]
    fn structural_units_embed_compact_json() {
        let module = StructuralNode::new(NodeKind::Module)
            .with_children(vec![StructuralNode::new(NodeKind::Function).named("add")]);
        let unit = DocumentationUnit {
            path: "math.ts".to_string(),
            language: Language::TypeScript,
            digest: FileDigest::Structural(module.clone()),
        };
        let prompt = build_prompt("math", "math.ts (file)", &unit);
        assert!(prompt.contains(&module.to_digest()));
        assert!(prompt.contains("File: math.ts (typescript)\nStructural digest"));
    }
}
