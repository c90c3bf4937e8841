use repodoc_ingest::IngestOutput;

pub fn render_ingest_report(out: &IngestOutput) -> String {
    let walk = &out.walk;

    let mut md = String::new();
    md.push_str(&format!(
        "# Repository `{}`\n\n",
        out.repository.display_name()
    ));
    md.push_str(&format!("- Branch: `{}`\n", out.branch));
    md.push_str(&format!("- Commit: `{}`\n", out.commit));
    md.push_str(&format!("- Entries: `{}`\n", walk.listing_len()));
    md.push_str(&format!(
        "- Extracted: `{}`{}\n\n",
        walk.file_contents.len(),
        if walk.truncated {
            " (file cap reached)"
        } else {
            ""
        }
    ));

    md.push_str("## Structure\n\n```text\n");
    md.push_str(&walk.structure);
    md.push_str("```\n\n");

    md.push_str("## Extracted files\n\n");
    if walk.file_contents.is_empty() {
        md.push_str("None.\n");
    } else {
        md.push_str("| path | language | bytes |\n");
        md.push_str("|---|---|---:|\n");
        for (path, file) in &walk.file_contents {
            md.push_str(&format!(
                "| `{}` | `{}` | `{}` |\n",
                escape_cell(path),
                file.language().as_str(),
                file.source().len()
            ));
        }
    }

    if !walk.skipped.is_empty() {
        md.push_str("\n## Skipped\n\n");
        for skipped in &walk.skipped {
            md.push_str(&format!("- `{}`: {}\n", skipped.path, skipped.reason));
        }
    }
    md
}

pub fn render_prompts(prompts: &[(&str, &str)]) -> String {
    let mut out = String::new();
    for (idx, (path, prompt)) in prompts.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&format!("===== {path} =====\n"));
        out.push_str(prompt.trim_end());
        out.push('\n');
    }
    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use repodoc_ingest::{ExtractedFile, RepoRef, SkippedFile, WalkOutput};

    fn output() -> IngestOutput {
        let mut walk = WalkOutput {
            structure: "src (directory)\n  src/a.ts (file)\n".to_string(),
            truncated: true,
            ..WalkOutput::default()
        };
        walk.file_contents.insert(
            "src/a.ts".to_string(),
            ExtractedFile::new("src/a.ts", "let a;"),
        );
        walk.skipped.push(SkippedFile {
            path: "big.js".to_string(),
            reason: "larger than 10 bytes".to_string(),
        });
        IngestOutput {
            repository: RepoRef::parse("https://github.com/acme/tool.git"),
            branch: "main".to_string(),
            commit: "abc123".to_string(),
            walk,
        }
    }

    #[test]
    fn ingest_report_lists_everything() {
        let md = render_ingest_report(&output());
        assert!(md.starts_with("# Repository `acme/tool`\n"));
        assert!(md.contains("- Extracted: `1` (file cap reached)\n"));
        assert!(md.contains("src (directory)\n  src/a.ts (file)\n```"));
        assert!(md.contains("| `src/a.ts` | `typescript` | `6` |"));
        assert!(md.contains("- `big.js`: larger than 10 bytes"));
    }

    #[test]
    fn prompts_are_separated_by_headers() {
        let text = render_prompts(&[("a.ts", "first\n"), ("b.ts", "second")]);
        assert_eq!(text, "===== a.ts =====\nfirst\n\n===== b.ts =====\nsecond\n");
    }
}
