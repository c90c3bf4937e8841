use crate::error::{Result, SummarizerError};
use std::path::Path;

/// Extensions eligible for extraction. Anything else is never read.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "js", "json", "ts", "jsx", "tsx", "py", "java", "cpp", "rb", "php", "go", "rs", "swift", "cs",
];

/// Language of an extracted file, derived from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
    Json,
    Python,
    Java,
    Cpp,
    Ruby,
    Php,
    Go,
    Rust,
    Swift,
    CSharp,
    Unknown,
}

impl Language {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "js" => Language::JavaScript,
            "jsx" => Language::Jsx,
            "ts" => Language::TypeScript,
            "tsx" => Language::Tsx,
            "json" => Language::Json,
            "py" => Language::Python,
            "java" => Language::Java,
            "cpp" => Language::Cpp,
            "rb" => Language::Ruby,
            "php" => Language::Php,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "swift" => Language::Swift,
            "cs" => Language::CSharp,
            _ => Language::Unknown,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Get language name as string
    pub fn as_str(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Jsx => "jsx",
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::Json => "json",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Swift => "swift",
            Language::CSharp => "csharp",
            Language::Unknown => "unknown",
        }
    }

    /// Label placed after the opening code fence; empty for unknown languages
    pub fn fence_label(self) -> &'static str {
        match self {
            Language::Unknown => "",
            other => other.as_str(),
        }
    }

    /// Wrap raw file content in a code fence annotated with this language
    pub fn fence(self, content: &str) -> String {
        let mut fenced = String::with_capacity(content.len() + 16);
        fenced.push_str("```");
        fenced.push_str(self.fence_label());
        fenced.push('\n');
        fenced.push_str(content);
        if !content.ends_with('\n') {
            fenced.push('\n');
        }
        fenced.push_str("```");
        fenced
    }

    /// Check if a structural digest can be built for this language
    pub fn supports_summary(self) -> bool {
        matches!(
            self,
            Language::JavaScript | Language::Jsx | Language::TypeScript | Language::Tsx
        )
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> Result<tree_sitter::Language> {
        match self {
            Language::JavaScript | Language::Jsx => Ok(tree_sitter_javascript::LANGUAGE.into()),
            Language::TypeScript => Ok(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
            Language::Tsx => Ok(tree_sitter_typescript::LANGUAGE_TSX.into()),
            _ => Err(SummarizerError::unsupported_language(self.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("ts"), Language::TypeScript);
        assert_eq!(Language::from_extension("TSX"), Language::Tsx);
        assert_eq!(Language::from_extension("js"), Language::JavaScript);
        assert_eq!(Language::from_extension("rs"), Language::Rust);
        assert_eq!(Language::from_extension("md"), Language::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("src/index.ts"), Language::TypeScript);
        assert_eq!(Language::from_path("app/main.py"), Language::Python);
        assert_eq!(Language::from_path("Makefile"), Language::Unknown);
    }

    #[test]
    fn every_whitelisted_extension_has_a_language() {
        for ext in SUPPORTED_EXTENSIONS {
            assert_ne!(Language::from_extension(ext), Language::Unknown, "{ext}");
        }
    }

    #[test]
    fn test_fence() {
        assert_eq!(
            Language::TypeScript.fence("let a = 1;"),
            "```typescript\nlet a = 1;\n```"
        );
        assert_eq!(Language::Unknown.fence("x\n"), "```\nx\n```");
    }

    #[test]
    fn test_supports_summary() {
        assert!(Language::TypeScript.supports_summary());
        assert!(Language::Jsx.supports_summary());
        assert!(!Language::Python.supports_summary());
        assert!(!Language::Json.supports_summary());
    }

    #[test]
    fn test_tree_sitter_language() {
        assert!(Language::TypeScript.tree_sitter_language().is_ok());
        assert!(Language::Tsx.tree_sitter_language().is_ok());
        assert!(Language::JavaScript.tree_sitter_language().is_ok());
        assert!(Language::Go.tree_sitter_language().is_err());
    }
}
