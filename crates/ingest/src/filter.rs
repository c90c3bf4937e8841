use repodoc_summarizer::SUPPORTED_EXTENSIONS;

/// Rules applied when no ignore list is configured
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    // dependencies / VCS / build output
    "node_modules/",
    ".git",
    "dist/",
    "build/",
    "coverage/",
    // noisy file types
    "*.log",
    "*.env",
    "*.lock",
    "*.md",
    "*.min.js",
    // tooling files
    "package-lock.json",
    ".vscode",
    ".editorconfig",
    ".gitignore",
    "license",
    "LICENSE",
    "tsconfig.json",
    ".dockerignore",
    "tailwind.config.ts",
    // sample and test code
    "examples",
    "example",
    "tests",
    "test",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rule {
    /// `*.log`: the path ends with the suffix
    Suffix(String),
    /// `/vendor`: the path starts at the repository root with these segments
    Anchored(Vec<String>),
    /// `node_modules/`, `.git`, `src/gen`: these segments appear anywhere in the path
    Segments(Vec<String>),
}

impl Rule {
    fn parse(pattern: &str) -> Option<Self> {
        let pattern = pattern.trim();
        if let Some(suffix) = pattern.strip_prefix('*') {
            return (!suffix.is_empty()).then(|| Rule::Suffix(suffix.to_string()));
        }
        let anchored = pattern.starts_with('/');
        let segments: Vec<String> = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if segments.is_empty() {
            return None;
        }
        Some(if anchored {
            Rule::Anchored(segments)
        } else {
            Rule::Segments(segments)
        })
    }

    fn matches(&self, path: &str, components: &[&str]) -> bool {
        match self {
            Rule::Suffix(suffix) => path.ends_with(suffix.as_str()),
            Rule::Anchored(segments) => {
                components.len() >= segments.len()
                    && components.iter().zip(segments).all(|(c, s)| *c == s.as_str())
            }
            Rule::Segments(segments) => components
                .windows(segments.len())
                .any(|window| window.iter().zip(segments).all(|(c, s)| *c == s.as_str())),
        }
    }
}

/// Ordered ignore patterns, parsed once per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRuleSet {
    patterns: Vec<String>,
    rules: Vec<Rule>,
}

impl IgnoreRuleSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns: Vec<String> = patterns.iter().map(|p| p.as_ref().to_string()).collect();
        let rules = patterns
            .iter()
            .filter_map(|p| {
                let rule = Rule::parse(p);
                if rule.is_none() {
                    log::warn!("Ignoring empty ignore pattern {p:?}");
                }
                rule
            })
            .collect();
        Self { patterns, rules }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Check a repository-relative, forward-slash separated path
    pub fn is_ignored(&self, path: &str) -> bool {
        let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
        self.rules.iter().any(|rule| rule.matches(path, &components))
    }
}

impl Default for IgnoreRuleSet {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_PATTERNS)
    }
}

/// Decides which paths are eligible for extraction
#[derive(Debug, Clone)]
pub struct FilterPolicy {
    rules: IgnoreRuleSet,
    max_file_bytes: u64,
}

impl FilterPolicy {
    pub fn new(rules: IgnoreRuleSet, max_file_bytes: u64) -> Self {
        Self {
            rules,
            max_file_bytes,
        }
    }

    /// Not ignored and carrying a whitelisted extension
    pub fn should_include(&self, path: &str) -> bool {
        !self.rules.is_ignored(path) && Self::is_source_file(path)
    }

    pub fn fits(&self, len: u64) -> bool {
        len <= self.max_file_bytes
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    fn is_source_file(path: &str) -> bool {
        let name = path.rsplit('/').next().unwrap_or(path);
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                let ext = ext.to_lowercase();
                SUPPORTED_EXTENSIONS.iter().any(|candidate| *candidate == ext)
            }
            _ => false,
        }
    }
}

/// Global cap on accepted files
///
/// Callers ask [`has_room`](Self::has_room) before reading a blob and
/// [`consume`](Self::consume) once it is accepted; failed reads cost nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionBudget {
    limit: usize,
    taken: usize,
}

impl ExtractionBudget {
    pub fn new(limit: usize) -> Self {
        Self { limit, taken: 0 }
    }

    pub fn has_room(&self) -> bool {
        self.taken < self.limit
    }

    /// Record one accepted file; returns false once the cap is reached
    pub fn consume(&mut self) -> bool {
        if !self.has_room() {
            return false;
        }
        self.taken += 1;
        true
    }

    pub fn taken(&self) -> usize {
        self.taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn policy() -> FilterPolicy {
        FilterPolicy::new(IgnoreRuleSet::default(), 1024)
    }

    #[test]
    fn excludes_ignored_segments_everywhere() {
        let policy = policy();
        for segment in [
            "node_modules",
            ".git",
            "dist",
            "build",
            "coverage",
            "examples",
            "example",
            "tests",
            "test",
        ] {
            for path in [
                format!("{segment}/a.ts"),
                format!("src/{segment}/a.ts"),
                format!("src/{segment}/deep/a.ts"),
            ] {
                assert!(!policy.should_include(&path), "{path} should be excluded");
            }
        }
    }

    #[test]
    fn segment_rules_do_not_match_substrings() {
        let policy = policy();
        assert!(policy.should_include("src/testing/a.ts"));
        assert!(policy.should_include("src/contest.ts"));
        assert!(policy.should_include("src/builder/a.ts"));
        assert!(policy.should_include(".github/scripts/release.js"));
    }

    #[test]
    fn excludes_suffixes_and_named_files() {
        let policy = policy();
        for path in [
            "README.md",
            "docs/guide.md",
            "public/app.min.js",
            "yarn.lock",
            "server.log",
            "config/.env",
            "package-lock.json",
            "web/tsconfig.json",
            "tailwind.config.ts",
            ".vscode/settings.json",
        ] {
            assert!(!policy.should_include(path), "{path} should be excluded");
        }
    }

    #[test]
    fn extension_whitelist() {
        let policy = policy();
        assert!(policy.should_include("src/index.ts"));
        assert!(policy.should_include("src/App.TSX"));
        assert!(policy.should_include("package.json"));
        assert!(policy.should_include("main.go"));
        assert!(!policy.should_include("style.css"));
        assert!(!policy.should_include("Makefile"));
        assert!(!policy.should_include("src/.ts"));
    }

    #[test]
    fn anchored_rules_only_match_from_root() {
        let rules = IgnoreRuleSet::new(&["/vendor", "src/gen/"]);
        assert!(rules.is_ignored("vendor/lib.js"));
        assert!(!rules.is_ignored("pkg/vendor/lib.js"));
        assert!(rules.is_ignored("app/src/gen/api.ts"));
        assert!(!rules.is_ignored("src/generated/api.ts"));
    }

    #[test]
    fn budget_counts_accepted_files() {
        let mut budget = ExtractionBudget::new(2);
        assert!(budget.consume());
        assert!(budget.has_room());
        assert!(budget.consume());
        assert!(!budget.has_room());
        assert!(!budget.consume());
        assert_eq!(budget.taken(), 2);
    }

    #[test]
    fn size_cap() {
        let policy = policy();
        assert!(policy.fits(1024));
        assert!(!policy.fits(1025));
    }
}
