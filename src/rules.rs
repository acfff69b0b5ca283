//! Filename rule matching.
//!
//! A [`Rule`] pairs a set of shell-style glob patterns with a destination
//! directory. A [`Ruleset`] is an ordered list of rules where the first rule
//! whose patterns match a filename wins.
//!
//! # Examples
//!
//! ```
//! use dirsort::rules::{Rule, Ruleset};
//!
//! let rules = Ruleset::new(vec![
//!     Rule::new(["*.jpg"], "images"),
//!     Rule::new(["IMG_*"], "camera"),
//! ]);
//!
//! let rule = rules.select("IMG_0001.JPG").unwrap();
//! assert_eq!(rule.destination().to_str(), Some("images"));
//! assert!(rules.select("notes.xyz").is_none());
//! ```

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};

/// Both sides are lowercased before matching, so the options only need to
/// keep `*` free to cross dots and separators the way `fnmatch` does.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Returns true if `filename` matches any of `patterns`, ignoring case.
///
/// The whole filename must match. An empty pattern list never matches.
pub fn matches<S: AsRef<str>>(filename: &str, patterns: &[S]) -> bool {
    let filename = filename.to_lowercase();
    patterns
        .iter()
        .any(|raw| NamePattern::compile(raw.as_ref()).is_match_lowercase(&filename))
}

/// A compiled, lowercased pattern.
#[derive(Debug, Clone)]
enum NamePattern {
    Glob(Pattern),
    /// Input `glob` still rejects after bracket escaping is compared
    /// literally.
    Literal(String),
}

impl NamePattern {
    fn compile(raw: &str) -> Self {
        let lowered = raw.to_lowercase();

        // Runs of `*` collapse to one since a filename has no directory levels.
        let mut normalized = String::with_capacity(lowered.len());
        for c in lowered.chars() {
            if c == '*' && normalized.ends_with('*') {
                continue;
            }
            normalized.push(c);
        }

        match Pattern::new(&escape_unclosed_brackets(&normalized)) {
            Ok(pattern) => Self::Glob(pattern),
            Err(_) => Self::Literal(lowered),
        }
    }

    /// `filename` must already be lowercase.
    fn is_match_lowercase(&self, filename: &str) -> bool {
        match self {
            Self::Glob(pattern) => pattern.matches_with(filename, MATCH_OPTIONS),
            Self::Literal(text) => text == filename,
        }
    }
}

/// Rewrites every `[` without a closing `]` as `[[]` so it matches itself
/// while the rest of the pattern keeps its wildcards, as `fnmatch` does.
///
/// A `]` right after `[` or `[!` belongs to the class.
fn escape_unclosed_brackets(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut escaped = String::with_capacity(pattern.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '[' {
            escaped.push(chars[i]);
            i += 1;
            continue;
        }

        let mut j = i + 1;
        if chars.get(j) == Some(&'!') {
            j += 1;
        }
        if chars.get(j) == Some(&']') {
            j += 1;
        }
        while j < chars.len() && chars[j] != ']' {
            j += 1;
        }

        if j >= chars.len() {
            escaped.push_str("[[]");
            i += 1;
        } else {
            escaped.extend(&chars[i..=j]);
            i = j + 1;
        }
    }
    escaped
}

/// A set of glob patterns paired with the directory matching files move to.
#[derive(Debug, Clone)]
pub struct Rule {
    patterns: Vec<String>,
    compiled: Vec<NamePattern>,
    destination: PathBuf,
}

impl Rule {
    /// Creates a rule, compiling its patterns once up front.
    ///
    /// `destination` may be absolute or relative to the directory being
    /// organized.
    pub fn new<I, S>(patterns: I, destination: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let compiled = patterns.iter().map(|p| NamePattern::compile(p)).collect();
        Self {
            patterns,
            compiled,
            destination: destination.into(),
        }
    }

    /// The patterns as they were given.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// The destination directory, unresolved.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Returns true if `filename` matches any of this rule's patterns.
    pub fn is_match(&self, filename: &str) -> bool {
        let filename = filename.to_lowercase();
        self.compiled
            .iter()
            .any(|pattern| pattern.is_match_lowercase(&filename))
    }
}

/// An ordered, immutable list of rules for one organizing pass.
#[derive(Debug, Clone, Default)]
pub struct Ruleset {
    rules: Vec<Rule>,
}

impl Ruleset {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Selects the first rule matching `filename`, or `None` if the file is
    /// unclassified. Later rules are not evaluated once one matches.
    pub fn select(&self, filename: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.is_match(filename))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<Rule> for Ruleset {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_ignores_case() {
        assert!(matches("IMG_1.JPG", &["img_*.jpg"]));
        assert!(matches("photo.heic", &["*.HEIC"]));
        assert!(matches("Report.PDF", &["*.pdf"]));
    }

    #[test]
    fn test_empty_pattern_set_never_matches() {
        let empty: [&str; 0] = [];
        assert!(!matches("anything.txt", &empty));
        assert!(!Rule::new(empty, "dest").is_match("anything.txt"));
    }

    #[test]
    fn test_matching_is_anchored() {
        assert!(!matches("notes.txt.bak", &["*.txt"]));
        assert!(!matches("my_invoice-1.pdf", &["invoice-*"]));
        assert!(matches("invoice-1.pdf", &["invoice-*"]));
    }

    #[test]
    fn test_single_char_wildcard() {
        assert!(matches("file1.txt", &["file?.txt"]));
        assert!(!matches("file.txt", &["file?.txt"]));
        assert!(!matches("file12.txt", &["file?.txt"]));
    }

    #[test]
    fn test_character_class() {
        assert!(matches("1cache.tmp", &["[0-9]*.tmp"]));
        assert!(!matches("cache.tmp", &["[0-9]*.tmp"]));
        assert!(matches("cache.tmp", &["[!0-9]*.tmp"]));
    }

    #[test]
    fn test_star_matches_empty_and_leading_dot() {
        assert!(matches(".txt", &["*.txt"]));
        assert!(matches("screenshot", &["*screenshot*"]));
        assert!(matches(".hidden.log", &["*.log"]));
    }

    #[test]
    fn test_unclosed_bracket_is_matched_literally() {
        assert!(matches("[draft.txt", &["[draft.txt"]));
        assert!(!matches("d.txt", &["[draft.txt"]));

        // wildcards after the stray bracket still work
        assert!(matches("[draft-1.txt", &["[draft*.txt"]));
        assert!(matches("[Draft7.TXT", &["[draft?.txt"]));
        assert!(!matches("draft-1.txt", &["[draft*.txt"]));
    }

    #[test]
    fn test_closing_bracket_first_in_class() {
        assert!(matches("].txt", &["[]x].txt"]));
        assert!(matches("x.txt", &["[]x].txt"]));
        assert!(matches("a]bc", &["a]*"]));
    }

    #[test]
    fn test_escape_unclosed_brackets() {
        assert_eq!(escape_unclosed_brackets("[draft*.txt"), "[[]draft*.txt");
        assert_eq!(escape_unclosed_brackets("[0-9]*.tmp"), "[0-9]*.tmp");
        assert_eq!(escape_unclosed_brackets("[!]x]["), "[!]x][[]");
    }

    #[test]
    fn test_double_star_behaves_like_single_star() {
        assert!(matches("a-long-name.txt", &["a**.txt"]));
    }

    #[test]
    fn test_first_match_wins() {
        let rules = Ruleset::new(vec![
            Rule::new(["*.jpg"], "A"),
            Rule::new(["IMG_*"], "B"),
        ]);

        let rule = rules.select("IMG_1.jpg").expect("rule should match");
        assert_eq!(rule.destination(), Path::new("A"));

        let rule = rules.select("IMG_1.png").expect("rule should match");
        assert_eq!(rule.destination(), Path::new("B"));
    }

    #[test]
    fn test_unclassified_file() {
        let rules: Ruleset = [Rule::new(["*.txt", "*.md"], "documents")]
            .into_iter()
            .collect();
        assert!(rules.select("data.xyz").is_none());
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_rule_keeps_original_patterns() {
        let rule = Rule::new(["*.HEIC", "IMG-*.jpg"], "images");
        assert_eq!(rule.patterns(), &["*.HEIC".to_string(), "IMG-*.jpg".to_string()]);
    }
}
