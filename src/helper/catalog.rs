//! Static reference data: Git topics and canned greetings.
//!
//! The catalog is loaded once at startup (either the built-in table or a JSON
//! file with the same shape) and is read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// Built-in Git catalog, compiled into the binary.
const BUILTIN_CATALOG: &str = include_str!("../../data/git_help.json");

/// Errors raised while building a catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// Failed to read the catalog file.
    ReadFile { path: PathBuf, source: std::io::Error },
    /// Failed to parse JSON.
    ParseJson(serde_json::Error),
    /// Two topics share the same id.
    DuplicateId(String),
    /// A topic has no keywords.
    EmptyKeywords(String),
    /// A keyword is empty or not lowercase.
    InvalidKeyword { id: String, keyword: String },
    /// Two greetings share the same phrase.
    DuplicateGreeting(String),
    /// A greeting phrase is empty or not lowercase.
    InvalidGreeting(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read catalog file '{}': {}", path.display(), source)
            }
            Self::ParseJson(source) => write!(f, "failed to parse catalog: {}", source),
            Self::DuplicateId(id) => write!(f, "duplicate topic id '{}'", id),
            Self::EmptyKeywords(id) => write!(f, "topic '{}' has no keywords", id),
            Self::InvalidKeyword { id, keyword } => write!(
                f,
                "topic '{}' has invalid keyword {:?} (keywords must be non-empty lowercase)",
                id, keyword
            ),
            Self::DuplicateGreeting(phrase) => write!(f, "duplicate greeting {:?}", phrase),
            Self::InvalidGreeting(phrase) => write!(
                f,
                "invalid greeting {:?} (phrases must be non-empty lowercase)",
                phrase
            ),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseJson(source) => Some(source),
            _ => None,
        }
    }
}

/// One command-reference topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicEntry {
    pub id: String,
    /// Multi-line explanation, including a numbered step list.
    pub description: String,
    /// Single-line usage example.
    pub example: String,
    /// Trigger words in match order.
    pub keywords: Vec<String>,
}

impl TopicEntry {
    /// First keyword (in definition order) contained in `normalized`.
    pub fn matching_keyword(&self, normalized: &str) -> Option<&str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .find(|keyword| normalized.contains(*keyword))
    }

    /// The reply text for this topic.
    pub fn explanation(&self) -> String {
        format!("{}\nExample: {}", self.description, self.example)
    }
}

/// An exact phrase answered with a canned reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetingEntry {
    pub phrase: String,
    pub reply: String,
}

#[derive(Deserialize)]
struct CatalogFile {
    topics: Vec<TopicEntry>,
    #[serde(default)]
    greetings: Vec<GreetingEntry>,
}

/// Validated, immutable topic and greeting tables.
#[derive(Debug, Clone)]
pub struct Catalog {
    topics: Vec<TopicEntry>,
    greetings: HashMap<String, String>,
}

fn is_normalized(s: &str) -> bool {
    !s.is_empty() && s.to_lowercase() == s
}

impl Catalog {
    pub fn new(topics: Vec<TopicEntry>, greetings: Vec<GreetingEntry>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        for topic in &topics {
            if !ids.insert(topic.id.as_str()) {
                return Err(CatalogError::DuplicateId(topic.id.clone()));
            }
            if topic.keywords.is_empty() {
                return Err(CatalogError::EmptyKeywords(topic.id.clone()));
            }
            if let Some(bad) = topic.keywords.iter().find(|k| !is_normalized(k)) {
                return Err(CatalogError::InvalidKeyword {
                    id: topic.id.clone(),
                    keyword: bad.clone(),
                });
            }
        }

        let mut table = HashMap::with_capacity(greetings.len());
        for GreetingEntry { phrase, reply } in greetings {
            if !is_normalized(&phrase) {
                return Err(CatalogError::InvalidGreeting(phrase));
            }
            if table.contains_key(&phrase) {
                return Err(CatalogError::DuplicateGreeting(phrase));
            }
            table.insert(phrase, reply);
        }

        Ok(Self { topics, greetings: table })
    }

    /// The Git catalog shipped with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Load a catalog from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(content).map_err(CatalogError::ParseJson)?;
        Self::new(file.topics, file.greetings)
    }

    /// Exact-phrase greeting lookup.
    pub fn lookup_greeting(&self, phrase: &str) -> Option<&str> {
        self.greetings.get(phrase).map(String::as_str)
    }

    /// Topics in definition order.
    pub fn entries(&self) -> &[TopicEntry] {
        &self.topics
    }

    pub fn greeting_count(&self) -> usize {
        self.greetings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn topic(id: &str, keywords: &[&str]) -> TopicEntry {
        TopicEntry {
            id: id.to_string(),
            description: format!("{id} description"),
            example: format!("`git {id}`"),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn greeting(phrase: &str) -> GreetingEntry {
        GreetingEntry {
            phrase: phrase.to_string(),
            reply: format!("reply to {phrase}"),
        }
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().expect("builtin catalog must be valid");
        assert_eq!(catalog.entries().len(), 16);
        assert_eq!(catalog.greeting_count(), 4);
        assert_eq!(catalog.entries()[0].id, "init");
        assert!(catalog.entries().iter().any(|t| t.id == "fetch"));
    }

    #[test]
    fn test_builtin_merge_precedes_branch() {
        let catalog = Catalog::builtin().unwrap();
        let position = |id: &str| catalog.entries().iter().position(|t| t.id == id).unwrap();
        assert!(position("merge") < position("branch"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = Catalog::new(vec![topic("add", &["add"]), topic("add", &["stage"])], vec![])
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(ref id) if id == "add"));
    }

    #[test]
    fn test_empty_keywords_rejected() {
        let err = Catalog::new(vec![topic("log", &[])], vec![]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyKeywords(_)));
        assert!(err.to_string().contains("log"));
    }

    #[test]
    fn test_empty_keyword_string_rejected() {
        let err = Catalog::new(vec![topic("log", &["log", ""])], vec![]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidKeyword { .. }));
    }

    #[test]
    fn test_uppercase_keyword_rejected() {
        let err = Catalog::new(vec![topic("log", &["History"])], vec![]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidKeyword { ref keyword, .. } if keyword == "History"));
    }

    #[test]
    fn test_overlapping_keywords_allowed() {
        let catalog = Catalog::new(
            vec![topic("commit", &["commit", "save"]), topic("stash", &["stash", "save"])],
            vec![],
        );
        assert!(catalog.is_ok());
    }

    #[test]
    fn test_duplicate_greeting_rejected() {
        let err = Catalog::new(vec![], vec![greeting("hi"), greeting("hi")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateGreeting(_)));
    }

    #[test]
    fn test_uppercase_greeting_rejected() {
        let err = Catalog::new(vec![], vec![greeting("Hi")]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidGreeting(_)));
    }

    #[test]
    fn test_lookup_greeting_is_exact() {
        let catalog = Catalog::new(vec![], vec![greeting("hi")]).unwrap();
        assert_eq!(catalog.lookup_greeting("hi"), Some("reply to hi"));
        assert_eq!(catalog.lookup_greeting("hi there"), None);
        assert_eq!(catalog.lookup_greeting("h"), None);
    }

    #[test]
    fn test_entries_keep_definition_order() {
        let catalog = Catalog::new(
            vec![topic("push", &["push"]), topic("add", &["add"]), topic("log", &["log"])],
            vec![],
        )
        .unwrap();
        let ids: Vec<&str> = catalog.entries().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["push", "add", "log"]);
    }

    #[test]
    fn test_matching_keyword_follows_keyword_order() {
        let entry = topic("diff", &["diff", "difference", "compare"]);
        assert_eq!(entry.matching_keyword("what is the difference"), Some("diff"));
        assert_eq!(entry.matching_keyword("compare two commits"), Some("compare"));
        assert_eq!(entry.matching_keyword("nothing here"), None);
    }

    #[test]
    fn test_explanation_format() {
        let entry = topic("log", &["log"]);
        assert_eq!(entry.explanation(), "log description\nExample: `git log`");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
                "topics": [{"id": "tag", "description": "Tags.", "example": "`git tag v1`", "keywords": ["tag"]}],
                "greetings": [{"phrase": "yo", "reply": "Yo!"}]
            }"#,
        )
        .unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.entries().len(), 1);
        assert_eq!(catalog.lookup_greeting("yo"), Some("Yo!"));
    }

    #[test]
    fn test_greetings_optional_in_file() {
        let catalog = Catalog::from_json(
            r#"{"topics": [{"id": "tag", "description": "d", "example": "e", "keywords": ["tag"]}]}"#,
        )
        .unwrap();
        assert_eq!(catalog.greeting_count(), 0);
    }

    #[test]
    fn test_missing_file() {
        let err = Catalog::load("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, CatalogError::ReadFile { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let err = Catalog::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CatalogError::ParseJson(_)));
    }
}
