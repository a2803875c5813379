//! Maps free-form text to a greeting, a topic explanation, or the fallback.

use tracing::info;

use crate::helper::catalog::{Catalog, TopicEntry};
use crate::helper::message::preview;

/// Reply when neither a greeting nor a topic matches.
pub const FALLBACK_REPLY: &str = "Sorry, I don't recognize that Git command. Try again!";

/// Which branch of the matcher produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    Greeting(&'a str),
    Topic { entry: &'a TopicEntry, keyword: &'a str },
    Fallback,
}

impl Outcome<'_> {
    pub fn render(&self) -> String {
        match self {
            Outcome::Greeting(reply) => reply.to_string(),
            Outcome::Topic { entry, .. } => entry.explanation(),
            Outcome::Fallback => FALLBACK_REPLY.to_string(),
        }
    }

    /// Short description of the branch taken, for logs.
    pub fn label(&self) -> String {
        match self {
            Outcome::Greeting(_) => "greeting".to_string(),
            Outcome::Topic { entry, keyword } => format!("{} (keyword {:?})", entry.id, keyword),
            Outcome::Fallback => "fallback".to_string(),
        }
    }
}

/// Stateless matcher over an immutable catalog.
///
/// Topics are scanned in definition order and the first topic with any
/// keyword contained in the lowercased input wins. Greetings are checked
/// first and only match the whole input.
#[derive(Debug)]
pub struct Matcher {
    catalog: Catalog,
}

impl Matcher {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn classify(&self, input: &str) -> Outcome<'_> {
        let normalized = input.to_lowercase();

        if let Some(reply) = self.catalog.lookup_greeting(&normalized) {
            return Outcome::Greeting(reply);
        }

        self.catalog
            .entries()
            .iter()
            .find_map(|entry| {
                entry
                    .matching_keyword(&normalized)
                    .map(|keyword| Outcome::Topic { entry, keyword })
            })
            .unwrap_or(Outcome::Fallback)
    }

    /// Reply text for `input`. Never fails.
    pub fn explain(&self, input: &str) -> String {
        self.classify(input).render()
    }

    /// `explain`, logging which branch answered. Every front door goes
    /// through here.
    pub fn respond(&self, origin: &str, input: &str) -> String {
        let outcome = self.classify(input);
        info!("📨 {}: \"{}\" → {}", origin, preview(input), outcome.label());
        outcome.render()
    }
}
