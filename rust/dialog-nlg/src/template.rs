//! Clause templates keyed by predicate name.
//!
//! A template is a clause skeleton whose [`PlaceHolder`](crate::syntax::PlaceHolder)
//! slots take the message arguments in order. Templates are checked when
//! they are added: the name must be a predicate name and the placeholders
//! must cover `0..n` with no gaps, so a template's arity is known before
//! any formula arrives.

use crate::error::LoadError;
use crate::syntax::{Clause, SyntaxNode};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// A validated predicate name: an uppercase letter followed by letters,
/// digits or underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PredicateName(String);

impl PredicateName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PredicateName {
    type Err = LoadError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let mut chars = name.chars();
        let valid = chars.next().is_some_and(char::is_uppercase)
            && chars.all(|c| c.is_alphanumeric() || c == '_');
        if valid {
            Ok(PredicateName(name.to_string()))
        } else {
            Err(LoadError::InvalidPredicateName { name: name.into() })
        }
    }
}

impl TryFrom<String> for PredicateName {
    type Error = LoadError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<PredicateName> for String {
    fn from(name: PredicateName) -> Self {
        name.0
    }
}

impl Borrow<str> for PredicateName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PredicateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A checked clause skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    clause: Clause,
    arity: usize,
}

impl Template {
    fn new(predicate: &PredicateName, skeleton: SyntaxNode) -> Result<Self, LoadError> {
        let indices: BTreeSet<usize> = skeleton.placeholders().into_iter().collect();
        let SyntaxNode::Clause(clause) = skeleton else {
            return Err(LoadError::NotAClause {
                predicate: predicate.to_string(),
            });
        };
        // Indices must be exactly 0..n
        if let Some(missing) = (0..indices.len()).find(|i| !indices.contains(i)) {
            return Err(LoadError::PlaceholderGap {
                predicate: predicate.to_string(),
                missing,
            });
        }
        Ok(Template {
            clause,
            arity: indices.len(),
        })
    }

    pub fn clause(&self) -> &Clause {
        &self.clause
    }

    /// Number of arguments the template takes.
    pub fn arity(&self) -> usize {
        self.arity
    }
}

/// Templates for a domain, keyed by predicate name.
///
/// ```
/// use dialog_nlg::Templates;
///
/// let templates = Templates::from_json(r#"{
///     "Play": {
///         "type": "clause",
///         "subject": { "type": "place_holder", "index": 0 },
///         "predicate": {
///             "type": "verb_phrase",
///             "head": { "lemma": "play", "category": "verb" },
///             "complements": [{ "type": "place_holder", "index": 1 }]
///         }
///     }
/// }"#).unwrap();
///
/// assert_eq!(templates.get("Play").unwrap().arity(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Templates {
    templates: HashMap<PredicateName, Template>,
}

impl Templates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let source: HashMap<PredicateName, SyntaxNode> = serde_json::from_str(json)?;
        let mut templates = Templates::new();
        for (name, skeleton) in source {
            let template = Template::new(&name, skeleton)?;
            templates.templates.insert(name, template);
        }
        Ok(templates)
    }

    pub fn insert(&mut self, predicate: &str, skeleton: impl Into<SyntaxNode>) -> Result<(), LoadError> {
        let name: PredicateName = predicate.parse()?;
        let template = Template::new(&name, skeleton.into())?;
        self.templates.insert(name, template);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, predicate: &str, skeleton: impl Into<SyntaxNode>) -> Result<Self, LoadError> {
        self.insert(predicate, skeleton)?;
        Ok(self)
    }

    pub fn get(&self, predicate: &str) -> Option<&Template> {
        self.templates.get(predicate)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Category, VerbPhrase, Word};
    use pretty_assertions::assert_eq;

    fn verb(lemma: &str) -> VerbPhrase {
        VerbPhrase::new(Word::new(lemma, Category::Verb))
    }

    #[test]
    fn test_predicate_names() {
        assert!("Play".parse::<PredicateName>().is_ok());
        assert!("Has_Part2".parse::<PredicateName>().is_ok());
        assert!("play".parse::<PredicateName>().is_err());
        assert!("".parse::<PredicateName>().is_err());
        assert!("Play guitar".parse::<PredicateName>().is_err());
    }

    #[test]
    fn test_arity() {
        let templates = Templates::new()
            .with(
                "Play",
                Clause::new(
                    SyntaxNode::placeholder(0),
                    verb("play").with_complement(SyntaxNode::placeholder(1)).into(),
                ),
            )
            .unwrap()
            .with(
                "Admire",
                Clause::new(
                    SyntaxNode::placeholder(0),
                    verb("admire").with_complement(SyntaxNode::placeholder(0)).into(),
                ),
            )
            .unwrap();
        assert_eq!(templates.get("Play").unwrap().arity(), 2);
        assert_eq!(templates.get("Admire").unwrap().arity(), 1);
        assert!(templates.get("Sing").is_none());
    }

    #[test]
    fn test_placeholder_gap() {
        let err = Templates::new()
            .with(
                "Give",
                Clause::new(
                    SyntaxNode::placeholder(0),
                    verb("give").with_complement(SyntaxNode::placeholder(2)).into(),
                ),
            )
            .unwrap_err();
        assert!(matches!(err, LoadError::PlaceholderGap { missing: 1, .. }));
    }

    #[test]
    fn test_not_a_clause() {
        let err = Templates::new()
            .with("Guitar", SyntaxNode::literal("guitar"))
            .unwrap_err();
        assert!(matches!(err, LoadError::NotAClause { predicate } if predicate == "Guitar"));
    }

    #[test]
    fn test_json_rejects_bad_name() {
        let err = Templates::from_json(
            r#"{ "play": { "type": "clause", "predicate": { "type": "verb_phrase", "head": { "lemma": "play", "category": "verb" } } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }
}
