//! The lexicon: words for constants and predicates, and the pronoun table.
//!
//! Keys are the names used in formulas (`john`, `guitar`, `play`). An
//! entry supplies the head word, its part of speech, agreement attributes
//! and any irregular forms. A constant's entry also decides the
//! attributes of the entity it names.
//!
//! ```
//! use dialog_nlg::Lexicon;
//! use dialog_logic::Gender;
//!
//! let lexicon = Lexicon::from_json(r#"{
//!     "entries": {
//!         "john": { "word": "John", "pos": "proper_noun", "gender": "masculine", "class": "musician" },
//!         "guitar": { "word": "guitar", "pos": "noun" }
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(lexicon.entry("john").unwrap().gender, Gender::Masculine);
//! assert!(lexicon.entry("bass").is_none());
//! ```

use crate::error::LoadError;
use crate::syntax::{Case, Category, Inflection};
use dialog_logic::{Gender, Number};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalEntry {
    pub word: String,
    #[serde(rename = "pos")]
    pub category: Category,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub number: Number,
    /// Common noun for definite descriptions. Defaults to `word`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub forms: BTreeMap<Inflection, String>,
}

impl LexicalEntry {
    pub fn new(word: impl Into<String>, category: Category) -> Self {
        LexicalEntry {
            word: word.into(),
            category,
            gender: Gender::default(),
            number: Number::default(),
            class: None,
            forms: BTreeMap::new(),
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_number(mut self, number: Number) -> Self {
        self.number = number;
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_form(mut self, inflection: Inflection, form: impl Into<String>) -> Self {
        self.forms.insert(inflection, form.into());
        self
    }

    pub fn class(&self) -> &str {
        self.class.as_deref().unwrap_or(&self.word)
    }

    pub fn is_proper(&self) -> bool {
        self.category == Category::ProperNoun
    }
}

/// One pronoun form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pronoun {
    pub gender: Gender,
    pub number: Number,
    pub case: Case,
    pub word: String,
}

/// Pronoun forms by gender, number and case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Pronoun>", into = "Vec<Pronoun>")]
pub struct PronounTable {
    forms: HashMap<(Gender, Number, Case), String>,
}

impl PronounTable {
    /// English personal pronouns.
    ///
    /// Neuter forms are left out: without them, things are always
    /// re-described and never called "it".
    pub fn english() -> Self {
        use Case::*;
        use Gender::*;
        let mut table = PronounTable::default();
        for (gender, number, forms) in [
            (Masculine, Number::Singular, ["he", "him", "himself"]),
            (Feminine, Number::Singular, ["she", "her", "herself"]),
            (Epicene, Number::Singular, ["they", "them", "themself"]),
            (Epicene, Number::Plural, ["they", "them", "themselves"]),
        ] {
            for (case, word) in [Subjective, Objective, Reflexive].into_iter().zip(forms) {
                table.insert(gender, number, case, word);
            }
        }
        table
    }

    pub fn insert(&mut self, gender: Gender, number: Number, case: Case, word: impl Into<String>) {
        self.forms.insert((gender, number, case), word.into());
    }

    /// The pronoun for an entity, if the table has one.
    ///
    /// Plurals of any gender fall back to the epicene plural.
    pub fn lookup(&self, gender: Gender, number: Number, case: Case) -> Option<&str> {
        self.forms
            .get(&(gender, number, case))
            .or_else(|| match number {
                Number::Plural => self.forms.get(&(Gender::Epicene, Number::Plural, case)),
                Number::Singular => None,
            })
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl From<Vec<Pronoun>> for PronounTable {
    fn from(pronouns: Vec<Pronoun>) -> Self {
        let mut table = PronounTable::default();
        for pronoun in pronouns {
            table.insert(pronoun.gender, pronoun.number, pronoun.case, pronoun.word);
        }
        table
    }
}

impl From<PronounTable> for Vec<Pronoun> {
    fn from(table: PronounTable) -> Self {
        let mut pronouns: Vec<Pronoun> = table
            .forms
            .into_iter()
            .map(|((gender, number, case), word)| Pronoun {
                gender,
                number,
                case,
                word,
            })
            .collect();
        pronouns.sort_by(|a, b| a.word.cmp(&b.word));
        pronouns
    }
}

#[derive(Deserialize)]
struct LexiconSource {
    #[serde(default)]
    entries: HashMap<String, LexicalEntry>,
    #[serde(default = "PronounTable::english")]
    pronouns: PronounTable,
}

/// Words for the constants and predicates of a domain. Read-only once
/// loaded, so one lexicon can serve any number of pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    entries: HashMap<String, LexicalEntry>,
    pronouns: PronounTable,
}

impl Default for Lexicon {
    fn default() -> Self {
        Lexicon {
            entries: HashMap::new(),
            pronouns: PronounTable::english(),
        }
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_alphanumeric() || c == '_')
}

impl Lexicon {
    /// An empty lexicon with English pronouns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a lexicon. `pronouns` may be omitted to get the English table.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let source: LexiconSource = serde_json::from_str(json)?;
        let mut lexicon = Lexicon {
            entries: HashMap::with_capacity(source.entries.len()),
            pronouns: source.pronouns,
        };
        for (key, entry) in source.entries {
            lexicon.insert(key, entry)?;
        }
        Ok(lexicon)
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: LexicalEntry) -> Result<(), LoadError> {
        let key = key.into();
        if !is_valid_key(&key) {
            return Err(LoadError::InvalidLexiconKey { key });
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_entry(mut self, key: impl Into<String>, entry: LexicalEntry) -> Result<Self, LoadError> {
        self.insert(key, entry)?;
        Ok(self)
    }

    pub fn with_pronouns(mut self, pronouns: PronounTable) -> Self {
        self.pronouns = pronouns;
        self
    }

    pub fn entry(&self, key: &str) -> Option<&LexicalEntry> {
        self.entries.get(key)
    }

    pub fn pronouns(&self) -> &PronounTable {
        &self.pronouns
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_english_pronouns() {
        let table = PronounTable::english();
        assert_eq!(
            table.lookup(Gender::Masculine, Number::Singular, Case::Subjective),
            Some("he")
        );
        assert_eq!(
            table.lookup(Gender::Feminine, Number::Singular, Case::Reflexive),
            Some("herself")
        );
        assert_eq!(
            table.lookup(Gender::Neuter, Number::Plural, Case::Objective),
            Some("them")
        );
        assert_eq!(table.lookup(Gender::Neuter, Number::Singular, Case::Subjective), None);
    }

    #[test]
    fn test_custom_pronouns_replace_english() {
        let lexicon = Lexicon::from_json(
            r#"{
                "entries": {},
                "pronouns": [
                    { "gender": "neuter", "number": "singular", "case": "subjective", "word": "it" }
                ]
            }"#,
        )
        .unwrap();
        let pronouns = lexicon.pronouns();
        assert_eq!(
            pronouns.lookup(Gender::Neuter, Number::Singular, Case::Subjective),
            Some("it")
        );
        assert_eq!(
            pronouns.lookup(Gender::Masculine, Number::Singular, Case::Subjective),
            None
        );
    }

    #[test]
    fn test_entry_defaults() {
        let lexicon = Lexicon::from_json(
            r#"{ "entries": { "drums": { "word": "drums", "pos": "noun", "number": "plural" },
                             "have": { "word": "have", "pos": "verb", "forms": { "present_third": "has" } } } }"#,
        )
        .unwrap();
        let drums = lexicon.entry("drums").unwrap();
        assert_eq!(drums.gender, Gender::Neuter);
        assert_eq!(drums.number, Number::Plural);
        assert_eq!(drums.class(), "drums");
        assert!(!drums.is_proper());
        assert_eq!(
            lexicon.entry("have").unwrap().forms.get(&Inflection::PresentThird),
            Some(&"has".to_string())
        );
        assert!(!lexicon.pronouns().is_empty());
    }

    #[test]
    fn test_rejects_bad_key() {
        let err = Lexicon::from_json(r#"{ "entries": { "bass guitar": { "word": "x", "pos": "noun" } } }"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::InvalidLexiconKey { key } if key == "bass guitar"));
    }

    #[test]
    fn test_rejects_unknown_category() {
        let err = Lexicon::from_json(r#"{ "entries": { "john": { "word": "John", "pos": "name" } } }"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }
}
