//! Error and warning types for the text generation pipeline.
//!
//! Fatal conditions are errors: a [`ContentError`] aborts planning before
//! any tree exists, and a [`RealisationError`] comes back from the external
//! realiser untouched. Recoverable conditions are [`Warning`]s, collected in
//! order next to the best-effort tree.

use dialog_logic::ParseError;
use thiserror::Error;

/// A formula the macroplanner cannot turn into messages.
///
/// Every variant names the offending formula and the position of the
/// input statement it came from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContentError {
    #[error("formula {index} `{formula}`: quantified variable '{variable}' is never used")]
    UngroundedQuantifier {
        index: usize,
        formula: String,
        variable: String,
    },

    #[error("formula {index} `{formula}`: variable '{variable}' is not bound by any quantifier")]
    FreeVariable {
        index: usize,
        formula: String,
        variable: String,
    },

    #[error("formula {index} `{formula}`: only negated predicates can be expressed")]
    UnsupportedNegation { index: usize, formula: String },

    #[error(
        "formula {index} `{formula}`: existential '{variable}' over a conjunction cannot be split into messages"
    )]
    UnsupportedExistential {
        index: usize,
        formula: String,
        variable: String,
    },
}

impl ContentError {
    /// The offending formula as text.
    pub fn formula(&self) -> &str {
        match self {
            ContentError::UngroundedQuantifier { formula, .. }
            | ContentError::FreeVariable { formula, .. }
            | ContentError::UnsupportedNegation { formula, .. }
            | ContentError::UnsupportedExistential { formula, .. } => formula,
        }
    }

    /// Position of the input statement the formula came from.
    pub fn index(&self) -> usize {
        match self {
            ContentError::UngroundedQuantifier { index, .. }
            | ContentError::FreeVariable { index, .. }
            | ContentError::UnsupportedNegation { index, .. }
            | ContentError::UnsupportedExistential { index, .. } => *index,
        }
    }
}

/// A missing template or lexicon entry. The lexicaliser falls back to a
/// literal placeholder and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexicalGap {
    #[error("no template for predicate '{predicate}'")]
    MissingTemplate { predicate: String },

    #[error("no lexicon entry for '{key}'")]
    MissingEntry { key: String },

    #[error("template for '{predicate}' takes {expected} arguments but the message has {found}")]
    ArityMismatch {
        predicate: String,
        expected: usize,
        found: usize,
    },
}

/// A definite description that still fits more than one entity in the
/// discourse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("reference to '{entity}' as \"{description}\" is ambiguous")]
pub struct ReferenceAmbiguity {
    pub entity: String,
    pub description: String,
}

/// A recoverable problem reported alongside the planned document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error(transparent)]
    LexicalGap(#[from] LexicalGap),

    #[error(transparent)]
    ReferenceAmbiguity(#[from] ReferenceAmbiguity),
}

/// A failure reported by the external realiser. Passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RealisationError {
    pub message: String,
}

impl RealisationError {
    pub fn new(message: impl Into<String>) -> Self {
        RealisationError {
            message: message.into(),
        }
    }
}

/// Problems found while loading templates, lexicons or configuration.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("'{name}' is not a valid predicate name")]
    InvalidPredicateName { name: String },

    #[error("'{key}' is not a valid lexicon key")]
    InvalidLexiconKey { key: String },

    #[error("template for '{predicate}' is not a clause")]
    NotAClause { predicate: String },

    #[error("template for '{predicate}' has no placeholder {missing}")]
    PlaceholderGap { predicate: String, missing: usize },
}

/// Anything that stops a pipeline call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NlgError {
    #[error("could not read formulas: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Realisation(#[from] RealisationError),
}
