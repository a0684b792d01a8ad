//! # dialog-nlg
//!
//! Document and sentence planning for first-order logic. Given formulas,
//! a template per predicate and a lexicon, the pipeline decides what to
//! say and in what order, how each thing is referred to, and which
//! clauses can share a subject or predicate. The result is a syntax tree
//! ready for an external surface realiser.
//!
//! ## Architecture
//!
//! ```text
//! Formula → Macroplanner (plan)        → DocumentPlan
//!         → Lexicaliser (lexicalise)   → Document
//!         → ReferringExpressionGenerator (reference)
//!         → Aggregator (aggregate)     → Document
//!         → Realiser (realise)         → text
//! ```
//!
//! ## Example
//!
//! ```
//! use dialog_nlg::{Lexicon, Pipeline, Templates};
//!
//! let templates = Templates::from_json(r#"{
//!     "Play": {
//!         "type": "clause",
//!         "subject": { "type": "place_holder", "index": 0 },
//!         "predicate": {
//!             "type": "verb_phrase",
//!             "head": { "lemma": "play", "category": "verb" },
//!             "complements": [{ "type": "place_holder", "index": 1 }]
//!         }
//!     }
//! }"#).unwrap();
//! let lexicon = Lexicon::from_json(r#"{
//!     "entries": {
//!         "john": { "word": "John", "pos": "proper_noun", "gender": "masculine" },
//!         "paul": { "word": "Paul", "pos": "proper_noun", "gender": "masculine" },
//!         "guitar": { "word": "guitar", "pos": "noun" }
//!     }
//! }"#).unwrap();
//!
//! let planned = Pipeline::new(&templates, &lexicon)
//!     .realise_str("Play(john, guitar) & Play(paul, guitar)")
//!     .unwrap();
//!
//! // Display joins uninflected lemmas
//! assert_eq!(planned.document.to_string(), "John and Paul play the guitar");
//! assert!(planned.warnings.is_empty());
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod lexicalise;
pub mod lexicon;
pub mod pipeline;
pub mod plan;
pub mod realise;
pub mod reference;
pub mod syntax;
pub mod template;

pub use aggregate::Aggregator;
pub use config::{AggregationConfig, PipelineConfig, ReferenceConfig};
pub use error::{
    ContentError, LexicalGap, LoadError, NlgError, RealisationError, ReferenceAmbiguity, Warning,
};
pub use lexicalise::Lexicaliser;
pub use lexicon::{LexicalEntry, Lexicon, Pronoun, PronounTable};
pub use pipeline::{Pipeline, Planned, Realised, realise_text};
pub use plan::{Argument, Binding, DocumentPlan, Macroplanner, Message, PlanNode, Polarity, Relation};
pub use realise::Realiser;
pub use reference::{DiscourseState, MentionRecord, ReferenceForm, ReferringExpressionGenerator};
pub use syntax::{
    Category, Clause, CoordinatedPhrase, Document, Features, NounPhrase, Paragraph, SyntaxNode,
    VerbPhrase, Word,
};
pub use template::{PredicateName, Templates};
